use chrono::{Datelike, Duration, NaiveDate, Timelike};

use crate::model::*;

use super::EngineError;

/// How many days the next-workday scan looks ahead. A workday set that
/// matches nothing within this bound is a configuration error.
const WORKDAY_SCAN_BOUND: u32 = 8;

pub(crate) fn at_hour(date: NaiveDate, hour: u32) -> LocalTime {
    date.and_hms_opt(hour, 0, 0).expect("hour within 0..24")
}

pub(crate) fn end_of_day(date: NaiveDate) -> LocalTime {
    date.and_hms_opt(23, 59, 59).expect("end of day")
}

/// Resolve the initial booking window from preferences and the current time.
///
/// With `daily_basis_booking` the resolved day is stretched to midnight..23:59:59,
/// ignoring workday hours. Pure function of its inputs — the caller supplies
/// the clock.
pub fn resolve_enter_window(
    pref: &SchedulePreference,
    now: LocalTime,
    daily_basis_booking: bool,
) -> Result<TimeWindow, EngineError> {
    let enter = match pref.enter_time_mode {
        EnterTimeMode::Immediate => {
            // Next full hour, then clamped into the workday.
            let next_hour = now + Duration::hours(1);
            let candidate = at_hour(next_hour.date(), next_hour.hour());
            if candidate.hour() < pref.workday_start_hour {
                at_hour(candidate.date(), pref.workday_start_hour)
            } else if candidate.hour() >= pref.workday_end_hour {
                at_hour(candidate.date() + Duration::days(1), pref.workday_start_hour)
            } else {
                candidate
            }
        }
        EnterTimeMode::NextDay => {
            at_hour(now.date() + Duration::days(1), pref.workday_start_hour)
        }
        EnterTimeMode::NextWorkday => {
            let mut day = now.date() + Duration::days(1);
            let mut found = None;
            for _ in 0..WORKDAY_SCAN_BOUND {
                if pref.workdays.contains(&day.weekday()) {
                    found = Some(day);
                    break;
                }
                day += Duration::days(1);
            }
            match found {
                Some(day) => at_hour(day, pref.workday_start_hour),
                None => return Err(EngineError::NoWorkdayFound),
            }
        }
    };

    if daily_basis_booking {
        Ok(TimeWindow::new(
            at_hour(enter.date(), 0),
            end_of_day(enter.date()),
        ))
    } else {
        Ok(TimeWindow::new(
            enter,
            at_hour(enter.date(), pref.workday_end_hour),
        ))
    }
}

/// Day-slider output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slide {
    pub window: TimeWindow,
    /// The slider position is outside `[0, max_days_in_advance]`.
    pub disabled: bool,
}

/// Shift the window `offset_days` from the originally resolved enter,
/// preserving the current duration exactly.
///
/// Day arithmetic is purely calendar-local: a shift across a DST transition
/// keeps wall-clock times and the stored duration, accepting 23-/25-hour
/// literal elapsed time on those days.
pub fn slide_window(
    earliest_enter: LocalTime,
    offset_days: i64,
    current: &TimeWindow,
    workday_start_hour: u32,
    max_days_in_advance: i64,
) -> Slide {
    let mut enter = earliest_enter + Duration::days(offset_days);
    // Reset the time-of-day only once the slider actually leaves the
    // starting day; on day zero the resolved clamp stays in effect.
    if enter.date() > earliest_enter.date() {
        enter = at_hour(enter.date(), workday_start_hour);
    }
    let leave = enter + current.duration();
    Slide {
        window: TimeWindow::new(enter, leave),
        disabled: offset_days > max_days_in_advance || offset_days < 0,
    }
}
