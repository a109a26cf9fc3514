use chrono::{Datelike, Duration, NaiveDate, NaiveTime};
use tracing::warn;

use crate::model::*;
use crate::observability;

use super::EngineError;

/// Hard cap on generated occurrences, regardless of `rule.end`.
const MAX_OCCURRENCES: usize = 366;

/// Monday of the week containing `date` — the anchor weekly cycles count from.
fn week_anchor(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

/// Expand a recurrence rule into concrete occurrences.
///
/// Every occurrence carries the base window's time-of-day and duration; the
/// output is strictly increasing by `enter` and every occurrence starts on or
/// before `rule.end`. The scan stops unconditionally at the advance-booking
/// horizon and at a hard occurrence cap, so it terminates for any `rule.end`;
/// truncation is a log/metrics event, never an error.
pub fn expand(
    rule: &RecurrenceRule,
    base: &TimeWindow,
    now: LocalTime,
    max_days_in_advance: i64,
) -> Result<Vec<Occurrence>, EngineError> {
    if rule.cycle == 0 {
        return Err(EngineError::InvalidRule("cycle must be at least 1"));
    }
    if rule.cadence == Cadence::Weekly && rule.weekdays.is_empty() {
        return Err(EngineError::InvalidRule("weekly rule needs at least one weekday"));
    }

    let enter_time = base.enter.time();
    let duration = base.duration();
    let horizon = now.date() + Duration::days(max_days_in_advance);

    let mut occurrences = Vec::new();
    match rule.cadence {
        Cadence::None => {
            occurrences.push(Occurrence {
                enter: base.enter,
                leave: base.leave,
            });
        }
        Cadence::Daily => {
            let mut day = base.enter.date();
            while day <= rule.end && !beyond_horizon(day, horizon) {
                if !push_occurrence(&mut occurrences, day, enter_time, duration) {
                    break;
                }
                day += Duration::days(rule.cycle as i64);
            }
        }
        Cadence::Weekly => {
            let anchor = week_anchor(base.enter.date());
            let mut day = base.enter.date();
            while day <= rule.end && !beyond_horizon(day, horizon) {
                let weeks = (day - anchor).num_days() / 7;
                if rule.weekdays.contains(&day.weekday())
                    && weeks % rule.cycle as i64 == 0
                    && !push_occurrence(&mut occurrences, day, enter_time, duration)
                {
                    break;
                }
                day += Duration::days(1);
            }
        }
    }

    Ok(occurrences)
}

fn beyond_horizon(day: NaiveDate, horizon: NaiveDate) -> bool {
    if day > horizon {
        warn!(%day, %horizon, "recurrence expansion passed the advance-booking horizon, truncating");
        metrics::counter!(observability::EXPANSIONS_TRUNCATED_TOTAL).increment(1);
        return true;
    }
    false
}

/// Returns false when the occurrence cap stops the expansion.
fn push_occurrence(
    out: &mut Vec<Occurrence>,
    day: NaiveDate,
    enter_time: NaiveTime,
    duration: Duration,
) -> bool {
    if out.len() >= MAX_OCCURRENCES {
        warn!(cap = MAX_OCCURRENCES, "recurrence expansion hit the occurrence cap, truncating");
        metrics::counter!(observability::EXPANSIONS_TRUNCATED_TOTAL).increment(1);
        return false;
    }
    let enter = day.and_time(enter_time);
    out.push(Occurrence {
        enter,
        leave: enter + duration,
    });
    true
}
