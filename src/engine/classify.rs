use std::collections::HashSet;

use ulid::Ulid;

use crate::model::*;

use super::window::at_hour;

/// Map a space's fetched booking state to its display state.
///
/// First match wins, top to bottom. Self and buddy bookings rank above
/// everything else so their indicators are never masked by the generic
/// booked color.
pub fn classify_space(
    state: &SpaceBookingState,
    caller: Ulid,
    buddies: &HashSet<Ulid>,
    policy: &BookingPolicy,
    pref: &SchedulePreference,
    window: &TimeWindow,
) -> DisplayState {
    if state.bookings.iter().any(|b| b.owner == caller) {
        return DisplayState::SelfBooked;
    }
    if state.bookings.iter().any(|b| buddies.contains(&b.owner)) {
        return DisplayState::BuddyBooked;
    }
    if !state.allowed {
        return DisplayState::Disallowed;
    }
    if policy.partially_booked_enabled
        && !state.bookings.is_empty()
        && covered_hours(&state.bookings, pref, window) < policy.max_hours_partially_booked
    {
        return DisplayState::PartiallyBooked;
    }
    if !state.available {
        return DisplayState::Booked;
    }
    DisplayState::Free
}

/// Hours of the requested day's workday covered by the booking envelope.
/// Both envelope bounds are clipped into `[workday_start, workday_end]` of
/// the requested day, so out-of-hours bookings contribute nothing.
fn covered_hours(bookings: &[SpaceBooking], pref: &SchedulePreference, window: &TimeWindow) -> f64 {
    let day = window.enter.date();
    let workday_start = at_hour(day, pref.workday_start_hour);
    let workday_end = at_hour(day, pref.workday_end_hour);

    let earliest = bookings.iter().map(|b| b.enter).min();
    let latest = bookings.iter().map(|b| b.leave).max();
    let (Some(earliest), Some(latest)) = (earliest, latest) else {
        return 0.0;
    };

    let start = earliest.clamp(workday_start, workday_end);
    let end = latest.clamp(workday_start, workday_end);
    (end - start).num_milliseconds() as f64 / 3_600_000.0
}
