use crate::model::*;

use super::window::end_of_day;

/// Validate a booking window against policy and current usage.
///
/// Checks run in a fixed priority order and the first failure is the single
/// reported reason — the order is part of the contract, so the UI hint is
/// deterministic. Space admins bypass the count, advance and duration limits
/// when the policy says so. Never errors, never does I/O.
pub fn validate_window(window: &TimeWindow, policy: &BookingPolicy, ctx: &BookingContext) -> Verdict {
    let exempt = policy.admin_exempt && ctx.space_admin;

    if !exempt && ctx.current_booking_count >= policy.max_bookings_per_user {
        return Verdict::fail(ReasonCode::BookingLimit);
    }
    if !ctx.space_selected {
        return Verdict::fail(ReasonCode::PickArea);
    }
    // Daily-basis bookings cover today until end of day, so today stays
    // bookable until midnight.
    let effective_enter = if policy.daily_basis_booking {
        end_of_day(window.enter.date())
    } else {
        window.enter
    };
    if effective_enter <= ctx.now {
        return Verdict::fail(ReasonCode::EnterMustBeFuture);
    }
    if window.leave <= window.enter {
        return Verdict::fail(ReasonCode::LeaveAfterEnter);
    }
    if !exempt {
        if (window.enter - ctx.now).num_days() > policy.max_days_in_advance {
            return Verdict::fail(ReasonCode::DaysAdvance);
        }
        let hours = window.duration_hours();
        if hours > policy.max_booking_duration_hours {
            return Verdict::fail(ReasonCode::MaxDuration);
        }
        if hours < policy.min_booking_duration_hours {
            return Verdict::fail(ReasonCode::MinDuration);
        }
    }
    Verdict::ok()
}
