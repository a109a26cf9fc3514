use std::collections::HashSet;

use chrono::{Datelike, NaiveDate, Weekday};

use super::*;
use crate::model::*;

fn dt(y: i32, m: u32, d: u32, h: u32, min: u32) -> LocalTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, min, 0)
        .unwrap()
}

fn weekdays() -> HashSet<Weekday> {
    [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
    ]
    .into_iter()
    .collect()
}

fn pref(mode: EnterTimeMode) -> SchedulePreference {
    SchedulePreference::new(mode, 9, 17, weekdays())
}

fn policy() -> BookingPolicy {
    BookingPolicy {
        max_days_in_advance: 30,
        max_booking_duration_hours: 10.0,
        min_booking_duration_hours: 0.5,
        max_bookings_per_user: 5,
        max_concurrent_bookings_per_user: 1,
        daily_basis_booking: false,
        admin_exempt: false,
        partially_booked_enabled: true,
        max_hours_partially_booked: 4.0,
    }
}

fn ctx(now: LocalTime) -> BookingContext {
    BookingContext {
        now,
        current_booking_count: 0,
        space_selected: true,
        space_admin: false,
    }
}

// ── resolve → validate ──────────────────────────────────────────

#[test]
fn resolved_window_passes_validation() {
    // Whatever the mode and time of day, the resolver's output must be
    // immediately submittable under a permissive-enough policy.
    let modes = [
        EnterTimeMode::Immediate,
        EnterTimeMode::NextDay,
        EnterTimeMode::NextWorkday,
    ];
    for mode in modes {
        for hour in 0..24 {
            let now = dt(2024, 1, 2, hour, 30);
            let window = resolve_enter_window(&pref(mode), now, false).unwrap();
            let verdict = validate_window(&window, &policy(), &ctx(now));
            assert!(verdict.valid, "mode {mode:?} hour {hour}: {:?}", verdict.reason);
        }
    }
}

#[test]
fn friday_evening_next_workday_resolves_to_monday_morning() {
    // 2024-01-05 is a Friday.
    let now = dt(2024, 1, 5, 18, 0);
    let window = resolve_enter_window(&pref(EnterTimeMode::NextWorkday), now, false).unwrap();
    assert_eq!(window.enter, dt(2024, 1, 8, 9, 0));
    assert_eq!(window.enter.weekday(), Weekday::Mon);
    assert_eq!(window.leave, dt(2024, 1, 8, 17, 0));
}

#[test]
fn daily_basis_resolution_validates_under_daily_basis_policy() {
    let mut p = policy();
    p.daily_basis_booking = true;
    p.max_booking_duration_hours = 24.0;
    let now = dt(2024, 1, 2, 14, 0);
    let window = resolve_enter_window(&pref(EnterTimeMode::NextDay), now, true).unwrap();
    assert!(validate_window(&window, &p, &ctx(now)).valid);
}

// ── resolve → slide → validate ──────────────────────────────────

#[test]
fn slider_and_validator_agree_on_the_advance_horizon() {
    // Immediate resolution keeps the earliest enter on today, so slider
    // offsets line up exactly with whole days ahead of now.
    let now = dt(2024, 1, 2, 8, 0);
    let resolved = resolve_enter_window(&pref(EnterTimeMode::Immediate), now, false).unwrap();
    assert_eq!(resolved.enter, dt(2024, 1, 2, 9, 0));

    for offset in 0..=35 {
        let slide = slide_window(resolved.enter, offset, &resolved, 9, 30);
        let verdict = validate_window(&slide.window, &policy(), &ctx(now));
        if slide.disabled {
            assert_eq!(verdict.reason, Some(ReasonCode::DaysAdvance), "offset {offset}");
        } else {
            assert!(verdict.valid, "offset {offset}: {:?}", verdict.reason);
        }
    }
}

#[test]
fn window_31_days_out_fails_days_advance() {
    let now = dt(2024, 1, 2, 8, 0);
    let window = TimeWindow::new(dt(2024, 2, 2, 9, 0), dt(2024, 2, 2, 17, 0));
    let verdict = validate_window(&window, &policy(), &ctx(now));
    assert_eq!(verdict, Verdict::fail(ReasonCode::DaysAdvance));
    assert_eq!(verdict.reason.unwrap().text_key(), "errorDaysAdvance");
}

// ── slide → expand ──────────────────────────────────────────────

#[test]
fn expansion_starts_from_the_slid_window() {
    let now = dt(2024, 1, 1, 8, 0);
    let resolved = resolve_enter_window(&pref(EnterTimeMode::NextDay), now, false).unwrap();
    let slide = slide_window(resolved.enter, 6, &resolved, 9, 30);
    // Landed on Monday the 8th.
    assert_eq!(slide.window.enter, dt(2024, 1, 8, 9, 0));

    let rule = RecurrenceRule {
        cadence: Cadence::Weekly,
        cycle: 1,
        weekdays: [Weekday::Mon].into_iter().collect(),
        end: NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
    };
    let occ = expand(&rule, &slide.window, now, policy().max_days_in_advance).unwrap();
    let days: Vec<u32> = occ.iter().map(|o| o.enter.day()).collect();
    assert_eq!(days, vec![8, 15, 22, 29]);
    for o in &occ {
        assert_eq!(o.duration(), slide.window.duration());
    }
}

// ── expand → summarize ──────────────────────────────────────────

#[test]
fn expanded_series_aggregates_server_verdicts() {
    let base = TimeWindow::new(dt(2024, 1, 1, 9, 0), dt(2024, 1, 1, 17, 0));
    let rule = RecurrenceRule {
        cadence: Cadence::Daily,
        cycle: 1,
        weekdays: HashSet::new(),
        end: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
    };
    let occ = expand(&rule, &base, dt(2024, 1, 1, 0, 0), 365).unwrap();
    assert_eq!(occ.len(), 5);

    // Server rejects days 2 and 4 as taken and day 5 as not permitted.
    let results: Vec<PrecheckResult> = occ
        .iter()
        .map(|o| {
            let day = o.enter.day();
            let (success, code) = match day {
                2 | 4 => (false, 409),
                5 => (false, 403),
                _ => (true, 0),
            };
            PrecheckResult {
                occurrence: *o,
                success,
                error_code: code,
            }
        })
        .collect();

    let summary = summarize(&results);
    assert_eq!(summary.success_count, 2);
    assert_eq!(summary.error_count, 3);
    assert_eq!(summary.distinct_error_codes, vec![409, 403]);
    assert!(summary.should_warn);
    assert_eq!(summary.final_booking_count(), 2);
}

// ── classification ──────────────────────────────────────────────

#[test]
fn self_booking_always_outranks_buddy_booking() {
    let caller = ulid::Ulid::new();
    let buddy = ulid::Ulid::new();
    let buddies: HashSet<ulid::Ulid> = [buddy].into_iter().collect();
    let window = TimeWindow::new(dt(2024, 1, 3, 9, 0), dt(2024, 1, 3, 17, 0));

    let state = SpaceBookingState {
        space_id: ulid::Ulid::new(),
        bookings: vec![
            SpaceBooking {
                owner: buddy,
                enter: dt(2024, 1, 3, 9, 0),
                leave: dt(2024, 1, 3, 12, 0),
            },
            SpaceBooking {
                owner: caller,
                enter: dt(2024, 1, 3, 13, 0),
                leave: dt(2024, 1, 3, 17, 0),
            },
        ],
        allowed: true,
        approval_required: false,
        available: false,
    };

    let got = classify_space(
        &state,
        caller,
        &buddies,
        &policy(),
        &pref(EnterTimeMode::NextDay),
        &window,
    );
    assert_eq!(got, DisplayState::SelfBooked);
}
