use std::collections::HashSet;

use chrono::{Duration, NaiveDate, NaiveDateTime, Weekday};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Zone-naive local wall-clock time — the only time type. Conversion to a
/// wire format happens in the transport layer, never here.
pub type LocalTime = NaiveDateTime;

/// Closed booking window `[enter, leave]` on the local wall clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub enter: LocalTime,
    pub leave: LocalTime,
}

impl TimeWindow {
    pub fn new(enter: LocalTime, leave: LocalTime) -> Self {
        debug_assert!(leave > enter, "TimeWindow leave must be after enter");
        Self { enter, leave }
    }

    pub fn duration(&self) -> Duration {
        self.leave - self.enter
    }

    /// Duration in fractional hours, millisecond-precise.
    pub fn duration_hours(&self) -> f64 {
        self.duration().num_milliseconds() as f64 / 3_600_000.0
    }

    pub fn overlaps(&self, other: &TimeWindow) -> bool {
        self.enter < other.leave && other.enter < self.leave
    }
}

/// How the default enter time is derived from the current time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnterTimeMode {
    /// Next full hour, clamped into the workday.
    Immediate,
    /// Tomorrow at workday start.
    NextDay,
    /// The next enabled workday at workday start.
    NextWorkday,
}

/// Per-user scheduling preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulePreference {
    pub enter_time_mode: EnterTimeMode,
    pub workday_start_hour: u32,
    pub workday_end_hour: u32,
    /// Days of the week enabled for bookings. Only consulted by `NextWorkday`.
    pub workdays: HashSet<Weekday>,
}

impl SchedulePreference {
    pub fn new(
        enter_time_mode: EnterTimeMode,
        workday_start_hour: u32,
        workday_end_hour: u32,
        workdays: HashSet<Weekday>,
    ) -> Self {
        debug_assert!(
            workday_start_hour < workday_end_hour,
            "workday start must be before workday end"
        );
        Self {
            enter_time_mode,
            workday_start_hour,
            workday_end_hour,
            workdays,
        }
    }
}

/// Organizational booking limits. One immutable value per evaluation — never
/// shared mutable state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingPolicy {
    pub max_days_in_advance: i64,
    pub max_booking_duration_hours: f64,
    pub min_booking_duration_hours: f64,
    pub max_bookings_per_user: u32,
    pub max_concurrent_bookings_per_user: u32,
    /// Bookings always span a full calendar day, ignoring workday hours.
    pub daily_basis_booking: bool,
    /// Space admins bypass count/advance/duration limits.
    pub admin_exempt: bool,
    pub partially_booked_enabled: bool,
    pub max_hours_partially_booked: f64,
}

/// Recurrence frequency class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cadence {
    None,
    Daily,
    Weekly,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurrenceRule {
    pub cadence: Cadence,
    /// Interval multiplier: every `cycle`-th day or week.
    pub cycle: u32,
    /// Required non-empty iff `cadence` is `Weekly`.
    pub weekdays: HashSet<Weekday>,
    /// Last calendar day an occurrence may start on.
    pub end: NaiveDate,
}

impl RecurrenceRule {
    /// The no-recurrence rule the booking form resets to when the user
    /// cancels recurrence.
    pub fn none(end: NaiveDate) -> Self {
        Self {
            cadence: Cadence::None,
            cycle: 1,
            weekdays: HashSet::new(),
            end,
        }
    }
}

/// One concrete instance of a (possibly recurring) booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occurrence {
    pub enter: LocalTime,
    pub leave: LocalTime,
}

impl Occurrence {
    pub fn duration(&self) -> Duration {
        self.leave - self.enter
    }
}

/// Server verdict for a single candidate occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrecheckResult {
    pub occurrence: Occurrence,
    pub success: bool,
    /// Server-reported application error code; 0 on success.
    pub error_code: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrecheckSummary {
    pub success_count: usize,
    pub error_count: usize,
    /// Error codes in first-seen order, duplicates removed.
    pub distinct_error_codes: Vec<i32>,
    pub should_warn: bool,
}

impl PrecheckSummary {
    /// How many bookings will actually be created if the user proceeds.
    pub fn final_booking_count(&self) -> usize {
        self.success_count
    }
}

/// An existing booking on a space, as fetched by the availability search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpaceBooking {
    pub owner: Ulid,
    pub enter: LocalTime,
    pub leave: LocalTime,
}

/// Snapshot of a space's booking state, refreshed on every search query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpaceBookingState {
    pub space_id: Ulid,
    pub bookings: Vec<SpaceBooking>,
    /// Whether the caller may book this space at all.
    pub allowed: bool,
    /// Whether a booking on this space needs admin approval.
    pub approval_required: bool,
    /// Fetched availability flag for the requested window.
    pub available: bool,
}

/// Color/icon class a space renders as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DisplayState {
    SelfBooked,
    BuddyBooked,
    Disallowed,
    PartiallyBooked,
    Booked,
    Free,
}

/// Why a window was rejected. Stable identifiers — the UI maps each onto a
/// localized hint via `text_key`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReasonCode {
    BookingLimit,
    PickArea,
    EnterMustBeFuture,
    LeaveAfterEnter,
    DaysAdvance,
    MaxDuration,
    MinDuration,
}

impl ReasonCode {
    /// Key into the external localization table.
    pub fn text_key(&self) -> &'static str {
        match self {
            ReasonCode::BookingLimit => "errorBookingLimit",
            ReasonCode::PickArea => "errorPickArea",
            ReasonCode::EnterMustBeFuture => "errorEnterFuture",
            ReasonCode::LeaveAfterEnter => "errorLeaveAfterEnter",
            ReasonCode::DaysAdvance => "errorDaysAdvance",
            ReasonCode::MaxDuration => "errorMaxBookingDuration",
            ReasonCode::MinDuration => "errorMinBookingDuration",
        }
    }
}

/// Validator output: drives submit-button enablement and the hint text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub valid: bool,
    pub reason: Option<ReasonCode>,
}

impl Verdict {
    pub fn ok() -> Self {
        Self {
            valid: true,
            reason: None,
        }
    }

    pub fn fail(reason: ReasonCode) -> Self {
        Self {
            valid: false,
            reason: Some(reason),
        }
    }
}

/// Caller-side facts the validator consumes alongside window and policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookingContext {
    pub now: LocalTime,
    /// The caller's current booking count, from the booking service.
    pub current_booking_count: u32,
    pub space_selected: bool,
    /// Caller is space-admin-or-higher.
    pub space_admin: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dt(y: i32, m: u32, d: u32, h: u32, min: u32) -> LocalTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn window_duration() {
        let w = TimeWindow::new(dt(2024, 1, 2, 9, 0), dt(2024, 1, 2, 17, 30));
        assert_eq!(w.duration(), Duration::minutes(510));
        assert_eq!(w.duration_hours(), 8.5);
    }

    #[test]
    fn window_overlap() {
        let a = TimeWindow::new(dt(2024, 1, 2, 9, 0), dt(2024, 1, 2, 12, 0));
        let b = TimeWindow::new(dt(2024, 1, 2, 11, 0), dt(2024, 1, 2, 14, 0));
        let c = TimeWindow::new(dt(2024, 1, 2, 12, 0), dt(2024, 1, 2, 14, 0));
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c)); // adjacent windows do not overlap
    }

    #[test]
    fn reason_codes_map_onto_text_table() {
        let codes = [
            ReasonCode::BookingLimit,
            ReasonCode::PickArea,
            ReasonCode::EnterMustBeFuture,
            ReasonCode::LeaveAfterEnter,
            ReasonCode::DaysAdvance,
            ReasonCode::MaxDuration,
            ReasonCode::MinDuration,
        ];
        let keys: HashSet<&str> = codes.iter().map(|c| c.text_key()).collect();
        // 1:1 — no two codes may share a text key.
        assert_eq!(keys.len(), codes.len());
        assert!(keys.contains("errorEnterFuture"));
        assert!(keys.contains("errorMaxBookingDuration"));
    }

    #[test]
    fn recurrence_rule_reset() {
        let end = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let rule = RecurrenceRule::none(end);
        assert_eq!(rule.cadence, Cadence::None);
        assert_eq!(rule.cycle, 1);
        assert!(rule.weekdays.is_empty());
    }

    #[test]
    fn rule_serialization_roundtrip() {
        let rule = RecurrenceRule {
            cadence: Cadence::Weekly,
            cycle: 2,
            weekdays: [Weekday::Mon, Weekday::Wed].into_iter().collect(),
            end: NaiveDate::from_ymd_opt(2024, 6, 30).unwrap(),
        };
        let json = serde_json::to_string(&rule).unwrap();
        let decoded: RecurrenceRule = serde_json::from_str(&json).unwrap();
        assert_eq!(rule, decoded);
    }

    #[test]
    fn summary_serialization_roundtrip() {
        let summary = PrecheckSummary {
            success_count: 3,
            error_count: 2,
            distinct_error_codes: vec![409, 403],
            should_warn: true,
        };
        let json = serde_json::to_string(&summary).unwrap();
        let decoded: PrecheckSummary = serde_json::from_str(&json).unwrap();
        assert_eq!(summary, decoded);
        assert_eq!(decoded.final_booking_count(), 3);
    }
}
