//! Booking window & recurrence validation engine for shared desk/space
//! booking: window resolution from scheduling preferences, day-slider
//! navigation, policy validation, recurrence expansion, precheck
//! aggregation, and per-space display-state classification.
//!
//! Everything is a pure function over immutable value inputs except the
//! batched precheck/commit RPC, which is the engine's single async boundary.

pub mod engine;
pub mod model;
pub mod observability;
