//! Core domain logic for the cartrack vehicle-compliance tracker.
//!
//! This crate is pure: no I/O, no async, no HTTP. It holds the wire data
//! model shared with the backend API, the renewal status classifier, the
//! upcoming-renewals view projection, and the calendar/money/reminder
//! helpers the presentation layer needs. Transport lives in
//! `cartrack-client`.

pub mod date;
pub mod model;
pub mod money;
pub mod projection;
pub mod reminders;
pub mod status;
pub mod types;

pub use model::{Car, RenewalKind, RenewalRecord, UpcomingRenewalEntry, UpcomingStatus};
pub use status::{
    classify, classify_with_issues, RenewalStatus, StatusTag, DUE_SOON_THRESHOLD_DAYS,
};
