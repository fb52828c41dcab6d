//! Presentation mapping for renewal statuses.
//!
//! Two surfaces show the same underlying data: the cross-car upcoming list
//! (backend-computed entries) and the per-kind badges on the car detail
//! view (locally classified). Both derive their urgency from the single
//! [`DUE_SOON_THRESHOLD_DAYS`] constant so they cannot drift apart.

use crate::model::{RenewalKind, UpcomingRenewalEntry, UpcomingStatus};
use crate::status::{RenewalStatus, StatusTag, DUE_SOON_THRESHOLD_DAYS};

// ---------------------------------------------------------------------------
// Upcoming list
// ---------------------------------------------------------------------------

/// Human-facing rendering of one upcoming entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpcomingLabel {
    /// Main line, e.g. `Due on 2025-03-01`.
    pub headline: String,
    /// Secondary count, e.g. `3d` or `12d overdue`.
    pub detail: Option<String>,
    /// Whether the entry needs immediate attention.
    pub urgent: bool,
}

/// Map an upcoming entry to its label.
///
/// Missing and overdue entries are always urgent; a due entry is urgent
/// once it is within [`DUE_SOON_THRESHOLD_DAYS`] days.
pub fn upcoming_label(entry: &UpcomingRenewalEntry) -> UpcomingLabel {
    match entry.status {
        UpcomingStatus::Missing => UpcomingLabel {
            headline: "No record".to_string(),
            detail: None,
            urgent: true,
        },
        UpcomingStatus::Overdue => UpcomingLabel {
            headline: match entry.due_date {
                Some(date) => format!("Expired on {date}"),
                None => "Expired".to_string(),
            },
            detail: entry.days_until.map(|days| format!("{}d overdue", days.abs())),
            urgent: true,
        },
        UpcomingStatus::Due => UpcomingLabel {
            headline: match entry.due_date {
                Some(date) => format!("Due on {date}"),
                None => "Due".to_string(),
            },
            detail: entry.days_until.map(|days| format!("{days}d")),
            urgent: entry
                .days_until
                .is_some_and(|days| days <= DUE_SOON_THRESHOLD_DAYS),
        },
    }
}

// ---------------------------------------------------------------------------
// Car detail badges
// ---------------------------------------------------------------------------

/// Visual tone of a status badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeTone {
    Good,
    Warn,
    Bad,
}

/// Per-kind status badge for the car detail view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusBadge {
    pub text: String,
    pub tone: BadgeTone,
}

/// Render the badge for one compliance track.
pub fn status_badge(kind: RenewalKind, status: &RenewalStatus) -> StatusBadge {
    match status.tag {
        StatusTag::Current | StatusTag::DueSoon => {
            let days = status.days_remaining().unwrap_or(0);
            StatusBadge {
                text: format!(
                    "{} is valid. There are {days} days left",
                    kind.display_name()
                ),
                tone: if status.tag == StatusTag::DueSoon {
                    BadgeTone::Warn
                } else {
                    BadgeTone::Good
                },
            }
        }
        StatusTag::Overdue => StatusBadge {
            text: format!("Expired ({}d ago)", status.days_overdue().unwrap_or(0)),
            tone: BadgeTone::Bad,
        },
        StatusTag::Missing => StatusBadge {
            text: "Missing".to_string(),
            tone: BadgeTone::Bad,
        },
    }
}
