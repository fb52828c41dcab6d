//! Renewal status classification.
//!
//! Given every renewal record for one (car, kind) pair and a reference
//! date, decide which record (if any) is authoritative and how close it is
//! to expiry. The rules are fixed here once so every surface that shows a
//! status agrees:
//!
//! - a record is *current* iff both dates parse and
//!   `valid_from <= reference_date <= valid_to` (inclusive on both ends);
//! - among overlapping current records, the latest `valid_to` wins,
//!   remaining ties broken by id;
//! - the same rule selects the *most recent* record when nothing is
//!   current;
//! - soft-deleted records are never considered;
//! - an unparsable date removes a record from the candidate sets it can no
//!   longer qualify for, and nothing else: classification never fails.

use chrono::NaiveDate;
use serde::Serialize;

use crate::date::DateParseError;
use crate::model::RenewalRecord;
use crate::types::EntityId;

/// Days-remaining threshold at or below which a current record is DUE_SOON.
///
/// Shared with the upcoming-renewals projection so the two surfaces cannot
/// disagree about what counts as urgent.
pub const DUE_SOON_THRESHOLD_DAYS: i64 = 7;

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Classification outcome for one (car, kind, reference date) triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusTag {
    Current,
    DueSoon,
    Overdue,
    Missing,
}

impl StatusTag {
    /// The canonical string value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Current => "CURRENT",
            Self::DueSoon => "DUE_SOON",
            Self::Overdue => "OVERDUE",
            Self::Missing => "MISSING",
        }
    }
}

/// Derived status for one compliance track. Computed, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RenewalStatus {
    pub tag: StatusTag,
    /// Id of the record that drove the classification, if any.
    pub record_id: Option<EntityId>,
    /// Signed day count: zero or more days remaining for CURRENT/DUE_SOON,
    /// negative (days elapsed since expiry) for OVERDUE, absent for MISSING.
    pub days: Option<i64>,
}

impl RenewalStatus {
    /// Days left on the authoritative record, when one is current.
    pub fn days_remaining(&self) -> Option<i64> {
        match self.tag {
            StatusTag::Current | StatusTag::DueSoon => self.days,
            _ => None,
        }
    }

    /// Days since the most recent record expired, when lapsed.
    pub fn days_overdue(&self) -> Option<i64> {
        match self.tag {
            StatusTag::Overdue => self.days.map(|d| -d),
            _ => None,
        }
    }

    fn missing() -> Self {
        Self {
            tag: StatusTag::Missing,
            record_id: None,
            days: None,
        }
    }
}

/// A record field that failed to parse during classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateIssue {
    pub record_id: EntityId,
    pub field: DateField,
    pub error: DateParseError,
}

/// Which side of the validity window failed to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateField {
    ValidFrom,
    ValidTo,
}

impl DateField {
    /// The wire field name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ValidFrom => "valid_from",
            Self::ValidTo => "valid_to",
        }
    }
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Classify the renewal records of one (car, kind) pair.
///
/// `records` may be in any order, empty, soft-deleted, or carry malformed
/// date strings; the function is total and never panics. Parse failures
/// degrade silently here; use [`classify_with_issues`] when the caller
/// wants to surface them.
pub fn classify(records: &[RenewalRecord], reference_date: NaiveDate) -> RenewalStatus {
    classify_with_issues(records, reference_date).0
}

/// Like [`classify`], additionally reporting every date that failed to
/// parse so callers can hand the data-quality problem to an observability
/// layer. The classification itself is unchanged.
pub fn classify_with_issues(
    records: &[RenewalRecord],
    reference_date: NaiveDate,
) -> (RenewalStatus, Vec<DateIssue>) {
    let mut issues = Vec::new();
    let mut spans = Vec::with_capacity(records.len());

    for record in records {
        if record.is_deleted {
            continue;
        }
        let from = note_issue(record, DateField::ValidFrom, &mut issues);
        let to = note_issue(record, DateField::ValidTo, &mut issues);
        spans.push((record.id, from, to));
    }

    // A record is current iff both dates parsed and the window contains the
    // reference date. Latest valid_to wins; residual ties go to the larger id.
    let mut best_current: Option<(NaiveDate, EntityId)> = None;
    for &(id, from, to) in &spans {
        if let (Some(from), Some(to)) = (from, to) {
            if from <= reference_date && reference_date <= to {
                let candidate = (to, id);
                if best_current.map_or(true, |best| candidate > best) {
                    best_current = Some(candidate);
                }
            }
        }
    }

    if let Some((valid_to, id)) = best_current {
        let days = (valid_to - reference_date).num_days();
        let tag = if days <= DUE_SOON_THRESHOLD_DAYS {
            StatusTag::DueSoon
        } else {
            StatusTag::Current
        };
        let status = RenewalStatus {
            tag,
            record_id: Some(id),
            days: Some(days),
        };
        return (status, issues);
    }

    // Nothing current: the most recent record is the one with the latest
    // parseable valid_to, under the same tie-break.
    let mut most_recent: Option<(NaiveDate, EntityId)> = None;
    for &(id, _, to) in &spans {
        if let Some(to) = to {
            let candidate = (to, id);
            if most_recent.map_or(true, |best| candidate > best) {
                most_recent = Some(candidate);
            }
        }
    }

    let status = match most_recent {
        Some((valid_to, id)) if valid_to < reference_date => RenewalStatus {
            tag: StatusTag::Overdue,
            record_id: Some(id),
            days: Some((valid_to - reference_date).num_days()),
        },
        // Either no datable record at all, or the latest window has not
        // lapsed but could not qualify as current (future or unparsable
        // valid_from).
        _ => RenewalStatus::missing(),
    };
    (status, issues)
}

fn note_issue(
    record: &RenewalRecord,
    field: DateField,
    issues: &mut Vec<DateIssue>,
) -> Option<NaiveDate> {
    let parsed = match field {
        DateField::ValidFrom => record.parsed_valid_from(),
        DateField::ValidTo => record.parsed_valid_to(),
    };
    match parsed {
        Ok(date) => Some(date),
        Err(error) => {
            issues.push(DateIssue {
                record_id: record.id,
                field,
                error,
            });
            None
        }
    }
}
