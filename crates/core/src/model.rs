//! Wire data model for the fixed backend API contract.
//!
//! Entity structs mirror the backend's response shapes exactly; payload
//! structs mirror its request shapes and carry the same field constraints,
//! so an invalid submission is rejected locally before any round-trip.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::date::{parse_iso_date, DateParseError};
use crate::types::{EntityId, Timestamp};

// ---------------------------------------------------------------------------
// Renewal kinds
// ---------------------------------------------------------------------------

/// Wire values for the three compliance tracks.
pub const KIND_INSURANCE: &str = "INSURANCE";
pub const KIND_MOT: &str = "MOT";
pub const KIND_TAX: &str = "TAX";

/// The three independent compliance tracks every car carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RenewalKind {
    #[serde(rename = "INSURANCE")]
    Insurance,
    #[serde(rename = "MOT")]
    Mot,
    #[serde(rename = "TAX")]
    Tax,
}

impl RenewalKind {
    /// All kinds, in display order.
    pub const ALL: [RenewalKind; 3] = [RenewalKind::Insurance, RenewalKind::Mot, RenewalKind::Tax];

    /// Convert from the wire string value.
    pub fn from_str_value(s: &str) -> Result<Self, String> {
        match s {
            KIND_INSURANCE => Ok(Self::Insurance),
            KIND_MOT => Ok(Self::Mot),
            KIND_TAX => Ok(Self::Tax),
            _ => Err(format!(
                "Invalid renewal kind '{s}'. Must be one of: {KIND_INSURANCE}, {KIND_MOT}, {KIND_TAX}"
            )),
        }
    }

    /// The wire string value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Insurance => KIND_INSURANCE,
            Self::Mot => KIND_MOT,
            Self::Tax => KIND_TAX,
        }
    }

    /// Human-readable name for presentation.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Insurance => "Insurance",
            Self::Mot => "MOT",
            Self::Tax => "Vehicle tax",
        }
    }
}

// ---------------------------------------------------------------------------
// Entities (backend response shapes)
// ---------------------------------------------------------------------------

/// A registered user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: EntityId,
    pub email: String,
    pub created_at: Timestamp,
}

/// The tenancy boundary; all cars and renewals belong to exactly one household.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Household {
    pub id: EntityId,
    pub name: String,
    pub created_at: Timestamp,
}

/// A car row as returned by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Car {
    pub id: EntityId,
    pub household_id: EntityId,
    /// Vehicle Registration Mark, unique within the household.
    pub registration_number: String,
    pub make: Option<String>,
    pub model: Option<String>,
    /// Archived cars are hidden from default listings but never deleted.
    pub is_archived: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A renewal record as returned by the backend.
///
/// `valid_from`/`valid_to` are kept as raw wire strings: a malformed date
/// must degrade that one record, not fail the whole fetch. Use
/// [`parsed_valid_from`](Self::parsed_valid_from) /
/// [`parsed_valid_to`](Self::parsed_valid_to) for typed access.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenewalRecord {
    pub id: EntityId,
    pub car_id: EntityId,
    pub kind: RenewalKind,
    pub valid_from: String,
    pub valid_to: String,
    pub provider: Option<String>,
    pub reference: Option<String>,
    /// Integer minor currency units (pence).
    pub cost_pence: Option<i64>,
    pub notes: Option<String>,
    pub is_deleted: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl RenewalRecord {
    /// The start of the validity window, if it parses.
    pub fn parsed_valid_from(&self) -> Result<NaiveDate, DateParseError> {
        parse_iso_date(&self.valid_from)
    }

    /// The end of the validity window, if it parses.
    pub fn parsed_valid_to(&self) -> Result<NaiveDate, DateParseError> {
        parse_iso_date(&self.valid_to)
    }
}

/// Token returned by a successful login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

// ---------------------------------------------------------------------------
// Upcoming renewals (backend-computed aggregate)
// ---------------------------------------------------------------------------

/// Status tag of one backend-computed upcoming entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpcomingStatus {
    Missing,
    Due,
    Overdue,
}

impl UpcomingStatus {
    /// The wire string value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Missing => "missing",
            Self::Due => "due",
            Self::Overdue => "overdue",
        }
    }
}

/// One row of the cross-car upcoming-renewals aggregate.
///
/// The backend's status algorithm is a black box; this type only fixes the
/// output shape the client renders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpcomingRenewalEntry {
    pub car_id: EntityId,
    pub car_registration_number: String,
    pub kind: RenewalKind,
    pub status: UpcomingStatus,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    /// Signed day count: non-negative until the due date, negative past it.
    #[serde(default)]
    pub days_until: Option<i64>,
    #[serde(default)]
    pub current_valid_to: Option<NaiveDate>,
}

// ---------------------------------------------------------------------------
// Reminder preferences
// ---------------------------------------------------------------------------

/// Per-kind reminder offsets: days before expiry at which to notify.
///
/// Keys are renewal kinds; an unknown kind fails deserialization, which is
/// the local-rejection behaviour the settings surface relies on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderPreferences {
    pub preferences: BTreeMap<RenewalKind, Vec<i64>>,
}

// ---------------------------------------------------------------------------
// Payloads (backend request shapes)
// ---------------------------------------------------------------------------

/// Payload for `POST /api/auth/signup`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
}

/// Payload for `POST /api/auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Payload for `POST /api/households`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct HouseholdCreate {
    #[validate(length(min = 2, max = 120))]
    pub name: String,
}

/// Payload for `POST /api/cars`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CarCreate {
    #[validate(length(min = 2, max = 16))]
    pub registration_number: String,
    #[validate(length(max = 64))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub make: Option<String>,
    #[validate(length(max = 64))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

/// Payload for `PATCH /api/cars/{id}`. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct CarUpdate {
    #[validate(length(min = 2, max = 16))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registration_number: Option<String>,
    #[validate(length(max = 64))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub make: Option<String>,
    #[validate(length(max = 64))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_archived: Option<bool>,
}

/// Payload for `POST /api/cars/{id}/renewals`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RenewalCreate {
    pub kind: RenewalKind,
    pub valid_from: NaiveDate,
    pub valid_to: NaiveDate,
    #[validate(length(max = 120))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[validate(length(max = 120))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[validate(range(min = 0))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost_pence: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl RenewalCreate {
    /// A minimal payload covering the given window.
    pub fn new(kind: RenewalKind, valid_from: NaiveDate, valid_to: NaiveDate) -> Self {
        Self {
            kind,
            valid_from,
            valid_to,
            provider: None,
            reference: None,
            cost_pence: None,
            notes: None,
        }
    }

    /// Check the validity window is not inverted.
    pub fn validate_range(&self) -> Result<(), String> {
        validate_window(self.valid_from, self.valid_to)
    }
}

/// Payload for `PATCH /api/renewals/{id}`. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct RenewalUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_from: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_to: Option<NaiveDate>,
    #[validate(length(max = 120))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[validate(length(max = 120))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[validate(range(min = 0))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost_pence: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl RenewalUpdate {
    /// Check the validity window is not inverted.
    ///
    /// Only applies when the payload carries both endpoints; a partial
    /// update cannot see the endpoint it leaves unchanged.
    pub fn validate_range(&self) -> Result<(), String> {
        match (self.valid_from, self.valid_to) {
            (Some(from), Some(to)) => validate_window(from, to),
            _ => Ok(()),
        }
    }
}

fn validate_window(from: NaiveDate, to: NaiveDate) -> Result<(), String> {
    if from > to {
        return Err(format!("valid_from ({from}) must not be after valid_to ({to})"));
    }
    Ok(())
}
