//! Reminder preference rules.
//!
//! Offsets are "days before expiry at which to notify". The backend stores
//! whatever it is given, so the client is responsible for rejecting bad
//! offsets locally and normalising the rest before submission.

use crate::model::{ReminderPreferences, RenewalKind};

/// Offsets applied for every kind when a user has saved nothing yet.
pub const DEFAULT_REMINDER_OFFSETS: [i64; 3] = [30, 7, 1];

/// Preferences used before the user has saved any.
pub fn default_preferences() -> ReminderPreferences {
    let preferences = RenewalKind::ALL
        .iter()
        .map(|&kind| (kind, DEFAULT_REMINDER_OFFSETS.to_vec()))
        .collect();
    ReminderPreferences { preferences }
}

/// Check every offset is non-negative.
pub fn validate_offsets(prefs: &ReminderPreferences) -> Result<(), String> {
    for (kind, offsets) in &prefs.preferences {
        if let Some(bad) = offsets.iter().find(|&&offset| offset < 0) {
            return Err(format!(
                "Offsets must be >= 0 for {} (got {bad})",
                kind.as_str()
            ));
        }
    }
    Ok(())
}

/// Normalise offsets per kind: unique values, largest first.
pub fn normalize(prefs: &ReminderPreferences) -> ReminderPreferences {
    let preferences = prefs
        .preferences
        .iter()
        .map(|(&kind, offsets)| {
            let mut sorted = offsets.clone();
            sorted.sort_unstable_by(|a, b| b.cmp(a));
            sorted.dedup();
            (kind, sorted)
        })
        .collect();
    ReminderPreferences { preferences }
}
