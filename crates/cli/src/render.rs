//! Plain-text rendering for CLI output.
//!
//! Pure functions from domain values to display lines, so the formatting
//! is testable without touching a terminal or the network.

use cartrack_core::model::{Car, RenewalKind, RenewalRecord, UpcomingRenewalEntry};
use cartrack_core::money::format_pence;
use cartrack_core::projection::{status_badge, upcoming_label, BadgeTone};
use cartrack_core::status::RenewalStatus;

/// One line of the car list, e.g. `3f8a…  AB12 CDE  Ford Focus`.
pub fn car_line(car: &Car) -> String {
    let mut line = format!("{}  {}", short_id(car), car.registration_number);
    if let Some(make) = &car.make {
        line.push_str(&format!("  {make}"));
    }
    if let Some(model) = &car.model {
        line.push_str(&format!(" {model}"));
    }
    if car.is_archived {
        line.push_str("  (archived)");
    }
    line
}

/// Badge line for one compliance track, e.g.
/// `[WARN] Insurance is valid. There are 3 days left`.
pub fn status_line(kind: RenewalKind, status: &RenewalStatus) -> String {
    let badge = status_badge(kind, status);
    format!("[{}] {}", tone_marker(badge.tone), badge.text)
}

/// History line for one record, e.g.
/// `2024-01-01 -> 2024-12-31  Acme Insurance  £349.99`.
pub fn history_line(record: &RenewalRecord) -> String {
    let mut line = format!("{} -> {}", record.valid_from, record.valid_to);
    if let Some(provider) = &record.provider {
        line.push_str(&format!("  {provider}"));
    }
    if let Some(cost_pence) = record.cost_pence {
        line.push_str(&format!("  {}", format_pence(cost_pence)));
    }
    line
}

/// One line of the upcoming table, e.g.
/// `AB12 CDE   MOT          Due on 2025-03-01 (3d) *`.
pub fn upcoming_line(entry: &UpcomingRenewalEntry) -> String {
    let label = upcoming_label(entry);
    let mut line = format!(
        "{:<10} {:<12} {}",
        entry.car_registration_number,
        entry.kind.display_name(),
        label.headline
    );
    if let Some(detail) = label.detail {
        line.push_str(&format!(" ({detail})"));
    }
    if label.urgent {
        line.push_str(" *");
    }
    line
}

fn short_id(car: &Car) -> String {
    let id = car.id.to_string();
    format!("{}…", &id[..8])
}

fn tone_marker(tone: BadgeTone) -> &'static str {
    match tone {
        BadgeTone::Good => " OK ",
        BadgeTone::Warn => "WARN",
        BadgeTone::Bad => " !! ",
    }
}
