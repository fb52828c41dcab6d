//! Money display helpers.
//!
//! Costs travel as integer minor currency units (pence) so no
//! floating-point rounding can creep in; display divides by 100 and
//! renders two decimal places.

/// Format a pence amount as pounds, e.g. `1234` becomes `£12.34`.
pub fn format_pence(pence: i64) -> String {
    let sign = if pence < 0 { "-" } else { "" };
    let abs = pence.unsigned_abs();
    format!("{sign}£{}.{:02}", abs / 100, abs % 100)
}
