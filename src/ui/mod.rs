//! Presentation layer: egui panels and charts over [`crate::state::AppState`].

pub mod panels;
pub mod plot;

use num_format::{Locale, ToFormattedString};

/// Whole-dollar amount with thousands separators, e.g. `$1,234,567`.
pub fn format_money(value: f64) -> String {
    let rounded = value.abs().round() as u64;
    let sign = if value < 0.0 && rounded > 0 { "-" } else { "" };
    format!("{sign}${}", rounded.to_formatted_string(&Locale::en))
}
