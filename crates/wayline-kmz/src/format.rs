//! Numeric formatting for firmware-facing documents.
//!
//! Firmware parsers reject scientific notation, so every number is written
//! in fixed-point form.

/// Decimal places for latitude and longitude (about 1 mm)
pub const COORDINATE_PRECISION: usize = 8;

/// Decimal places for every other fractional value
pub const DECIMAL_PRECISION: usize = 6;

/// Fixed-point coordinate, always with [`COORDINATE_PRECISION`] decimals.
pub fn coordinate(value: f64) -> String {
    strip_negative_zero(format!("{value:.prec$}", prec = COORDINATE_PRECISION))
}

/// Fixed-point decimal with trailing zeros removed: `8.0` becomes `"8"`.
pub fn decimal(value: f64) -> String {
    let fixed = format!("{value:.prec$}", prec = DECIMAL_PRECISION);
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    strip_negative_zero(trimmed.to_string())
}

/// `Point/coordinates` text: longitude first.
pub fn coordinates(latitude: f64, longitude: f64) -> String {
    format!("{},{}", coordinate(longitude), coordinate(latitude))
}

fn strip_negative_zero(text: String) -> String {
    match text.strip_prefix('-') {
        Some(rest) if rest.chars().all(|c| c == '0' || c == '.') => rest.to_string(),
        _ => text,
    }
}
