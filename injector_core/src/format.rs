//! Display formatting for computed values.
//!
//! Undefined results render as an empty cell, never as "NaN". Rounding only
//! affects the text; the underlying values keep full precision.

/// Decimal places used when rendering computed values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayPrecision {
    /// Summary figures and the main metric columns.
    pub decimals: usize,
    /// Modeled pulse width and small-pulse adder columns.
    pub small_pulse_decimals: usize,
}

impl Default for DisplayPrecision {
    fn default() -> Self {
        Self {
            decimals: 1,
            small_pulse_decimals: 3,
        }
    }
}

/// Format `value` with `decimals` places, or an empty string when non-finite.
pub fn fmt_value(value: f64, decimals: usize) -> String {
    if value.is_finite() {
        let s = format!("{value:.decimals$}");
        // "-0.0" reads as noise in a table
        if s.starts_with('-') && s[1..].chars().all(|c| c == '0' || c == '.') {
            return s[1..].to_string();
        }
        s
    } else {
        String::new()
    }
}

/// Format an optional input field: `None` and NaN are blank, others printed as entered.
pub fn fmt_input(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{v}"),
        _ => String::new(),
    }
}
