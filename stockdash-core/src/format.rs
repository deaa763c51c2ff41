//! Human-readable formatting for dashboard metrics.
//!
//! Large magnitudes are abbreviated with T/B/M/K suffixes. Formatting never
//! fails outward: absent values render as `"N/A"` and unexpected input renders
//! as `"Error"` after being logged.

use thiserror::Error;
use tracing::warn;

/// Placeholder for an absent value.
pub const NOT_AVAILABLE: &str = "N/A";

/// Placeholder substituted when formatting fails.
pub const FORMAT_ERROR: &str = "Error";

const SUFFIXES: [(f64, &str); 4] = [(1e12, "T"), (1e9, "B"), (1e6, "M"), (1e3, "K")];

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormatError {
    #[error("cannot format non-finite number {0}")]
    NonFinite(f64),
}

/// Abbreviate a number by magnitude, keeping its sign.
///
/// The bucket is picked on the absolute value, the division uses the signed
/// value: `-2_500_000.0` becomes `"-2.50 M"`.
pub fn try_abbreviate(value: Option<f64>) -> Result<String, FormatError> {
    let Some(number) = value else {
        return Ok(NOT_AVAILABLE.to_string());
    };
    if !number.is_finite() {
        return Err(FormatError::NonFinite(number));
    }

    let magnitude = number.abs();
    for (scale, suffix) in SUFFIXES {
        if magnitude >= scale {
            return Ok(format!("{:.2} {suffix}", number / scale));
        }
    }
    Ok(format!("{number:.2}"))
}

/// Two-decimal rendering for ratios such as beta or P/E.
pub fn try_decimal(value: Option<f64>) -> Result<String, FormatError> {
    match value {
        None => Ok(NOT_AVAILABLE.to_string()),
        Some(v) if !v.is_finite() => Err(FormatError::NonFinite(v)),
        Some(v) => Ok(format!("{v:.2}")),
    }
}

/// One-decimal percentage for values already expressed in percent.
pub fn try_percent(value: Option<f64>) -> Result<String, FormatError> {
    match value {
        None => Ok(NOT_AVAILABLE.to_string()),
        Some(v) if !v.is_finite() => Err(FormatError::NonFinite(v)),
        Some(v) => Ok(format!("{v:.1}%")),
    }
}

/// Abbreviated rendering that substitutes `"Error"` instead of failing.
pub fn format_number_abbreviated(value: Option<f64>) -> String {
    try_abbreviate(value).unwrap_or_else(|e| {
        warn!(error = %e, "number formatting failed");
        FORMAT_ERROR.to_string()
    })
}

pub fn format_decimal(value: Option<f64>) -> String {
    try_decimal(value).unwrap_or_else(|e| {
        warn!(error = %e, "decimal formatting failed");
        FORMAT_ERROR.to_string()
    })
}

/// Text attribute, `"N/A"` when absent or blank.
pub fn format_text(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(text) if !text.is_empty() => text.to_string(),
        _ => NOT_AVAILABLE.to_string(),
    }
}

/// Formats a batch of metrics and remembers which ones failed.
///
/// The page builder uses this to turn every substituted `"Error"` into a
/// warning tagged with the metric label.
#[derive(Debug, Default)]
pub struct MetricFormatter {
    failures: Vec<(String, FormatError)>,
}

impl MetricFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn abbreviated(&mut self, label: &str, value: Option<f64>) -> String {
        self.record(label, try_abbreviate(value))
    }

    pub fn decimal(&mut self, label: &str, value: Option<f64>) -> String {
        self.record(label, try_decimal(value))
    }

    pub fn percent(&mut self, label: &str, value: Option<f64>) -> String {
        self.record(label, try_percent(value))
    }

    pub fn text(&mut self, value: Option<&str>) -> String {
        format_text(value)
    }

    pub fn failures(&self) -> &[(String, FormatError)] {
        &self.failures
    }

    pub fn into_failures(self) -> Vec<(String, FormatError)> {
        self.failures
    }

    fn record(&mut self, label: &str, result: Result<String, FormatError>) -> String {
        match result {
            Ok(text) => text,
            Err(e) => {
                warn!(metric = label, error = %e, "metric formatting failed");
                self.failures.push((label.to_string(), e));
                FORMAT_ERROR.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn abbreviates_each_bucket() {
        assert_eq!(format_number_abbreviated(Some(2.5e12)), "2.50 T");
        assert_eq!(format_number_abbreviated(Some(3.0e9)), "3.00 B");
        assert_eq!(format_number_abbreviated(Some(1_234_567.0)), "1.23 M");
        assert_eq!(format_number_abbreviated(Some(1_000.0)), "1.00 K");
        assert_eq!(format_number_abbreviated(Some(999.999)), "1000.00");
        assert_eq!(format_number_abbreviated(Some(12.3456)), "12.35");
    }

    #[test]
    fn negative_values_keep_sign() {
        assert_eq!(format_number_abbreviated(Some(-2_500_000.0)), "-2.50 M");
        assert_eq!(format_number_abbreviated(Some(-1_500.0)), "-1.50 K");
        assert_eq!(format_number_abbreviated(Some(-42.0)), "-42.00");
    }

    #[test]
    fn absent_is_not_available() {
        assert_eq!(format_number_abbreviated(None), "N/A");
        assert_eq!(format_decimal(None), "N/A");
        assert_eq!(try_percent(None).unwrap(), "N/A");
        assert_eq!(format_text(None), "N/A");
        assert_eq!(format_text(Some("   ")), "N/A");
    }

    #[test]
    fn non_finite_is_error_string() {
        assert_eq!(format_number_abbreviated(Some(f64::NAN)), "Error");
        assert_eq!(format_number_abbreviated(Some(f64::INFINITY)), "Error");
        assert_eq!(format_decimal(Some(f64::NEG_INFINITY)), "Error");
        assert!(matches!(
            try_abbreviate(Some(f64::NAN)),
            Err(FormatError::NonFinite(_))
        ));
    }

    #[test]
    fn percent_uses_one_decimal() {
        assert_eq!(try_percent(Some(145.678)).unwrap(), "145.7%");
    }

    #[test]
    fn metric_formatter_records_failures() {
        let mut fmt = MetricFormatter::new();
        assert_eq!(fmt.abbreviated("Market Cap", Some(3.0e12)), "3.00 T");
        assert_eq!(fmt.decimal("Beta", Some(f64::NAN)), "Error");
        assert_eq!(fmt.text(Some("Technology")), "Technology");

        let failures = fmt.into_failures();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].0, "Beta");
    }
}
