//! Shared helpers for value parsing and column extraction.

use crate::error::{DashboardError, Result};
use chrono::{Datelike, NaiveDate};
use polars::prelude::*;

// =============================================================================
// Data Type Utilities
// =============================================================================

/// Check if a DataType is numeric (integer or float).
#[inline]
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

// =============================================================================
// String Parsing Utilities
// =============================================================================

/// Characters commonly used in amount formatting that should be stripped.
pub const NUMERIC_FORMAT_CHARS: [char; 6] = [',', '$', '%', '€', '£', ' '];

/// Common error/missing value markers in exported data.
pub const ERROR_MARKERS: [&str; 9] = [
    "error", "unknown", "n/a", "na", "nan", "null", "missing", "none", "#n/a",
];

/// Remove currency symbols, thousands separators and padding.
///
/// ```rust,ignore
/// assert_eq!(clean_numeric_string("$1,234.56"), "1234.56");
/// ```
pub fn clean_numeric_string(s: &str) -> String {
    s.trim()
        .chars()
        .filter(|c| !NUMERIC_FORMAT_CHARS.contains(c))
        .collect()
}

/// Check if a string is an error/missing value marker.
pub fn is_error_marker(s: &str) -> bool {
    let lower = s.trim().to_ascii_lowercase();
    ERROR_MARKERS.iter().any(|&marker| lower == marker)
}

/// Parse a sales amount, tolerating currency formatting.
///
/// Empty cells, error markers and non-finite values yield `None`.
pub fn parse_amount(s: &str) -> Option<f64> {
    if is_error_marker(s) {
        return None;
    }

    let cleaned = clean_numeric_string(s);
    if cleaned.is_empty() {
        return None;
    }

    // accounting negatives: (12.50)
    let value = match cleaned.strip_prefix('(').and_then(|v| v.strip_suffix(')')) {
        Some(inner) => -inner.parse::<f64>().ok()?,
        None => cleaned.parse::<f64>().ok()?,
    };

    value.is_finite().then_some(value)
}

// =============================================================================
// Date Utilities
// =============================================================================

/// Days between 0001-01-01 (CE) and the Unix epoch.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Convert a date to the physical representation of a polars `Date`.
pub fn date_to_days(date: NaiveDate) -> i32 {
    date.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE
}

/// Convert days since the Unix epoch back to a date.
pub fn days_to_date(days: i32) -> Option<NaiveDate> {
    NaiveDate::from_num_days_from_ce_opt(days.checked_add(UNIX_EPOCH_DAYS_FROM_CE)?)
}

// =============================================================================
// Column Extraction Utilities
// =============================================================================

fn column_series<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Series> {
    df.column(name)
        .map(|col| col.as_materialized_series())
        .map_err(|_| DashboardError::ColumnNotFound(name.to_string()))
}

/// Read a `Date` column as days since the Unix epoch.
pub fn date_column_days(df: &DataFrame, name: &str) -> Result<Vec<Option<i32>>> {
    let days = column_series(df, name)?.cast(&DataType::Int32)?;
    Ok(days.i32()?.into_iter().collect())
}

/// Read a numeric column as `f64`.
pub fn float_column(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    let values = column_series(df, name)?.cast(&DataType::Float64)?;
    Ok(values.f64()?.into_iter().collect())
}

/// Read a column as owned strings.
pub fn string_column(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    let values = column_series(df, name)?.cast(&DataType::String)?;
    Ok(values
        .str()?
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_numeric_dtype() {
        assert!(is_numeric_dtype(&DataType::Int64));
        assert!(is_numeric_dtype(&DataType::Float64));
        assert!(!is_numeric_dtype(&DataType::String));
        assert!(!is_numeric_dtype(&DataType::Date));
    }

    #[test]
    fn test_clean_numeric_string() {
        assert_eq!(clean_numeric_string("$1,234.56"), "1234.56");
        assert_eq!(clean_numeric_string("  42%  "), "42");
        assert_eq!(clean_numeric_string("€100"), "100");
    }

    #[test]
    fn test_is_error_marker() {
        assert!(is_error_marker("N/A"));
        assert!(is_error_marker("  MISSING  "));
        assert!(!is_error_marker("42"));
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("100"), Some(100.0));
        assert_eq!(parse_amount("$1,234.50"), Some(1234.5));
        assert_eq!(parse_amount("(12.50)"), Some(-12.5));
        assert_eq!(parse_amount("-7"), Some(-7.0));
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("n/a"), None);
        assert_eq!(parse_amount("NaN"), None);
        assert_eq!(parse_amount("twelve"), None);
    }

    #[test]
    fn test_days_round_trip_epoch() {
        let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();
        assert_eq!(date_to_days(epoch), 0);
        assert_eq!(days_to_date(0), Some(epoch));

        let date = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        assert_eq!(days_to_date(date_to_days(date)), Some(date));
    }

    #[test]
    fn test_column_extraction() {
        let df = df![
            "Sales" => &[Some(1.5), None],
            "Region" => &[Some("East"), None],
        ]
        .unwrap();

        assert_eq!(float_column(&df, "Sales").unwrap(), vec![Some(1.5), None]);
        assert_eq!(
            string_column(&df, "Region").unwrap(),
            vec![Some("East".to_string()), None]
        );
        assert!(matches!(
            float_column(&df, "Profit"),
            Err(DashboardError::ColumnNotFound(_))
        ));
    }
}
