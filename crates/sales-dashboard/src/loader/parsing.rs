//! Permissive coercion of raw columns into canonical types.
//!
//! Values that cannot be interpreted become null instead of failing the load;
//! the loader drops affected rows afterwards.

use crate::utils::{date_to_days, is_error_marker, is_numeric_dtype, parse_amount};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use polars::prelude::*;

/// Date-only layouts, tried in order. Month-first wins over day-first for
/// slash-separated values.
const DATE_FORMATS: [&str; 10] = [
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%m-%d-%Y",
    "%d.%m.%Y",
    "%d-%b-%Y",
    "%d %b %Y",
    "%b %d, %Y",
    "%B %d, %Y",
    "%Y%m%d",
];

/// Date-time layouts; the time of day is discarded.
const DATETIME_FORMATS: [&str; 5] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// Parse a single date value, returning `None` when no layout matches.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let value = raw.trim();
    if value.is_empty() || is_error_marker(value) {
        return None;
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return Some(date);
        }
    }

    for format in DATETIME_FORMATS {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(value, format) {
            return Some(datetime.date());
        }
    }

    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|datetime| datetime.date_naive())
}

/// Coerce any column into a polars `Date` series.
///
/// Native date and datetime columns are cast directly; everything else is
/// parsed value by value through [`parse_date`].
pub fn coerce_date_series(series: &Series) -> PolarsResult<Series> {
    match series.dtype() {
        DataType::Date => Ok(series.clone()),
        DataType::Datetime(_, _) => series.cast(&DataType::Date),
        _ => {
            let text = series.cast(&DataType::String)?;
            let days: Vec<Option<i32>> = text
                .str()?
                .into_iter()
                .map(|v| v.and_then(parse_date).map(date_to_days))
                .collect();

            Series::new(series.name().clone(), days).cast(&DataType::Date)
        }
    }
}

/// Coerce any column into a `Float64` amount series.
///
/// `NaN` and infinities become null whether the reader inferred a float
/// column or left the values as text.
pub fn coerce_amount_series(series: &Series) -> PolarsResult<Series> {
    if is_numeric_dtype(series.dtype()) {
        let floats = series.cast(&DataType::Float64)?;
        let amounts: Vec<Option<f64>> = floats
            .f64()?
            .into_iter()
            .map(|v| v.filter(|x| x.is_finite()))
            .collect();
        return Ok(Series::new(series.name().clone(), amounts));
    }

    let text = series.cast(&DataType::String)?;
    let amounts: Vec<Option<f64>> = text
        .str()?
        .into_iter()
        .map(|v| v.and_then(parse_amount))
        .collect();

    Ok(Series::new(series.name().clone(), amounts))
}

/// Coerce a label column (region, category, product) into trimmed strings.
///
/// Blank cells and error markers become null so they never form a group.
pub fn coerce_label_series(series: &Series) -> PolarsResult<Series> {
    let text = series.cast(&DataType::String)?;
    let labels: Vec<Option<String>> = text
        .str()?
        .into_iter()
        .map(|v| {
            v.map(str::trim)
                .filter(|s| !s.is_empty() && !is_error_marker(s))
                .map(str::to_string)
        })
        .collect();

    Ok(Series::new(series.name().clone(), labels))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::days_to_date;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_date_layouts() {
        assert_eq!(parse_date("2024-01-05"), Some(ymd(2024, 1, 5)));
        assert_eq!(parse_date("2024/01/05"), Some(ymd(2024, 1, 5)));
        assert_eq!(parse_date("01/05/2024"), Some(ymd(2024, 1, 5)));
        assert_eq!(parse_date("05.01.2024"), Some(ymd(2024, 1, 5)));
        assert_eq!(parse_date("05-Jan-2024"), Some(ymd(2024, 1, 5)));
        assert_eq!(parse_date("Jan 05, 2024"), Some(ymd(2024, 1, 5)));
        assert_eq!(parse_date(" 2024-01-05 13:45:00 "), Some(ymd(2024, 1, 5)));
        assert_eq!(parse_date("2024-01-05T23:59:59+02:00"), Some(ymd(2024, 1, 5)));
    }

    #[test]
    fn test_parse_date_rejects_garbage() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("not a date"), None);
        assert_eq!(parse_date("2024-13-40"), None);
        assert_eq!(parse_date("N/A"), None);
    }

    #[test]
    fn test_coerce_date_series_marks_unparseable_null() {
        let series = Series::new("Order Date".into(), &["2024-01-05", "soon", "2024-02-01"]);
        let dates = coerce_date_series(&series).unwrap();

        assert_eq!(dates.dtype(), &DataType::Date);
        assert_eq!(dates.null_count(), 1);

        let days = dates.cast(&DataType::Int32).unwrap();
        let first = days.i32().unwrap().get(0).unwrap();
        assert_eq!(days_to_date(first), Some(ymd(2024, 1, 5)));
    }

    #[test]
    fn test_coerce_amount_series() {
        let text = Series::new("Sales".into(), &["$1,000", "oops", "12.5"]);
        let amounts = coerce_amount_series(&text).unwrap();
        assert_eq!(amounts.dtype(), &DataType::Float64);
        assert_eq!(
            amounts.f64().unwrap().into_iter().collect::<Vec<_>>(),
            vec![Some(1000.0), None, Some(12.5)]
        );

        let ints = Series::new("Sales".into(), &[3_i64, 4]);
        assert_eq!(coerce_amount_series(&ints).unwrap().dtype(), &DataType::Float64);
    }

    #[test]
    fn test_coerce_amount_series_nulls_non_finite_floats() {
        let floats = Series::new(
            "Sales".into(),
            &[100.0, f64::NAN, f64::INFINITY, f64::NEG_INFINITY, 2.5],
        );
        let amounts = coerce_amount_series(&floats).unwrap();

        assert_eq!(
            amounts.f64().unwrap().into_iter().collect::<Vec<_>>(),
            vec![Some(100.0), None, None, None, Some(2.5)]
        );
    }

    #[test]
    fn test_coerce_label_series() {
        let series = Series::new("Region".into(), &[Some(" East "), Some(""), None, Some("unknown")]);
        let labels = coerce_label_series(&series).unwrap();
        assert_eq!(labels.null_count(), 3);
        assert_eq!(labels.str().unwrap().get(0), Some("East"));
    }
}
