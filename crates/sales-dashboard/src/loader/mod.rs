//! Data loading.
//!
//! [`DataLoader`] turns a CSV file into a [`CanonicalRecordSet`]:
//!
//! 1. Read the file with polars, falling back to more lenient strategies
//!    when the strict read fails
//! 2. Normalize headers through the alias lists
//! 3. Coerce `Order Date`/`Ship Date` to dates, `Sales` to `Float64`, and
//!    label columns to trimmed strings
//! 4. Drop rows missing a required field
//!
//! [`DataCache`] memoizes the result per session, keyed by source identity.

mod cache;
pub mod parsing;

pub use cache::{DataCache, SourceKey};

use crate::config::DashboardConfig;
use crate::error::{Result, ResultExt};
use crate::records::{CanonicalRecordSet, LoadStats};
use crate::schema::{CanonicalField, ORDER_DATE, SALES, SchemaNormalizer};
use parsing::{coerce_amount_series, coerce_date_series, coerce_label_series};
use polars::io::csv::read::{CsvParseOptions, CsvReadOptions};
use polars::prelude::*;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Reads sales files into canonical record sets.
#[derive(Debug, Clone)]
pub struct DataLoader {
    infer_schema_length: usize,
    separator: u8,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new(&DashboardConfig::default())
    }
}

impl DataLoader {
    pub fn new(config: &DashboardConfig) -> Self {
        Self {
            infer_schema_length: config.infer_schema_length,
            separator: config.separator_byte(),
        }
    }

    /// Load and normalize the file at `path`.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<CanonicalRecordSet> {
        let path = path.as_ref();
        info!("Loading sales data from: {}", path.display());

        let raw = self.read_csv(path)?;
        info!("Read {} rows x {} columns", raw.height(), raw.width());

        self.canonicalize(raw, Some(path.to_path_buf()))
    }

    /// Normalize an in-memory frame as if it had been read from a file.
    pub fn load_frame(&self, raw: DataFrame) -> Result<CanonicalRecordSet> {
        self.canonicalize(raw, None)
    }

    fn canonicalize(
        &self,
        raw: DataFrame,
        source: Option<PathBuf>,
    ) -> Result<CanonicalRecordSet> {
        let rows_read = raw.height();
        let (mut df, mapping) = SchemaNormalizer::normalize(raw)?;

        for (field, _) in mapping.iter() {
            let name = field.canonical_name();
            let series = df.column(name)?.as_materialized_series();
            let coerced = match field {
                CanonicalField::OrderDate | CanonicalField::ShipDate => {
                    coerce_date_series(series)
                }
                CanonicalField::Sales => coerce_amount_series(series),
                CanonicalField::Region | CanonicalField::Category | CanonicalField::Product => {
                    coerce_label_series(series)
                }
            }
            .context(format!("Coercing column '{}'", name))?;

            df.replace(name, coerced)?;
        }

        let (df, stats) = drop_incomplete_rows(df, rows_read)?;

        if stats.rows_dropped() > 0 {
            info!(
                "Dropped {} rows missing a required field ({} without order date, {} without sales)",
                stats.rows_dropped(),
                stats.dropped_missing_date,
                stats.dropped_missing_sales
            );
        }
        if stats.rows_kept == 0 {
            warn!("No usable rows remain after dropping incomplete records");
        }

        Ok(CanonicalRecordSet::new(df, mapping, stats, source))
    }

    /// Read the CSV with progressively more lenient strategies.
    fn read_csv(&self, path: &Path) -> Result<DataFrame> {
        // Strategy 1: standard loading with quote handling
        match self
            .csv_options(Some(self.infer_schema_length), Some(b'"'))
            .try_into_reader_with_file_path(Some(path.to_path_buf()))?
            .finish()
        {
            Ok(df) => return Ok(df),
            Err(e) => debug!("Standard loading failed: {}", e),
        }

        // Strategy 2: without quote handling
        match self
            .csv_options(Some(self.infer_schema_length), None)
            .try_into_reader_with_file_path(Some(path.to_path_buf()))?
            .finish()
        {
            Ok(df) => return Ok(df),
            Err(e) => debug!("Loading without quotes failed: {}", e),
        }

        // Strategy 3: pre-cleaned content
        let content = std::fs::read_to_string(path)?;
        match self
            .csv_options(Some(self.infer_schema_length), Some(b'"'))
            .into_reader_with_file_handle(Cursor::new(clean_csv_content(&content)))
            .finish()
        {
            Ok(df) => return Ok(df),
            Err(e) => debug!("Loading pre-cleaned content failed: {}", e),
        }

        // Strategy 4: every column as text; coercion happens after normalization
        self.csv_options(Some(0), Some(b'"'))
            .into_reader_with_file_handle(Cursor::new(clean_csv_content(&content)))
            .finish()
            .context(format!("Reading '{}'", path.display()))
    }

    fn csv_options(&self, infer_schema_length: Option<usize>, quote: Option<u8>) -> CsvReadOptions {
        CsvReadOptions::default()
            .with_infer_schema_length(infer_schema_length)
            .with_has_header(true)
            .with_parse_options(
                CsvParseOptions::default()
                    .with_separator(self.separator)
                    .with_quote_char(quote),
            )
    }
}

/// Remove rows whose order date or sales amount is null.
fn drop_incomplete_rows(df: DataFrame, rows_read: usize) -> Result<(DataFrame, LoadStats)> {
    let date_nulls = df.column(ORDER_DATE)?.as_materialized_series().is_null();
    let sales_nulls = df.column(SALES)?.as_materialized_series().is_null();

    let mut stats = LoadStats {
        rows_read,
        ..LoadStats::default()
    };

    let keep: Vec<bool> = date_nulls
        .into_iter()
        .zip(sales_nulls.into_iter())
        .map(|(date_null, sales_null)| {
            let date_null = date_null.unwrap_or(true);
            let sales_null = sales_null.unwrap_or(true);
            if date_null {
                stats.dropped_missing_date += 1;
            } else if sales_null {
                stats.dropped_missing_sales += 1;
            }
            !date_null && !sales_null
        })
        .collect();

    let mask = Series::new("keep".into(), keep);
    let df = df.filter(mask.bool()?)?;
    stats.rows_kept = df.height();

    Ok((df, stats))
}

/// Collapse doubled quotes and drop blank lines.
fn clean_csv_content(content: &str) -> String {
    content
        .replace("\"\"\"", "\"")
        .replace("\"\"", "\"")
        .lines()
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::SalesFrame;
    use crate::schema::{PRODUCT, SHIP_DATE};
    use pretty_assertions::assert_eq;

    fn raw_frame() -> DataFrame {
        df![
            "Date" => &["2024-01-05", "garbage", "2024-02-01", "2024-02-03"],
            "Revenue" => &["100", "50", "", "$30.00"],
            "Product Name" => &["A", "B", "A", "C"],
            "Ship_Date" => &["2024-01-07", "2024-01-22", "later", "2024-02-05"],
            "Quantity" => &[1_i64, 2, 3, 4],
        ]
        .unwrap()
    }

    #[test]
    fn test_load_frame_drops_incomplete_rows() {
        let records = DataLoader::default().load_frame(raw_frame()).unwrap();

        assert_eq!(
            records.stats(),
            LoadStats {
                rows_read: 4,
                dropped_missing_date: 1,
                dropped_missing_sales: 1,
                rows_kept: 2,
            }
        );
        assert_eq!(records.len(), 2);
        assert_eq!(records.frame().column(ORDER_DATE).unwrap().dtype(), &DataType::Date);
        assert_eq!(records.frame().column(SALES).unwrap().dtype(), &DataType::Float64);
    }

    #[test]
    fn test_load_frame_keeps_unparseable_optional_dates() {
        let raw = df![
            "Order Date" => &["2024-01-05"],
            "Sales" => &[10.0],
            "Ship Date" => &["whenever"],
        ]
        .unwrap();

        let records = DataLoader::default().load_frame(raw).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records.frame().column(SHIP_DATE).unwrap().null_count(), 1);
    }

    #[test]
    fn test_load_frame_sets_capabilities_and_passthrough() {
        let records = DataLoader::default().load_frame(raw_frame()).unwrap();
        let caps = records.capabilities();

        assert!(caps.has_product);
        assert!(caps.has_ship_date);
        assert!(!caps.has_region);
        assert!(records.frame().column(PRODUCT).is_ok());
        assert!(records.frame().column("Quantity").is_ok());
    }

    #[test]
    fn test_load_frame_missing_required() {
        let raw = df!["Date" => &["2024-01-05"], "Region" => &["East"]].unwrap();
        let err = DataLoader::default().load_frame(raw).unwrap_err();
        assert_eq!(err.error_code(), "MISSING_REQUIRED_COLUMN");
    }

    #[test]
    fn test_load_drops_non_finite_float_sales() {
        use crate::aggregate::compute_kpis;
        use std::io::Write;

        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        let csv = "Order Date,Sales\n2024-01-05,100\n2024-01-06,NaN\n2024-01-07,2.5\n2024-01-08,inf\n";
        file.write_all(csv.as_bytes()).unwrap();
        file.flush().unwrap();

        let records = DataLoader::default().load(file.path()).unwrap();
        assert_eq!(records.stats().dropped_missing_sales, 2);
        assert_eq!(records.stats().rows_kept, 2);

        let kpis = compute_kpis(&records).unwrap();
        assert_eq!(kpis.total, 102.5);
        assert_eq!(kpis.average, 51.25);
        assert_eq!(kpis.count, 2);
    }

    #[test]
    fn test_clean_csv_content() {
        let content = "a,b\n\n\"\"x\"\",1\n";
        assert_eq!(clean_csv_content(content), "a,b\n\"x\",1");
    }
}
