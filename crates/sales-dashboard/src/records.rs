//! Canonical record set and filtered views.
//!
//! Both types wrap an immutable polars `DataFrame` whose required columns are
//! guaranteed by construction. The [`SalesFrame`] trait is the seam the
//! filter and aggregation stages work against, so a filtered view can be
//! filtered again or aggregated exactly like the full record set.

use crate::error::Result;
use crate::schema::{Capabilities, ColumnMapping, ORDER_DATE, SALES};
use crate::utils::{date_column_days, days_to_date};
use chrono::NaiveDate;
use polars::prelude::*;
use serde::Serialize;
use std::path::PathBuf;

/// Read access shared by every sales table.
pub trait SalesFrame {
    /// Underlying frame with canonical column names.
    fn frame(&self) -> &DataFrame;

    /// Which optional columns are present.
    fn capabilities(&self) -> Capabilities;

    /// Number of rows.
    fn len(&self) -> usize {
        self.frame().height()
    }

    /// Whether the table has no rows.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Row accounting for a single load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoadStats {
    /// Rows read from the source file.
    pub rows_read: usize,
    /// Rows dropped because `Order Date` was missing or unparseable.
    pub dropped_missing_date: usize,
    /// Rows dropped because `Sales` was missing or not numeric.
    pub dropped_missing_sales: usize,
    /// Rows kept.
    pub rows_kept: usize,
}

impl LoadStats {
    /// Total number of rows removed by the required-field check.
    pub fn rows_dropped(&self) -> usize {
        self.rows_read - self.rows_kept
    }
}

/// Sales records with canonical columns.
///
/// Every row has a non-null `Order Date` (polars `Date`) and `Sales`
/// (`Float64`). Optional columns are present only when flagged in
/// [`Capabilities`].
#[derive(Debug, Clone)]
pub struct CanonicalRecordSet {
    df: DataFrame,
    mapping: ColumnMapping,
    capabilities: Capabilities,
    stats: LoadStats,
    source: Option<PathBuf>,
}

impl CanonicalRecordSet {
    /// Assemble a record set from an already-normalized and cleaned frame.
    pub(crate) fn new(
        df: DataFrame,
        mapping: ColumnMapping,
        stats: LoadStats,
        source: Option<PathBuf>,
    ) -> Self {
        let capabilities = Capabilities::from_mapping(&mapping);
        Self {
            df,
            mapping,
            capabilities,
            stats,
            source,
        }
    }

    /// Raw header matched for each canonical field.
    pub fn mapping(&self) -> &ColumnMapping {
        &self.mapping
    }

    /// Row accounting from the load that produced this set.
    pub fn stats(&self) -> LoadStats {
        self.stats
    }

    /// File this set was loaded from, if any.
    pub fn source(&self) -> Option<&PathBuf> {
        self.source.as_ref()
    }

    /// The first `n` rows, for a quick preview.
    pub fn preview(&self, n: usize) -> DataFrame {
        self.df.head(Some(n))
    }
}

impl SalesFrame for CanonicalRecordSet {
    fn frame(&self) -> &DataFrame {
        &self.df
    }

    fn capabilities(&self) -> Capabilities {
        self.capabilities
    }
}

/// Read-only subset of a record set matching a filter selection.
#[derive(Debug, Clone)]
pub struct FilteredView {
    df: DataFrame,
    capabilities: Capabilities,
}

impl FilteredView {
    pub(crate) fn new(df: DataFrame, capabilities: Capabilities) -> Self {
        Self { df, capabilities }
    }

    /// Consume the view and return its frame.
    pub fn into_frame(self) -> DataFrame {
        self.df
    }
}

impl SalesFrame for FilteredView {
    fn frame(&self) -> &DataFrame {
        &self.df
    }

    fn capabilities(&self) -> Capabilities {
        self.capabilities
    }
}

/// Order dates of every row, in row order.
pub(crate) fn order_dates(view: &impl SalesFrame) -> Result<Vec<Option<NaiveDate>>> {
    Ok(date_column_days(view.frame(), ORDER_DATE)?
        .into_iter()
        .map(|d| d.and_then(days_to_date))
        .collect())
}

/// Sales amounts of every row, in row order.
pub(crate) fn sales_amounts(view: &impl SalesFrame) -> Result<Vec<f64>> {
    Ok(crate::utils::float_column(view.frame(), SALES)?
        .into_iter()
        .map(|v| v.unwrap_or(0.0))
        .collect())
}
