//! Filter stage.
//!
//! A [`FilterSelection`] describes what the user picked in the filter
//! controls; [`filter`] applies it to any [`SalesFrame`]. The operation is
//! pure: the same records and selection always produce the same rows, and
//! filtering a view again with the same selection changes nothing.

use crate::error::{DashboardError, Result};
use crate::records::{FilteredView, SalesFrame, order_dates};
use crate::schema::{CATEGORY, CanonicalField, REGION};
use crate::utils::string_column;
use chrono::NaiveDate;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// Inclusive range of order dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Create a range; `start` must not be after `end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(DashboardError::InvalidDateRange {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Whether `date` lies within the range, bounds included.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Current state of the filter controls.
///
/// `None` means the control is inactive. An active set keeps only rows whose
/// value is in the set; rows with no value never match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSelection {
    pub date_range: Option<DateRange>,
    pub regions: Option<BTreeSet<String>>,
    pub categories: Option<BTreeSet<String>>,
}

impl FilterSelection {
    /// Selection the controls start with: the full observed date range and
    /// every region and category.
    pub fn defaults(records: &impl SalesFrame) -> Result<Self> {
        Ok(Self {
            date_range: observed_range(records)?,
            regions: None,
            categories: None,
        })
    }

    pub fn with_date_range(mut self, range: DateRange) -> Self {
        self.date_range = Some(range);
        self
    }

    pub fn with_regions<I, S>(mut self, regions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.regions = Some(regions.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = Some(categories.into_iter().map(Into::into).collect());
        self
    }
}

/// Earliest and latest order date, or `None` for an empty table.
pub fn observed_range(view: &impl SalesFrame) -> Result<Option<DateRange>> {
    let dates = order_dates(view)?;
    let min = dates.iter().flatten().min().copied();
    let max = dates.iter().flatten().max().copied();

    match (min, max) {
        (Some(start), Some(end)) => Ok(Some(DateRange { start, end })),
        _ => Ok(None),
    }
}

/// Sorted distinct values of an optional label column, for filter options.
///
/// Returns an empty list when the column is not available.
pub fn observed_values(view: &impl SalesFrame, field: CanonicalField) -> Result<Vec<String>> {
    if !view.capabilities().supports(field) {
        return Ok(Vec::new());
    }

    let values: BTreeSet<String> = string_column(view.frame(), field.canonical_name())?
        .into_iter()
        .flatten()
        .collect();

    Ok(values.into_iter().collect())
}

/// Rows of `view` matching `selection`.
pub fn filter(view: &impl SalesFrame, selection: &FilterSelection) -> Result<FilteredView> {
    let caps = view.capabilities();
    let mut keep = vec![true; view.len()];

    if let Some(range) = &selection.date_range {
        for (slot, date) in keep.iter_mut().zip(order_dates(view)?) {
            *slot &= date.is_some_and(|d| range.contains(d));
        }
    }

    if let Some(regions) = &selection.regions {
        if caps.has_region {
            apply_label_filter(&mut keep, view.frame(), REGION, regions)?;
        } else {
            warn!("Region filter ignored: dataset has no region column");
        }
    }

    if let Some(categories) = &selection.categories {
        if caps.has_category {
            apply_label_filter(&mut keep, view.frame(), CATEGORY, categories)?;
        } else {
            warn!("Category filter ignored: dataset has no category column");
        }
    }

    let mask = Series::new("keep".into(), keep);
    let df = view.frame().filter(mask.bool()?)?;
    debug!("Filter kept {} of {} rows", df.height(), view.len());

    Ok(FilteredView::new(df, caps))
}

fn apply_label_filter(
    keep: &mut [bool],
    df: &DataFrame,
    column: &str,
    selected: &BTreeSet<String>,
) -> Result<()> {
    for (slot, value) in keep.iter_mut().zip(string_column(df, column)?) {
        *slot &= value.is_some_and(|v| selected.contains(&v));
    }
    Ok(())
}
