//! Per-label breakdowns: top products and sales by region.

use crate::error::Result;
use crate::records::{SalesFrame, sales_amounts};
use crate::schema::{PRODUCT, REGION};
use crate::utils::string_column;
use serde::Serialize;
use std::collections::HashMap;
use std::collections::hash_map::Entry;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductSales {
    pub product: String,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionSales {
    pub region: String,
    pub total: f64,
    /// Fraction of the summed region totals. Stays within `[0, 1]` only when
    /// no region total is negative.
    pub share: f64,
}

/// The `n` products with the highest summed sales, highest first.
///
/// Returns `None` when the data has no product column. Products with equal
/// totals keep the order in which they first appear in the view.
pub fn top_products(view: &impl SalesFrame, n: usize) -> Result<Option<Vec<ProductSales>>> {
    if !view.capabilities().has_product {
        return Ok(None);
    }

    let mut groups = group_totals(view, PRODUCT)?;
    groups.sort_by(|a, b| b.1.total_cmp(&a.1));
    groups.truncate(n);

    Ok(Some(
        groups
            .into_iter()
            .map(|(product, total)| ProductSales { product, total })
            .collect(),
    ))
}

/// Sales summed per region, in first-appearance order.
///
/// Returns `None` when the data has no region column.
pub fn sales_by_region(view: &impl SalesFrame) -> Result<Option<Vec<RegionSales>>> {
    if !view.capabilities().has_region {
        return Ok(None);
    }

    let groups = group_totals(view, REGION)?;
    let grand_total: f64 = groups.iter().map(|(_, total)| total).sum();

    Ok(Some(
        groups
            .into_iter()
            .map(|(region, total)| RegionSales {
                region,
                total,
                share: if grand_total == 0.0 { 0.0 } else { total / grand_total },
            })
            .collect(),
    ))
}

/// Sum sales by the label in `column`, keeping first-appearance order.
/// Rows with a null label are skipped.
fn group_totals(view: &impl SalesFrame, column: &str) -> Result<Vec<(String, f64)>> {
    let labels = string_column(view.frame(), column)?;
    let amounts = sales_amounts(view)?;

    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<(String, f64)> = Vec::new();

    for (label, amount) in labels.into_iter().zip(amounts) {
        let Some(label) = label else { continue };
        match index.entry(label) {
            Entry::Occupied(slot) => groups[*slot.get()].1 += amount,
            Entry::Vacant(slot) => {
                groups.push((slot.key().clone(), amount));
                slot.insert(groups.len() - 1);
            }
        }
    }

    Ok(groups)
}
