//! One-call dashboard assembly.

use crate::aggregate::{
    Kpis, MonthlySales, ProductSales, RegionSales, compute_kpis, monthly_sales, sales_by_region,
    top_products,
};
use crate::error::Result;
use crate::filter::{FilterSelection, filter};
use crate::records::{CanonicalRecordSet, LoadStats, SalesFrame};
use crate::schema::Capabilities;
use serde::Serialize;
use tracing::debug;

/// Everything a dashboard renders for one filter selection.
///
/// `top_products` and `sales_by_region` are `None` when the data lacks the
/// column, so the corresponding panel can be hidden.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardReport {
    pub selection: FilterSelection,
    pub capabilities: Capabilities,
    pub load_stats: LoadStats,
    pub rows_selected: usize,
    pub kpis: Kpis,
    pub monthly_sales: Vec<MonthlySales>,
    pub top_products: Option<Vec<ProductSales>>,
    pub sales_by_region: Option<Vec<RegionSales>>,
}

/// Filter `records` with `selection` and compute every aggregate.
pub fn build_report(
    records: &CanonicalRecordSet,
    selection: &FilterSelection,
    top_n: usize,
) -> Result<DashboardReport> {
    let view = filter(records, selection)?;
    debug!("Building report over {} of {} rows", view.len(), records.len());

    Ok(DashboardReport {
        selection: selection.clone(),
        capabilities: view.capabilities(),
        load_stats: records.stats(),
        rows_selected: view.len(),
        kpis: compute_kpis(&view)?,
        monthly_sales: monthly_sales(&view)?,
        top_products: top_products(&view, top_n)?,
        sales_by_region: sales_by_region(&view)?,
    })
}
