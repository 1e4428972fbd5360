//! Aggregations over a sales table.
//!
//! Every function here takes any [`SalesFrame`](crate::records::SalesFrame),
//! so the same code serves the full record set and a filtered view. Results
//! are plain serde structs ready for a chart or a JSON response.

mod breakdown;
mod kpi;
mod monthly;

pub use breakdown::{ProductSales, RegionSales, sales_by_region, top_products};
pub use kpi::{Kpis, compute_kpis};
pub use monthly::{MonthlySales, monthly_sales};
