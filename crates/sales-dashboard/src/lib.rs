//! Sales Dashboard Core
//!
//! Loads a sales CSV, maps its headers onto a fixed set of canonical columns,
//! and computes the figures a sales dashboard shows.
//!
//! # Overview
//!
//! - **Schema Normalization**: headers such as `Date`, `Total` or `Territory`
//!   are resolved against ordered alias lists and renamed to `Order Date`,
//!   `Sales`, `Region` and friends
//! - **Loading**: lenient CSV reading with fallback strategies, permissive
//!   date and amount parsing, and removal of rows missing a required field
//! - **Caching**: a session-scoped cache that reloads only when the file changes
//! - **Filtering**: inclusive date range plus region and category sets
//! - **Aggregation**: KPIs, monthly sales, top-N products and region shares
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use sales_dashboard::{DashboardConfig, DashboardSession, FilterSelection};
//!
//! let config = DashboardConfig::builder()
//!     .source_path("data/sales_data.csv")
//!     .top_n(5)
//!     .build()?;
//!
//! let mut session = DashboardSession::new(config);
//! let records = session.load()?;
//!
//! let selection = FilterSelection::defaults(records.as_ref())?.with_regions(["East"]);
//! let report = session.report(&selection)?;
//!
//! println!("Total sales: {:.2}", report.kpis.total);
//! for month in &report.monthly_sales {
//!     println!("{}: {:.2}", month.month, month.total);
//! }
//! ```
//!
//! # Missing Columns
//!
//! A file without an order date or a sales amount cannot be shown at all.
//! Loading then fails with [`DashboardError::MissingRequiredColumn`], whose
//! message lists the missing fields:
//!
//! ```text
//! Missing required columns: Sales / Total / Revenue. Please check your dataset.
//! ```
//!
//! Optional columns (`Region`, `Category`, `Product`, `Ship Date`) only switch
//! the related panels off; see [`Capabilities`].

pub mod aggregate;
pub mod config;
pub mod error;
pub mod filter;
pub mod loader;
pub mod records;
pub mod report;
pub mod schema;
pub mod session;
pub mod utils;

pub use aggregate::{
    Kpis, MonthlySales, ProductSales, RegionSales, compute_kpis, monthly_sales, sales_by_region,
    top_products,
};
pub use config::{ConfigValidationError, DashboardConfig, DashboardConfigBuilder};
pub use error::{DashboardError, Result as DashboardResult, ResultExt};
pub use filter::{DateRange, FilterSelection, filter, observed_range, observed_values};
pub use loader::{DataCache, DataLoader, SourceKey};
pub use records::{CanonicalRecordSet, FilteredView, LoadStats, SalesFrame};
pub use report::{DashboardReport, build_report};
pub use schema::{Capabilities, CanonicalField, ColumnMapping, SchemaNormalizer, resolve_columns};
pub use session::DashboardSession;
