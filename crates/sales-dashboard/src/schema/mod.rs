//! Schema normalization.
//!
//! Raw sales exports spell their headers differently ("Order Date", "Date",
//! "OrderDate", ...). This module resolves each canonical field against a
//! fixed, ordered alias list and renames the matched columns, so everything
//! downstream can rely on the names in [`fields`].

pub mod fields;
mod normalizer;

pub use fields::{CATEGORY, CanonicalField, ORDER_DATE, PRODUCT, REGION, SALES, SHIP_DATE};
pub use normalizer::{Capabilities, ColumnMapping, SchemaNormalizer, resolve_columns};
