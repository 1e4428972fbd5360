//! Canonical fields and their alias lists.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical name of the order date column.
pub const ORDER_DATE: &str = "Order Date";
/// Canonical name of the ship date column.
pub const SHIP_DATE: &str = "Ship Date";
/// Canonical name of the sales amount column.
pub const SALES: &str = "Sales";
/// Canonical name of the region column.
pub const REGION: &str = "Region";
/// Canonical name of the category column.
pub const CATEGORY: &str = "Category";
/// Canonical name of the product column.
pub const PRODUCT: &str = "Product";

// Each list starts with the canonical name, so a renamed column can never
// collide with an unmatched header of the same name.
const ORDER_DATE_ALIASES: &[&str] = &["Order Date", "Date", "Order_Date", "OrderDate"];
const SHIP_DATE_ALIASES: &[&str] = &["Ship Date", "Shipping Date", "Ship_Date"];
const SALES_ALIASES: &[&str] = &["Sales", "Total", "Revenue", "Amount"];
const REGION_ALIASES: &[&str] = &["Region", "Sales Region", "Territory"];
const CATEGORY_ALIASES: &[&str] = &["Category", "Product Category", "Category_Name"];
const PRODUCT_ALIASES: &[&str] = &[
    "Product",
    "Product Name",
    "Product_Name",
    "ProductName",
    "Item",
];

/// A field of the canonical sales schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CanonicalField {
    OrderDate,
    ShipDate,
    Sales,
    Region,
    Category,
    Product,
}

impl CanonicalField {
    /// All fields, in the order they are resolved and reported.
    pub const ALL: [CanonicalField; 6] = [
        CanonicalField::OrderDate,
        CanonicalField::ShipDate,
        CanonicalField::Sales,
        CanonicalField::Region,
        CanonicalField::Category,
        CanonicalField::Product,
    ];

    /// Column name used downstream regardless of the raw header spelling.
    pub fn canonical_name(self) -> &'static str {
        match self {
            Self::OrderDate => ORDER_DATE,
            Self::ShipDate => SHIP_DATE,
            Self::Sales => SALES,
            Self::Region => REGION,
            Self::Category => CATEGORY,
            Self::Product => PRODUCT,
        }
    }

    /// Accepted header spellings, in priority order.
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            Self::OrderDate => ORDER_DATE_ALIASES,
            Self::ShipDate => SHIP_DATE_ALIASES,
            Self::Sales => SALES_ALIASES,
            Self::Region => REGION_ALIASES,
            Self::Category => CATEGORY_ALIASES,
            Self::Product => PRODUCT_ALIASES,
        }
    }

    /// Whether loading must fail when no alias is present.
    pub fn is_required(self) -> bool {
        matches!(self, Self::OrderDate | Self::Sales)
    }

    /// Label shown to the user when this field is missing.
    pub fn missing_label(self) -> &'static str {
        match self {
            Self::Sales => "Sales / Total / Revenue",
            other => other.canonical_name(),
        }
    }
}

impl fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.canonical_name())
    }
}
