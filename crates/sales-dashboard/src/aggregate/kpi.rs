//! Headline KPIs: total, average and transaction count.

use crate::error::Result;
use crate::records::{SalesFrame, sales_amounts};
use serde::Serialize;

/// Headline figures for the current view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Kpis {
    pub total: f64,
    pub average: f64,
    pub count: usize,
    pub is_empty: bool,
}

/// Sum, mean and row count of `Sales`. An empty view yields zeros.
pub fn compute_kpis(view: &impl SalesFrame) -> Result<Kpis> {
    let amounts = sales_amounts(view)?;
    if amounts.is_empty() {
        return Ok(Kpis {
            is_empty: true,
            ..Kpis::default()
        });
    }

    let count = amounts.len();
    let total: f64 = amounts.iter().sum();

    Ok(Kpis {
        total,
        average: total / count as f64,
        count,
        is_empty: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{DateRange, FilterSelection, filter};
    use crate::loader::DataLoader;
    use chrono::NaiveDate;
    use polars::prelude::*;
    use pretty_assertions::assert_eq;

    fn records() -> crate::records::CanonicalRecordSet {
        let raw = df![
            "Order Date" => &["2024-01-05", "2024-01-20", "2024-02-01"],
            "Product" => &["A", "B", "A"],
            "Sales" => &[100.0, 50.0, 30.0],
        ]
        .unwrap();
        DataLoader::default().load_frame(raw).unwrap()
    }

    #[test]
    fn test_compute_kpis() {
        let kpis = compute_kpis(&records()).unwrap();
        assert_eq!(
            kpis,
            Kpis {
                total: 180.0,
                average: 60.0,
                count: 3,
                is_empty: false,
            }
        );
    }

    #[test]
    fn test_compute_kpis_empty_view() {
        let day = NaiveDate::from_ymd_opt(2030, 1, 1).unwrap();
        let selection = FilterSelection::default().with_date_range(DateRange::new(day, day).unwrap());
        let view = filter(&records(), &selection).unwrap();

        let kpis = compute_kpis(&view).unwrap();
        assert!(kpis.is_empty);
        assert_eq!(kpis.total, 0.0);
        assert_eq!(kpis.average, 0.0);
        assert_eq!(kpis.count, 0);
    }
}
