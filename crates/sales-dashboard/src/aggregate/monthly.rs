//! Sales over time, bucketed by calendar month.

use crate::error::Result;
use crate::records::{SalesFrame, order_dates, sales_amounts};
use chrono::Datelike;
use serde::Serialize;
use std::collections::BTreeMap;

/// Sales total for one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlySales {
    /// `YYYY-MM`
    pub month: String,
    pub year: i32,
    pub month_number: u32,
    pub total: f64,
}

/// Sales summed per calendar month of `Order Date`, oldest month first.
///
/// Months without any sales are not emitted.
pub fn monthly_sales(view: &impl SalesFrame) -> Result<Vec<MonthlySales>> {
    let mut totals: BTreeMap<(i32, u32), f64> = BTreeMap::new();

    for (date, amount) in order_dates(view)?.into_iter().zip(sales_amounts(view)?) {
        if let Some(date) = date {
            *totals.entry((date.year(), date.month())).or_default() += amount;
        }
    }

    Ok(totals
        .into_iter()
        .map(|((year, month_number), total)| MonthlySales {
            month: format!("{year:04}-{month_number:02}"),
            year,
            month_number,
            total,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::DataLoader;
    use polars::prelude::*;
    use pretty_assertions::assert_eq;

    fn month(label: &str, total: f64) -> (String, f64) {
        (label.to_string(), total)
    }

    #[test]
    fn test_monthly_sales_groups_by_calendar_month() {
        let raw = df![
            "Order Date" => &["2024-01-05", "2024-01-20", "2024-02-01"],
            "Sales" => &[100.0, 50.0, 30.0],
        ]
        .unwrap();
        let records = DataLoader::default().load_frame(raw).unwrap();

        let series: Vec<(String, f64)> = monthly_sales(&records)
            .unwrap()
            .into_iter()
            .map(|m| (m.month, m.total))
            .collect();

        assert_eq!(series, vec![month("2024-01", 150.0), month("2024-02", 30.0)]);
    }

    #[test]
    fn test_monthly_sales_orders_across_years() {
        let raw = df![
            "Order Date" => &["2024-03-01", "2023-12-31", "2024-01-15", "2023-12-01"],
            "Sales" => &[1.0, 2.0, 3.0, 4.0],
        ]
        .unwrap();
        let records = DataLoader::default().load_frame(raw).unwrap();

        let months = monthly_sales(&records).unwrap();
        let labels: Vec<&str> = months.iter().map(|m| m.month.as_str()).collect();

        assert_eq!(labels, vec!["2023-12", "2024-01", "2024-03"]);
        assert_eq!(months[0].total, 6.0);
        assert_eq!(months[0].year, 2023);
        assert_eq!(months[0].month_number, 12);
    }
}
