//! Dashboard aggregates over the medicine record set.
//!
//! Recomputed from the live records on every call. Low stock here uses the
//! fixed [`DASHBOARD_LOW_STOCK_THRESHOLD`] rather than each record's own
//! reorder level.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::models::Medicine;

/// Quantity below which the dashboard counts a medicine as low stock.
pub const DASHBOARD_LOW_STOCK_THRESHOLD: i64 = 10;

/// Number of best-stocked medicines shown.
pub const TOP_STOCKED_LIMIT: usize = 5;

/// Per-category totals.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CategorySummary {
    pub category: String,
    pub medicine_count: usize,
    pub total_quantity: i64,
    /// Mean unit price, two decimals
    pub avg_price: Decimal,
}

/// Parallel arrays for charting libraries.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CategorySeries {
    pub labels: Vec<String>,
    pub total_quantities: Vec<i64>,
    pub avg_prices: Vec<Decimal>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Dashboard {
    pub total: usize,
    pub low_stock_count: usize,
    pub expiring_soon_count: usize,
    /// `total - low_stock_count - expiring_soon_count`; a record that is
    /// both low and expiring is subtracted twice, so this can go negative.
    pub healthy_count: i64,
    /// Sorted by category name
    pub categories: Vec<CategorySummary>,
    /// Highest quantity first
    pub top_stocked: Vec<Medicine>,
}

impl Dashboard {
    pub fn category_series(&self) -> CategorySeries {
        CategorySeries {
            labels: self.categories.iter().map(|c| c.category.clone()).collect(),
            total_quantities: self.categories.iter().map(|c| c.total_quantity).collect(),
            avg_prices: self.categories.iter().map(|c| c.avg_price).collect(),
        }
    }
}

/// Compute dashboard figures for `medicines` as of `today`.
pub fn summarize(medicines: &[Medicine], today: NaiveDate) -> Dashboard {
    let total = medicines.len();
    let low_stock_count = medicines
        .iter()
        .filter(|m| m.quantity < DASHBOARD_LOW_STOCK_THRESHOLD)
        .count();
    let expiring_soon_count = medicines
        .iter()
        .filter(|m| m.is_expiring_soon(today))
        .count();
    let healthy_count = total as i64 - low_stock_count as i64 - expiring_soon_count as i64;

    Dashboard {
        total,
        low_stock_count,
        expiring_soon_count,
        healthy_count,
        categories: category_summaries(medicines),
        top_stocked: top_stocked(medicines, TOP_STOCKED_LIMIT),
    }
}

fn category_summaries(medicines: &[Medicine]) -> Vec<CategorySummary> {
    // (count, quantity, price sum)
    let mut groups: BTreeMap<&str, (usize, i64, Decimal)> = BTreeMap::new();
    for m in medicines {
        let entry = groups
            .entry(m.category.as_str())
            .or_insert((0, 0, Decimal::ZERO));
        entry.0 += 1;
        entry.1 += m.quantity;
        entry.2 += m.price;
    }

    groups
        .into_iter()
        .map(|(category, (count, quantity, price_sum))| CategorySummary {
            category: category.to_string(),
            medicine_count: count,
            total_quantity: quantity,
            avg_price: (price_sum / Decimal::from(count))
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
        })
        .collect()
}

fn top_stocked(medicines: &[Medicine], limit: usize) -> Vec<Medicine> {
    let mut sorted: Vec<Medicine> = medicines.to_vec();
    // Stable sort keeps insertion order among equal quantities
    sorted.sort_by(|a, b| b.quantity.cmp(&a.quantity));
    sorted.truncate(limit);
    sorted
}
