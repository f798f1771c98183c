use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;

use crate::cleaning::rules;
use crate::core::types::DataTable;

/// Merchant name used when no mapping covers an inventory file.
pub const UNKNOWN_MERCHANT: &str = "Unknown Merchant";

/// File source recorded on the zeroed summary of a merchant that has
/// no inventory export.
pub const NO_INVENTORY_SOURCE: &str = "No inventory file";

/// Aggregated view of one inventory export, attached to the matching
/// merchant in the analytics report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InventorySummary {
    pub merchant_name: String,
    pub file_source: String,
    pub total_items: usize,
    pub revenue_items: usize,
    pub non_revenue_items: usize,
    pub items_with_cost: usize,
    pub hidden_items: usize,
    #[serde(with = "crate::analytics::serde_money")]
    pub avg_price: Decimal,
    #[serde(with = "crate::analytics::serde_money")]
    pub total_inventory_value: Decimal,
}

impl InventorySummary {
    /// Summarize a cleaned inventory table. Columns the export lacks
    /// degrade the way a missing column should: every item counts as a
    /// revenue item, nothing counts as hidden or costed.
    pub fn from_table(merchant_name: String, file_source: String, table: &DataTable) -> Self {
        let revenue_col = table.column_index("Non-revenue item");
        let cost_col = table.column_index("Cost");
        let hidden_col = table.column_index("Hidden");
        let price_col = table.column_index("Price");

        let total_items = table.row_count();

        let count_matching = |col: Option<usize>, expected: &str| -> usize {
            match col {
                Some(col) => table
                    .rows
                    .iter()
                    .filter(|row| row.get(col).map(|c| c.trim() == expected).unwrap_or(false))
                    .count(),
                None => 0,
            }
        };

        let revenue_items = match revenue_col {
            Some(_) => count_matching(revenue_col, "No"),
            None => total_items,
        };
        let non_revenue_items = count_matching(revenue_col, "Yes");
        let hidden_items = count_matching(hidden_col, "Yes");

        let items_with_cost = match cost_col {
            Some(col) => table
                .rows
                .iter()
                .filter(|row| row.get(col).map(|c| !c.trim().is_empty()).unwrap_or(false))
                .count(),
            None => 0,
        };

        let prices: Vec<Decimal> = match price_col {
            Some(col) => table
                .rows
                .iter()
                .filter_map(|row| row.get(col))
                .filter_map(|cell| rules::parse_number(cell))
                .collect(),
            None => Vec::new(),
        };
        let total_inventory_value: Decimal = prices.iter().copied().sum();
        let avg_price = if prices.is_empty() {
            Decimal::ZERO
        } else {
            total_inventory_value / Decimal::from(prices.len())
        };

        Self {
            merchant_name,
            file_source,
            total_items,
            revenue_items,
            non_revenue_items,
            items_with_cost,
            hidden_items,
            avg_price,
            total_inventory_value,
        }
    }

    /// Zeroed summary for a merchant without any inventory export.
    pub fn missing_for(merchant_name: &str) -> Self {
        Self {
            merchant_name: merchant_name.to_string(),
            file_source: NO_INVENTORY_SOURCE.to_string(),
            total_items: 0,
            revenue_items: 0,
            non_revenue_items: 0,
            items_with_cost: 0,
            hidden_items: 0,
            avg_price: Decimal::ZERO,
            total_inventory_value: Decimal::ZERO,
        }
    }
}

/// Resolve the merchant an inventory file belongs to from the
/// configured stem-to-merchant map.
pub fn merchant_for_stem(stem: &str, inventory_map: Option<&HashMap<String, String>>) -> String {
    inventory_map
        .and_then(|map| map.get(stem))
        .cloned()
        .unwrap_or_else(|| UNKNOWN_MERCHANT.to_string())
}
