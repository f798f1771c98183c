use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde::Serialize;

use crate::cleaning::rules;
use crate::core::constants::defaults;
use crate::core::types::DataTable;

/// One row of a business customer roster.
#[derive(Debug, Clone, PartialEq)]
pub struct BusinessAccount {
    pub legal_name: String,
    pub dba_name: String,
    pub customer_id: String,
    pub account_status: Option<String>,
    pub mtd_volume: Option<Decimal>,
    pub last_month_volume: Option<Decimal>,
}

impl BusinessAccount {
    /// Combined volume with missing figures counted as zero.
    pub fn total_volume(&self) -> Decimal {
        self.mtd_volume.unwrap_or_default() + self.last_month_volume.unwrap_or_default()
    }

    pub fn is_live(&self) -> bool {
        self.account_status.as_deref() == Some("Live")
    }

    /// Active means a live account that actually moved money this
    /// month.
    pub fn is_active(&self) -> bool {
        self.is_live() && self.mtd_volume.map(|v| v > Decimal::ZERO).unwrap_or(false)
    }
}

/// Flatten cleaned business tables into accounts.
pub fn collect_accounts(tables: &[&DataTable]) -> Vec<BusinessAccount> {
    let mut accounts = Vec::new();

    for table in tables {
        let legal_col = table.column_index("Legal Business Name");
        let dba_col = table.column_index("DBA Name");
        let id_col = table.column_index("Customer ID");
        let status_col = table.column_index("Account Status");
        let mtd_col = table.column_index("MTD Volume");
        let last_month_col = table.column_index("Last Month Volume");

        for row in &table.rows {
            let text = |col: Option<usize>| -> Option<String> {
                col.and_then(|c| row.get(c)).map(|cell| cell.trim().to_string())
            };
            let volume = |col: Option<usize>| -> Option<Decimal> {
                col.and_then(|c| row.get(c))
                    .and_then(|cell| rules::parse_number(cell))
            };

            accounts.push(BusinessAccount {
                legal_name: text(legal_col).unwrap_or_else(|| "Unknown".to_string()),
                dba_name: text(dba_col).unwrap_or_default(),
                customer_id: text(id_col).unwrap_or_default(),
                account_status: text(status_col),
                mtd_volume: volume(mtd_col),
                last_month_volume: volume(last_month_col),
            });
        }
    }

    accounts
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum VolumeCategory {
    High,
    Medium,
    Low,
}

/// Category cutpoints relative to the portfolio mean: High above twice
/// the mean, Medium above half of it.
pub fn categorize_volume(total: Decimal, mean: Decimal) -> VolumeCategory {
    if total > mean * Decimal::from(2) {
        VolumeCategory::High
    } else if total > mean / Decimal::from(2) {
        VolumeCategory::Medium
    } else {
        VolumeCategory::Low
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VolumeCategories {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopBusinessCustomer {
    pub business_name: String,
    pub dba_name: String,
    pub customer_id: String,
    #[serde(with = "crate::analytics::serde_money")]
    pub total_volume: Decimal,
    #[serde(with = "crate::analytics::serde_money")]
    pub mtd_volume: Decimal,
    #[serde(with = "crate::analytics::serde_money")]
    pub last_month_volume: Decimal,
    pub account_status: String,
    pub volume_category: VolumeCategory,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct BusinessAnalytics {
    pub total_business_accounts: usize,
    pub active_accounts: usize,
    pub live_accounts: usize,
    #[serde(with = "crate::analytics::serde_money")]
    pub total_mtd_volume: Decimal,
    #[serde(with = "crate::analytics::serde_money")]
    pub total_last_month_volume: Decimal,
    pub high_volume_accounts: usize,
    #[serde(with = "crate::analytics::serde_money")]
    pub avg_volume_per_account: Decimal,
    pub volume_categories: VolumeCategories,
    pub top_3_business_customers: Vec<TopBusinessCustomer>,
}

impl BusinessAnalytics {
    pub fn from_accounts(accounts: &[BusinessAccount]) -> Self {
        if accounts.is_empty() {
            return Self::default();
        }

        let totals: Vec<Decimal> = accounts.iter().map(|a| a.total_volume()).collect();
        let mut sorted_totals = totals.clone();
        sorted_totals.sort();
        let q75 = quantile_linear(&sorted_totals, 0.75);
        let mean = totals.iter().copied().sum::<Decimal>() / Decimal::from(totals.len());

        let mtd_values: Vec<Decimal> = accounts.iter().filter_map(|a| a.mtd_volume).collect();
        let total_mtd_volume: Decimal = mtd_values.iter().copied().sum();
        // Average over accounts that reported a figure, like a
        // spreadsheet mean over a sparse column
        let avg_volume_per_account = if mtd_values.is_empty() {
            Decimal::ZERO
        } else {
            total_mtd_volume / Decimal::from(mtd_values.len())
        };

        let mut volume_categories = VolumeCategories::default();
        for &total in &totals {
            match categorize_volume(total, mean) {
                VolumeCategory::High => volume_categories.high += 1,
                VolumeCategory::Medium => volume_categories.medium += 1,
                VolumeCategory::Low => volume_categories.low += 1,
            }
        }

        let mut ranked: Vec<&BusinessAccount> = accounts.iter().collect();
        ranked.sort_by(|a, b| b.total_volume().cmp(&a.total_volume()));
        let top_3_business_customers = ranked
            .into_iter()
            .take(defaults::TOP_LIST_SIZE)
            .map(|account| TopBusinessCustomer {
                business_name: account.legal_name.clone(),
                dba_name: account.dba_name.clone(),
                customer_id: account.customer_id.clone(),
                total_volume: account.total_volume(),
                mtd_volume: account.mtd_volume.unwrap_or_default(),
                last_month_volume: account.last_month_volume.unwrap_or_default(),
                account_status: account
                    .account_status
                    .clone()
                    .unwrap_or_else(|| "Unknown".to_string()),
                volume_category: categorize_volume(account.total_volume(), mean),
            })
            .collect();

        Self {
            total_business_accounts: accounts.len(),
            active_accounts: accounts.iter().filter(|a| a.is_active()).count(),
            live_accounts: accounts.iter().filter(|a| a.is_live()).count(),
            total_mtd_volume,
            total_last_month_volume: accounts
                .iter()
                .filter_map(|a| a.last_month_volume)
                .sum(),
            high_volume_accounts: totals.iter().filter(|&&t| t > q75).count(),
            avg_volume_per_account,
            volume_categories,
            top_3_business_customers,
        }
    }
}

/// Quantile with linear interpolation between the two nearest ranks,
/// over an ascending-sorted slice.
fn quantile_linear(sorted: &[Decimal], q: f64) -> Decimal {
    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }

    let position = (n - 1) as f64 * q;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    if lower == upper {
        return sorted[lower];
    }

    let fraction = Decimal::from_f64(position - lower as f64).unwrap_or_default();
    sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
}
