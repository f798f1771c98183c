use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use serde::Serialize;
use std::path::Path;

use crate::analytics::inventory::{self, InventorySummary};
use crate::cleaning::rules;
use crate::core::constants::defaults;
use crate::core::types::DataTable;

static MERCHANT_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([^/\\]+)-Revenue").expect("Failed to compile merchant name pattern")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MerchantStatus {
    Active,
    Inactive,
}

/// One line of a merchant's top-seller list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopItem {
    pub name: String,
    #[serde(with = "crate::analytics::serde_money")]
    pub gross_sales: Decimal,
}

/// Everything extracted from one merchant revenue report.
///
/// Summary figures the report did not carry stay `None` and are left
/// out of the serialized details, mirroring how partial reports look
/// in practice.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesReport {
    pub merchant_name: String,
    pub date_range: String,
    pub file_source: String,
    #[serde(
        serialize_with = "crate::analytics::serde_opt_money::serialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub gross_sales: Option<Decimal>,
    #[serde(
        serialize_with = "crate::analytics::serde_opt_money::serialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub net_sales: Option<Decimal>,
    #[serde(
        serialize_with = "crate::analytics::serde_opt_money::serialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub gross_profit: Option<Decimal>,
    #[serde(
        serialize_with = "crate::analytics::serde_opt_percent::serialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub gross_profit_margin: Option<Decimal>,
    pub top_selling_items: Vec<TopItem>,
    pub last_activity: Option<NaiveDate>,
    pub status: MerchantStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inventory_details: Option<InventorySummary>,
}

impl SalesReport {
    /// Parse a cleaned sales report table.
    ///
    /// The report preamble carries the date range on its second line
    /// and the labelled summary figures; wherever a label repeats, the
    /// last occurrence wins. Merchants whose reporting period ended
    /// after `active_cutoff` count as active; a report whose period
    /// cannot be read counts as inactive.
    pub fn parse(
        file_name: &str,
        file_source: String,
        table: &DataTable,
        active_cutoff: NaiveDate,
    ) -> Self {
        let merchant_name = merchant_name_from_file(file_name);

        let date_range = table
            .rows
            .get(1)
            .map(|row| row.join(",").trim().trim_matches('"').trim().to_string())
            .unwrap_or_default();

        let mut gross_sales = None;
        let mut net_sales = None;
        let mut gross_profit = None;
        let mut gross_profit_margin = None;

        for row in &table.rows {
            let line = row.join(",");
            if line.contains("Gross Sales") && line.contains('$') {
                gross_sales = rules::parse_currency(&line);
            } else if line.contains("Net Sales") && line.contains('$') {
                net_sales = rules::parse_currency(&line);
            } else if line.contains("Gross Profit,") && !line.contains("Margin") {
                gross_profit = rules::parse_currency(&line);
            } else if line.contains("Gross Profit Margin") {
                gross_profit_margin = rules::parse_percent(&line);
            }
        }

        let mut top_selling_items = parse_top_items(table);
        top_selling_items.sort_by(|a, b| b.gross_sales.cmp(&a.gross_sales));
        top_selling_items.truncate(defaults::TOP_LIST_SIZE);

        let last_activity = rules::last_month_day_year(&date_range);
        let status = match last_activity {
            Some(date) if date > active_cutoff => MerchantStatus::Active,
            _ => MerchantStatus::Inactive,
        };

        Self {
            merchant_name,
            date_range,
            file_source,
            gross_sales,
            net_sales,
            gross_profit,
            gross_profit_margin,
            top_selling_items,
            last_activity,
            status,
            inventory_details: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == MerchantStatus::Active
    }
}

/// Merchant name from a revenue report file name, the part before
/// `-Revenue`. Files named differently fall back to "Unknown".
pub fn merchant_name_from_file(file_name: &str) -> String {
    MERCHANT_NAME
        .captures(file_name)
        .map(|captures| captures[1].to_string())
        .unwrap_or_else(|| "Unknown".to_string())
}

/// Top-seller extraction. Revenue exports come in a few layouts, so
/// the item section is sniffed rather than assumed: a proper item
/// table wins, then category totals, then indented item lines.
fn parse_top_items(table: &DataTable) -> Vec<TopItem> {
    if let Some(items) = parse_item_table(table) {
        return items;
    }

    let categories = parse_category_totals(table);
    if !categories.is_empty() {
        return categories;
    }

    parse_indented_items(table)
}

/// Layout with a `Name,Gross Sales,Net Sales,Sold` header followed by
/// one CSV row per item. The trailing TOTAL row is skipped.
fn parse_item_table(table: &DataTable) -> Option<Vec<TopItem>> {
    let header_idx = table.rows.iter().position(|row| {
        row.len() >= 4
            && row[0].trim() == "Name"
            && row[1].trim() == "Gross Sales"
            && row[2].trim() == "Net Sales"
            && row[3].trim() == "Sold"
    })?;

    let mut items = Vec::new();
    for row in &table.rows[header_idx + 1..] {
        let name = clean_cell(row.first());
        let amount_cell = clean_cell(row.get(1));
        if name.is_empty() || amount_cell.is_empty() {
            continue;
        }
        if name.eq_ignore_ascii_case("TOTAL") {
            continue;
        }
        if let Some(amount) = rules::parse_currency(&amount_cell)
            && amount > Decimal::ZERO
        {
            items.push(TopItem {
                name,
                gross_sales: amount,
            });
        }
    }

    Some(items)
}

/// Layout with `Total (Category)` rollup rows, amount in the third
/// column, category name inside the parentheses.
fn parse_category_totals(table: &DataTable) -> Vec<TopItem> {
    let mut items = Vec::new();

    for row in &table.rows {
        let first = clean_cell(row.first());
        if !(first.starts_with("Total (") && first.ends_with(')')) {
            continue;
        }
        let name = first["Total (".len()..first.len() - 1].to_string();

        let Some(amount_cell) = row.get(2) else {
            continue;
        };
        if let Some(amount) = rules::parse_currency(amount_cell)
            && amount > Decimal::ZERO
        {
            items.push(TopItem {
                name,
                gross_sales: amount,
            });
        }
    }

    items
}

/// Layout where item lines are indented by an empty leading column,
/// name second, amount third.
fn parse_indented_items(table: &DataTable) -> Vec<TopItem> {
    let mut items = Vec::new();

    for row in &table.rows {
        if row.len() < 3 || !row[0].trim().is_empty() {
            continue;
        }
        let name = clean_cell(row.get(1));
        if name.is_empty() {
            continue;
        }
        if let Some(amount) = rules::parse_currency(&row[2])
            && amount > Decimal::ZERO
        {
            items.push(TopItem {
                name,
                gross_sales: amount,
            });
        }
    }

    items
}

fn clean_cell(cell: Option<&String>) -> String {
    cell.map(|c| c.trim().trim_matches('"').trim().to_string())
        .unwrap_or_default()
}

/// Attach each merchant's inventory summary: first by exact merchant
/// name, then by the inventory file stem containing the merchant name.
/// With no inventory files at all, merchants stay without details;
/// otherwise unmatched merchants get a zeroed placeholder.
pub fn attach_inventory(reports: &mut [SalesReport], summaries: &[InventorySummary]) {
    if summaries.is_empty() {
        return;
    }

    for report in reports.iter_mut() {
        let matched = summaries
            .iter()
            .find(|summary| summary.merchant_name == report.merchant_name)
            .or_else(|| {
                summaries.iter().find(|summary| {
                    summary.merchant_name == inventory::UNKNOWN_MERCHANT
                        && stem_matches(&summary.file_source, &report.merchant_name)
                })
            });

        report.inventory_details = Some(match matched {
            Some(summary) => {
                let mut summary = summary.clone();
                if summary.merchant_name == inventory::UNKNOWN_MERCHANT {
                    summary.merchant_name = report.merchant_name.clone();
                }
                summary
            }
            None => InventorySummary::missing_for(&report.merchant_name),
        });
    }
}

fn stem_matches(file_source: &str, merchant_name: &str) -> bool {
    let stem = Path::new(file_source)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("")
        .to_lowercase();
    let name = merchant_name.to_lowercase();
    !stem.is_empty() && !name.is_empty() && stem.contains(&name)
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct MerchantAnalytics {
    pub total_merchants: usize,
    pub active_merchants: usize,
    pub inactive_merchants: usize,
    #[serde(with = "crate::analytics::serde_money")]
    pub total_gross_sales: Decimal,
    #[serde(with = "crate::analytics::serde_money")]
    pub total_net_sales: Decimal,
    pub average_profit_margin: Option<f64>,
    pub merchant_details: Vec<SalesReport>,
    pub top_3_merchants: Vec<SalesReport>,
}

impl MerchantAnalytics {
    pub fn from_reports(reports: Vec<SalesReport>) -> Self {
        if reports.is_empty() {
            return Self::default();
        }

        let total = reports.len();
        let active = reports.iter().filter(|r| r.is_active()).count();
        let total_gross_sales: Decimal = reports.iter().filter_map(|r| r.gross_sales).sum();
        let total_net_sales: Decimal = reports.iter().filter_map(|r| r.net_sales).sum();

        let margins: Vec<Decimal> = reports
            .iter()
            .filter_map(|r| r.gross_profit_margin)
            .filter(|margin| *margin > Decimal::ZERO)
            .collect();
        let average_profit_margin = if margins.is_empty() {
            None
        } else {
            let sum: Decimal = margins.iter().copied().sum();
            Some(crate::analytics::to_raw_f64(
                sum / Decimal::from(margins.len()),
            ))
        };

        let mut top_3_merchants = reports.clone();
        top_3_merchants.sort_by(|a, b| {
            b.gross_sales
                .unwrap_or_default()
                .cmp(&a.gross_sales.unwrap_or_default())
        });
        top_3_merchants.truncate(defaults::TOP_LIST_SIZE);

        Self {
            total_merchants: total,
            active_merchants: active,
            inactive_merchants: total - active,
            total_gross_sales,
            total_net_sales,
            average_profit_margin,
            merchant_details: reports,
            top_3_merchants,
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]

    use super::*;
    use rust_decimal_macros::dec;

    fn table(rows: Vec<Vec<&str>>) -> DataTable {
        DataTable::headerless(
            rows.into_iter()
                .map(|row| row.into_iter().map(String::from).collect())
                .collect(),
        )
    }

    fn cutoff() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, 1).unwrap()
    }

    fn item_table_report() -> DataTable {
        table(vec![
            vec!["MARATHON LIQUORS Revenue Report"],
            vec!["Jan 1, 2025 - May 31, 2025"],
            vec!["Gross Sales", "", "$36,712.88"],
            vec!["Net Sales", "", "$33,258.44"],
            vec!["Gross Profit", "", "$10,413.65"],
            vec!["Gross Profit Margin", "31.3%"],
            vec!["Name", "Gross Sales", "Net Sales", "Sold"],
            vec!["Blue Moon 6pk", "$1,370.50", "$1,248.75", "108"],
            vec!["Tito's 750ml", "$980.00", "$890.00", "49"],
            vec!["Bud Light 12pk", "$450.25", "$401.10", "62"],
            vec!["Craft IPA", "$1,500.00", "$1,400.00", "80"],
            vec!["TOTAL", "$36,712.88", "$33,258.44", "299"],
        ])
    }

    #[test]
    fn test_parse__summary_figures_and_date_range() {
        let report = SalesReport::parse(
            "MARATHON LIQUORS-Revenue-Report.csv",
            "data/MARATHON LIQUORS-Revenue-Report.csv".to_string(),
            &item_table_report(),
            cutoff(),
        );

        assert_eq!(report.merchant_name, "MARATHON LIQUORS");
        assert_eq!(report.date_range, "Jan 1, 2025 - May 31, 2025");
        assert_eq!(report.gross_sales, Some(dec!(36712.88)));
        assert_eq!(report.net_sales, Some(dec!(33258.44)));
        assert_eq!(report.gross_profit, Some(dec!(10413.65)));
        assert_eq!(report.gross_profit_margin, Some(dec!(31.3)));
        assert_eq!(
            report.last_activity,
            NaiveDate::from_ymd_opt(2025, 5, 31)
        );
        assert_eq!(report.status, MerchantStatus::Active);
    }

    #[test]
    fn test_parse__item_table_top_sellers_sorted_and_capped() {
        let report = SalesReport::parse(
            "MARATHON LIQUORS-Revenue-Report.csv",
            String::new(),
            &item_table_report(),
            cutoff(),
        );

        let names: Vec<&str> = report
            .top_selling_items
            .iter()
            .map(|item| item.name.as_str())
            .collect();
        assert_eq!(names, vec!["Craft IPA", "Blue Moon 6pk", "Tito's 750ml"]);
        assert_eq!(report.top_selling_items[0].gross_sales, dec!(1500.00));
    }

    #[test]
    fn test_parse__category_totals_layout() {
        let report_table = table(vec![
            vec!["POKE HANA"],
            vec!["Feb 1, 2025 - Apr 30, 2025"],
            vec!["Gross Sales", "", "$20,000.00"],
            vec!["Category", "Items", "Gross Sales"],
            vec!["Total (Poke Bowls)", "120", "$8,500.00"],
            vec!["Total (Drinks)", "300", "$2,100.00"],
            vec!["Total (Sides)", "150", "$3,000.00"],
        ]);

        let report = SalesReport::parse(
            "POKE HANA-Revenue.csv",
            String::new(),
            &report_table,
            cutoff(),
        );

        let names: Vec<&str> = report
            .top_selling_items
            .iter()
            .map(|item| item.name.as_str())
            .collect();
        assert_eq!(names, vec!["Poke Bowls", "Sides", "Drinks"]);
    }

    #[test]
    fn test_parse__indented_items_layout() {
        let report_table = table(vec![
            vec!["Anthony's Pizza & Pasta"],
            vec!["Mar 1, 2025 - May 15, 2025"],
            vec!["Gross Sales", "", "$12,000.00"],
            vec!["", "Pepperoni Pizza", "$2,400.00"],
            vec!["", "Margherita Pizza", "$1,900.00"],
            vec!["", "Garlic Bread", "$500.00"],
            vec!["", "Tiramisu", "$0.00"],
        ]);

        let report = SalesReport::parse(
            "Anthony's Pizza & Pasta-Revenue.csv",
            String::new(),
            &report_table,
            cutoff(),
        );

        assert_eq!(report.merchant_name, "Anthony's Pizza & Pasta");
        let names: Vec<&str> = report
            .top_selling_items
            .iter()
            .map(|item| item.name.as_str())
            .collect();
        // Zero-amount rows are dropped
        assert_eq!(
            names,
            vec!["Pepperoni Pizza", "Margherita Pizza", "Garlic Bread"]
        );
    }

    #[test]
    fn test_parse__unreadable_period_counts_inactive() {
        let report_table = table(vec![
            vec!["Shop"],
            vec!["no dates here"],
            vec!["Gross Sales", "", "$100.00"],
        ]);

        let report =
            SalesReport::parse("Shop-Revenue.csv", String::new(), &report_table, cutoff());

        assert_eq!(report.last_activity, None);
        assert_eq!(report.status, MerchantStatus::Inactive);
    }

    #[test]
    fn test_parse__stale_period_counts_inactive() {
        let report_table = table(vec![
            vec!["Shop"],
            vec!["Jan 1, 2024 - Feb 28, 2024"],
        ]);

        let report =
            SalesReport::parse("Shop-Revenue.csv", String::new(), &report_table, cutoff());

        assert_eq!(report.status, MerchantStatus::Inactive);
    }

    #[test]
    fn test_parse__missing_figures_stay_absent() {
        let report_table = table(vec![vec!["Shop"], vec!["Jan 1, 2025 - May 31, 2025"]]);

        let report =
            SalesReport::parse("Shop-Revenue.csv", String::new(), &report_table, cutoff());

        assert_eq!(report.gross_sales, None);
        assert_eq!(report.gross_profit_margin, None);

        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("gross_sales").is_none());
        assert!(json.get("inventory_details").is_none());
        assert_eq!(json["status"], "Active");
    }

    #[test]
    fn test_merchant_name_from_file() {
        assert_eq!(
            merchant_name_from_file("MARATHON LIQUORS-Revenue-Report.csv"),
            "MARATHON LIQUORS"
        );
        assert_eq!(
            merchant_name_from_file("POKE HANA-Revenue.csv"),
            "POKE HANA"
        );
        assert_eq!(merchant_name_from_file("sales-summary.csv"), "Unknown");
    }

    fn bare_report(name: &str, gross: Option<Decimal>, status: MerchantStatus) -> SalesReport {
        SalesReport {
            merchant_name: name.to_string(),
            date_range: String::new(),
            file_source: String::new(),
            gross_sales: gross,
            net_sales: gross,
            gross_profit: None,
            gross_profit_margin: None,
            top_selling_items: Vec::new(),
            last_activity: None,
            status,
            inventory_details: None,
        }
    }

    #[test]
    fn test_attach_inventory__by_merchant_name() {
        let mut reports = vec![bare_report(
            "MARATHON LIQUORS",
            Some(dec!(100)),
            MerchantStatus::Active,
        )];
        let summaries = vec![InventorySummary::from_table(
            "MARATHON LIQUORS".to_string(),
            "inventory-export-v2.xlsx".to_string(),
            &DataTable::new(vec!["Name".to_string()], vec![vec!["Cola".to_string()]]),
        )];

        attach_inventory(&mut reports, &summaries);

        let details = reports[0].inventory_details.as_ref().unwrap();
        assert_eq!(details.merchant_name, "MARATHON LIQUORS");
        assert_eq!(details.total_items, 1);
    }

    #[test]
    fn test_attach_inventory__falls_back_to_stem_match() {
        let mut reports = vec![bare_report(
            "Poke Hana",
            Some(dec!(100)),
            MerchantStatus::Active,
        )];
        let summaries = vec![InventorySummary::from_table(
            inventory::UNKNOWN_MERCHANT.to_string(),
            "exports/Poke Hana-inventory.xlsx".to_string(),
            &DataTable::new(vec!["Name".to_string()], vec![vec!["Bowl".to_string()]]),
        )];

        attach_inventory(&mut reports, &summaries);

        let details = reports[0].inventory_details.as_ref().unwrap();
        // The placeholder name is replaced once the file is claimed
        assert_eq!(details.merchant_name, "Poke Hana");
        assert_eq!(details.total_items, 1);
    }

    #[test]
    fn test_attach_inventory__unmatched_gets_zeroed_placeholder() {
        let mut reports = vec![bare_report(
            "POKE HANA",
            Some(dec!(100)),
            MerchantStatus::Active,
        )];
        let summaries = vec![InventorySummary::from_table(
            "MARATHON LIQUORS".to_string(),
            "inventory-export-v2.xlsx".to_string(),
            &DataTable::new(vec!["Name".to_string()], Vec::new()),
        )];

        attach_inventory(&mut reports, &summaries);

        let details = reports[0].inventory_details.as_ref().unwrap();
        assert_eq!(details.merchant_name, "POKE HANA");
        assert_eq!(details.file_source, inventory::NO_INVENTORY_SOURCE);
        assert_eq!(details.total_items, 0);
    }

    #[test]
    fn test_attach_inventory__no_summaries_leaves_reports_untouched() {
        let mut reports = vec![bare_report(
            "POKE HANA",
            Some(dec!(100)),
            MerchantStatus::Active,
        )];

        attach_inventory(&mut reports, &[]);

        assert!(reports[0].inventory_details.is_none());
    }

    #[test]
    fn test_from_reports__totals_and_top_list() {
        let reports = vec![
            bare_report("A", Some(dec!(100.00)), MerchantStatus::Active),
            bare_report("B", Some(dec!(300.00)), MerchantStatus::Inactive),
            bare_report("C", Some(dec!(200.00)), MerchantStatus::Active),
            bare_report("D", None, MerchantStatus::Inactive),
        ];

        let analytics = MerchantAnalytics::from_reports(reports);

        assert_eq!(analytics.total_merchants, 4);
        assert_eq!(analytics.active_merchants, 2);
        assert_eq!(analytics.inactive_merchants, 2);
        assert_eq!(analytics.total_gross_sales, dec!(600.00));
        assert_eq!(analytics.merchant_details.len(), 4);

        let top: Vec<&str> = analytics
            .top_3_merchants
            .iter()
            .map(|r| r.merchant_name.as_str())
            .collect();
        assert_eq!(top, vec!["B", "C", "A"]);
    }

    #[test]
    fn test_from_reports__margin_mean_over_positive_margins_only() {
        let mut with_margin = bare_report("A", None, MerchantStatus::Active);
        with_margin.gross_profit_margin = Some(dec!(30));
        let mut zero_margin = bare_report("B", None, MerchantStatus::Active);
        zero_margin.gross_profit_margin = Some(dec!(0));
        let mut other_margin = bare_report("C", None, MerchantStatus::Active);
        other_margin.gross_profit_margin = Some(dec!(20));

        let analytics =
            MerchantAnalytics::from_reports(vec![with_margin, zero_margin, other_margin]);

        assert_eq!(analytics.average_profit_margin, Some(25.0));
    }

    #[test]
    fn test_from_reports__no_positive_margins_is_null() {
        let reports = vec![bare_report("A", Some(dec!(100)), MerchantStatus::Active)];

        let analytics = MerchantAnalytics::from_reports(reports);

        assert_eq!(analytics.average_profit_margin, None);
        let json = serde_json::to_value(&analytics).unwrap();
        assert_eq!(json["average_profit_margin"], serde_json::Value::Null);
    }

    #[test]
    fn test_from_reports__empty_is_zeroed() {
        let analytics = MerchantAnalytics::from_reports(Vec::new());

        assert_eq!(analytics.total_merchants, 0);
        assert_eq!(analytics.total_gross_sales, Decimal::ZERO);
        assert!(analytics.top_3_merchants.is_empty());
    }
}
