use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::analytics::business::{self, BusinessAnalytics};
use crate::analytics::customers::{self, CustomerAnalytics};
use crate::analytics::forecast::{self, Predictions};
use crate::analytics::inventory::{self, InventorySummary};
use crate::analytics::merchants::{self, MerchantAnalytics, SalesReport};
use crate::cleaning::cleaner::CleanRun;
use crate::config::Config;
use crate::core::error::Result;
use crate::core::types::{DataTable, DatasetKind};

/// Full analytics report, the payload of `refined_data.json`.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsReport {
    pub summary: PlatformSummary,
    pub merchants: MerchantAnalytics,
    pub customers: CustomerAnalytics,
    pub business_customers: BusinessAnalytics,
    pub predictions: Predictions,
}

/// Headline numbers across every entity type on the platform.
#[derive(Debug, Clone, Serialize)]
pub struct PlatformSummary {
    pub total_entities_onboarded: usize,
    #[serde(with = "crate::analytics::serde_money")]
    pub total_platform_volume: Decimal,
    pub overall_active_rate: f64,
    pub data_processing_date: String,
    pub comprehensive_breakdown: EntityBreakdown,
}

#[derive(Debug, Clone, Serialize)]
pub struct EntityBreakdown {
    pub individual_customers: usize,
    pub merchants: usize,
    pub business_customers: usize,
}

/// A stateless calculator deriving the analytics report from the
/// tables a cleaning run produced.
#[derive(Debug, Default)]
pub struct AnalyticsEngine {}

impl AnalyticsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// The main entry point for deriving analytics.
    ///
    /// `today` anchors every recency window so a run is reproducible
    /// under test. Fails only when the configured signup cutoff cannot
    /// be parsed.
    pub fn calculate(
        &self,
        run: &CleanRun,
        config: &Config,
        today: NaiveDate,
    ) -> Result<AnalyticsReport> {
        let active_cutoff = today - chrono::Duration::days(config.active_window_days());
        // Customers can pin activity to a fixed calendar date instead
        // of a sliding window
        let customer_cutoff = config.signup_cutoff_date()?.unwrap_or(active_cutoff);

        let customers = self.calculate_customers(run, customer_cutoff, today);
        let merchants = self.calculate_merchants(run, config, active_cutoff);
        let business_customers = self.calculate_business(run);
        let predictions = forecast::generate_predictions(
            &merchants.merchant_details,
            config.monthly_growth_rate(),
            config.annual_growth_rate(),
            config.forecast_months(),
        );
        let summary = self.calculate_summary(&customers, &merchants, &business_customers);

        Ok(AnalyticsReport {
            summary,
            merchants,
            customers,
            business_customers,
            predictions,
        })
    }

    fn calculate_customers(
        &self,
        run: &CleanRun,
        cutoff: NaiveDate,
        today: NaiveDate,
    ) -> CustomerAnalytics {
        let tables = Self::tables_of_kind(run, DatasetKind::Customer);
        let profiles = customers::collect_profiles(&tables);
        CustomerAnalytics::from_profiles(&profiles, cutoff, today)
    }

    fn calculate_merchants(
        &self,
        run: &CleanRun,
        config: &Config,
        active_cutoff: NaiveDate,
    ) -> MerchantAnalytics {
        let inventory_map = config.inventory_map.as_ref();
        let summaries: Vec<InventorySummary> = run
            .tables_of_kind(DatasetKind::Inventory)
            .into_iter()
            .map(|file| {
                let stem = file
                    .source
                    .path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("");
                InventorySummary::from_table(
                    inventory::merchant_for_stem(stem, inventory_map),
                    file.source.path.display().to_string(),
                    &file.table,
                )
            })
            .collect();

        let mut reports: Vec<SalesReport> = run
            .tables_of_kind(DatasetKind::Sales)
            .into_iter()
            .map(|file| {
                SalesReport::parse(
                    &file.source.file_name(),
                    file.source.path.display().to_string(),
                    &file.table,
                    active_cutoff,
                )
            })
            .collect();

        merchants::attach_inventory(&mut reports, &summaries);
        MerchantAnalytics::from_reports(reports)
    }

    fn calculate_business(&self, run: &CleanRun) -> BusinessAnalytics {
        let tables = Self::tables_of_kind(run, DatasetKind::Business);
        let accounts = business::collect_accounts(&tables);
        BusinessAnalytics::from_accounts(&accounts)
    }

    fn calculate_summary(
        &self,
        customers: &CustomerAnalytics,
        merchants: &MerchantAnalytics,
        business: &BusinessAnalytics,
    ) -> PlatformSummary {
        let total_entities = customers.total_onboarded
            + merchants.total_merchants
            + business.total_business_accounts;
        let active_entities = customers.active_customers
            + merchants.active_merchants
            + business.active_accounts;

        let overall_active_rate = if total_entities == 0 {
            0.0
        } else {
            let rate = Decimal::from(active_entities) / Decimal::from(total_entities)
                * Decimal::from(100);
            crate::analytics::to_raw_f64(rate.round_dp(2))
        };

        PlatformSummary {
            total_entities_onboarded: total_entities,
            total_platform_volume: merchants.total_gross_sales + business.total_mtd_volume,
            overall_active_rate,
            data_processing_date: chrono::Local::now()
                .naive_local()
                .format("%Y-%m-%dT%H:%M:%S%.6f")
                .to_string(),
            comprehensive_breakdown: EntityBreakdown {
                individual_customers: customers.total_onboarded,
                merchants: merchants.total_merchants,
                business_customers: business.total_business_accounts,
            },
        }
    }

    fn tables_of_kind(run: &CleanRun, kind: DatasetKind) -> Vec<&DataTable> {
        run.tables_of_kind(kind)
            .into_iter()
            .map(|file| &file.table)
            .collect()
    }
}
