use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::analytics::merchants::SalesReport;
use crate::analytics::to_money_f64;
use crate::core::constants::defaults;

pub const METHODOLOGY: &str = "Linear trend extrapolation based on current data";

/// Month-by-month revenue forecast, serialized as `month_N_forecast`
/// entries followed by a `total_N_months` rollup.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyForecast {
    pub months: Vec<f64>,
    pub total: f64,
}

impl Serialize for MonthlyForecast {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.months.len() + 1))?;
        for (index, value) in self.months.iter().enumerate() {
            map.serialize_entry(&format!("month_{}_forecast", index + 1), value)?;
        }
        map.serialize_entry(&format!("total_{}_months", self.months.len()), &self.total)?;
        map.end()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnualForecast {
    pub forecast: f64,
    pub growth_projection: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Predictions {
    pub next_2_months: Option<MonthlyForecast>,
    pub same_period_next_year: Option<AnnualForecast>,
    pub methodology: String,
}

impl Predictions {
    /// Forecast with nothing to extrapolate from.
    pub fn empty() -> Self {
        Self {
            next_2_months: None,
            same_period_next_year: None,
            methodology: METHODOLOGY.to_string(),
        }
    }
}

impl Default for Predictions {
    fn default() -> Self {
        Self::empty()
    }
}

/// Revenue forecast from merchant gross sales.
///
/// The monthly average treats total sales as covering one three-month
/// reporting period per merchant. Each forecast month compounds the
/// monthly growth rate on the previous one; the annual figure applies
/// the annual rate to the whole period. Growth rates are fractions,
/// 0.05 for five percent.
pub fn generate_predictions(
    reports: &[SalesReport],
    monthly_growth: f64,
    annual_growth: f64,
    forecast_months: u32,
) -> Predictions {
    if reports.is_empty() {
        return Predictions::empty();
    }

    let total_sales: Decimal = reports.iter().filter_map(|r| r.gross_sales).sum();
    let monthly_avg = total_sales
        / Decimal::from(reports.len().max(1))
        / Decimal::from(defaults::REPORT_PERIOD_MONTHS);

    let monthly_factor = growth_factor(monthly_growth);
    let mut months = Vec::with_capacity(forecast_months as usize);
    let mut period_total = Decimal::ZERO;
    let mut projected = monthly_avg;
    for _ in 0..forecast_months {
        projected *= monthly_factor;
        months.push(to_money_f64(projected));
        period_total += projected;
    }

    let next_2_months = MonthlyForecast {
        months,
        total: to_money_f64(period_total),
    };

    let same_period_next_year = AnnualForecast {
        forecast: to_money_f64(total_sales * growth_factor(annual_growth)),
        growth_projection: format!("{:.1}%", annual_growth * 100.0),
    };

    Predictions {
        next_2_months: Some(next_2_months),
        same_period_next_year: Some(same_period_next_year),
        methodology: METHODOLOGY.to_string(),
    }
}

fn growth_factor(rate: f64) -> Decimal {
    Decimal::ONE + Decimal::from_f64(rate).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]

    use super::*;
    use crate::analytics::merchants::MerchantStatus;
    use rust_decimal_macros::dec;

    fn report(gross: Option<Decimal>) -> SalesReport {
        SalesReport {
            merchant_name: "Shop".to_string(),
            date_range: String::new(),
            file_source: String::new(),
            gross_sales: gross,
            net_sales: None,
            gross_profit: None,
            gross_profit_margin: None,
            top_selling_items: Vec::new(),
            last_activity: None,
            status: MerchantStatus::Active,
            inventory_details: None,
        }
    }

    #[test]
    fn test_generate_predictions__compounds_monthly_growth() {
        let reports = vec![report(Some(dec!(600.00)))];

        let predictions = generate_predictions(&reports, 0.05, 0.15, 2);

        // 600 over one merchant and three months gives 200 a month
        let monthly = predictions.next_2_months.unwrap();
        assert_eq!(monthly.months, vec![210.0, 220.5]);
        assert_eq!(monthly.total, 430.5);

        let annual = predictions.same_period_next_year.unwrap();
        assert_eq!(annual.forecast, 690.0);
        assert_eq!(annual.growth_projection, "15.0%");
        assert_eq!(predictions.methodology, METHODOLOGY);
    }

    #[test]
    fn test_generate_predictions__splits_across_merchants() {
        let reports = vec![
            report(Some(dec!(600.00))),
            report(Some(dec!(600.00))),
            report(None),
        ];

        let predictions = generate_predictions(&reports, 0.05, 0.15, 2);

        // 1200 across three merchants; the merchant without figures
        // still dilutes the average
        let monthly = predictions.next_2_months.unwrap();
        assert_eq!(monthly.months[0], 140.0);
    }

    #[test]
    fn test_generate_predictions__custom_rates_and_horizon() {
        let reports = vec![report(Some(dec!(600.00)))];

        let predictions = generate_predictions(&reports, 0.10, 0.20, 3);

        let monthly = predictions.next_2_months.unwrap();
        assert_eq!(monthly.months, vec![220.0, 242.0, 266.2]);
        assert_eq!(monthly.total, 728.2);

        let annual = predictions.same_period_next_year.unwrap();
        assert_eq!(annual.forecast, 720.0);
        assert_eq!(annual.growth_projection, "20.0%");
    }

    #[test]
    fn test_generate_predictions__no_merchants() {
        let predictions = generate_predictions(&[], 0.05, 0.15, 2);

        assert_eq!(predictions.next_2_months, None);
        assert_eq!(predictions.same_period_next_year, None);
        assert_eq!(predictions.methodology, METHODOLOGY);
    }

    #[test]
    fn test_monthly_forecast__serializes_numbered_keys() {
        let forecast = MonthlyForecast {
            months: vec![210.0, 220.5],
            total: 430.5,
        };

        let json = serde_json::to_value(&forecast).unwrap();
        assert_eq!(json["month_1_forecast"], serde_json::json!(210.0));
        assert_eq!(json["month_2_forecast"], serde_json::json!(220.5));
        assert_eq!(json["total_2_months"], serde_json::json!(430.5));
    }

    #[test]
    fn test_monthly_forecast__longer_horizon_keys() {
        let forecast = MonthlyForecast {
            months: vec![1.0, 2.0, 3.0],
            total: 6.0,
        };

        let json = serde_json::to_value(&forecast).unwrap();
        assert_eq!(json["month_3_forecast"], serde_json::json!(3.0));
        assert_eq!(json["total_3_months"], serde_json::json!(6.0));
        assert!(json.get("total_2_months").is_none());
    }
}
