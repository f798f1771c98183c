//! Analytics stage.
//!
//! Derives the refined analytics report from cleaned tables, one
//! calculator per section: individual customers, merchants with their
//! inventory, business accounts and revenue forecasts. Money is
//! carried as [`rust_decimal::Decimal`] internally and becomes a
//! two-decimal number at the serialization boundary.

pub mod business;
pub mod customers;
pub mod engine;
pub mod forecast;
pub mod inventory;
pub mod merchants;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

/// Decimal to f64 without rounding, for rates and percentages.
pub(crate) fn to_raw_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}

/// Decimal to f64 rounded to cents, for money fields.
pub(crate) fn to_money_f64(value: Decimal) -> f64 {
    to_raw_f64(value.round_dp(2))
}

/// Serializes a money `Decimal` as a two-decimal JSON number.
pub(crate) mod serde_money {
    use rust_decimal::Decimal;
    use serde::Serializer;

    pub fn serialize<S: Serializer>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(super::to_money_f64(*value))
    }
}

/// Serializes an optional money `Decimal`, used with
/// `skip_serializing_if` so missing figures stay out of the report.
pub(crate) mod serde_opt_money {
    use rust_decimal::Decimal;
    use serde::Serializer;

    pub fn serialize<S: Serializer>(
        value: &Option<Decimal>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(value) => serializer.serialize_f64(super::to_money_f64(*value)),
            None => serializer.serialize_none(),
        }
    }
}

/// Serializes an optional percentage `Decimal` without rounding.
pub(crate) mod serde_opt_percent {
    use rust_decimal::Decimal;
    use serde::Serializer;

    pub fn serialize<S: Serializer>(
        value: &Option<Decimal>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(value) => serializer.serialize_f64(super::to_raw_f64(*value)),
            None => serializer.serialize_none(),
        }
    }
}
