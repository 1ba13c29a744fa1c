use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::error::{ReportError, ReportResult};

pub fn decimal_to_f64(value: Decimal, field_name: &str) -> ReportResult<f64> {
    value.to_f64().ok_or_else(|| {
        ReportError::InvalidData(format!("{field_name} cannot be represented as f64"))
    })
}

pub fn f64_to_decimal(value: f64, field_name: &str) -> ReportResult<Decimal> {
    Decimal::from_f64_retain(value)
        .map(|decimal| decimal.round_dp(2))
        .ok_or_else(|| ReportError::InvalidData(format!("{field_name} must be finite")))
}
