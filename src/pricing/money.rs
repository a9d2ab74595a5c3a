//! Unit conversion, currency conversion and market-tier classification.

use crate::domain::{CurrencySpec, MarketTier};
use crate::error::EstimatorError;

/// Model output is in units of 100,000 native currency.
pub const NATIVE_SCALE: f64 = 100_000.0;

/// Native values strictly above this are `HighValue`.
pub const HIGH_VALUE_THRESHOLD: f64 = 200_000.0;

/// 2^63: the first magnitude an `i64` cannot hold.
const I64_LIMIT: f64 = 9_223_372_036_854_775_808.0;

/// Scale a raw model output to the native currency.
pub fn to_native_currency(raw: f64) -> f64 {
    raw * NATIVE_SCALE
}

/// Convert a native value to `spec`'s currency, truncating toward zero.
///
/// Amounts that are not finite or do not fit in an `i64` are rejected.
pub fn convert(native_value: f64, spec: &CurrencySpec) -> Result<i64, EstimatorError> {
    let amount = (native_value * spec.multiplier).trunc();
    if !(-I64_LIMIT..I64_LIMIT).contains(&amount) {
        return Err(EstimatorError::InvalidInput(format!(
            "Converted amount {amount:e} is outside the representable range."
        )));
    }
    Ok(amount as i64)
}

/// Classify a native value against the default threshold.
pub fn classify(native_value: f64) -> MarketTier {
    classify_with_threshold(native_value, HIGH_VALUE_THRESHOLD)
}

pub fn classify_with_threshold(native_value: f64, threshold: f64) -> MarketTier {
    if native_value > threshold {
        MarketTier::HighValue
    } else {
        MarketTier::Affordable
    }
}

/// Render `"<symbol> <amount>"` with comma thousands separators.
pub fn format_amount(amount: i64, symbol: &str) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if amount < 0 {
        grouped.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{symbol} {grouped}")
}
