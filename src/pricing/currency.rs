//! Static currency table.
//!
//! Rates are configuration constants, not live quotes. Each entry maps the
//! native (USD) value to a display currency.

use serde::{Deserialize, Serialize};

use crate::domain::{Currency, CurrencySpec};
use crate::error::EstimatorError;

pub const USD_MULTIPLIER: f64 = 1.0;
pub const EUR_MULTIPLIER: f64 = 0.95;
pub const TND_MULTIPLIER: f64 = 2.94;

pub const USD_SYMBOL: &str = "$";
pub const EUR_SYMBOL: &str = "€";
pub const TND_SYMBOL: &str = "DT";

/// Multiplier and symbol per supported currency.
///
/// Deserializes from a `[currencies]` TOML table; entries that are left out
/// keep their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurrencyTable {
    pub usd: CurrencySpec,
    pub eur: CurrencySpec,
    pub tnd: CurrencySpec,
}

impl Default for CurrencyTable {
    fn default() -> Self {
        Self {
            usd: CurrencySpec::new(USD_MULTIPLIER, USD_SYMBOL),
            eur: CurrencySpec::new(EUR_MULTIPLIER, EUR_SYMBOL),
            tnd: CurrencySpec::new(TND_MULTIPLIER, TND_SYMBOL),
        }
    }
}

impl CurrencyTable {
    pub fn get(&self, currency: Currency) -> &CurrencySpec {
        match currency {
            Currency::Usd => &self.usd,
            Currency::Eur => &self.eur,
            Currency::Tnd => &self.tnd,
        }
    }

    /// Resolve a user-supplied key such as `"eur"`.
    pub fn lookup(&self, key: &str) -> Result<(Currency, &CurrencySpec), EstimatorError> {
        let currency: Currency = key.parse()?;
        Ok((currency, self.get(currency)))
    }

    /// Entries in `Currency::ALL` order.
    pub fn entries(&self) -> impl Iterator<Item = (Currency, &CurrencySpec)> {
        Currency::ALL.into_iter().map(move |c| (c, self.get(c)))
    }

    /// Reject non-finite multipliers and blank symbols.
    ///
    /// Zero and negative multipliers are accepted; `convert` handles them.
    pub fn validate(&self) -> Result<(), String> {
        for (currency, spec) in self.entries() {
            if !spec.multiplier.is_finite() {
                return Err(format!(
                    "Invalid multiplier {} for {currency}: must be finite.",
                    spec.multiplier
                ));
            }
            if spec.symbol.trim().is_empty() {
                return Err(format!("Empty display symbol for {currency}."));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_published_rates() {
        let table = CurrencyTable::default();
        assert_eq!(table.get(Currency::Usd), &CurrencySpec::new(1.0, "$"));
        assert_eq!(table.get(Currency::Eur), &CurrencySpec::new(0.95, "€"));
        assert_eq!(table.get(Currency::Tnd), &CurrencySpec::new(2.94, "DT"));
        assert!(table.validate().is_ok());
    }

    #[test]
    fn lookup_rejects_unknown_keys() {
        let table = CurrencyTable::default();
        let (currency, spec) = table.lookup("TND").unwrap();
        assert_eq!(currency, Currency::Tnd);
        assert_eq!(spec.symbol, "DT");
        assert_eq!(
            table.lookup("🇺🇸 USD ($)").unwrap_err(),
            EstimatorError::InvalidCurrency("🇺🇸 USD ($)".to_string())
        );
    }

    #[test]
    fn validate_flags_bad_entries() {
        let mut table = CurrencyTable::default();
        table.eur.multiplier = f64::NAN;
        assert!(table.validate().unwrap_err().contains("EUR"));

        let mut table = CurrencyTable::default();
        table.usd.multiplier = f64::INFINITY;
        assert!(table.validate().is_err());

        let mut table = CurrencyTable::default();
        table.tnd.symbol = " ".to_string();
        assert!(table.validate().is_err());
    }

    #[test]
    fn validate_accepts_zero_and_negative_multipliers() {
        let mut table = CurrencyTable::default();
        table.eur.multiplier = -0.5;
        table.tnd.multiplier = 0.0;
        assert!(table.validate().is_ok());
    }
}
