//! The estimation pipeline shared by every front-end.
//!
//! features -> predict -> native currency -> display currency -> tier
//!
//! `Estimator` owns the compute-once model cache. Construct one per process
//! and pass it by reference to whatever serves requests; it is `Sync`.

use std::sync::Arc;

use tracing::debug;

use crate::config::Settings;
use crate::data::{DatasetSource, load_reference_dataset};
use crate::domain::{Currency, EstimationResult, FeatureVector, ReferenceDataset, TrainedModel};
use crate::error::EstimatorError;
use crate::fit::ModelCache;
use crate::models::predict;
use crate::pricing::{
    CurrencyTable, HIGH_VALUE_THRESHOLD, classify_with_threshold, convert, format_amount,
    to_native_currency,
};

#[derive(Debug)]
pub struct Estimator {
    source: DatasetSource,
    cache: ModelCache,
    currencies: CurrencyTable,
    high_value_threshold: f64,
}

impl Estimator {
    /// Estimator with default currencies and threshold.
    pub fn new(source: DatasetSource) -> Self {
        Self {
            source,
            cache: ModelCache::new(),
            currencies: CurrencyTable::default(),
            high_value_threshold: HIGH_VALUE_THRESHOLD,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.dataset_source())
            .with_currencies(settings.currencies.clone())
            .with_threshold(settings.high_value_threshold)
    }

    pub fn with_currencies(mut self, currencies: CurrencyTable) -> Self {
        self.currencies = currencies;
        self
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.high_value_threshold = threshold;
        self
    }

    pub fn source(&self) -> &DatasetSource {
        &self.source
    }

    pub fn currencies(&self) -> &CurrencyTable {
        &self.currencies
    }

    pub fn high_value_threshold(&self) -> f64 {
        self.high_value_threshold
    }

    /// The fitted model; loads and fits on first use only.
    pub fn model(&self) -> Result<Arc<TrainedModel>, EstimatorError> {
        self.cache
            .get_or_fit(|| load_reference_dataset(&self.source))
    }

    /// The reference table, once the model has been fitted.
    pub fn dataset(&self) -> Option<Arc<ReferenceDataset>> {
        self.cache.dataset()
    }

    /// How many times the model has been fitted (at most once on success).
    pub fn fit_count(&self) -> usize {
        self.cache.fit_count()
    }

    /// Raw model output in units of 100,000.
    pub fn predict(&self, features: FeatureVector) -> Result<f64, EstimatorError> {
        ensure_finite(features)?;
        let model = self.model()?;
        Ok(predict(&model, features))
    }

    /// Full estimate in `currency`.
    ///
    /// The tier is decided on the native value, so it never depends on the
    /// currency.
    pub fn estimate(&self, features: FeatureVector, currency: Currency) -> Result<EstimationResult, EstimatorError> {
        let raw = self.predict(features)?;
        let native_value = to_native_currency(raw);
        let spec = self.currencies.get(currency);
        let amount = convert(native_value, spec)?;
        let tier = classify_with_threshold(native_value, self.high_value_threshold);
        debug!(raw, native_value, %currency, amount, ?tier, "estimate");

        Ok(EstimationResult {
            raw,
            native_value,
            currency,
            amount,
            display: format_amount(amount, &spec.symbol),
            tier,
        })
    }

    /// Like `estimate`, with the currency given as a key such as `"eur"`.
    ///
    /// Unknown keys fail before the model is touched.
    pub fn estimate_with_key(&self, features: FeatureVector, currency: &str) -> Result<EstimationResult, EstimatorError> {
        let (currency, _) = self.currencies.lookup(currency)?;
        self.estimate(features, currency)
    }
}

fn ensure_finite(features: FeatureVector) -> Result<(), EstimatorError> {
    if features.is_finite() {
        return Ok(());
    }
    let bad: Vec<&str> = FeatureVector::NAMES
        .iter()
        .zip(features.as_array())
        .filter(|(_, v)| !v.is_finite())
        .map(|(name, _)| *name)
        .collect();
    Err(EstimatorError::InvalidInput(format!(
        "Non-finite feature value(s): {}",
        bad.join(", ")
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MarketTier;

    fn synthetic() -> Estimator {
        Estimator::new(DatasetSource::Synthetic {
            rows: 1000,
            seed: 42,
            noise_sd: 0.3,
        })
    }

    #[test]
    fn estimate_runs_full_pipeline() {
        let est = synthetic();
        let features = FeatureVector::new(3.0, 20.0, 5.0);
        let result = est.estimate(features, Currency::Usd).unwrap();

        let model = est.model().unwrap();
        assert_eq!(result.raw, predict(&model, features));
        assert_eq!(result.native_value, result.raw * 100_000.0);
        assert_eq!(result.amount, result.native_value.trunc() as i64);
        assert!(result.display.starts_with("$ "));
        assert_eq!(result.tier, crate::pricing::classify(result.native_value));
        assert_eq!(est.fit_count(), 1);
    }

    #[test]
    fn threshold_override_changes_tier() {
        let features = FeatureVector::new(3.0, 20.0, 5.0);
        let low = synthetic().with_threshold(f64::MIN);
        let high = synthetic().with_threshold(f64::MAX);
        assert_eq!(low.estimate(features, Currency::Usd).unwrap().tier, MarketTier::HighValue);
        assert_eq!(high.estimate(features, Currency::Usd).unwrap().tier, MarketTier::Affordable);
    }

    #[test]
    fn unknown_currency_is_rejected_before_fitting() {
        let est = synthetic();
        let err = est
            .estimate_with_key(FeatureVector::new(3.0, 20.0, 5.0), "gbp")
            .unwrap_err();
        assert_eq!(err, EstimatorError::InvalidCurrency("gbp".to_string()));
        assert_eq!(est.fit_count(), 0);
    }

    #[test]
    fn non_finite_features_are_rejected() {
        let est = synthetic();
        let err = est.predict(FeatureVector::new(3.0, f64::NAN, f64::INFINITY)).unwrap_err();
        assert_eq!(
            err,
            EstimatorError::InvalidInput("Non-finite feature value(s): house_age, average_rooms".to_string())
        );
    }

    #[test]
    fn unrepresentable_amount_is_an_error() {
        let est = synthetic();
        let err = est.estimate(FeatureVector::new(1e300, 20.0, 5.0), Currency::Usd).unwrap_err();
        assert!(matches!(err, EstimatorError::InvalidInput(_)));
        assert_eq!(est.fit_count(), 1);
    }

    #[test]
    fn custom_currency_table_is_used() {
        let mut table = CurrencyTable::default();
        table.eur.multiplier = 2.0;
        table.eur.symbol = "EUR".to_string();
        let est = synthetic().with_currencies(table);
        let features = FeatureVector::new(3.0, 20.0, 5.0);

        let usd = est.estimate(features, Currency::Usd).unwrap();
        let eur = est.estimate(features, Currency::Eur).unwrap();
        assert_eq!(eur.amount, (usd.native_value * 2.0).trunc() as i64);
        assert!(eur.display.starts_with("EUR "));
    }
}
