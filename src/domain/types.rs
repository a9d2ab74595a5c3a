//! Shared domain types.
//!
//! These types are intentionally small and mostly `Copy` so they can be passed
//! by value through the pipeline:
//!
//! - reference observations and the dataset that owns them
//! - the fixed-order feature vector accepted by the model
//! - the fitted model and its diagnostics
//! - currency selection and the per-call estimation result

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EstimatorError;

/// Model input: the three neighbourhood features, in fit order.
///
/// `median_income` is in tens of thousands (the dataset's own scale), so a raw
/// annual income of 30,000 is passed as `3.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub median_income: f64,
    pub house_age: f64,
    pub average_rooms: f64,
}

impl FeatureVector {
    /// Number of features (and of model weights).
    pub const LEN: usize = 3;

    /// Column names in fit order.
    pub const NAMES: [&'static str; 3] = ["median_income", "house_age", "average_rooms"];

    pub fn new(median_income: f64, house_age: f64, average_rooms: f64) -> Self {
        Self {
            median_income,
            house_age,
            average_rooms,
        }
    }

    /// Values in the same order as the fitted weights.
    pub fn as_array(&self) -> [f64; Self::LEN] {
        [self.median_income, self.house_age, self.average_rooms]
    }

    pub fn is_finite(&self) -> bool {
        self.as_array().iter().all(|v| v.is_finite())
    }
}

/// One historical observation (a census block group).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferenceRecord {
    pub median_income: f64,
    pub house_age: f64,
    pub average_rooms: f64,
    /// Median house value in units of 100,000 (native currency).
    pub median_value: f64,
}

impl ReferenceRecord {
    pub fn features(&self) -> FeatureVector {
        FeatureVector::new(self.median_income, self.house_age, self.average_rooms)
    }

    pub fn is_finite(&self) -> bool {
        self.features().is_finite() && self.median_value.is_finite()
    }
}

/// The read-only table the model is fitted on.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceDataset {
    records: Vec<ReferenceRecord>,
    origin: String,
}

impl ReferenceDataset {
    /// `origin` is a human-readable description of where the rows came from.
    pub fn new(records: Vec<ReferenceRecord>, origin: impl Into<String>) -> Self {
        Self {
            records,
            origin: origin.into(),
        }
    }

    pub fn records(&self) -> &[ReferenceRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }
}

/// Goodness-of-fit on the training rows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitQuality {
    pub n_rows: usize,
    pub r_squared: f64,
    pub rmse: f64,
}

/// Fitted linear model: `value = intercept + Σ weight_i * feature_i`.
///
/// Immutable once built; coefficients are only readable.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrainedModel {
    intercept: f64,
    weights: [f64; FeatureVector::LEN],
    quality: Option<FitQuality>,
}

impl TrainedModel {
    /// Build a model from known coefficients (no diagnostics).
    pub fn from_coefficients(intercept: f64, weights: [f64; FeatureVector::LEN]) -> Self {
        Self {
            intercept,
            weights,
            quality: None,
        }
    }

    pub(crate) fn with_quality(mut self, quality: FitQuality) -> Self {
        self.quality = Some(quality);
        self
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Weights in `FeatureVector` order.
    pub fn weights(&self) -> [f64; FeatureVector::LEN] {
        self.weights
    }

    /// Training diagnostics; `None` for models built from raw coefficients.
    pub fn quality(&self) -> Option<&FitQuality> {
        self.quality.as_ref()
    }
}

/// Display currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Currency {
    Usd,
    Eur,
    Tnd,
}

impl Currency {
    pub const ALL: [Currency; 3] = [Currency::Usd, Currency::Eur, Currency::Tnd];

    /// ISO 4217 code.
    pub fn code(self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
            Currency::Tnd => "TND",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = EstimatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "usd" => Ok(Currency::Usd),
            "eur" => Ok(Currency::Eur),
            "tnd" => Ok(Currency::Tnd),
            _ => Err(EstimatorError::InvalidCurrency(s.to_string())),
        }
    }
}

/// Exchange multiplier (from native USD) and display symbol of a currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencySpec {
    pub multiplier: f64,
    pub symbol: String,
}

impl CurrencySpec {
    pub fn new(multiplier: f64, symbol: impl Into<String>) -> Self {
        Self {
            multiplier,
            symbol: symbol.into(),
        }
    }
}

/// Market segment of an estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketTier {
    HighValue,
    Affordable,
}

impl MarketTier {
    /// Label for terminal output.
    pub fn label(self) -> &'static str {
        match self {
            MarketTier::HighValue => "High Value Property",
            MarketTier::Affordable => "Affordable Entry-Level Property",
        }
    }
}

/// Output of a single estimate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EstimationResult {
    /// Model output in units of 100,000.
    pub raw: f64,
    /// `raw` scaled to the native currency.
    pub native_value: f64,
    pub currency: Currency,
    /// Native value converted to `currency`, truncated toward zero.
    pub amount: i64,
    /// `amount` with symbol and thousands separators.
    pub display: String,
    pub tier: MarketTier,
}
