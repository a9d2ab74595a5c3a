//! Runtime settings.
//!
//! Resolution order, later wins:
//! 1. built-in defaults (the named constants in `pricing` and `data`)
//! 2. an optional TOML file (`--config`)
//! 3. environment variables, with `.env` loaded via `dotenvy`
//!
//! ```toml
//! high_value_threshold = 250000.0
//!
//! [currencies.eur]
//! multiplier = 0.92
//! symbol = "€"
//!
//! [dataset]
//! path = "data/housing.csv"
//! timeout_secs = 10
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::data::{DEFAULT_DATASET_URL, DatasetSource, SYNTHETIC_NOISE_SD};
use crate::error::AppError;
use crate::pricing::{CurrencyTable, HIGH_VALUE_THRESHOLD};

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_SYNTHETIC_ROWS: usize = 20_640;
pub const DEFAULT_SEED: u64 = 42;

pub const ENV_DATASET_URL: &str = "HV_DATASET_URL";
pub const ENV_DATASET_PATH: &str = "HV_DATASET_PATH";
pub const ENV_HIGH_VALUE_THRESHOLD: &str = "HV_HIGH_VALUE_THRESHOLD";
pub const ENV_TIMEOUT_SECS: &str = "HV_TIMEOUT_SECS";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub currencies: CurrencyTable,
    /// Native-currency threshold above which an estimate is `HighValue`.
    pub high_value_threshold: f64,
    pub dataset: DatasetSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetSettings {
    pub url: String,
    /// Local CSV; takes precedence over `url`.
    pub path: Option<PathBuf>,
    /// Use the seeded synthetic table instead of real data.
    pub synthetic: bool,
    pub synthetic_rows: usize,
    pub seed: u64,
    pub timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            currencies: CurrencyTable::default(),
            high_value_threshold: HIGH_VALUE_THRESHOLD,
            dataset: DatasetSettings::default(),
        }
    }
}

impl Default for DatasetSettings {
    fn default() -> Self {
        Self {
            url: DEFAULT_DATASET_URL.to_string(),
            path: None,
            synthetic: false,
            synthetic_rows: DEFAULT_SYNTHETIC_ROWS,
            seed: DEFAULT_SEED,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Settings {
    /// Defaults, then `path` (if any), then the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let mut settings = match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path).map_err(|e| {
                    AppError::new(2, format!("Failed to read config '{}': {e}", path.display()))
                })?;
                Self::from_toml_str(&raw)?
            }
            None => Self::default(),
        };

        settings.apply_overrides(|key| std::env::var(key).ok())?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, AppError> {
        toml::from_str(raw).map_err(|e| AppError::new(2, format!("Invalid config: {e}")))
    }

    /// Apply `HV_*` overrides from `lookup` (the environment in production).
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_DATASET_URL) {
            self.dataset.url = url;
        }
        if let Some(path) = lookup(ENV_DATASET_PATH) {
            self.dataset.path = Some(PathBuf::from(path));
        }
        if let Some(raw) = lookup(ENV_HIGH_VALUE_THRESHOLD) {
            self.high_value_threshold = raw.trim().parse().map_err(|_| {
                AppError::new(2, format!("Invalid {ENV_HIGH_VALUE_THRESHOLD}: '{raw}'"))
            })?;
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            self.dataset.timeout_secs = raw
                .trim()
                .parse()
                .map_err(|_| AppError::new(2, format!("Invalid {ENV_TIMEOUT_SECS}: '{raw}'")))?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), AppError> {
        self.currencies
            .validate()
            .map_err(|msg| AppError::new(2, msg))?;
        if !self.high_value_threshold.is_finite() {
            return Err(AppError::new(2, "high_value_threshold must be finite."));
        }
        if self.dataset.timeout_secs == 0 {
            return Err(AppError::new(2, "dataset.timeout_secs must be > 0."));
        }
        if self.dataset.synthetic && self.dataset.synthetic_rows == 0 {
            return Err(AppError::new(2, "dataset.synthetic_rows must be > 0."));
        }
        Ok(())
    }

    /// Where the estimator should load its reference table from.
    pub fn dataset_source(&self) -> DatasetSource {
        let ds = &self.dataset;
        if ds.synthetic {
            return DatasetSource::Synthetic {
                rows: ds.synthetic_rows,
                seed: ds.seed,
                noise_sd: SYNTHETIC_NOISE_SD,
            };
        }
        match &ds.path {
            Some(path) => DatasetSource::File(path.clone()),
            None => DatasetSource::Remote {
                url: ds.url.clone(),
                timeout: Duration::from_secs(ds.timeout_secs),
            },
        }
    }
}
