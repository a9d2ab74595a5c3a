//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - reference observations (`ReferenceRecord`, `ReferenceDataset`)
//! - model input and output (`FeatureVector`, `TrainedModel`, `EstimationResult`)
//! - currency selection and market tiers (`Currency`, `CurrencySpec`, `MarketTier`)

pub mod types;

pub use types::*;
