//! `house-value` library crate.
//!
//! Estimates a property's market value from three neighbourhood features with
//! a linear model fitted once on the California housing table, then prices the
//! estimate in a chosen currency and classifies it.
//!
//! The binary (`hv`) is a thin wrapper around this library; embedders build an
//! [`Estimator`] once and share it.

pub mod app;
pub mod cli;
pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod fit;
pub mod math;
pub mod models;
pub mod pricing;
pub mod report;

pub use app::Estimator;
pub use domain::{Currency, EstimationResult, FeatureVector, MarketTier, TrainedModel};
pub use error::EstimatorError;
