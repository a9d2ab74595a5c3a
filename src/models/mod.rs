//! Linear model implementation.
//!
//! Kept as small, pure functions so the fitter and the estimator agree on the
//! feature order without sharing state.

pub mod model;

pub use model::*;
