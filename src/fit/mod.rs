//! Model fitting.
//!
//! Responsibilities:
//!
//! - solve OLS for the three-feature value model and report fit quality
//! - hold the fitted model behind a compute-once cache

pub mod cache;
pub mod fitter;

pub use cache::*;
pub use fitter::*;
