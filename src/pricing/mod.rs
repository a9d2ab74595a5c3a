//! Turning a raw model output into a priced, classified result.
//!
//! - `money`: native scaling, currency conversion, classification, formatting
//! - `currency`: the static currency table

pub mod currency;
pub mod money;

pub use currency::*;
pub use money::*;
