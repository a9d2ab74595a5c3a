//! Reporting: formatted terminal output for estimates and fitted models.

pub mod format;

pub use format::*;
