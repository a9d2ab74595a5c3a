//! Reference data: remote/local CSV loading and a seeded synthetic table.

pub mod sample;
pub mod source;

pub use sample::*;
pub use source::*;
