//! Numeric utilities: descriptive statistics.

pub mod stats;

pub use stats::*;
