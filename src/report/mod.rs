//! Reporting utilities: formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the analysis code stays clean and testable
//! - output changes are localized

pub mod format;

pub use format::*;
