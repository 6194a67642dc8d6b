//! Input/output helpers.
//!
//! - CSV ingest of bulletin observations (`ingest`)
//! - JSON exports of analysis results (`export`)

pub mod export;
pub mod ingest;

pub use export::*;
pub use ingest::*;
