//! `vb-trends` library crate.
//!
//! The binary (`vb`) is a thin wrapper around this library so that:
//!
//! - the analysis engine is testable without spawning processes
//! - other front ends (chat tools, an HTTP API) can call the same operations
//! - code stays easy to navigate as the project grows

pub mod analysis;
pub mod app;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod io;
pub mod math;
pub mod plot;
pub mod report;
pub mod source;
