//! Domain types used throughout the engine.
//!
//! This module defines:
//!
//! - the observation series (`Observation`, `VisaStatus`)
//! - classification keys (`Category`, `Country`)
//! - the time window an analysis covers (`Window`)
//! - derived advancement samples (`AdvancementSample`)

pub mod types;

pub use types::*;
