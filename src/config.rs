//! Runtime settings from the environment (and an optional `.env`).
//!
//! - `VB_DATA`  default observation CSV
//! - `VB_LOG`   tracing filter (falls back to `RUST_LOG`)
//! - `VB_YEARS` default trailing window in years
//!
//! CLI flags take precedence over everything here.

use std::path::PathBuf;

use crate::error::AppError;

pub const DEFAULT_LOG_FILTER: &str = "vb_trends=warn";
pub const DEFAULT_YEARS: u32 = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub data_path: Option<PathBuf>,
    pub log_filter: String,
    pub years: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_path: None,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            years: DEFAULT_YEARS,
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup (used by tests).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let mut settings = Self::default();

        if let Some(path) = lookup("VB_DATA").filter(|s| !s.trim().is_empty()) {
            settings.data_path = Some(PathBuf::from(path));
        }
        if let Some(filter) = lookup("VB_LOG").or_else(|| lookup("RUST_LOG")) {
            settings.log_filter = filter;
        }
        if let Some(years) = lookup("VB_YEARS") {
            settings.years = years
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|y| *y > 0)
                .ok_or_else(|| AppError::new(2, format!("Invalid VB_YEARS '{years}' (expected a positive integer).")))?;
        }

        Ok(settings)
    }
}
