//! Trend analysis and forecasting.
//!
//! Responsibilities:
//!
//! - extract signed day-deltas from an observation series (`extract`)
//! - describe them: trend, volatility, consistency, momentum, seasonality (`trend`)
//! - score how far the history can be trusted (`confidence`)
//! - project the next few bulletins (`forecast`)
//! - rank categories and summarize the market (`compare`, `summary`)
//!
//! Everything here is a pure function of its inputs. `TrendAnalyzer` binds the
//! operations to an `ObservationSource`.

pub mod classify;
pub mod compare;
pub mod confidence;
pub mod extract;
pub mod forecast;
pub mod momentum;
pub mod seasonal;
pub mod summary;
pub mod trend;

pub use classify::*;
pub use compare::*;
pub use confidence::*;
pub use extract::*;
pub use forecast::*;
pub use momentum::*;
pub use seasonal::*;
pub use summary::*;
pub use trend::*;

use crate::domain::{Category, Country, Window};
use crate::error::AppError;
use crate::source::ObservationSource;

/// Drop repeats, keeping the first occurrence of each item.
pub(crate) fn distinct<T: Copy + PartialEq>(items: &[T]) -> Vec<T> {
    let mut out = Vec::with_capacity(items.len());
    for &item in items {
        if !out.contains(&item) {
            out.push(item);
        }
    }
    out
}

/// The four public analysis operations over one observation source.
#[derive(Debug)]
pub struct TrendAnalyzer<S> {
    source: S,
}

impl<S: ObservationSource> TrendAnalyzer<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn analyze(
        &self,
        category: Category,
        country: Country,
        window: Window,
    ) -> Result<TrendAnalysis, AppError> {
        let obs = self.source.observations(category, country, &window)?;
        Ok(analyze_series(category, country, window, &obs))
    }

    /// Analyze, then forecast `periods_ahead` bulletins.
    pub fn predict(
        &self,
        category: Category,
        country: Country,
        window: Window,
        periods_ahead: usize,
    ) -> Result<Forecast, AppError> {
        let analysis = self.analyze(category, country, window)?;
        predict(&analysis, periods_ahead)
    }

    pub fn compare(
        &self,
        country: Country,
        categories: &[Category],
        window: Window,
    ) -> Result<Comparison, AppError> {
        compare(&self.source, country, categories, window)
    }

    pub fn summarize(
        &self,
        categories: &[Category],
        countries: &[Country],
        window: Window,
    ) -> Result<MarketSummary, AppError> {
        summarize(&self.source, categories, countries, window)
    }
}
