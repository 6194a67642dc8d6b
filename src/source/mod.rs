//! Where observation series come from.
//!
//! The engine never touches storage directly; it asks an `ObservationSource`
//! for one (category, country) series restricted to a window. Scraper output,
//! a database, or the CSV loader in `io::ingest` can all sit behind it.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::domain::{Category, Country, Observation, Window};
use crate::error::AppError;

pub trait ObservationSource: Sync {
    /// Observations within `window`, ascending by bulletin date. Months with no
    /// bulletin are absent rather than filled.
    fn observations(
        &self,
        category: Category,
        country: Country,
        window: &Window,
    ) -> Result<Vec<Observation>, AppError>;
}

/// In-memory series keyed by (category, country).
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    series: HashMap<(Category, Country), Vec<Observation>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one observation. A second observation for the same bulletin date
    /// replaces the first.
    pub fn insert(&mut self, category: Category, country: Country, observation: Observation) {
        let series = self.series.entry((category, country)).or_default();
        match series.binary_search_by_key(&observation.observation_date, |o| o.observation_date) {
            Ok(idx) => series[idx] = observation,
            Err(idx) => series.insert(idx, observation),
        }
    }

    pub fn extend(
        &mut self,
        category: Category,
        country: Country,
        observations: impl IntoIterator<Item = Observation>,
    ) {
        for o in observations {
            self.insert(category, country, o);
        }
    }

    /// Keys present, in stable (category, country) order.
    pub fn keys(&self) -> Vec<(Category, Country)> {
        let mut keys: Vec<_> = self.series.keys().copied().collect();
        keys.sort();
        keys
    }

    pub fn categories(&self) -> Vec<Category> {
        let mut out: Vec<Category> = self.keys().into_iter().map(|(c, _)| c).collect();
        out.dedup();
        out
    }

    pub fn countries(&self) -> Vec<Country> {
        let mut out: Vec<Country> = self.keys().into_iter().map(|(_, c)| c).collect();
        out.sort();
        out.dedup();
        out
    }

    /// Newest bulletin date across every series.
    pub fn latest_observation_date(&self) -> Option<NaiveDate> {
        self.series
            .values()
            .filter_map(|series| series.last().map(|o| o.observation_date))
            .max()
    }

    pub fn len(&self) -> usize {
        self.series.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

impl ObservationSource for MemorySource {
    fn observations(
        &self,
        category: Category,
        country: Country,
        window: &Window,
    ) -> Result<Vec<Observation>, AppError> {
        Ok(self
            .series
            .get(&(category, country))
            .map(|series| {
                series
                    .iter()
                    .filter(|o| window.contains(o.observation_date))
                    .copied()
                    .collect()
            })
            .unwrap_or_default())
    }
}
