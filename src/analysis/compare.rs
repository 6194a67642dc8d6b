//! Rank categories against each other for one country.
//!
//! Each category is analyzed independently (in parallel); results are kept in
//! input order so output never depends on scheduling. Categories whose
//! analysis did not succeed are left out of every ranking and listed in
//! `excluded` instead.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::analysis::distinct;
use crate::analysis::trend::{TrendAnalysis, analyze_series};
use crate::domain::{Category, Country, Window};
use crate::error::AppError;
use crate::source::ObservationSource;

/// Entries per ranking.
pub const RANKING_SIZE: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryMetrics {
    pub category: Category,
    pub average_advancement: f64,
    pub consistency_score: f64,
    pub std_deviation: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExcludedCategory {
    pub category: Category,
    pub status: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    pub country: Country,
    pub window: Window,
    /// Every successfully analyzed category, in input order.
    pub analyzed: Vec<CategoryMetrics>,
    /// By average advancement, descending.
    pub fastest_advancing: Vec<CategoryMetrics>,
    /// By consistency score, descending.
    pub most_stable: Vec<CategoryMetrics>,
    /// By standard deviation, descending.
    pub most_volatile: Vec<CategoryMetrics>,
    pub excluded: Vec<ExcludedCategory>,
}

/// Compare `categories` for `country` over `window`.
///
/// `categories` is treated as a set. Only source failures are errors; thin
/// data just excludes a category.
pub fn compare<S: ObservationSource>(
    source: &S,
    country: Country,
    categories: &[Category],
    window: Window,
) -> Result<Comparison, AppError> {
    let results: Vec<(Category, TrendAnalysis)> = distinct(categories)
        .par_iter()
        .map(|&category| -> Result<(Category, TrendAnalysis), AppError> {
            let obs = source.observations(category, country, &window)?;
            Ok((category, analyze_series(category, country, window, &obs)))
        })
        .collect::<Result<_, _>>()?;

    Ok(rank(country, window, &results))
}

/// Build rankings from per-category analyses.
pub fn rank(country: Country, window: Window, results: &[(Category, TrendAnalysis)]) -> Comparison {
    let mut analyzed = Vec::new();
    let mut excluded = Vec::new();

    for (category, analysis) in results {
        match analysis.report() {
            Some(r) => analyzed.push(CategoryMetrics {
                category: *category,
                average_advancement: r.average_advancement_days,
                consistency_score: r.consistency_score,
                std_deviation: r.std_deviation,
            }),
            None => {
                tracing::warn!(
                    category = %category,
                    country = %country,
                    status = analysis.status(),
                    "category excluded from comparison"
                );
                excluded.push(ExcludedCategory {
                    category: *category,
                    status: analysis.status().to_string(),
                    message: analysis.message().unwrap_or_default().to_string(),
                });
            }
        }
    }

    Comparison {
        country,
        window,
        fastest_advancing: top_by(&analyzed, |m| m.average_advancement),
        most_stable: top_by(&analyzed, |m| m.consistency_score),
        most_volatile: top_by(&analyzed, |m| m.std_deviation),
        analyzed,
        excluded,
    }
}

/// Top `RANKING_SIZE` by `key` descending; ties keep input order.
fn top_by(metrics: &[CategoryMetrics], key: impl Fn(&CategoryMetrics) -> f64) -> Vec<CategoryMetrics> {
    let mut sorted = metrics.to_vec();
    sorted.sort_by(|a, b| key(b).partial_cmp(&key(a)).unwrap_or(std::cmp::Ordering::Equal));
    sorted.truncate(RANKING_SIZE);
    sorted
}
