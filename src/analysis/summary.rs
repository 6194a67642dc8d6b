//! Market-level summary across every (category, country) combination.

use std::collections::BTreeMap;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::analysis::classify::{TrendDirection, Volatility};
use crate::analysis::distinct;
use crate::analysis::trend::{DataQuality, TrendAnalysis, analyze_series};
use crate::domain::{Category, Country, Window};
use crate::error::AppError;
use crate::source::ObservationSource;

/// Categories listed as most active.
pub const MOST_ACTIVE_SIZE: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinationSummary {
    pub category: Category,
    pub country: Country,
    pub trend_direction: TrendDirection,
    pub average_advancement: f64,
    pub volatility: Volatility,
    pub data_quality: DataQuality,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryActivity {
    pub category: Category,
    /// Mean of `|average_advancement|` over the category's countries.
    pub average_movement: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSummary {
    pub window: Window,
    pub combinations_analyzed: usize,
    pub excluded_combinations: usize,
    /// (category, country) order.
    pub combinations: Vec<CombinationSummary>,
    pub most_active_categories: Vec<CategoryActivity>,
    pub advancing_count: usize,
    pub stable_count: usize,
    pub retrogressing_count: usize,
    pub observations: Vec<String>,
}

/// Analyze the full `categories × countries` cross product. Both lists are
/// treated as sets.
pub fn summarize<S: ObservationSource>(
    source: &S,
    categories: &[Category],
    countries: &[Country],
    window: Window,
) -> Result<MarketSummary, AppError> {
    let countries = distinct(countries);
    let pairs: Vec<(Category, Country)> = distinct(categories)
        .into_iter()
        .flat_map(|cat| countries.iter().map(move |&country| (cat, country)))
        .collect();

    let results: Vec<TrendAnalysis> = pairs
        .par_iter()
        .map(|&(category, country)| -> Result<TrendAnalysis, AppError> {
            let obs = source.observations(category, country, &window)?;
            Ok(analyze_series(category, country, window, &obs))
        })
        .collect::<Result<_, _>>()?;

    Ok(aggregate(window, &results))
}

/// Aggregate analyses (already in a stable order) into a summary.
pub fn aggregate(window: Window, results: &[TrendAnalysis]) -> MarketSummary {
    let combinations: Vec<CombinationSummary> = results
        .iter()
        .filter_map(TrendAnalysis::report)
        .map(|r| CombinationSummary {
            category: r.category,
            country: r.country,
            trend_direction: r.trend_direction,
            average_advancement: r.average_advancement_days,
            volatility: r.volatility,
            data_quality: r.data_quality(),
        })
        .collect();

    let excluded_combinations = results.len() - combinations.len();
    if excluded_combinations > 0 {
        tracing::warn!(
            excluded = excluded_combinations,
            total = results.len(),
            "combinations excluded from market summary"
        );
    }

    let advancing_count = combinations
        .iter()
        .filter(|c| c.trend_direction.is_advancing())
        .count();
    let stable_count = combinations
        .iter()
        .filter(|c| c.trend_direction == TrendDirection::Stable)
        .count();
    let retrogressing_count = combinations
        .iter()
        .filter(|c| c.trend_direction.is_retrogressing())
        .count();

    let observations = vec![
        format!("{advancing_count} category/country combination(s) are advancing."),
        format!("{stable_count} category/country combination(s) are stable."),
        format!("{retrogressing_count} category/country combination(s) are retrogressing."),
    ];

    MarketSummary {
        window,
        combinations_analyzed: combinations.len(),
        excluded_combinations,
        most_active_categories: most_active(&combinations),
        combinations,
        advancing_count,
        stable_count,
        retrogressing_count,
        observations,
    }
}

fn most_active(combinations: &[CombinationSummary]) -> Vec<CategoryActivity> {
    let mut by_category: BTreeMap<Category, (f64, usize)> = BTreeMap::new();
    for c in combinations {
        let entry = by_category.entry(c.category).or_insert((0.0, 0));
        entry.0 += c.average_advancement.abs();
        entry.1 += 1;
    }

    let mut activity: Vec<CategoryActivity> = by_category
        .into_iter()
        .map(|(category, (sum, n))| CategoryActivity {
            category,
            average_movement: sum / n as f64,
        })
        .collect();
    activity.sort_by(|a, b| {
        b.average_movement
            .partial_cmp(&a.average_movement)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    activity.truncate(MOST_ACTIVE_SIZE);
    activity
}
