//! Seasonal decomposition by bulletin month.
//!
//! Fiscal-year quota resets make some months reliably better than others, so
//! samples are grouped by the calendar month they were published in.

use std::collections::BTreeMap;

use chrono::Month;
use serde::{Deserialize, Serialize};

use crate::domain::AdvancementSample;

/// Samples required before any seasonal grouping is attempted.
pub const MIN_SEASONAL_SAMPLES: usize = 12;

/// Distinct calendar months required for a meaningful comparison.
pub const MIN_DISTINCT_MONTHS: usize = 6;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthAverage {
    /// 1 = January.
    pub month: u32,
    pub name: String,
    pub average_advancement: f64,
    pub samples: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SeasonalPattern {
    /// Fewer than `MIN_SEASONAL_SAMPLES` samples.
    InsufficientData,
    /// Enough samples, but fewer than `MIN_DISTINCT_MONTHS` months represented.
    InsufficientMonthlyData { months_represented: usize },
    Detected {
        best_month: MonthAverage,
        worst_month: MonthAverage,
        /// `best - worst` average advancement, in days.
        spread: f64,
        /// January..December, months without samples omitted.
        monthly_averages: Vec<MonthAverage>,
    },
}

pub fn seasonal_pattern(samples: &[AdvancementSample]) -> SeasonalPattern {
    if samples.len() < MIN_SEASONAL_SAMPLES {
        return SeasonalPattern::InsufficientData;
    }

    let mut by_month: BTreeMap<u32, (f64, usize)> = BTreeMap::new();
    for s in samples {
        let entry = by_month.entry(s.month()).or_insert((0.0, 0));
        entry.0 += s.days as f64;
        entry.1 += 1;
    }

    if by_month.len() < MIN_DISTINCT_MONTHS {
        return SeasonalPattern::InsufficientMonthlyData {
            months_represented: by_month.len(),
        };
    }

    let monthly_averages: Vec<MonthAverage> = by_month
        .into_iter()
        .map(|(month, (sum, count))| MonthAverage {
            month,
            name: month_name(month),
            average_advancement: sum / count as f64,
            samples: count,
        })
        .collect();

    // Ties resolve to the earliest calendar month.
    let mut best = &monthly_averages[0];
    let mut worst = &monthly_averages[0];
    for m in &monthly_averages[1..] {
        if m.average_advancement > best.average_advancement {
            best = m;
        }
        if m.average_advancement < worst.average_advancement {
            worst = m;
        }
    }

    SeasonalPattern::Detected {
        spread: best.average_advancement - worst.average_advancement,
        best_month: best.clone(),
        worst_month: worst.clone(),
        monthly_averages,
    }
}

fn month_name(month: u32) -> String {
    u8::try_from(month)
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .map(|m| m.name().to_string())
        .unwrap_or_else(|| format!("month {month}"))
}
