//! Statistics engine: one observation series in, one `TrendAnalysis` out.
//!
//! Gating is on the *raw* observation count: fewer than 3 bulletins is
//! `insufficient_data` no matter how many of them are dated; 3 or more with no
//! dated pair is `no_movement_data`. Everything else produces a full report,
//! even from a single advancement sample.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::analysis::classify::{
    TrendDirection, Volatility, classify_trend, classify_volatility, consistency_score,
};
use crate::analysis::confidence::{PredictionConfidence, estimate_confidence};
use crate::analysis::extract::{extract_advancements, sample_days};
use crate::analysis::momentum::{Momentum, momentum};
use crate::analysis::seasonal::{SeasonalPattern, seasonal_pattern};
use crate::domain::{Category, Country, Observation, Window};
use crate::math::{Percentiles, mean, median, std_dev, tail};

/// Raw observations required before analysis is attempted.
pub const MIN_OBSERVATIONS: usize = 3;

/// Raw observations for a combination to count as well covered.
pub const GOOD_COVERAGE_OBSERVATIONS: usize = 12;

/// Samples in the "recent" trend window.
pub const RECENT_WINDOW: usize = 6;

/// Full statistics for one (category, country, window).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendReport {
    pub category: Category,
    pub country: Country,
    pub window: Window,

    /// Raw observation count (dated or not).
    pub data_points: usize,
    /// Number of advancement samples extracted.
    pub movement_samples: usize,
    pub first_bulletin: NaiveDate,
    pub last_bulletin: NaiveDate,
    /// Most recent published cutoff date, if any.
    pub latest_priority_date: Option<NaiveDate>,

    pub total_advancement_days: i64,
    pub average_advancement_days: f64,
    pub median_advancement_days: f64,
    pub std_deviation: f64,
    pub min_advancement_days: i64,
    pub max_advancement_days: i64,
    /// Mean of the last 6 samples (all samples when fewer).
    pub recent_average_days: f64,

    pub trend_direction: TrendDirection,
    pub volatility: Volatility,
    pub consistency_score: f64,
    pub momentum: Momentum,
    pub seasonal_pattern: SeasonalPattern,
    pub prediction_confidence: PredictionConfidence,

    pub positive_months: usize,
    pub negative_months: usize,
    pub stagnant_months: usize,
    pub percentiles: Percentiles,

    pub interpretation: String,
}

impl TrendReport {
    /// `good` with at least a year of bulletins, else `limited`.
    pub fn data_quality(&self) -> DataQuality {
        if self.data_points >= GOOD_COVERAGE_OBSERVATIONS {
            DataQuality::Good
        } else {
            DataQuality::Limited
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataQuality {
    Good,
    Limited,
}

/// Result of `analyze_series`, tagged by `status`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TrendAnalysis {
    Success(Box<TrendReport>),
    InsufficientData {
        category: Category,
        country: Country,
        data_points: usize,
        message: String,
    },
    NoMovementData {
        category: Category,
        country: Country,
        data_points: usize,
        message: String,
    },
}

impl TrendAnalysis {
    pub fn report(&self) -> Option<&TrendReport> {
        match self {
            TrendAnalysis::Success(report) => Some(report),
            _ => None,
        }
    }

    /// Snake-case status key.
    pub fn status(&self) -> &'static str {
        match self {
            TrendAnalysis::Success(_) => "success",
            TrendAnalysis::InsufficientData { .. } => "insufficient_data",
            TrendAnalysis::NoMovementData { .. } => "no_movement_data",
        }
    }

    /// Human-readable reason for a non-success result.
    pub fn message(&self) -> Option<&str> {
        match self {
            TrendAnalysis::Success(_) => None,
            TrendAnalysis::InsufficientData { message, .. }
            | TrendAnalysis::NoMovementData { message, .. } => Some(message),
        }
    }

    pub fn data_points(&self) -> usize {
        match self {
            TrendAnalysis::Success(report) => report.data_points,
            TrendAnalysis::InsufficientData { data_points, .. }
            | TrendAnalysis::NoMovementData { data_points, .. } => *data_points,
        }
    }
}

/// Analyze an observation series ordered ascending by bulletin date.
pub fn analyze_series(
    category: Category,
    country: Country,
    window: Window,
    observations: &[Observation],
) -> TrendAnalysis {
    let data_points = observations.len();
    if data_points < MIN_OBSERVATIONS {
        return TrendAnalysis::InsufficientData {
            category,
            country,
            data_points,
            message: format!(
                "Insufficient data for {category} {country}: {data_points} bulletin(s) in {}, need at least {MIN_OBSERVATIONS}.",
                window.label()
            ),
        };
    }

    let samples = extract_advancements(observations);
    let days = sample_days(&samples);

    let (Some(avg), Some(sd), Some(med), Some(percentiles)) = (
        mean(&days),
        std_dev(&days),
        median(&days),
        Percentiles::of(&days),
    ) else {
        return TrendAnalysis::NoMovementData {
            category,
            country,
            data_points,
            message: format!(
                "No movement data for {category} {country}: none of the {data_points} bulletin(s) form a pair of dated cutoffs."
            ),
        };
    };

    let recent_avg = mean(tail(&days, RECENT_WINDOW)).unwrap_or(avg);
    let trend_direction = classify_trend(avg, recent_avg);
    let volatility = classify_volatility(sd);

    let ints = || samples.iter().map(|s| s.days);

    let interpretation = interpret(category, country, trend_direction, avg, volatility);

    TrendAnalysis::Success(Box::new(TrendReport {
        category,
        country,
        window,
        data_points,
        movement_samples: samples.len(),
        first_bulletin: observations[0].observation_date,
        last_bulletin: observations[data_points - 1].observation_date,
        latest_priority_date: observations.iter().rev().find_map(|o| o.value()),
        total_advancement_days: ints().sum(),
        average_advancement_days: avg,
        median_advancement_days: med,
        std_deviation: sd,
        min_advancement_days: ints().min().unwrap_or(0),
        max_advancement_days: ints().max().unwrap_or(0),
        recent_average_days: recent_avg,
        trend_direction,
        volatility,
        consistency_score: consistency_score(avg, sd),
        momentum: momentum(&days),
        seasonal_pattern: seasonal_pattern(&samples),
        prediction_confidence: estimate_confidence(&days),
        positive_months: ints().filter(|d| *d > 0).count(),
        negative_months: ints().filter(|d| *d < 0).count(),
        stagnant_months: ints().filter(|d| *d == 0).count(),
        percentiles,
        interpretation,
    }))
}

fn interpret(
    category: Category,
    country: Country,
    trend: TrendDirection,
    average: f64,
    volatility: Volatility,
) -> String {
    format!(
        "{category} for {country} is {} with an average movement of {average:.1} days per bulletin and {} volatility.",
        trend.label(),
        volatility.label(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Days, Months};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn window() -> Window {
        Window::new(date(2020, 1, 1), date(2025, 12, 1)).unwrap()
    }

    /// Monthly bulletins starting January 2023 whose cutoff moves by `deltas`.
    fn series(deltas: &[i64]) -> Vec<Observation> {
        let start = date(2023, 1, 1);
        let mut cutoff = date(2012, 1, 1);
        let mut out = vec![Observation::dated(start, cutoff)];
        for (i, d) in deltas.iter().enumerate() {
            cutoff = if *d >= 0 {
                cutoff.checked_add_days(Days::new(*d as u64)).unwrap()
            } else {
                cutoff.checked_sub_days(Days::new(d.unsigned_abs())).unwrap()
            };
            let asof = start.checked_add_months(Months::new(i as u32 + 1)).unwrap();
            out.push(Observation::dated(asof, cutoff));
        }
        out
    }

    fn analyze(obs: &[Observation]) -> TrendAnalysis {
        analyze_series(Category::Eb2, Country::India, window(), obs)
    }

    #[test]
    fn two_observations_are_insufficient() {
        let result = analyze(&series(&[30]));
        assert_eq!(result.status(), "insufficient_data");
        assert_eq!(result.data_points(), 2);
        assert!(result.message().unwrap().contains("EB-2 INDIA"));
    }

    #[test]
    fn three_observations_with_one_pair_are_analyzed() {
        let obs = [
            Observation::dated(date(2024, 1, 1), date(2012, 1, 1)),
            Observation::unavailable(date(2024, 2, 1)),
            Observation::dated(date(2024, 3, 1), date(2012, 1, 11)),
        ];
        let result = analyze(&obs);
        let report = result.report().expect("analysis should succeed");
        assert_eq!(report.data_points, 3);
        assert_eq!(report.movement_samples, 1);
        assert_eq!(report.total_advancement_days, 10);
        assert_eq!(report.std_deviation, 0.0);
        assert_eq!(report.trend_direction, TrendDirection::Advancing);
    }

    #[test]
    fn all_unavailable_is_no_movement_with_raw_count() {
        let obs: Vec<_> = (1..=5).map(|m| Observation::unavailable(date(2024, m, 1))).collect();
        let result = analyze(&obs);
        assert_eq!(result.status(), "no_movement_data");
        assert_eq!(result.data_points(), 5);
    }

    #[test]
    fn eb2_india_scenario() {
        let result = analyze(&series(&[12, 15, 8, 20, 18, -5, 0, 22, 14, 9, 16]));
        let r = result.report().unwrap();
        assert_eq!(r.data_points, 12);
        assert_eq!(r.movement_samples, 11);
        assert_eq!(r.trend_direction, TrendDirection::Advancing);
        assert_eq!(r.volatility, Volatility::Low);
        assert_eq!(r.positive_months, 9);
        assert_eq!(r.negative_months, 1);
        assert_eq!(r.stagnant_months, 1);
        assert_eq!(r.total_advancement_days, 129);
        assert_eq!(r.min_advancement_days, -5);
        assert_eq!(r.max_advancement_days, 22);
        assert!((r.recent_average_days - 56.0 / 6.0).abs() < 1e-9);
        // Population form: sqrt(sum((x - mean)^2) / n) = sqrt(7548 / 121) ~ 7.898.
        assert!((r.std_deviation - (7548.0_f64 / 121.0).sqrt()).abs() < 1e-9);
        assert_eq!(r.median_advancement_days, 14.0);
        assert_eq!(r.first_bulletin, date(2023, 1, 1));
        assert_eq!(r.last_bulletin, date(2023, 12, 1));
        // 11 samples: not enough for a seasonal breakdown.
        assert_eq!(r.seasonal_pattern, SeasonalPattern::InsufficientData);
        assert_eq!(
            r.interpretation,
            "EB-2 for INDIA is advancing with an average movement of 11.7 days per bulletin and low volatility."
        );
    }

    #[test]
    fn mean_of_five_with_flat_recent_is_stable() {
        // Overall mean 5, last six all zero.
        let result = analyze(&series(&[10, 10, 10, 10, 10, 10, 0, 0, 0, 0, 0, 0]));
        let r = result.report().unwrap();
        assert_eq!(r.average_advancement_days, 5.0);
        assert_eq!(r.recent_average_days, 0.0);
        assert_eq!(r.trend_direction, TrendDirection::Stable);
    }

    #[test]
    fn analysis_is_deterministic() {
        let obs = series(&[30, -10, 0, 45, 60, 5, 5, 0, -90, 120, 31, 28, 14]);
        assert_eq!(analyze(&obs), analyze(&obs));
    }

    #[test]
    fn percentiles_are_monotone() {
        let result = analyze(&series(&[-30, 200, 0, 0, 7, 13, -1, 44]));
        let p = result.report().unwrap().percentiles;
        assert!(p.p25 <= p.p50 && p.p50 <= p.p75 && p.p75 <= p.p90);
    }

    #[test]
    fn latest_priority_date_skips_trailing_current() {
        let mut obs = series(&[10, 10]);
        obs.push(Observation::current(date(2023, 4, 1)));
        let r = analyze(&obs);
        assert_eq!(r.report().unwrap().latest_priority_date, Some(date(2012, 1, 21)));
    }

    #[test]
    fn serializes_with_status_tag() {
        let json = serde_json::to_value(analyze(&series(&[5]))).unwrap();
        assert_eq!(json["status"], "insufficient_data");
        let json = serde_json::to_value(analyze(&series(&[5, 5, 5]))).unwrap();
        assert_eq!(json["status"], "success");
        assert_eq!(json["trend_direction"], "stable");
    }
}
