//! Threshold classifiers for trend direction, volatility and consistency.
//!
//! All thresholds are in days per bulletin and use strict inequalities: a mean
//! of exactly 5 is stable, a standard deviation of exactly 30 is moderate.

use serde::{Deserialize, Serialize};

/// Overall-mean threshold for a directional trend.
const TREND_MEAN: f64 = 5.0;
/// Overall-mean threshold for a strong trend.
const STRONG_TREND_MEAN: f64 = 15.0;
/// Recent-mean threshold for a strong trend.
const STRONG_RECENT_MEAN: f64 = 10.0;

const HIGH_VOLATILITY: f64 = 30.0;
const MODERATE_VOLATILITY: f64 = 15.0;

const NEAR_ZERO: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    StronglyAdvancing,
    Advancing,
    Stable,
    Retrogressing,
    StronglyRetrogressing,
    Mixed,
}

impl TrendDirection {
    pub fn label(self) -> &'static str {
        match self {
            TrendDirection::StronglyAdvancing => "strongly advancing",
            TrendDirection::Advancing => "advancing",
            TrendDirection::Stable => "stable",
            TrendDirection::Retrogressing => "retrogressing",
            TrendDirection::StronglyRetrogressing => "strongly retrogressing",
            TrendDirection::Mixed => "mixed",
        }
    }

    pub fn is_advancing(self) -> bool {
        matches!(self, TrendDirection::StronglyAdvancing | TrendDirection::Advancing)
    }

    pub fn is_retrogressing(self) -> bool {
        matches!(
            self,
            TrendDirection::StronglyRetrogressing | TrendDirection::Retrogressing
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Volatility {
    Low,
    Moderate,
    High,
}

impl Volatility {
    pub fn label(self) -> &'static str {
        match self {
            Volatility::Low => "low",
            Volatility::Moderate => "moderate",
            Volatility::High => "high",
        }
    }
}

/// Classify from the overall mean and the mean of the recent samples.
///
/// Strong variants are checked first; `Stable` only applies once no
/// directional rule matched; `Mixed` is the fallback (e.g. mean 8 with a
/// negative recent mean).
pub fn classify_trend(overall_mean: f64, recent_mean: f64) -> TrendDirection {
    if overall_mean > STRONG_TREND_MEAN && recent_mean > STRONG_RECENT_MEAN {
        TrendDirection::StronglyAdvancing
    } else if overall_mean < -STRONG_TREND_MEAN && recent_mean < -STRONG_RECENT_MEAN {
        TrendDirection::StronglyRetrogressing
    } else if overall_mean > TREND_MEAN && recent_mean > 0.0 {
        TrendDirection::Advancing
    } else if overall_mean < -TREND_MEAN && recent_mean < 0.0 {
        TrendDirection::Retrogressing
    } else if overall_mean.abs() <= TREND_MEAN {
        TrendDirection::Stable
    } else {
        TrendDirection::Mixed
    }
}

pub fn classify_volatility(std_dev: f64) -> Volatility {
    if std_dev > HIGH_VOLATILITY {
        Volatility::High
    } else if std_dev > MODERATE_VOLATILITY {
        Volatility::Moderate
    } else {
        Volatility::Low
    }
}

/// How predictable the movement is, in `[0, 100]`.
///
/// A flat series (no mean, no spread) is perfectly consistent; a zero mean with
/// spread scores a neutral 50; otherwise the score drops 20 points per unit of
/// coefficient of variation.
pub fn consistency_score(mean: f64, std_dev: f64) -> f64 {
    if mean.abs() < NEAR_ZERO {
        return if std_dev < NEAR_ZERO { 100.0 } else { 50.0 };
    }
    let cv = std_dev / mean.abs();
    (100.0 - 20.0 * cv).clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_of_exactly_five_is_stable() {
        assert_eq!(classify_trend(5.0, 0.0), TrendDirection::Stable);
        assert_eq!(classify_trend(-5.0, 0.0), TrendDirection::Stable);
        assert_eq!(classify_trend(5.01, 0.1), TrendDirection::Advancing);
    }

    #[test]
    fn strong_variants_take_precedence() {
        assert_eq!(classify_trend(20.0, 12.0), TrendDirection::StronglyAdvancing);
        assert_eq!(classify_trend(20.0, 10.0), TrendDirection::Advancing);
        assert_eq!(classify_trend(-20.0, -11.0), TrendDirection::StronglyRetrogressing);
        assert_eq!(classify_trend(-6.0, -1.0), TrendDirection::Retrogressing);
    }

    #[test]
    fn disagreeing_recent_movement_is_mixed() {
        assert_eq!(classify_trend(8.0, -3.0), TrendDirection::Mixed);
        assert_eq!(classify_trend(-8.0, 0.0), TrendDirection::Mixed);
    }

    #[test]
    fn volatility_boundaries_are_strict() {
        assert_eq!(classify_volatility(30.0), Volatility::Moderate);
        assert_eq!(classify_volatility(30.1), Volatility::High);
        assert_eq!(classify_volatility(15.0), Volatility::Low);
        assert_eq!(classify_volatility(15.1), Volatility::Moderate);
    }

    #[test]
    fn consistency_edge_cases() {
        assert_eq!(consistency_score(0.0, 0.0), 100.0);
        assert_eq!(consistency_score(0.0, 12.0), 50.0);
        assert!((consistency_score(10.0, 2.0) - 96.0).abs() < 1e-12);
        assert_eq!(consistency_score(-10.0, 60.0), 0.0);
    }
}
