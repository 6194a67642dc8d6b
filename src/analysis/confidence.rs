//! Prediction confidence from sample size, consistency and volatility.
//!
//! Score (0..=100) is additive:
//!
//! ```text
//! min(2 * n, 30)
//! + 0.3 * consistency
//! + 20 if std < 10, 10 if std < 20, else 0
//! + 15 if std(last 6) < 0.8 * std
//! ```
//!
//! Levels: `>= 80` high, `>= 60` moderate, `>= 40` low, else very low.

use serde::{Deserialize, Serialize};

use crate::analysis::classify::consistency_score;
use crate::math::{mean, round_to, std_dev, tail};

/// Samples required before the score is computed at all.
pub const MIN_CONFIDENCE_SAMPLES: usize = 6;

/// Score reported below `MIN_CONFIDENCE_SAMPLES`.
const INSUFFICIENT_SCORE: f64 = 25.0;

const RECENT_WINDOW: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceLevel {
    High,
    Moderate,
    Low,
    VeryLow,
}

impl ConfidenceLevel {
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            ConfidenceLevel::High
        } else if score >= 60.0 {
            ConfidenceLevel::Moderate
        } else if score >= 40.0 {
            ConfidenceLevel::Low
        } else {
            ConfidenceLevel::VeryLow
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ConfidenceLevel::High => "high",
            ConfidenceLevel::Moderate => "moderate",
            ConfidenceLevel::Low => "low",
            ConfidenceLevel::VeryLow => "very low",
        }
    }
}

/// Inputs that drove the score (only present when it was computed).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceFactors {
    pub data_points: usize,
    pub consistency: f64,
    /// Overall standard deviation, 1 dp.
    pub volatility: f64,
    /// Standard deviation of the last 6 samples, 1 dp.
    pub recent_stability: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionConfidence {
    pub level: ConfidenceLevel,
    pub score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub factors: Option<ConfidenceFactors>,
}

pub fn estimate_confidence(days: &[f64]) -> PredictionConfidence {
    let (Some(avg), Some(sd)) = (mean(days), std_dev(days)) else {
        return insufficient();
    };
    if days.len() < MIN_CONFIDENCE_SAMPLES {
        return insufficient();
    }

    let consistency = consistency_score(avg, sd);
    let recent_sd = std_dev(tail(days, RECENT_WINDOW)).unwrap_or(sd);

    let mut score = (days.len() as f64 * 2.0).min(30.0);
    score += consistency * 0.3;
    score += if sd < 10.0 {
        20.0
    } else if sd < 20.0 {
        10.0
    } else {
        0.0
    };
    if recent_sd < sd * 0.8 {
        score += 15.0;
    }
    let score = score.min(100.0);

    PredictionConfidence {
        level: ConfidenceLevel::from_score(score),
        score,
        reason: None,
        factors: Some(ConfidenceFactors {
            data_points: days.len(),
            consistency,
            volatility: round_to(sd, 1),
            recent_stability: round_to(recent_sd, 1),
        }),
    }
}

fn insufficient() -> PredictionConfidence {
    PredictionConfidence {
        level: ConfidenceLevel::Low,
        score: INSUFFICIENT_SCORE,
        reason: Some("insufficient_data".to_string()),
        factors: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fewer_than_six_samples_floor_at_25() {
        for days in [vec![], vec![30.0], vec![10.0, 10.0, 10.0, 10.0, 10.0]] {
            let c = estimate_confidence(&days);
            assert_eq!(c.score, 25.0);
            assert_eq!(c.level, ConfidenceLevel::Low);
            assert_eq!(c.reason.as_deref(), Some("insufficient_data"));
            assert!(c.factors.is_none());
        }
    }

    #[test]
    fn steady_series_scores_high() {
        // n=15 -> 30, consistency 100 -> 30, std 0 -> 20; recent std 0 is not < 0.
        let c = estimate_confidence(&[30.0; 15]);
        assert_eq!(c.score, 80.0);
        assert_eq!(c.level, ConfidenceLevel::High);
        let f = c.factors.unwrap();
        assert_eq!(f.data_points, 15);
        assert_eq!(f.volatility, 0.0);
    }

    #[test]
    fn calming_recent_movement_earns_bonus() {
        // Wild early history, flat last six.
        let mut days = vec![100.0, -80.0, 90.0, -60.0];
        days.extend([10.0; 6]);
        let c = estimate_confidence(&days);
        let f = c.factors.unwrap();
        assert_eq!(f.recent_stability, 0.0);
        // 20 (n=10) + 0.3 * consistency + 0 (std > 20) + 15
        assert!(f.consistency > 0.0 && f.consistency < 10.0);
        let expected = 20.0 + 0.3 * f.consistency + 15.0;
        assert!((c.score - expected).abs() < 1e-9, "score={}", c.score);
        assert_eq!(c.level, ConfidenceLevel::VeryLow);
    }

    #[test]
    fn score_is_capped() {
        let mut days = vec![40.0, 60.0, 40.0, 60.0, 40.0, 60.0];
        days.extend([50.0; 10]);
        let c = estimate_confidence(&days);
        assert!(c.score <= 100.0);
    }
}
