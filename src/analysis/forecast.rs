//! Short-horizon forecast of cutoff movement.
//!
//! The point estimate is the historical average, nudged by momentum
//! (×1.2 accelerating, ×0.8 decelerating). The range is ±1.5 standard
//! deviations. Every period uses the same estimate and range; periods only
//! differ in the projected cutoff date, which accumulates the rounded point
//! estimate from the latest published cutoff.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::analysis::confidence::ConfidenceLevel;
use crate::analysis::momentum::MomentumDirection;
use crate::analysis::trend::{TrendAnalysis, TrendReport};
use crate::domain::{Category, Country};
use crate::error::AppError;

const ACCELERATION_FACTOR: f64 = 1.2;
const DECELERATION_FACTOR: f64 = 0.8;
/// Range half-width in standard deviations.
const MARGIN_STD_DEVS: f64 = 1.5;

/// Longest forecast horizon, in bulletins (two years).
pub const MAX_PERIODS_AHEAD: usize = 24;

pub const DISCLAIMER: &str = "Predictions are statistical estimates based on historical bulletin movement and are not guarantees of future visa availability.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodPrediction {
    /// 1-based period (bulletin) index.
    pub period: usize,
    pub predicted_advancement: i64,
    pub range_low: i64,
    pub range_high: i64,
    pub confidence: ConfidenceLevel,
    /// Latest cutoff moved by `period * predicted_advancement` days.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projected_cutoff: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastReport {
    pub category: Category,
    pub country: Country,
    /// Average before the momentum adjustment.
    pub historical_average: f64,
    pub momentum_adjustment: f64,
    pub margin_of_error: f64,
    pub predictions: Vec<PeriodPrediction>,
    pub confidence_score: f64,
    pub disclaimer: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Forecast {
    Success(Box<ForecastReport>),
    PredictionFailed { reason: String },
}

impl Forecast {
    pub fn report(&self) -> Option<&ForecastReport> {
        match self {
            Forecast::Success(report) => Some(report),
            Forecast::PredictionFailed { .. } => None,
        }
    }
}

/// Forecast `periods_ahead` bulletins from a trend analysis.
///
/// Zero periods, or more than `MAX_PERIODS_AHEAD`, is a caller error. A non-success analysis yields
/// `PredictionFailed` carrying the analysis message.
pub fn predict(analysis: &TrendAnalysis, periods_ahead: usize) -> Result<Forecast, AppError> {
    if periods_ahead == 0 {
        return Err(AppError::invalid("periods_ahead must be at least 1."));
    }
    if periods_ahead > MAX_PERIODS_AHEAD {
        return Err(AppError::invalid(format!(
            "periods_ahead must be at most {MAX_PERIODS_AHEAD} (got {periods_ahead})."
        )));
    }

    let Some(report) = analysis.report() else {
        let reason = analysis
            .message()
            .unwrap_or("Trend analysis did not succeed.")
            .to_string();
        return Ok(Forecast::PredictionFailed { reason });
    };

    Ok(Forecast::Success(Box::new(forecast_report(report, periods_ahead))))
}

fn forecast_report(report: &TrendReport, periods_ahead: usize) -> ForecastReport {
    let adjustment = match report.momentum.direction() {
        Some(MomentumDirection::Accelerating) => ACCELERATION_FACTOR,
        Some(MomentumDirection::Decelerating) => DECELERATION_FACTOR,
        Some(MomentumDirection::Stable) | None => 1.0,
    };
    let base = report.average_advancement_days * adjustment;
    let margin = MARGIN_STD_DEVS * report.std_deviation;

    let predicted = base.round() as i64;
    let range_low = (base - margin).round() as i64;
    let range_high = (base + margin).round() as i64;
    let confidence = report.prediction_confidence.level;

    let predictions = (1..=periods_ahead)
        .map(|period| PeriodPrediction {
            period,
            predicted_advancement: predicted,
            range_low,
            range_high,
            confidence,
            projected_cutoff: report
                .latest_priority_date
                .and_then(|d| shift_days(d, predicted.saturating_mul(period as i64))),
        })
        .collect();

    ForecastReport {
        category: report.category,
        country: report.country,
        historical_average: report.average_advancement_days,
        momentum_adjustment: adjustment,
        margin_of_error: margin,
        predictions,
        confidence_score: report.prediction_confidence.score,
        disclaimer: DISCLAIMER.to_string(),
    }
}

fn shift_days(date: NaiveDate, days: i64) -> Option<NaiveDate> {
    if days >= 0 {
        date.checked_add_days(Days::new(days as u64))
    } else {
        date.checked_sub_days(Days::new(days.unsigned_abs()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::trend::analyze_series;
    use crate::domain::{Observation, Window};
    use chrono::Months;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn analysis(deltas: &[i64]) -> TrendAnalysis {
        let start = date(2022, 1, 1);
        let mut cutoff = date(2015, 1, 1);
        let mut obs = vec![Observation::dated(start, cutoff)];
        for (i, d) in deltas.iter().enumerate() {
            cutoff = shift_days(cutoff, *d).unwrap();
            let asof = start.checked_add_months(Months::new(i as u32 + 1)).unwrap();
            obs.push(Observation::dated(asof, cutoff));
        }
        let window = Window::new(date(2020, 1, 1), date(2026, 1, 1)).unwrap();
        analyze_series(Category::Eb3, Country::All, window, &obs)
    }

    #[test]
    fn zero_periods_is_rejected() {
        let err = predict(&analysis(&[10, 10, 10]), 0).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn horizon_is_capped() {
        let a = analysis(&[10, 10, 10]);
        assert_eq!(
            predict(&a, MAX_PERIODS_AHEAD).unwrap().report().unwrap().predictions.len(),
            MAX_PERIODS_AHEAD
        );
        for periods in [MAX_PERIODS_AHEAD + 1, usize::MAX] {
            let err = predict(&a, periods).unwrap_err();
            assert_eq!(err.exit_code(), 2);
            assert!(err.message().contains("at most 24"));
        }
    }

    #[test]
    fn failed_analysis_propagates_reason() {
        let failed = analysis(&[10]);
        match predict(&failed, 3).unwrap() {
            Forecast::PredictionFailed { reason } => {
                assert_eq!(Some(reason.as_str()), failed.message());
            }
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[test]
    fn ranges_contain_point_estimate() {
        let deltas = [30, -45, 0, 90, 12, 7, -3, 60, 21, 0, 15, 44, -20];
        let forecast = predict(&analysis(&deltas), 6).unwrap();
        let report = forecast.report().unwrap();
        assert_eq!(report.predictions.len(), 6);
        for p in &report.predictions {
            assert!(p.range_low <= p.predicted_advancement);
            assert!(p.predicted_advancement <= p.range_high);
        }
        assert!(report.disclaimer.contains("not guarantees"));
    }

    #[test]
    fn acceleration_scales_the_estimate() {
        // earlier six average 10, recent six average 20 -> accelerating.
        let mut deltas = vec![10; 6];
        deltas.extend([20; 6]);
        let forecast = predict(&analysis(&deltas), 2).unwrap();
        let report = forecast.report().unwrap();
        assert_eq!(report.momentum_adjustment, 1.2);
        assert_eq!(report.historical_average, 15.0);
        assert_eq!(report.predictions[0].predicted_advancement, 18);
        assert_eq!(report.margin_of_error, 7.5);
        assert_eq!(report.predictions[0].range_low, 11);
        assert_eq!(report.predictions[0].range_high, 26);
        // Same estimate for every period; projection accumulates.
        assert_eq!(report.predictions[1].predicted_advancement, 18);
        assert_eq!(
            report.predictions[1].projected_cutoff,
            Some(date(2015, 1, 1) + Days::new(180 + 36))
        );
    }

    #[test]
    fn short_history_keeps_unadjusted_average() {
        let forecast = predict(&analysis(&[10, 20, 30]), 1).unwrap();
        let report = forecast.report().unwrap();
        assert_eq!(report.momentum_adjustment, 1.0);
        assert_eq!(report.predictions[0].predicted_advancement, 20);
        assert_eq!(report.predictions[0].confidence, ConfidenceLevel::Low);
    }
}
