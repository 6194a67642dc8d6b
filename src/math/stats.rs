//! Descriptive statistics over small samples.
//!
//! Inputs here are at most a few hundred bulletin months, so everything is a
//! straightforward pass over a slice. Conventions:
//! - standard deviation is the population form (divide by `n`)
//! - percentiles interpolate linearly between closest ranks
//!   (`rank = p/100 * (n - 1)`)
//!
//! Empty input yields `None` rather than `NaN`.

/// Arithmetic mean.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Population standard deviation.
pub fn std_dev(values: &[f64]) -> Option<f64> {
    let m = mean(values)?;
    let var = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    Some(var.sqrt())
}

/// Median (mean of the two middle values for even `n`).
pub fn median(values: &[f64]) -> Option<f64> {
    percentile(values, 50.0)
}

/// Percentile `p` in `[0, 100]` with linear interpolation.
pub fn percentile(values: &[f64], p: f64) -> Option<f64> {
    if values.is_empty() || !p.is_finite() {
        return None;
    }
    let sorted = sorted_copy(values);
    Some(percentile_sorted(&sorted, p))
}

/// Percentile of an already-sorted, non-empty slice.
fn percentile_sorted(sorted: &[f64], p: f64) -> f64 {
    let p = p.clamp(0.0, 100.0);
    let rank = p / 100.0 * (sorted.len() as f64 - 1.0);
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi {
        return sorted[lo];
    }
    let frac = rank - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

fn sorted_copy(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    sorted
}

/// Quartile-style summary of a sample.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Percentiles {
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub p90: f64,
}

impl Percentiles {
    pub fn of(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let sorted = sorted_copy(values);
        Some(Self {
            p25: percentile_sorted(&sorted, 25.0),
            p50: percentile_sorted(&sorted, 50.0),
            p75: percentile_sorted(&sorted, 75.0),
            p90: percentile_sorted(&sorted, 90.0),
        })
    }
}

/// The trailing `n` values (all of them when shorter).
pub fn tail(values: &[f64], n: usize) -> &[f64] {
    &values[values.len().saturating_sub(n)..]
}

/// Round to `dp` decimal places.
pub fn round_to(value: f64, dp: i32) -> f64 {
    let scale = 10f64.powi(dp);
    (value * scale).round() / scale
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_has_no_statistics() {
        assert_eq!(mean(&[]), None);
        assert_eq!(std_dev(&[]), None);
        assert_eq!(median(&[]), None);
        assert!(Percentiles::of(&[]).is_none());
    }

    #[test]
    fn population_std_dev() {
        let v = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!((mean(&v).unwrap() - 5.0).abs() < 1e-12);
        assert!((std_dev(&v).unwrap() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn median_even_and_odd() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
    }

    #[test]
    fn percentiles_interpolate_and_are_ordered() {
        let v = [1.0, 2.0, 3.0, 4.0, 5.0];
        let p = Percentiles::of(&v).unwrap();
        assert!((p.p25 - 2.0).abs() < 1e-12);
        assert!((p.p50 - 3.0).abs() < 1e-12);
        assert!((p.p75 - 4.0).abs() < 1e-12);
        assert!((p.p90 - 4.6).abs() < 1e-12);

        let noisy = [30.0, -12.0, 0.0, 7.0, 7.0, 120.0, -45.0];
        let q = Percentiles::of(&noisy).unwrap();
        assert!(q.p25 <= q.p50 && q.p50 <= q.p75 && q.p75 <= q.p90);
    }

    #[test]
    fn single_value_percentiles_collapse() {
        let p = Percentiles::of(&[12.0]).unwrap();
        assert_eq!((p.p25, p.p50, p.p75, p.p90), (12.0, 12.0, 12.0, 12.0));
    }

    #[test]
    fn tail_handles_short_input() {
        let v = [1.0, 2.0, 3.0];
        assert_eq!(tail(&v, 6), &v[..]);
        assert_eq!(tail(&v, 2), &[2.0, 3.0]);
        assert_eq!(round_to(8.8765, 1), 8.9);
    }
}
