//! Advancement extraction.
//!
//! Turns an observation series into signed day-deltas between consecutive
//! *dated* observations. `Current` / `Unavailable` months are dropped before
//! diffing, so they never break a run: `[date(d1), Current, date(d2)]` yields
//! exactly one sample `d2 - d1`.

use crate::domain::{AdvancementSample, Observation};

/// Extract advancement samples from observations ordered by bulletin date.
///
/// Each sample is tagged with the bulletin date of the later observation.
/// Fewer than two dated observations produce an empty vector.
pub fn extract_advancements(observations: &[Observation]) -> Vec<AdvancementSample> {
    let dated: Vec<_> = observations
        .iter()
        .filter_map(|o| o.value().map(|v| (o.observation_date, v)))
        .collect();

    dated
        .windows(2)
        .map(|pair| {
            let (_, prev) = pair[0];
            let (asof, next) = pair[1];
            AdvancementSample {
                days: (next - prev).num_days(),
                observation_date: asof,
            }
        })
        .collect()
}

/// Day values of a sample sequence, as floats for the statistics code.
pub fn sample_days(samples: &[AdvancementSample]) -> Vec<f64> {
    samples.iter().map(|s| s.days as f64).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn non_dated_entries_are_skipped_not_breaks() {
        let obs = [
            Observation::dated(date(2024, 1, 1), date(2012, 1, 1)),
            Observation::current(date(2024, 2, 1)),
            Observation::dated(date(2024, 3, 1), date(2012, 2, 15)),
        ];
        let samples = extract_advancements(&obs);
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].days, 45);
        assert_eq!(samples[0].observation_date, date(2024, 3, 1));
    }

    #[test]
    fn retrogression_is_negative() {
        let obs = [
            Observation::dated(date(2024, 1, 1), date(2012, 3, 1)),
            Observation::dated(date(2024, 2, 1), date(2012, 1, 1)),
            Observation::unavailable(date(2024, 3, 1)),
            Observation::dated(date(2024, 4, 1), date(2012, 1, 1)),
        ];
        let days: Vec<i64> = extract_advancements(&obs).iter().map(|s| s.days).collect();
        assert_eq!(days, vec![-60, 0]);
    }

    #[test]
    fn fewer_than_two_dated_observations_is_empty() {
        let obs = [
            Observation::current(date(2024, 1, 1)),
            Observation::dated(date(2024, 2, 1), date(2012, 1, 1)),
            Observation::unavailable(date(2024, 3, 1)),
        ];
        assert!(extract_advancements(&obs).is_empty());
        assert!(extract_advancements(&[]).is_empty());
    }
}
