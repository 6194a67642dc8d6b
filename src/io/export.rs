//! Export analysis results as JSON.
//!
//! Every result type carries its `status` discriminator, so the files can be
//! consumed directly by the chat/API layers without a translation step.

use std::fs::File;
use std::path::Path;

use serde::Serialize;

use crate::error::AppError;

/// Render any result as pretty JSON.
pub fn to_json<T: Serialize>(value: &T) -> Result<String, AppError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| AppError::new(4, format!("Failed to serialize result: {e}")))
}

/// Write any result to a JSON file.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create export '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(file, value)
        .map_err(|e| AppError::new(2, format!("Failed to write export JSON: {e}")))?;
    tracing::info!(path = %path.display(), "wrote export");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{Forecast, predict};
    use crate::analysis::trend::analyze_series;
    use crate::domain::{Category, Country, Observation, Window};
    use chrono::NaiveDate;

    #[test]
    fn failed_forecast_serializes_status_and_reason() {
        let d = |m| NaiveDate::from_ymd_opt(2024, m, 1).unwrap();
        let window = Window::new(d(1), d(12)).unwrap();
        let analysis = analyze_series(
            Category::F4,
            Country::Philippines,
            window,
            &[Observation::current(d(1))],
        );
        let forecast: Forecast = predict(&analysis, 2).unwrap();
        let json = to_json(&forecast).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["status"], "prediction_failed");
        assert!(value["reason"].as_str().unwrap().contains("F4 PHILIPPINES"));
    }

    #[test]
    fn writes_file() {
        let path = std::env::temp_dir().join(format!("vb_trends_export_{}.json", std::process::id()));
        write_json(&path, &Window::new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        ).unwrap())
        .unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("2024-06-01"));
        let _ = std::fs::remove_file(&path);
    }
}
