//! CSV ingest of bulletin observations.
//!
//! Expected columns (header names are case-insensitive, order is free):
//!
//! ```text
//! category,country,bulletin_date,value
//! EB-2,INDIA,2024-01-01,2012-03-15
//! EB-2,INDIA,2024-02-01,C
//! ```
//!
//! `value` is `C`/`CURRENT`, `U`/`UNAVAILABLE`, an ISO date or a bulletin-style
//! date such as `15MAR12`. Bad rows are skipped and reported, the rest load.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use csv::StringRecord;

use crate::domain::{Category, Country, Observation, VisaStatus};
use crate::error::AppError;
use crate::source::MemorySource;

const REQUIRED_COLUMNS: [&str; 4] = ["category", "country", "bulletin_date", "value"];

/// A row-level error encountered during ingest.
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Ingest output: the loaded source plus what was skipped.
#[derive(Debug, Clone)]
pub struct IngestedData {
    pub source: MemorySource,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
    pub rows_used: usize,
}

/// Load observations from a CSV file.
pub fn load_observations(path: &Path) -> Result<IngestedData, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open CSV '{}': {e}", path.display())))?;
    let data = read_observations(file)?;
    tracing::info!(
        path = %path.display(),
        rows_read = data.rows_read,
        rows_used = data.rows_used,
        row_errors = data.row_errors.len(),
        "loaded observations"
    );
    Ok(data)
}

/// Load observations from any CSV reader.
pub fn read_observations<R: Read>(input: R) -> Result<IngestedData, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input);

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read CSV headers: {e}")))?
        .clone();
    let header_map = build_header_map(&headers);

    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|c| !header_map.contains_key(*c))
        .collect();
    if !missing.is_empty() {
        return Err(AppError::new(
            2,
            format!("CSV is missing required column(s): {}.", missing.join(", ")),
        ));
    }

    let mut source = MemorySource::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;
    let mut rows_used = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // Line 1 is the header.
        let line = idx + 2;
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        match parse_row(&record, &header_map) {
            Ok((category, country, observation)) => {
                source.insert(category, country, observation);
                rows_used += 1;
            }
            Err(message) => {
                tracing::debug!(line, %message, "skipping row");
                row_errors.push(RowError { line, message });
            }
        }
    }

    if rows_used == 0 {
        return Err(AppError::new(3, "No valid observation rows in CSV."));
    }

    Ok(IngestedData {
        source,
        row_errors,
        rows_read,
        rows_used,
    })
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports may prefix the first header with a BOM.
    let name = name.trim().trim_start_matches('\u{feff}').to_ascii_lowercase();
    match name.as_str() {
        "date" | "bulletin" | "bulletin_month" | "observation_date" => "bulletin_date".to_string(),
        "cutoff" | "cutoff_date" | "priority_date" | "final_action_date" => "value".to_string(),
        "chargeability" => "country".to_string(),
        _ => name,
    }
}

fn field<'a>(record: &'a StringRecord, header_map: &HashMap<String, usize>, name: &str) -> Option<&'a str> {
    header_map
        .get(name)
        .and_then(|&idx| record.get(idx))
        .filter(|s| !s.is_empty())
}

fn parse_row(
    record: &StringRecord,
    header_map: &HashMap<String, usize>,
) -> Result<(Category, Country, Observation), String> {
    let category = field(record, header_map, "category")
        .ok_or("Missing category.")?
        .parse::<Category>()
        .map_err(|e| e.to_string())?;
    let country = field(record, header_map, "country")
        .ok_or("Missing country.")?
        .parse::<Country>()
        .map_err(|e| e.to_string())?;
    let bulletin = field(record, header_map, "bulletin_date").ok_or("Missing bulletin_date.")?;
    let bulletin_date =
        parse_date(bulletin).ok_or_else(|| format!("Invalid bulletin_date '{bulletin}'."))?;
    let value = field(record, header_map, "value").ok_or("Missing value.")?;
    let status = parse_status(value)?;

    Ok((category, country, Observation::new(bulletin_date, status)))
}

/// Parse a bulletin cell: `C`, `U`, or a date.
pub fn parse_status(value: &str) -> Result<VisaStatus, String> {
    match value.trim().to_ascii_uppercase().as_str() {
        "C" | "CURRENT" => Ok(VisaStatus::Current),
        "U" | "UNAVAILABLE" => Ok(VisaStatus::Unavailable),
        _ => parse_date(value)
            .map(VisaStatus::DateSpecified)
            .ok_or_else(|| format!("Invalid cutoff value '{value}'.")),
    }
}

/// ISO (`2012-03-15`), bulletin style (`15MAR12`) or month-only (`2024-03`).
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(s, "%d%b%y"))
        .or_else(|_| NaiveDate::parse_from_str(&format!("{s}-01"), "%Y-%m-%d"))
        .ok()
}
