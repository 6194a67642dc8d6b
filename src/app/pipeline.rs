//! Shared setup used by every command: load data, resolve the window.
//!
//! Keeping this in one place avoids duplicating the workflow
//! CSV -> source -> window -> analyzer in each command handler.

use std::path::PathBuf;

use crate::analysis::TrendAnalyzer;
use crate::cli::CommonArgs;
use crate::config::Settings;
use crate::domain::Window;
use crate::error::AppError;
use crate::io::ingest::{IngestedData, load_observations};
use crate::source::MemorySource;

/// Everything a command needs to run.
#[derive(Debug)]
pub struct Workspace {
    pub analyzer: TrendAnalyzer<MemorySource>,
    pub window: Window,
    pub rows_used: usize,
    pub row_errors: usize,
}

/// Load the observation CSV and resolve the analysis window.
pub fn prepare(common: &CommonArgs, settings: &Settings) -> Result<Workspace, AppError> {
    let path = resolve_data_path(common, settings)?;
    let data = load_observations(&path)?;
    for e in &data.row_errors {
        tracing::warn!(line = e.line, message = %e.message, "skipped CSV row");
    }
    workspace_from(data, common, settings)
}

/// Build a workspace from already-ingested data.
pub fn workspace_from(
    data: IngestedData,
    common: &CommonArgs,
    settings: &Settings,
) -> Result<Workspace, AppError> {
    let end = match common.end {
        Some(end) => end,
        // Anchored to the data, never to today.
        None => data
            .source
            .latest_observation_date()
            .ok_or_else(|| AppError::new(3, "No bulletins loaded; cannot anchor the window."))?,
    };
    let years = common.years.unwrap_or(settings.years);
    let window = Window::trailing_years(end, years)?;
    tracing::debug!(window = %window.label(), "resolved analysis window");

    Ok(Workspace {
        rows_used: data.rows_used,
        row_errors: data.row_errors.len(),
        analyzer: TrendAnalyzer::new(data.source),
        window,
    })
}

fn resolve_data_path(common: &CommonArgs, settings: &Settings) -> Result<PathBuf, AppError> {
    common
        .data
        .clone()
        .or_else(|| settings.data_path.clone())
        .ok_or_else(|| AppError::new(2, "No observation data: pass --data or set VB_DATA."))
}
