//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads settings and initializes logging
//! - parses CLI arguments
//! - loads observations and resolves the window
//! - runs the requested analysis
//! - prints text or JSON and writes optional exports

use clap::Parser;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use crate::analysis::extract_advancements;
use crate::cli::{AnalyzeArgs, Command, CommonArgs, CompareArgs, PredictArgs, SummaryArgs};
use crate::config::{DEFAULT_LOG_FILTER, Settings};
use crate::domain::{Category, Country};
use crate::error::AppError;
use crate::source::ObservationSource;

pub mod pipeline;

/// Entry point for the `vb` binary.
pub fn run() -> Result<(), AppError> {
    let settings = Settings::from_env()?;
    init_logging(&settings.log_filter);

    let cli = crate::cli::Cli::parse();
    match cli.command {
        Command::Analyze(args) => handle_analyze(args, &settings),
        Command::Predict(args) => handle_predict(args, &settings),
        Command::Compare(args) => handle_compare(args, &settings),
        Command::Summary(args) => handle_summary(args, &settings),
    }
}

/// Logs go to stderr so stdout stays parseable with `--json`.
fn init_logging(filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    // A subscriber may already be installed (e.g. by an embedding application).
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn handle_analyze(args: AnalyzeArgs, settings: &Settings) -> Result<(), AppError> {
    let ws = pipeline::prepare(&args.common, settings)?;
    let (category, country) = (args.series.category, args.series.country);
    let analysis = ws.analyzer.analyze(category, country, ws.window)?;
    match analysis.report() {
        Some(r) => tracing::info!("{}", crate::report::headline(r)),
        None => tracing::info!(%category, %country, status = analysis.status(), "analysis incomplete"),
    }

    let mut text = crate::report::format_trend(&analysis);
    if args.plot {
        let obs = ws.analyzer.source().observations(category, country, &ws.window)?;
        text.push('\n');
        text.push_str(&crate::plot::render_advancement_plot(
            &extract_advancements(&obs),
            args.width,
            args.height,
        ));
    }
    emit(&args.common, &analysis, text)
}

fn handle_predict(args: PredictArgs, settings: &Settings) -> Result<(), AppError> {
    let ws = pipeline::prepare(&args.common, settings)?;
    let forecast = ws.analyzer.predict(
        args.series.category,
        args.series.country,
        ws.window,
        args.periods,
    )?;
    let text = crate::report::format_forecast(&forecast);
    emit(&args.common, &forecast, text)
}

fn handle_compare(args: CompareArgs, settings: &Settings) -> Result<(), AppError> {
    let ws = pipeline::prepare(&args.common, settings)?;
    let categories = or_all(args.categories, || ws.analyzer.source().categories());
    let comparison = ws.analyzer.compare(args.country, &categories, ws.window)?;
    let text = crate::report::format_comparison(&comparison);
    emit(&args.common, &comparison, text)
}

fn handle_summary(args: SummaryArgs, settings: &Settings) -> Result<(), AppError> {
    let ws = pipeline::prepare(&args.common, settings)?;
    let categories: Vec<Category> = or_all(args.categories, || ws.analyzer.source().categories());
    let countries: Vec<Country> = or_all(args.countries, || ws.analyzer.source().countries());
    let summary = ws.analyzer.summarize(&categories, &countries, ws.window)?;
    let text = crate::report::format_summary(&summary);
    emit(&args.common, &summary, text)
}

/// Explicit selection, or everything present in the data.
fn or_all<T>(selected: Vec<T>, all: impl FnOnce() -> Vec<T>) -> Vec<T> {
    if selected.is_empty() { all() } else { selected }
}

fn emit<T: Serialize>(common: &CommonArgs, result: &T, text: String) -> Result<(), AppError> {
    if common.json {
        println!("{}", crate::io::to_json(result)?);
    } else {
        print!("{text}");
    }
    if let Some(path) = &common.export {
        crate::io::write_json(path, result)?;
    }
    Ok(())
}
