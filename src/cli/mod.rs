//! Command-line parsing for the visa bulletin trend tool.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! analysis code.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use crate::domain::{Category, Country};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "vb", version, about = "Visa bulletin trend analysis and forecasting")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Trend statistics for one category/country.
    Analyze(AnalyzeArgs),
    /// Forecast the next bulletins for one category/country.
    Predict(PredictArgs),
    /// Rank categories for one country.
    Compare(CompareArgs),
    /// Market-level summary across categories and countries.
    Summary(SummaryArgs),
}

/// Options shared by every command.
#[derive(Debug, Args, Clone)]
pub struct CommonArgs {
    /// Observation CSV (category,country,bulletin_date,value). Defaults to $VB_DATA.
    #[arg(long, value_name = "CSV")]
    pub data: Option<PathBuf>,

    /// Last bulletin date of the window (defaults to the latest bulletin in the data).
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub end: Option<NaiveDate>,

    /// Years of history to analyze (defaults to $VB_YEARS or 3).
    #[arg(long)]
    pub years: Option<u32>,

    /// Print JSON instead of the text report.
    #[arg(long)]
    pub json: bool,

    /// Also write the JSON result to this file.
    #[arg(long, value_name = "JSON")]
    pub export: Option<PathBuf>,
}

/// One category/country series.
#[derive(Debug, Args, Clone)]
pub struct SeriesArgs {
    /// Visa category (e.g. EB-2, F2A).
    #[arg(short = 'c', long)]
    pub category: Category,

    /// Chargeability country (ALL, CHINA, INDIA, MEXICO, PHILIPPINES).
    #[arg(short = 'C', long, default_value = "ALL")]
    pub country: Country,
}

#[derive(Debug, Args, Clone)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub series: SeriesArgs,

    #[command(flatten)]
    pub common: CommonArgs,

    /// Render an ASCII plot of the advancement series.
    #[arg(long)]
    pub plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 72)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 15)]
    pub height: usize,
}

#[derive(Debug, Args, Clone)]
pub struct PredictArgs {
    #[command(flatten)]
    pub series: SeriesArgs,

    #[command(flatten)]
    pub common: CommonArgs,

    /// Number of bulletins to forecast (1-24).
    #[arg(short = 'n', long, default_value_t = 3)]
    pub periods: usize,
}

#[derive(Debug, Args, Clone)]
pub struct CompareArgs {
    /// Chargeability country.
    #[arg(short = 'C', long, default_value = "ALL")]
    pub country: Country,

    /// Categories to compare (repeatable; defaults to every category in the data).
    #[arg(short = 'c', long = "category")]
    pub categories: Vec<Category>,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Debug, Args, Clone)]
pub struct SummaryArgs {
    /// Categories to include (repeatable; defaults to every category in the data).
    #[arg(short = 'c', long = "category")]
    pub categories: Vec<Category>,

    /// Countries to include (repeatable; defaults to every country in the data).
    #[arg(short = 'C', long = "country")]
    pub countries: Vec<Country>,

    #[command(flatten)]
    pub common: CommonArgs,
}
