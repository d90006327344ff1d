//! CLI argument definitions for hnp-tidy.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "hnp-tidy",
    version,
    about = "Reshape and merge public-health tables into one tidy CSV",
    long_about = "Filter a wide World Bank health-indicator export to a fixed set of\n\
                  expenditure series, reshape it to one row per country-year, merge it\n\
                  with a life-expectancy table on (country code, year), and write the\n\
                  result as a tidy CSV."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Reshape and merge the two source tables into a tidy CSV.
    Tidy(TidyArgs),

    /// List the active indicator catalog (code -> tidy column).
    Indicators(IndicatorsArgs),

    /// Print a source file's detected header and its unique indicators.
    Inspect(InspectArgs),
}

#[derive(Parser)]
pub struct TidyArgs {
    /// Wide-format health indicators CSV (countries x years).
    #[arg(value_name = "HEALTH_CSV")]
    pub health_csv: PathBuf,

    /// Long-format life-expectancy CSV.
    #[arg(value_name = "LIFE_CSV")]
    pub life_csv: PathBuf,

    /// Output path for the merged table (default: tidy.csv next to HEALTH_CSV).
    #[arg(long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Replacement indicator catalog: a JSON object of code -> column name.
    #[arg(long = "catalog", value_name = "JSON")]
    pub catalog: Option<PathBuf>,

    /// Source column holding the life-expectancy metric.
    #[arg(long = "life-metric-column", value_name = "NAME")]
    pub life_metric_column: Option<String>,

    /// Run the pipeline and report counts without writing the output file.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

#[derive(Parser)]
pub struct IndicatorsArgs {
    /// Replacement indicator catalog: a JSON object of code -> column name.
    #[arg(long = "catalog", value_name = "JSON")]
    pub catalog: Option<PathBuf>,
}

#[derive(Parser)]
pub struct InspectArgs {
    /// CSV file to inspect.
    #[arg(value_name = "CSV")]
    pub file: PathBuf,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
