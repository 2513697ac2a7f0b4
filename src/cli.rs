//! CLI argument parsing for TicToc

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for measurement listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text table (default)
    Text,
    /// JSON array for machine parsing
    Json,
    /// CSV rows for spreadsheet analysis
    Csv,
}

#[derive(Parser, Debug)]
#[command(name = "tictoc")]
#[command(version)]
#[command(
    about = "Replay reactive-UI lifecycle event logs into latency measurements",
    long_about = None
)]
pub struct Cli {
    /// Event log to replay (JSON Lines, one lifecycle event per line; use - for stdin)
    #[arg(value_name = "EVENT_LOG")]
    pub event_log: String,

    /// Show the slowest server/output summary instead of individual measurements
    #[arg(short = 'c', long = "summary")]
    pub summary: bool,

    /// Filter measurements (e.g., -e ids=out1,out2 or -e ids=server or -e ids=outputs)
    #[arg(short = 'e', long = "expr", value_name = "EXPR")]
    pub filter: Option<String>,

    /// Output format for the measurement listing
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Write a timestamped CSV export into the output directory
    #[arg(long = "export-csv")]
    pub export_csv: bool,

    /// Write a self-contained HTML timeline report into the output directory
    #[arg(long = "export-html")]
    pub export_html: bool,

    /// Directory exported artifacts are written to
    #[arg(long = "output-dir", value_name = "DIR", default_value = ".")]
    pub output_dir: PathBuf,

    /// URL of the chart bundle embedded into HTML reports
    #[arg(long = "chart-url", value_name = "URL")]
    pub chart_url: Option<String>,

    /// Local chart bundle file to embed instead of fetching (offline export)
    #[arg(long = "chart-bundle", value_name = "FILE")]
    pub chart_bundle: Option<PathBuf>,

    /// Enable verbose diagnostics on stderr
    #[arg(long = "debug")]
    pub debug: bool,
}
