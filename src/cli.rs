//! CLI argument parsing for Charla

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for talk-time reports
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable bar chart (default)
    Text,
    /// JSON format for machine parsing
    Json,
    /// CSV format for spreadsheet analysis
    Csv,
}

#[derive(Parser, Debug)]
#[command(name = "charla")]
#[command(version)]
#[command(about = "Talk-time tracker for opaque web-conference clients", long_about = None)]
pub struct Cli {
    /// Recorded host session to replay (JSON transcript)
    pub recording: PathBuf,

    /// Show the per-participant summary table instead of the chart
    #[arg(short = 'c', long = "summary")]
    pub statistics: bool,

    /// Output format (text, json or csv)
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Scan cadence for the instrumentation pass, in milliseconds
    #[arg(long = "scan-interval", value_name = "MS", default_value = "250")]
    pub scan_interval_ms: u64,

    /// Poll cadence for the aggregation pass, in milliseconds
    #[arg(long = "poll-interval", value_name = "MS", default_value = "500")]
    pub poll_interval_ms: u64,

    /// Label the host renders for the local participant ("" disables seeding)
    #[arg(long = "self-label", value_name = "NAME", default_value = "You")]
    pub self_label: String,

    /// Identifier prefix shared by roster keys
    #[arg(long = "space-prefix", value_name = "PREFIX", default_value = "spaces/")]
    pub space_prefix: String,

    /// Verbose debug logging to stderr
    #[arg(short, long)]
    pub debug: bool,
}
