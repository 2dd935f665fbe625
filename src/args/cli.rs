use clap::{Args, Parser, Subcommand};
use std::time::Duration;

use super::defaults::default_charts_path;
use super::parsers::{parse_duration_arg, parse_positive_usize};
use super::types::PositiveUsize;

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Print statistics and chart a previously dumped series file
    Report(ReportArgs),
}

#[derive(Debug, Args, Clone)]
pub struct ReportArgs {
    /// Series file written by --dump
    #[arg(value_name = "FILE")]
    pub input: String,

    /// Aggregate failed calls as -1 instead of dropping them
    #[arg(long = "include-failures")]
    pub include_failures: bool,

    #[command(flatten)]
    pub chart: ChartArgs,
}

#[derive(Debug, Args, Clone)]
pub struct ChartArgs {
    /// Write the chart to this PNG file
    #[arg(long = "chart")]
    pub chart: Option<String>,

    /// Directory for charts when --chart is not given
    #[arg(long = "charts-path", default_value_t = default_charts_path())]
    pub charts_path: String,

    /// Skip chart generation
    #[arg(long = "no-chart", conflicts_with = "chart")]
    pub no_chart: bool,

    /// Chart and report title
    #[arg(long = "title")]
    pub title: Option<String>,

    /// Y axis unit label
    #[arg(long = "units", default_value = "milliseconds")]
    pub units: String,
}

#[derive(Debug, Parser, Clone)]
#[clap(
    version,
    about = "Sequential HTTP latency tester - times repeated REST calls per endpoint and reports statistics and charts.",
    args_conflicts_with_subcommands = true
)]
pub struct DriftArgs {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Endpoints to benchmark, in order (e.g. categories brands)
    #[arg(value_name = "ENDPOINT", default_value = "categories")]
    pub endpoints: Vec<String>,

    /// Series label for the endpoint at the same position (repeatable)
    #[arg(long = "label", short = 'l')]
    pub labels: Vec<String>,

    /// Config file (.toml or .json); defaults to driftbench.toml/driftbench.json
    #[arg(long, short = 'c')]
    pub config: Option<String>,

    /// Base URL of the API under test
    #[arg(long = "api-root", env = "DRIFTBENCH_API_ROOT")]
    pub api_root: Option<String>,

    /// Value sent in the API-Key header
    #[arg(long = "api-key", env = "DRIFTBENCH_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Calls per endpoint
    #[arg(
        long = "runs",
        short = 'n',
        default_value = "100",
        value_parser = parse_positive_usize
    )]
    pub runs: PositiveUsize,

    /// Pause between calls (supports ms/s/m/h)
    #[arg(long = "wait", value_parser = parse_duration_arg)]
    pub wait: Option<Duration>,

    /// Request timeout (supports ms/s/m/h)
    #[arg(
        long = "timeout",
        default_value = "30s",
        value_parser = parse_duration_arg
    )]
    pub request_timeout: Duration,

    /// Ask for confirmation before each endpoint after the first
    #[arg(long = "prompt")]
    pub prompt: bool,

    /// Print a progress tick per call
    #[arg(long = "debug")]
    pub debug: bool,

    /// Aggregate failed calls as -1 instead of dropping them
    #[arg(long = "include-failures")]
    pub include_failures: bool,

    /// Write the collected series as JSON to this path
    #[arg(long = "dump")]
    pub dump: Option<String>,

    #[command(flatten)]
    pub chart: ChartArgs,

    /// Enable verbose logging
    #[arg(long, short)]
    pub verbose: bool,

    /// Disable colored log output
    #[arg(long = "no-color")]
    pub no_color: bool,
}
