//! Binary entry point: argument parsing, logging and the runtime.
mod output;

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use clap::{ArgMatches, CommandFactory, FromArgMatches};
use tracing::{error, info};

use crate::args::{Command, DriftArgs, ReportArgs};
use crate::config::types::EndpointConfig;
use crate::config::{DEFAULT_CONFIG_FILES, Settings, load_config};
use crate::error::{AppError, AppResult, SeriesError};
use crate::http::ReqwestApiClient;
use crate::runner::Runner;
use crate::series::{FailurePolicy, TimeSeries};

use output::{ReportPlan, finish_report};

const API_ROOT_ENV: &str = "DRIFTBENCH_API_ROOT";

/// Parse the command line and run it to completion.
///
/// # Errors
///
/// Returns the first configuration, client, runner or output error.
pub fn run() -> AppResult<()> {
    let (args, matches) = match parse_args()? {
        Some(parsed) => parsed,
        None => return Ok(()),
    };

    crate::logger::init_logging(args.verbose, args.no_color);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(run_async(args, &matches))
}

fn parse_args() -> AppResult<Option<(DriftArgs, ArgMatches)>> {
    let mut cmd = DriftArgs::command();
    let raw_args: Vec<OsString> = std::env::args_os().collect();

    if should_show_help(&raw_args) {
        cmd.print_help()?;
        println!();
        return Ok(None);
    }

    let matches = cmd.get_matches_from(raw_args);
    let args = DriftArgs::from_arg_matches(&matches)?;

    Ok(Some((args, matches)))
}

fn should_show_help(raw_args: &[OsString]) -> bool {
    let treat_as_empty =
        matches!(raw_args, [] | [_]) || matches!(raw_args, [_, second] if second == "--");
    if !treat_as_empty {
        return false;
    }

    !has_default_config() && std::env::var_os(API_ROOT_ENV).is_none()
}

fn has_default_config() -> bool {
    DEFAULT_CONFIG_FILES
        .iter()
        .any(|path| Path::new(path).exists())
}

async fn run_async(mut args: DriftArgs, matches: &ArgMatches) -> AppResult<()> {
    if let Some(Command::Report(report)) = args.command.take() {
        return run_report(&report);
    }

    let endpoints = apply_config(&mut args, matches)?;
    let settings = Settings::from_args(&args, endpoints)?;
    let client = ReqwestApiClient::from_settings(&settings)?;
    let mut runner = Runner::from_settings(client, &settings)?;

    info!(
        "Running {} x{} against {}",
        args.endpoints.join(", "),
        settings.runs.get(),
        settings.api_root
    );
    let outcome = runner
        .run(args.endpoints.as_slice(), &args.labels, args.prompt)
        .await;

    let plan = ReportPlan {
        chart: &args.chart,
        policy: failure_policy(args.include_failures),
        dump: args.dump.as_deref(),
    };

    match outcome {
        Ok(totals) => {
            for (name, total) in args.endpoints.iter().zip(&totals) {
                info!("{} finished in {:.3}s", name, total.as_secs_f64());
            }
            finish_report(runner.series(), &plan)
        }
        Err(err) => {
            error!("Run stopped: {}", err);
            if !runner.series().is_empty()
                && let Err(report_err) = finish_report(runner.series(), &plan)
            {
                error!("Failed to report partial results: {}", report_err);
            }
            Err(err)
        }
    }
}

fn run_report(report: &ReportArgs) -> AppResult<()> {
    let file = File::open(&report.input).map_err(|err| {
        error!("Failed to open series file '{}': {}", report.input, err);
        AppError::from(err)
    })?;
    let series = TimeSeries::load(BufReader::new(file))?;
    if series.is_empty() {
        return Err(AppError::series(SeriesError::Empty {
            path: report.input.clone(),
        }));
    }

    let plan = ReportPlan {
        chart: &report.chart,
        policy: failure_policy(report.include_failures),
        dump: None,
    };
    finish_report(&series, &plan)
}

fn apply_config(
    args: &mut DriftArgs,
    matches: &ArgMatches,
) -> AppResult<BTreeMap<String, EndpointConfig>> {
    let mut endpoints = BTreeMap::new();
    let mut loaded_config = load_config(args.config.as_deref())?;
    if let Some(config) = loaded_config.as_mut() {
        endpoints = config.endpoints.take().unwrap_or_default();
        crate::config::apply_config(args, matches, config)?;
    }
    Ok(endpoints)
}

const fn failure_policy(include_failures: bool) -> FailurePolicy {
    if include_failures {
        FailurePolicy::Include
    } else {
        FailurePolicy::Exclude
    }
}
