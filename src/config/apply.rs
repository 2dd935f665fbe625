use clap::ArgMatches;
use clap::parser::ValueSource;

use crate::args::{DriftArgs, PositiveUsize};
use crate::error::{AppError, AppResult, ConfigError};

use super::types::ConfigFile;

/// Applies configuration values to CLI arguments.
///
/// Values given on the command line or through an environment variable win
/// over the config file.
///
/// # Errors
///
/// Returns an error when a config value is invalid.
pub fn apply_config(
    args: &mut DriftArgs,
    matches: &ArgMatches,
    config: &ConfigFile,
) -> AppResult<()> {
    if !is_explicit(matches, "api_root")
        && let Some(api_root) = config.api_root.clone()
    {
        args.api_root = Some(api_root);
    }

    if !is_explicit(matches, "api_key")
        && let Some(api_key) = config.api_key.clone()
    {
        args.api_key = Some(api_key);
    }

    if !is_explicit(matches, "runs")
        && let Some(runs) = config.runs
    {
        args.runs = PositiveUsize::try_from(runs).map_err(|err| {
            AppError::config(ConfigError::FieldMustBePositive {
                field: "runs",
                source: err,
            })
        })?;
    }

    if !is_explicit(matches, "wait")
        && let Some(wait) = config.wait.as_ref()
    {
        args.wait = Some(wait.to_duration("wait")?);
    }

    if !is_explicit(matches, "request_timeout")
        && let Some(timeout) = config.timeout.as_ref()
    {
        args.request_timeout = timeout.to_duration("timeout")?;
    }

    if !is_explicit(matches, "debug")
        && let Some(debug) = config.debug
    {
        args.debug = debug;
    }

    Ok(())
}

fn is_explicit(matches: &ArgMatches, name: &str) -> bool {
    matches!(
        matches.value_source(name),
        Some(ValueSource::CommandLine | ValueSource::EnvVariable)
    )
}
