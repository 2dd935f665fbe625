use std::collections::BTreeMap;
use std::time::Duration;

use url::Url;

use crate::args::{DriftArgs, PositiveUsize};
use crate::error::{AppError, AppResult, ConfigError, ValidationError};
use crate::runner::DEFAULT_RUNS;

use super::types::EndpointConfig;

pub(crate) const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Everything the API client and runner need, resolved once at startup.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Base URL without a trailing slash.
    pub api_root: String,
    pub api_key: String,
    pub runs: PositiveUsize,
    pub wait: Option<Duration>,
    pub timeout: Duration,
    pub debug: bool,
    pub endpoints: BTreeMap<String, EndpointConfig>,
}

impl Settings {
    /// Settings with default run count, no wait and the default timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if `api_root` is not an absolute http(s) URL.
    pub fn new(api_root: &str, api_key: &str) -> AppResult<Self> {
        Ok(Self {
            api_root: normalize_api_root(api_root)?,
            api_key: api_key.to_owned(),
            runs: PositiveUsize::try_from(DEFAULT_RUNS)?,
            wait: None,
            timeout: DEFAULT_TIMEOUT,
            debug: false,
            endpoints: BTreeMap::new(),
        })
    }

    /// Build settings from parsed (and config-merged) CLI arguments.
    ///
    /// # Errors
    ///
    /// Returns an error when the API root or key is missing or invalid, or
    /// when a configured endpoint has no path.
    pub fn from_args(
        args: &DriftArgs,
        endpoints: BTreeMap<String, EndpointConfig>,
    ) -> AppResult<Self> {
        let api_root = args
            .api_root
            .as_deref()
            .ok_or_else(|| AppError::validation(ValidationError::MissingApiRoot))?;
        let api_key = args
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| AppError::validation(ValidationError::MissingApiKey))?;

        for (name, endpoint) in &endpoints {
            if endpoint.path.trim().is_empty() {
                return Err(AppError::config(ConfigError::EndpointPathEmpty {
                    name: name.clone(),
                }));
            }
        }

        Ok(Self {
            api_root: normalize_api_root(api_root)?,
            api_key: api_key.to_owned(),
            runs: args.runs,
            wait: args.wait,
            timeout: args.request_timeout,
            debug: args.debug,
            endpoints,
        })
    }
}

fn normalize_api_root(value: &str) -> AppResult<String> {
    let trimmed = value.trim();
    let parsed = Url::parse(trimmed).map_err(|err| {
        AppError::validation(ValidationError::InvalidApiRoot {
            value: trimmed.to_owned(),
            source: err,
        })
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(AppError::validation(
            ValidationError::UnsupportedApiScheme {
                value: trimmed.to_owned(),
            },
        ));
    }
    Ok(trimmed.trim_end_matches('/').to_owned())
}
