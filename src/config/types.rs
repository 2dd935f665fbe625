use std::collections::BTreeMap;
use std::time::Duration;

use serde::Deserialize;

use crate::args::{HttpMethod, parse_duration_arg};
use crate::error::{AppError, AppResult, ConfigError};

#[derive(Debug, Default, Deserialize)]
pub struct ConfigFile {
    pub api_root: Option<String>,
    pub api_key: Option<String>,
    pub runs: Option<usize>,
    pub wait: Option<DurationValue>,
    pub timeout: Option<DurationValue>,
    pub debug: Option<bool>,
    pub endpoints: Option<BTreeMap<String, EndpointConfig>>,
}

/// Extra endpoint registered under the table key, e.g. `[endpoints.users]`.
#[derive(Debug, Default, Deserialize, Clone, PartialEq)]
pub struct EndpointConfig {
    pub path: String,
    pub label: Option<String>,
    pub method: Option<HttpMethod>,
    pub body: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DurationValue {
    Seconds(u64),
    Text(String),
}

impl DurationValue {
    pub(crate) fn to_duration(&self, field: &'static str) -> AppResult<Duration> {
        match self {
            DurationValue::Seconds(0) => Err(AppError::config(ConfigError::InvalidDuration {
                field,
                message: "Duration must be > 0.".to_owned(),
            })),
            DurationValue::Seconds(secs) => Ok(Duration::from_secs(*secs)),
            DurationValue::Text(text) => parse_duration_arg(text).map_err(|err| {
                AppError::config(ConfigError::InvalidDuration {
                    field,
                    message: err.to_string(),
                })
            }),
        }
    }
}
