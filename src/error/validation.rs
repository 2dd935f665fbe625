use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Duration must not be empty.")]
    DurationEmpty,
    #[error("Invalid duration '{value}'.")]
    InvalidDurationFormat { value: String },
    #[error("Invalid duration '{value}': {source}")]
    InvalidDurationNumber {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("Duration overflow.")]
    DurationOverflow,
    #[error("Invalid duration unit '{unit}'.")]
    InvalidDurationUnit { unit: String },
    #[error("Duration must be > 0.")]
    DurationZero,
    #[error("Value must be >= {min}.")]
    ValueTooSmall { min: u64 },
    #[error("Invalid value: {source}")]
    InvalidNumber {
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("Missing API root (set --api-root, DRIFTBENCH_API_ROOT or api_root in config).")]
    MissingApiRoot,
    #[error("Missing API key (set --api-key, DRIFTBENCH_API_KEY or api_key in config).")]
    MissingApiKey,
    #[error("Invalid API root '{value}': {source}")]
    InvalidApiRoot {
        value: String,
        #[source]
        source: url::ParseError,
    },
    #[error("API root '{value}' must use http or https.")]
    UnsupportedApiScheme { value: String },
    #[error("Got {labels} labels for {endpoints} endpoints.")]
    TooManyLabels { labels: usize, endpoints: usize },
    #[cfg(test)]
    #[error("Test expectation failed: {message}")]
    TestExpectation { message: &'static str },
    #[cfg(test)]
    #[error("Test expectation failed: {message}: {value}")]
    TestExpectationValue {
        message: &'static str,
        value: String,
    },
}
