use thiserror::Error;

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("No runner for endpoint '{name}'.")]
    NoSuchRunner { name: String },
    #[error("Endpoint '{name}' is already registered.")]
    DuplicateEndpoint { name: String },
    #[error("Failed to read confirmation from stdin: {source}")]
    Prompt {
        #[source]
        source: std::io::Error,
    },
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
