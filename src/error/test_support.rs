use super::{ConfigError, RunnerError, SeriesError, ValidationError};

impl From<&'static str> for ValidationError {
    fn from(message: &'static str) -> Self {
        ValidationError::TestExpectation { message }
    }
}

impl From<String> for ValidationError {
    fn from(value: String) -> Self {
        ValidationError::TestExpectationValue {
            message: "Test expectation failed",
            value,
        }
    }
}

impl From<&'static str> for ConfigError {
    fn from(message: &'static str) -> Self {
        ConfigError::TestExpectation { message }
    }
}

impl From<String> for ConfigError {
    fn from(value: String) -> Self {
        ConfigError::TestExpectationValue {
            message: "Test expectation failed",
            value,
        }
    }
}

impl From<&'static str> for SeriesError {
    fn from(message: &'static str) -> Self {
        SeriesError::TestExpectation { message }
    }
}

impl From<String> for SeriesError {
    fn from(value: String) -> Self {
        SeriesError::TestExpectationValue {
            message: "Test expectation failed",
            value,
        }
    }
}

impl From<&'static str> for RunnerError {
    fn from(message: &'static str) -> Self {
        RunnerError::TestExpectation { message }
    }
}

impl From<String> for RunnerError {
    fn from(value: String) -> Self {
        RunnerError::TestExpectationValue {
            message: "Test expectation failed",
            value,
        }
    }
}
