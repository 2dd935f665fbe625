use thiserror::Error;

#[derive(Debug, Error)]
pub enum SeriesError {
    #[error("No series labeled '{label}'.")]
    MissingSeries { label: String },
    #[error("Failed to read series JSON: {source}")]
    Decode {
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to write series JSON: {source}")]
    Encode {
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to flush series file: {source}")]
    Flush {
        #[source]
        source: std::io::Error,
    },
    #[error("Series file '{path}' holds no series.")]
    Empty { path: String },
    #[error("Failed to write series report: {source}")]
    Report {
        #[source]
        source: std::fmt::Error,
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
