use thiserror::Error;

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("Request to {url} timed out.")]
    Timeout {
        url: String,
        #[source]
        source: Option<reqwest::Error>,
    },
    #[error("Connection to {url} failed before a response arrived.")]
    Connection {
        url: String,
        #[source]
        source: Option<reqwest::Error>,
    },
    #[error("{method} {url} returned status {status}.")]
    Status {
        method: &'static str,
        url: String,
        status: u16,
    },
    #[error("Request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("Invalid JSON body from {url}: {source}")]
    InvalidBody {
        url: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Invalid API key header value.")]
    InvalidApiKey,
    #[error("Failed to build HTTP client: {source}")]
    BuildClientFailed {
        #[source]
        source: reqwest::Error,
    },
}

impl HttpError {
    /// Timeouts and dropped or refused connections are recorded as failed
    /// samples; everything else aborts a run.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        match self {
            HttpError::Timeout { .. } | HttpError::Connection { .. } => true,
            HttpError::Status { .. }
            | HttpError::Request { .. }
            | HttpError::InvalidBody { .. }
            | HttpError::InvalidApiKey
            | HttpError::BuildClientFailed { .. } => false,
        }
    }
}
