use std::fmt;

use async_trait::async_trait;
use serde_json::Value;

use crate::args::HttpMethod;
use crate::error::HttpError;

/// A single REST call: method, path relative to the API root and an optional
/// JSON body for PUT/POST.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiCall {
    pub method: HttpMethod,
    pub path: String,
    pub body: Value,
}

impl ApiCall {
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path, Value::Null)
    }

    #[must_use]
    pub fn put(path: impl Into<String>, body: Value) -> Self {
        Self::new(HttpMethod::Put, path, body)
    }

    #[must_use]
    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self::new(HttpMethod::Post, path, body)
    }

    #[must_use]
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, path, Value::Null)
    }

    #[must_use]
    pub fn new(method: HttpMethod, path: impl Into<String>, body: Value) -> Self {
        Self {
            method,
            path: path.into(),
            body,
        }
    }
}

impl fmt::Display for ApiCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} /{}", self.method, self.path.trim_start_matches('/'))
    }
}

/// Typed access to the REST API under test.
///
/// Every method returns the decoded JSON response body, `Value::Null` when
/// the body is empty.
#[async_trait]
pub trait ApiClient: Send + Sync {
    async fn get(&self, path: &str) -> Result<Value, HttpError>;

    async fn put(&self, path: &str, body: &Value) -> Result<Value, HttpError>;

    async fn post(&self, path: &str, body: &Value) -> Result<Value, HttpError>;

    async fn delete(&self, path: &str) -> Result<Value, HttpError>;

    async fn call(&self, call: &ApiCall) -> Result<Value, HttpError> {
        match call.method {
            HttpMethod::Get => self.get(&call.path).await,
            HttpMethod::Put => self.put(&call.path, &call.body).await,
            HttpMethod::Post => self.post(&call.path, &call.body).await,
            HttpMethod::Delete => self.delete(&call.path).await,
        }
    }
}
