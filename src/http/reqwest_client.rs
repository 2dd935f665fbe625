use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method};
use serde_json::Value;
use tracing::debug;

use crate::args::{DEFAULT_USER_AGENT, HttpMethod};
use crate::config::Settings;
use crate::error::HttpError;

use super::client::ApiClient;

/// Header carrying the API key (`API-Key`; header names are case-insensitive).
pub const API_KEY_HEADER: &str = "api-key";

/// Join an API root and path segments with single slashes.
#[must_use]
pub fn build_endpoint(root: &str, segments: &[&str]) -> String {
    let mut url = root.trim_end_matches('/').to_owned();
    for segment in segments {
        let segment = segment.trim_matches('/');
        if segment.is_empty() {
            continue;
        }
        url.push('/');
        url.push_str(segment);
    }
    url
}

/// [`ApiClient`] backed by a shared `reqwest::Client`.
///
/// Certificates are not verified; the API under test is usually a staging
/// host with a self-signed certificate.
#[derive(Debug, Clone)]
pub struct ReqwestApiClient {
    client: Client,
    api_root: String,
}

impl ReqwestApiClient {
    /// # Errors
    ///
    /// Returns an error when the key is not a valid header value or the
    /// client cannot be built.
    pub fn new(api_root: &str, api_key: &str, timeout: Duration) -> Result<Self, HttpError> {
        let mut key = HeaderValue::from_str(api_key).map_err(|_err| HttpError::InvalidApiKey)?;
        key.set_sensitive(true);
        let mut headers = HeaderMap::new();
        headers.insert(HeaderName::from_static(API_KEY_HEADER), key);

        let client = Client::builder()
            .default_headers(headers)
            .user_agent(DEFAULT_USER_AGENT)
            .timeout(timeout)
            .danger_accept_invalid_certs(true)
            .build()
            .map_err(|err| HttpError::BuildClientFailed { source: err })?;

        Ok(Self {
            client,
            api_root: api_root.trim_end_matches('/').to_owned(),
        })
    }

    /// # Errors
    ///
    /// See [`ReqwestApiClient::new`].
    pub fn from_settings(settings: &Settings) -> Result<Self, HttpError> {
        Self::new(&settings.api_root, &settings.api_key, settings.timeout)
    }

    #[must_use]
    pub fn api_root(&self) -> &str {
        &self.api_root
    }

    #[must_use]
    pub fn url_for(&self, path: &str) -> String {
        build_endpoint(&self.api_root, &[path])
    }

    async fn send(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Value, HttpError> {
        let url = self.url_for(path);
        let mut request = self.client.request(reqwest_method(method), &url);
        if let Some(body) = body {
            request = request
                .header(CONTENT_TYPE, "application/json")
                .body(body.to_string());
        }

        debug!("{} {}", method, url);
        let response = request
            .send()
            .await
            .map_err(|err| classify(url.clone(), err))?;

        let status = response.status();
        if !status.is_success() {
            return Err(HttpError::Status {
                method: method.as_str(),
                url,
                status: status.as_u16(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|err| classify(url.clone(), err))?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        serde_json::from_slice(&bytes).map_err(|err| HttpError::InvalidBody { url, source: err })
    }
}

#[async_trait]
impl ApiClient for ReqwestApiClient {
    async fn get(&self, path: &str) -> Result<Value, HttpError> {
        self.send(HttpMethod::Get, path, None).await
    }

    async fn put(&self, path: &str, body: &Value) -> Result<Value, HttpError> {
        self.send(HttpMethod::Put, path, Some(body)).await
    }

    async fn post(&self, path: &str, body: &Value) -> Result<Value, HttpError> {
        self.send(HttpMethod::Post, path, Some(body)).await
    }

    async fn delete(&self, path: &str) -> Result<Value, HttpError> {
        self.send(HttpMethod::Delete, path, None).await
    }
}

/// Timeouts, and transport failures that never produced a response (refused,
/// reset or truncated connections), are transient. Builder and redirect
/// errors are not.
fn classify(url: String, err: reqwest::Error) -> HttpError {
    if err.is_timeout() {
        HttpError::Timeout {
            url,
            source: Some(err),
        }
    } else if err.is_connect()
        || (err.status().is_none() && !err.is_builder() && !err.is_redirect())
    {
        HttpError::Connection {
            url,
            source: Some(err),
        }
    } else {
        HttpError::Request { url, source: err }
    }
}

const fn reqwest_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Post => Method::POST,
        HttpMethod::Delete => Method::DELETE,
    }
}
