use std::collections::BTreeMap;

use serde_json::Value;

use crate::config::types::EndpointConfig;
use crate::error::RunnerError;
use crate::http::ApiCall;

/// Endpoints every runner knows; each name doubles as its REST path.
pub const BUILTIN_ENDPOINTS: [&str; 4] = ["categories", "brands", "sizes", "merchants"];

/// A named, runnable API call with its default series label.
#[derive(Debug, Clone, PartialEq)]
pub struct Endpoint {
    pub name: String,
    pub call: ApiCall,
    pub label: String,
}

impl Endpoint {
    /// Endpoint labeled `"<METHOD> /<path>"`.
    #[must_use]
    pub fn new(name: impl Into<String>, call: ApiCall) -> Self {
        let label = call.to_string();
        Self {
            name: name.into(),
            call,
            label,
        }
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    #[must_use]
    pub fn from_config(name: &str, config: &EndpointConfig) -> Self {
        let call = ApiCall::new(
            config.method.unwrap_or_default(),
            config.path.trim(),
            config.body.clone().unwrap_or(Value::Null),
        );
        let endpoint = Self::new(name, call);
        match config.label.as_deref() {
            Some(label) => endpoint.with_label(label),
            None => endpoint,
        }
    }
}

/// Name to endpoint lookup used by `Runner::get_runner` and `Runner::run`.
#[derive(Debug, Clone, Default)]
pub struct EndpointRegistry {
    endpoints: BTreeMap<String, Endpoint>,
}

impl EndpointRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the `categories`, `brands`, `sizes` and `merchants`
    /// GET endpoints.
    #[must_use]
    pub fn builtin() -> Self {
        let endpoints = BUILTIN_ENDPOINTS
            .iter()
            .map(|name| ((*name).to_owned(), Endpoint::new(*name, ApiCall::get(*name))))
            .collect();
        Self { endpoints }
    }

    /// Builtins plus every `[endpoints.<name>]` table from the config.
    ///
    /// # Errors
    ///
    /// Returns `RunnerError::DuplicateEndpoint` when a configured name
    /// shadows a builtin.
    pub fn with_config(configured: &BTreeMap<String, EndpointConfig>) -> Result<Self, RunnerError> {
        let mut registry = Self::builtin();
        for (name, config) in configured {
            registry.register(Endpoint::from_config(name, config))?;
        }
        Ok(registry)
    }

    /// # Errors
    ///
    /// Returns `RunnerError::DuplicateEndpoint` if the name is taken.
    pub fn register(&mut self, endpoint: Endpoint) -> Result<(), RunnerError> {
        if self.endpoints.contains_key(&endpoint.name) {
            return Err(RunnerError::DuplicateEndpoint {
                name: endpoint.name,
            });
        }
        self.endpoints.insert(endpoint.name.clone(), endpoint);
        Ok(())
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Endpoint> {
        self.endpoints.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.endpoints.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }
}
