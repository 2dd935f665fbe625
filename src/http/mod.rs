//! API client abstraction and its reqwest implementation.
mod client;
mod reqwest_client;

#[cfg(test)]
mod tests;

pub use client::{ApiCall, ApiClient};
pub use reqwest_client::{API_KEY_HEADER, ReqwestApiClient, build_endpoint};
