//! Outbound HTTP transport.
//!
//! The `Transport` trait is the only place a network call happens, so
//! tests can swap in a mock and count requests per endpoint.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

use crate::types::GeocodeError;

/// Abstraction over an HTTP GET returning the response body.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    /// GET `url` with `query` and return the response body on 2xx.
    async fn get(&self, url: &str, query: &[(String, String)]) -> Result<String, GeocodeError>;
}

/// `reqwest`-backed transport with a bounded per-request timeout.
pub struct HttpTransport {
    http: Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .context("Failed to build geocoding HTTP client")?;
        Ok(Self { http })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str, query: &[(String, String)]) -> Result<String, GeocodeError> {
        let resp = self
            .http
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(classify)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(GeocodeError::Status(status.as_u16()));
        }

        let body = resp.text().await.map_err(classify)?;
        debug!(url, bytes = body.len(), "Response received");
        Ok(body)
    }
}

/// Map a `reqwest` error onto the taxonomy. The URL is stripped because
/// the query string carries credentials.
fn classify(e: reqwest::Error) -> GeocodeError {
    if e.is_timeout() {
        GeocodeError::Timeout
    } else if e.is_decode() {
        GeocodeError::Malformed(e.without_url().to_string())
    } else {
        GeocodeError::Transport(e.without_url().to_string())
    }
}
