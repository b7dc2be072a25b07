//! HTTP transport seam.
//!
//! The client only needs "GET this URL, give me status and body". Keeping that
//! behind a trait lets tests script responses and their arrival order.

use crate::error::CatalogError;
use anyhow::{Context, Result};
use reqwest::{Client, Url};
use std::future::Future;
use std::time::Duration;
use tracing::debug;

/// Status and body of a completed HTTP exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Performs GET requests for the catalog client.
///
/// Transport failures must be reported as [`CatalogError::Network`]; any HTTP
/// status, including errors, is a successful exchange at this level.
pub trait HttpTransport: Send + Sync + 'static {
    fn get(&self, url: Url) -> impl Future<Output = Result<RawResponse, CatalogError>> + Send;
}

/// reqwest-backed transport
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }
}

impl HttpTransport for ReqwestTransport {
    fn get(&self, url: Url) -> impl Future<Output = Result<RawResponse, CatalogError>> + Send {
        let request = self.client.get(url);

        async move {
            let response = request
                .send()
                .await
                .map_err(|e| CatalogError::Network(e.to_string()))?;

            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .map_err(|e| CatalogError::Network(e.to_string()))?;

            debug!(status = status, bytes = body.len(), "Response received");
            Ok(RawResponse { status, body })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_creation() {
        let transport = ReqwestTransport::new(Duration::from_secs(30), "anime-browser-test");
        assert!(transport.is_ok());
    }

    #[test]
    fn test_raw_response_success_range() {
        assert!(RawResponse::new(200, "").is_success());
        assert!(RawResponse::new(204, "").is_success());
        assert!(!RawResponse::new(304, "").is_success());
        assert!(!RawResponse::new(404, "").is_success());
    }
}
