//! Blocking HTTP client implementation using reqwest.

use std::time::Duration;

use reqwest::blocking::Client;
use tracing::debug;

use crate::domain::AppError;
use crate::ports::HttpClient;

/// HTTP client for probes and installer downloads.
#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    client: Client,
}

impl ReqwestHttpClient {
    /// Create a client whose requests give up after `timeout_secs`.
    pub fn new(timeout_secs: u64) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(concat!("mtdeploy/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AppError::Configuration(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

impl HttpClient for ReqwestHttpClient {
    fn get_text(&self, url: &str) -> Result<String, AppError> {
        debug!(url, "GET");
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| AppError::Http(format!("GET {} failed: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Http(format!("GET {} returned {}", url, status.as_u16())));
        }

        response.text().map_err(|e| AppError::Http(format!("Failed to read body of {}: {}", url, e)))
    }
}
