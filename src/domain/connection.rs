//! Operator-facing connection credentials.

use std::path::PathBuf;

use url::Url;

use crate::domain::{AppError, HealthWarning};

/// Placeholder used in links when the public address could not be determined.
pub const UNKNOWN_SERVER_IP: &str = "YOUR_SERVER_IP";

/// A labeled shell command the operator can run to manage the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagementCommand {
    pub label: &'static str,
    pub command: String,
}

/// Final artifact of a successful install (or of `status`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionReport {
    pub server: String,
    pub port: u16,
    pub secret: String,
    pub tls_domain: String,
    pub metrics_url: Option<String>,
    pub install_dir: PathBuf,
    pub management: Vec<ManagementCommand>,
    pub warnings: Vec<HealthWarning>,
}

impl ConnectionReport {
    /// `tg://proxy?...` link opened directly by Telegram clients.
    pub fn tg_link(&self) -> Result<String, AppError> {
        self.link("tg://proxy")
    }

    /// `https://t.me/proxy?...` link that works from a browser.
    pub fn web_link(&self) -> Result<String, AppError> {
        self.link("https://t.me/proxy")
    }

    fn link(&self, base: &str) -> Result<String, AppError> {
        let port = self.port.to_string();
        let url = Url::parse_with_params(
            base,
            [("server", self.server.as_str()), ("port", port.as_str()), ("secret", self.secret.as_str())],
        )
        .map_err(|e| AppError::Internal(format!("Failed to build link from '{}': {}", base, e)))?;
        Ok(url.to_string())
    }
}
