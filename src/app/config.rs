//! Installer settings.
//!
//! Every field has a default, so running without `--config` is the normal
//! case. A settings file only needs the keys it overrides:
//!
//! ```toml
//! install_dir = "/srv/mtproxy"
//!
//! [timing]
//! startup_attempts = 10
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::domain::AppError;

/// Installer settings loaded from an optional TOML file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Directory holding the service configuration and deployment descriptor.
    #[serde(default = "default_install_dir")]
    pub install_dir: PathBuf,
    /// Pinned proxy image reference (`name:tag`).
    #[serde(default = "default_image")]
    pub image: String,
    /// Name given to the managed container.
    #[serde(default = "default_container_name")]
    pub container_name: String,
    /// Official container runtime bootstrap script.
    #[serde(default = "default_runtime_installer_url")]
    pub runtime_installer_url: Url,
    /// Services tried, in order, for the public address of this host.
    #[serde(default = "default_public_ip_endpoints")]
    pub public_ip_endpoints: Vec<Url>,
    /// System services that commonly hold HTTP/TLS ports.
    #[serde(default = "default_competing_services")]
    pub competing_services: Vec<String>,
    /// Lines of service logs shown when startup fails.
    #[serde(default = "default_log_tail_lines")]
    pub log_tail_lines: u32,
    /// Delays and limits for probes.
    #[serde(default)]
    pub timing: TimingSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            install_dir: default_install_dir(),
            image: default_image(),
            container_name: default_container_name(),
            runtime_installer_url: default_runtime_installer_url(),
            public_ip_endpoints: default_public_ip_endpoints(),
            competing_services: default_competing_services(),
            log_tail_lines: default_log_tail_lines(),
            timing: TimingSettings::default(),
        }
    }
}

impl Settings {
    /// Load settings from `path`, or return defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self, AppError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let content = fs::read_to_string(path).map_err(|e| {
            AppError::config_error(format!("Failed to read settings {}: {}", path.display(), e))
        })?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, AppError> {
        let settings: Settings = toml::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if !self.install_dir.is_absolute() {
            return Err(AppError::config_error(format!(
                "install_dir must be an absolute path, got '{}'",
                self.install_dir.display()
            )));
        }
        if self.image.trim().is_empty() || !self.image.contains(':') {
            return Err(AppError::config_error("image must be a pinned 'name:tag' reference"));
        }
        if self.container_name.trim().is_empty() {
            return Err(AppError::config_error("container_name must not be empty"));
        }
        for url in std::iter::once(&self.runtime_installer_url).chain(&self.public_ip_endpoints) {
            if !matches!(url.scheme(), "http" | "https") {
                return Err(AppError::config_error(format!("'{}' must be an http(s) URL", url)));
            }
        }
        self.timing.validate()
    }

    pub fn config_path(&self) -> PathBuf {
        self.install_dir.join(crate::domain::CONFIG_FILE)
    }

    pub fn compose_path(&self) -> PathBuf {
        self.install_dir.join(crate::domain::COMPOSE_FILE)
    }
}

/// Delays and limits, in seconds unless noted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TimingSettings {
    /// Pause after stopping competing services before re-checking the port.
    #[serde(default = "default_reclaim_settle_secs")]
    pub reclaim_settle_secs: u64,
    /// Pause after `compose up` before the first status poll.
    #[serde(default = "default_startup_initial_delay_secs")]
    pub startup_initial_delay_secs: u64,
    /// Number of status polls before startup is declared failed.
    #[serde(default = "default_startup_attempts")]
    pub startup_attempts: u32,
    /// Pause between status polls.
    #[serde(default = "default_startup_interval_secs")]
    pub startup_interval_secs: u64,
    /// Timeout for each HTTP request.
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,
}

impl Default for TimingSettings {
    fn default() -> Self {
        Self {
            reclaim_settle_secs: default_reclaim_settle_secs(),
            startup_initial_delay_secs: default_startup_initial_delay_secs(),
            startup_attempts: default_startup_attempts(),
            startup_interval_secs: default_startup_interval_secs(),
            http_timeout_secs: default_http_timeout_secs(),
        }
    }
}

impl TimingSettings {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.startup_attempts == 0 {
            return Err(AppError::config_error("startup_attempts must be greater than 0"));
        }
        if self.http_timeout_secs == 0 {
            return Err(AppError::config_error("http_timeout_secs must be greater than 0"));
        }
        Ok(())
    }
}

fn default_install_dir() -> PathBuf {
    PathBuf::from("/opt/mtproxy")
}

fn default_image() -> String {
    "ghcr.io/telemt/telemt:3.0.5".to_string()
}

fn default_container_name() -> String {
    "mtproxy".to_string()
}

fn default_runtime_installer_url() -> Url {
    Url::parse("https://get.docker.com").expect("Default installer URL must be valid")
}

fn default_public_ip_endpoints() -> Vec<Url> {
    ["https://api.ipify.org", "https://ifconfig.me/ip", "https://icanhazip.com"]
        .into_iter()
        .map(|url| Url::parse(url).expect("Default IP endpoint must be valid"))
        .collect()
}

fn default_competing_services() -> Vec<String> {
    ["nginx", "apache2", "httpd", "caddy", "haproxy", "lighttpd"]
        .into_iter()
        .map(str::to_string)
        .collect()
}

fn default_log_tail_lines() -> u32 {
    50
}

fn default_reclaim_settle_secs() -> u64 {
    2
}

fn default_startup_initial_delay_secs() -> u64 {
    3
}

fn default_startup_attempts() -> u32 {
    5
}

fn default_startup_interval_secs() -> u64 {
    2
}

fn default_http_timeout_secs() -> u64 {
    5
}
