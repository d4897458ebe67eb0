use std::io;

use thiserror::Error;

/// Library-wide error type for mtdeploy operations.
#[derive(Debug, Error)]
pub enum AppError {
    /// Underlying I/O failure.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// Installer settings are invalid or could not be loaded.
    #[error("{0}")]
    Configuration(String),

    /// The process is not running with root privileges.
    #[error("This command must be run as root (try again with sudo)")]
    Privilege,

    /// A host utility required by the installer is not on PATH.
    #[error("Required tool '{0}' is not installed")]
    MissingTool(String),

    /// The target port is still occupied after the confirmed remediation attempt.
    #[error("Port {port} is still in use by {}", owners_display(.owners))]
    PortConflict { port: u16, owners: Vec<String> },

    /// No usable container runtime or compose capability after all fallbacks.
    #[error("Missing dependency: {0}")]
    MissingDependency(String),

    /// The service did not reach a running state within the grace window.
    #[error("Service failed to start: {0}")]
    Startup(String),

    /// The operator declined to proceed.
    #[error("Installation cancelled by operator")]
    Cancelled,

    /// Operator-supplied value failed validation.
    #[error("Invalid {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    /// A tagged secret string could not be decoded.
    #[error("Invalid secret: {0}")]
    InvalidSecret(String),

    /// An operator prompt could not be read.
    #[error("Failed to read '{prompt}': {reason}")]
    Prompt { prompt: String, reason: String },

    /// External command execution failed.
    #[error("{tool} failed: {error}")]
    ExternalToolError { tool: String, error: String },

    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Nothing has been installed at the configured location.
    #[error("No installation found at {0}")]
    NotInstalled(String),

    /// Invariant violated inside mtdeploy itself.
    #[error("Internal error: {0}")]
    Internal(String),

    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

fn owners_display(owners: &[String]) -> String {
    if owners.is_empty() { "an unknown process".to_string() } else { owners.join(", ") }
}

impl AppError {
    pub fn config_error<S: Into<String>>(message: S) -> Self {
        AppError::Configuration(message.into())
    }

    pub fn invalid_input(field: &str, reason: impl Into<String>) -> Self {
        AppError::InvalidInput { field: field.to_string(), reason: reason.into() }
    }

    /// Short label printed in front of fatal errors.
    pub fn label(&self) -> &'static str {
        match self {
            AppError::Privilege => "PrivilegeError",
            AppError::MissingTool(_) => "MissingToolError",
            AppError::PortConflict { .. } => "PortConflictError",
            AppError::MissingDependency(_) => "MissingDependencyError",
            AppError::Startup(_) => "StartupError",
            AppError::Cancelled => "Cancelled",
            AppError::InvalidInput { .. }
            | AppError::InvalidSecret(_)
            | AppError::Prompt { .. } => "InputError",
            AppError::Configuration(_) | AppError::TomlParse(_) => "ConfigurationError",
            AppError::NotInstalled(_) => "NotInstalled",
            AppError::Io(_)
            | AppError::ExternalToolError { .. }
            | AppError::Http(_)
            | AppError::Internal(_) => "Error",
        }
    }
}
