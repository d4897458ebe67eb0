//! Operator input captured for one install run.

use std::fmt;

use crate::domain::AppError;

/// Masking domain used when the operator does not choose one.
pub const DEFAULT_TLS_DOMAIN: &str = "www.google.com";

/// Proxy port used when the operator does not choose one.
pub const DEFAULT_PORT: u16 = 443;

const MAX_DOMAIN_LEN: usize = 253;
const MAX_LABEL_LEN: usize = 63;

/// A bare hostname with no scheme, path, or port.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TlsDomain(String);

impl TlsDomain {
    /// Normalize operator input into a bare lowercase hostname.
    ///
    /// Accepts pasted URLs such as `https://example.com/path` and reduces them
    /// to `example.com`.
    pub fn parse(input: &str) -> Result<Self, AppError> {
        let mut host = input.trim();
        if let Some((_, rest)) = host.split_once("://") {
            host = rest;
        }
        if let Some(end) = host.find(['/', '?', '#']) {
            host = &host[..end];
        }
        if let Some((name, port)) = host.rsplit_once(':')
            && !port.is_empty()
            && port.chars().all(|c| c.is_ascii_digit())
        {
            host = name;
        }
        let host = host.strip_suffix('.').unwrap_or(host).to_ascii_lowercase();

        Self::validate(&host)?;
        Ok(Self(host))
    }

    fn validate(host: &str) -> Result<(), AppError> {
        if host.is_empty() {
            return Err(AppError::invalid_input("masking domain", "must not be empty"));
        }
        if host.len() > MAX_DOMAIN_LEN {
            return Err(AppError::invalid_input(
                "masking domain",
                format!("must be at most {} characters", MAX_DOMAIN_LEN),
            ));
        }
        if let Some(bad) = host.chars().find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '.'))
        {
            return Err(AppError::invalid_input(
                "masking domain",
                format!("'{}' contains unsupported character '{}'", host, bad),
            ));
        }
        for label in host.split('.') {
            if label.is_empty() || label.len() > MAX_LABEL_LEN {
                return Err(AppError::invalid_input(
                    "masking domain",
                    format!("'{}' has a label that is empty or longer than {}", host, MAX_LABEL_LEN),
                ));
            }
            if label.starts_with('-') || label.ends_with('-') {
                return Err(AppError::invalid_input(
                    "masking domain",
                    format!("label '{}' must not start or end with '-'", label),
                ));
            }
        }
        Ok(())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TlsDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Validated install parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallRequest {
    pub port: u16,
    pub tls_domain: TlsDomain,
    pub metrics_enabled: bool,
}

/// Parse a port typed by the operator.
pub fn parse_port(input: &str) -> Result<u16, AppError> {
    let trimmed = input.trim();
    let value: u32 = trimmed
        .parse()
        .map_err(|_| AppError::invalid_input("port", format!("'{}' is not a number", trimmed)))?;
    if value == 0 || value > u32::from(u16::MAX) {
        return Err(AppError::invalid_input("port", format!("{} is outside 1-65535", value)));
    }
    Ok(value as u16)
}
