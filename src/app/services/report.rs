//! Connection report assembly.

use std::net::IpAddr;
use std::path::Path;

use tracing::debug;
use url::Url;

use crate::app::services::compose::ComposeInvocation;
use crate::domain::{
    ConnectionReport, HealthWarning, ManagementCommand, ServiceConfig, UNKNOWN_SERVER_IP,
};
use crate::ports::HttpClient;

/// Ask each endpoint in turn for this host's public address.
///
/// The first body that parses as an IP address wins. The error lists why
/// every endpoint failed.
pub fn lookup_public_ip(http: &impl HttpClient, endpoints: &[Url]) -> Result<IpAddr, String> {
    let mut failures = Vec::new();
    for endpoint in endpoints {
        match http.get_text(endpoint.as_str()) {
            Ok(body) => match body.trim().parse::<IpAddr>() {
                Ok(ip) => return Ok(ip),
                Err(_) => failures.push(format!("{} returned '{}'", endpoint, body.trim())),
            },
            Err(err) => failures.push(err.to_string()),
        }
    }
    if failures.is_empty() {
        return Err("no public IP endpoints configured".to_string());
    }
    debug!(?failures, "public IP lookup failed");
    Err(failures.join("; "))
}

/// Management commands in the resolved compose form.
pub fn management_commands(compose: &ComposeInvocation) -> Vec<ManagementCommand> {
    [("View logs", "logs -f"), ("Restart", "restart"), ("Stop", "down")]
        .into_iter()
        .map(|(label, args)| ManagementCommand { label, command: compose.shell_command(args) })
        .collect()
}

/// Build the operator-facing report, falling back to a placeholder address.
pub fn build_report(
    config: &ServiceConfig,
    management: Vec<ManagementCommand>,
    install_dir: &Path,
    public_ip: Result<IpAddr, String>,
    mut warnings: Vec<HealthWarning>,
) -> ConnectionReport {
    let server = match public_ip {
        Ok(ip) => ip.to_string(),
        Err(reason) => {
            warnings.push(HealthWarning::PublicIpUnknown(reason));
            UNKNOWN_SERVER_IP.to_string()
        }
    };
    ConnectionReport {
        server,
        port: config.port,
        secret: config.secret.full(),
        tls_domain: config.tls_domain().to_string(),
        metrics_url: config.metrics_url(),
        install_dir: install_dir.to_path_buf(),
        management,
        warnings,
    }
}
