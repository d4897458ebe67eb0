use crate::domain::{InstallRequest, Secret, TlsDomain};

/// Metrics endpoint port inside the container and on the loopback interface.
pub const METRICS_PORT: u16 = 9090;

/// Port of the masking domain the proxy forwards unrecognized clients to.
pub const MASK_PORT: u16 = 443;

/// Certificate length the proxy fakes during the TLS handshake.
pub const FAKE_CERT_LEN: u32 = 2048;

/// Username the credential is registered under.
pub const PROXY_USERNAME: &str = "proxy";

/// Addresses allowed to scrape metrics.
pub const METRICS_ALLOWLIST: [&str; 2] = ["127.0.0.1", "::1"];

/// File name of the service configuration inside the install directory.
pub const CONFIG_FILE: &str = "config.toml";

/// File name of the deployment descriptor inside the install directory.
pub const COMPOSE_FILE: &str = "docker-compose.yml";

/// Everything needed to render the service artifacts for one install.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub port: u16,
    pub metrics_enabled: bool,
    pub secret: Secret,
    pub image: String,
    pub container_name: String,
}

impl ServiceConfig {
    pub fn new(request: &InstallRequest, secret: Secret, image: &str, container_name: &str) -> Self {
        Self {
            port: request.port,
            metrics_enabled: request.metrics_enabled,
            secret,
            image: image.to_string(),
            container_name: container_name.to_string(),
        }
    }

    pub fn tls_domain(&self) -> &TlsDomain {
        self.secret.domain()
    }

    /// Loopback URL of the metrics endpoint, when enabled.
    pub fn metrics_url(&self) -> Option<String> {
        self.metrics_enabled.then(|| format!("http://127.0.0.1:{}/metrics", METRICS_PORT))
    }
}
