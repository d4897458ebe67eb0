pub mod command;
pub mod connection;
pub mod error;
pub mod health;
pub mod host_state;
pub mod install_request;
pub mod secret;
pub mod service_config;
pub mod state;

pub use command::{CommandOutcome, CommandOutput, CommandSpec, Tolerance};
pub use connection::{ConnectionReport, ManagementCommand, UNKNOWN_SERVER_IP};
pub use error::AppError;
pub use health::{HealthReport, HealthWarning, ServiceStatus};
pub use host_state::{ComposeCapability, HostState, Listener};
pub use install_request::{DEFAULT_PORT, DEFAULT_TLS_DOMAIN, InstallRequest, TlsDomain, parse_port};
pub use secret::{FAKE_TLS_TAG, FULL_SECRET_PREFIX_LEN, Secret};
pub use service_config::{
    COMPOSE_FILE, CONFIG_FILE, FAKE_CERT_LEN, MASK_PORT, METRICS_ALLOWLIST, METRICS_PORT,
    PROXY_USERNAME, ServiceConfig,
};
pub use state::InstallState;
