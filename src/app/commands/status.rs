use std::io::ErrorKind;

use crate::app::AppContext;
use crate::app::services::compose::{ComposeInvocation, probe_capability};
use crate::app::services::{artifacts, lifecycle, report};
use crate::domain::{
    AppError, ConnectionReport, InstallRequest, ServiceConfig, ServiceStatus, Tolerance,
};
use crate::ports::{CommandRunner, HttpClient, InputSource, PortProbe};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusOutcome {
    pub service: ServiceStatus,
    pub connection: ConnectionReport,
}

/// Report the service state and the links of the saved install. Read-only.
pub fn execute<R, I, P, H>(ctx: &AppContext<R, I, P, H>) -> Result<StatusOutcome, AppError>
where
    R: CommandRunner,
    I: InputSource,
    P: PortProbe,
    H: HttpClient,
{
    let settings = ctx.settings();
    let config_path = settings.config_path();
    if !config_path.exists() {
        return Err(AppError::NotInstalled(settings.install_dir.display().to_string()));
    }
    let saved = match artifacts::read_saved(&config_path) {
        Err(AppError::Io(err)) if err.kind() == ErrorKind::PermissionDenied => {
            return Err(AppError::Privilege);
        }
        other => other?,
    };

    let request = InstallRequest {
        port: saved.port,
        tls_domain: saved.secret.domain().clone(),
        metrics_enabled: saved.metrics_enabled,
    };
    let config = ServiceConfig::new(&request, saved.secret, &settings.image, &settings.container_name);

    let service = lifecycle::status(ctx);
    let management = if ctx.runner().exists("docker") {
        let capability =
            probe_capability(|spec| ctx.execute(spec, Tolerance::Optional).succeeded());
        ComposeInvocation::new(capability, &settings.compose_path())
            .map(|compose| report::management_commands(&compose))
            .unwrap_or_default()
    } else {
        Vec::new()
    };

    let public_ip = report::lookup_public_ip(ctx.http(), &settings.public_ip_endpoints);
    let connection =
        report::build_report(&config, management, &settings.install_dir, public_ip, Vec::new());
    Ok(StatusOutcome { service, connection })
}
