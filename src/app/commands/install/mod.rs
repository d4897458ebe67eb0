//! The install pipeline.
//!
//! Each `Stage` variant carries what the following step needs, and `advance`
//! moves exactly one step forward. The first error ends the run; nothing is
//! persisted between runs, so a failed install is simply run again.

pub mod reconcile;
pub mod runtime;

use rand::rngs::OsRng;
use tracing::info;

use crate::app::AppContext;
use crate::app::commands::preflight;
use crate::app::services::compose::ComposeInvocation;
use crate::app::services::{artifacts, lifecycle, report};
use crate::domain::{
    AppError, ConnectionReport, DEFAULT_PORT, DEFAULT_TLS_DOMAIN, HealthReport, HostState,
    InstallRequest, InstallState, METRICS_PORT, Secret, ServiceConfig, TlsDomain, parse_port,
};
use crate::ports::{CommandRunner, HttpClient, InputSource, PortProbe};

use reconcile::{inspect_host, reconcile};

/// Values preselected on the command line. They become prompt defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallOptions {
    pub port: Option<u16>,
    pub domain: Option<String>,
    pub metrics: bool,
}

enum Stage {
    Start,
    EnvironmentChecked { host: HostState },
    RuntimeReady { reconciled_port: u16, compose: ComposeInvocation },
    Configured { compose: ComposeInvocation, config: ServiceConfig },
    FilesWritten { compose: ComposeInvocation, config: ServiceConfig },
    ServiceRunning { compose: ComposeInvocation, config: ServiceConfig },
    Verified { compose: ComposeInvocation, config: ServiceConfig, health: HealthReport },
    Reported(ConnectionReport),
}

impl Stage {
    fn state(&self) -> InstallState {
        match self {
            Stage::Start => InstallState::Start,
            Stage::EnvironmentChecked { .. } => InstallState::EnvironmentChecked,
            Stage::RuntimeReady { .. } => InstallState::RuntimeReady,
            Stage::Configured { .. } => InstallState::Configured,
            Stage::FilesWritten { .. } => InstallState::FilesWritten,
            Stage::ServiceRunning { .. } => InstallState::ServiceRunning,
            Stage::Verified { .. } => InstallState::Verified,
            Stage::Reported(_) => InstallState::Reported,
        }
    }
}

/// Run the whole pipeline and return the connection report.
pub fn execute<R, I, P, H>(
    ctx: &AppContext<R, I, P, H>,
    options: &InstallOptions,
) -> Result<ConnectionReport, AppError>
where
    R: CommandRunner,
    I: InputSource,
    P: PortProbe,
    H: HttpClient,
{
    let mut stage = Stage::Start;
    loop {
        let from = stage.state();
        stage = advance(ctx, options, stage)?;
        let to = stage.state();
        debug_assert_eq!(from.next(), Some(to));
        info!(from = %from, to = %to, "install state advanced");
        if let Stage::Reported(report) = stage {
            return Ok(report);
        }
    }
}

fn advance<R, I, P, H>(
    ctx: &AppContext<R, I, P, H>,
    options: &InstallOptions,
    stage: Stage,
) -> Result<Stage, AppError>
where
    R: CommandRunner,
    I: InputSource,
    P: PortProbe,
    H: HttpClient,
{
    match stage {
        Stage::Start => {
            preflight::require_root(ctx)?;
            preflight::require_tools(ctx)?;
            let host = inspect_host(ctx, options.port.unwrap_or(DEFAULT_PORT))?;
            reconcile(ctx, &host)?;
            Ok(Stage::EnvironmentChecked { host })
        }
        Stage::EnvironmentChecked { host } => {
            let compose = runtime::ensure_runtime(ctx, &host)?;
            Ok(Stage::RuntimeReady { reconciled_port: host.port, compose })
        }
        Stage::RuntimeReady { reconciled_port, compose } => {
            let config = configure(ctx, options, reconciled_port)?;
            Ok(Stage::Configured { compose, config })
        }
        Stage::Configured { compose, config } => {
            let rendered = artifacts::render(&config)?;
            release_previous_install(ctx);
            artifacts::write(&ctx.settings().install_dir, &rendered)?;
            println!("✅ Wrote configuration to {}", ctx.settings().install_dir.display());
            Ok(Stage::FilesWritten { compose, config })
        }
        Stage::FilesWritten { compose, config } => {
            lifecycle::start(ctx, &compose, config.port)?;
            println!("✅ Service is running");
            Ok(Stage::ServiceRunning { compose, config })
        }
        Stage::ServiceRunning { compose, config } => {
            let health = lifecycle::verify(ctx, &config);
            Ok(Stage::Verified { compose, config, health })
        }
        Stage::Verified { compose, config, health } => {
            let settings = ctx.settings();
            let public_ip = report::lookup_public_ip(ctx.http(), &settings.public_ip_endpoints);
            Ok(Stage::Reported(report::build_report(
                &config,
                report::management_commands(&compose),
                &settings.install_dir,
                public_ip,
                health.warnings,
            )))
        }
        Stage::Reported(report) => Ok(Stage::Reported(report)),
    }
}

/// Answers accepted per prompt before the run gives up.
const PROMPT_ATTEMPTS: usize = 3;

// Only runs once the new plan is confirmed and rendered.
fn release_previous_install<R, I, P, H>(ctx: &AppContext<R, I, P, H>)
where
    R: CommandRunner,
    I: InputSource,
    P: PortProbe,
    H: HttpClient,
{
    if ctx.settings().compose_path().exists() {
        println!("ℹ️ Existing installation found, stopping it before reconfiguring");
        lifecycle::stop(ctx, false);
    }
}

fn configure<R, I, P, H>(
    ctx: &AppContext<R, I, P, H>,
    options: &InstallOptions,
    reconciled_port: u16,
) -> Result<ServiceConfig, AppError>
where
    R: CommandRunner,
    I: InputSource,
    P: PortProbe,
    H: HttpClient,
{
    let input = ctx.input();
    let port = ask(input, "Proxy port", &reconciled_port.to_string(), parse_port)?;
    let domain_default = options.domain.as_deref().unwrap_or(DEFAULT_TLS_DOMAIN);
    let tls_domain = ask(input, "Masking domain (TLS)", domain_default, TlsDomain::parse)?;
    let metrics_enabled = input.confirm(
        &format!("Expose metrics on 127.0.0.1:{}?", METRICS_PORT),
        options.metrics,
    )?;

    if port != reconciled_port {
        reconcile(ctx, &inspect_host(ctx, port)?)?;
    }

    println!();
    println!("📋 Installation plan:");
    println!("  Port:           {}", port);
    println!("  Masking domain: {}", tls_domain);
    println!("  Metrics:        {}", if metrics_enabled { "enabled (loopback only)" } else { "disabled" });
    println!("  Image:          {}", ctx.settings().image);
    println!("  Install dir:    {}", ctx.settings().install_dir.display());
    if !input.confirm("Proceed with installation?", true)? {
        return Err(AppError::Cancelled);
    }

    let request = InstallRequest { port, tls_domain, metrics_enabled };
    let secret = Secret::generate(request.tls_domain.clone(), &mut OsRng);
    let settings = ctx.settings();
    Ok(ServiceConfig::new(&request, secret, &settings.image, &settings.container_name))
}

/// Ask until `parse` accepts the answer, giving up after `PROMPT_ATTEMPTS`.
fn ask<T>(
    input: &impl InputSource,
    prompt: &str,
    default: &str,
    parse: impl Fn(&str) -> Result<T, AppError>,
) -> Result<T, AppError> {
    let mut attempt = 1;
    loop {
        match parse(&input.text(prompt, default)?) {
            Ok(value) => return Ok(value),
            Err(err) if attempt < PROMPT_ATTEMPTS => {
                println!("⚠️  {}", err);
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}
