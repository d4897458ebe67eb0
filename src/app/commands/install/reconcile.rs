//! Freeing the target port before the service claims it.

use std::collections::BTreeSet;

use tracing::info;

use crate::app::AppContext;
use crate::app::services::artifacts;
use crate::app::services::compose::probe_capability;
use crate::domain::{AppError, CommandSpec, ComposeCapability, HostState, Listener, Tolerance};
use crate::ports::{CommandRunner, HttpClient, InputSource, PortProbe};

/// Process name the container runtime uses for published ports.
pub const RUNTIME_PROXY_PROCESS: &str = "docker-proxy";

/// Result of reconciling the target port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// Nothing was listening; no action taken.
    AlreadyFree,
    /// The port was freed after stopping these services.
    Reclaimed { stopped: Vec<String> },
}

/// Take a fresh snapshot of the host for `port`.
///
/// Competing services are only probed when the port is actually held. The
/// previous install's own published port does not count as held; it is
/// released only after the new plan is confirmed.
pub fn inspect_host<R, I, P, H>(ctx: &AppContext<R, I, P, H>, port: u16) -> Result<HostState, AppError>
where
    R: CommandRunner,
    I: InputSource,
    P: PortProbe,
    H: HttpClient,
{
    let listeners = foreign_listeners(ctx, port)?;
    let competing_services = if listeners.is_empty() {
        BTreeSet::new()
    } else {
        competing_services(ctx, &listeners)
    };

    let runtime_present = ctx.runner().exists("docker");
    let compose = if runtime_present {
        probe_capability(|spec| ctx.execute(spec, Tolerance::Optional).succeeded())
    } else {
        ComposeCapability::Absent
    };

    Ok(HostState { port, listeners, competing_services, runtime_present, compose })
}

/// Listeners on `port`, minus the runtime proxy of a previous install on that port.
fn foreign_listeners<R, I, P, H>(ctx: &AppContext<R, I, P, H>, port: u16) -> Result<Vec<Listener>, AppError>
where
    R: CommandRunner,
    I: InputSource,
    P: PortProbe,
    H: HttpClient,
{
    let mut listeners = ctx.ports().listeners(port)?;
    if previous_install_port(ctx) == Some(port) {
        listeners.retain(|l| l.process != RUNTIME_PROXY_PROCESS);
    }
    Ok(listeners)
}

fn previous_install_port<R, I, P, H>(ctx: &AppContext<R, I, P, H>) -> Option<u16>
where
    R: CommandRunner,
    I: InputSource,
    P: PortProbe,
    H: HttpClient,
{
    let settings = ctx.settings();
    if !settings.compose_path().exists() {
        return None;
    }
    artifacts::read_saved(&settings.config_path()).ok().map(|saved| saved.port)
}

fn competing_services<R, I, P, H>(
    ctx: &AppContext<R, I, P, H>,
    listeners: &[Listener],
) -> BTreeSet<String>
where
    R: CommandRunner,
    I: InputSource,
    P: PortProbe,
    H: HttpClient,
{
    ctx.settings()
        .competing_services
        .iter()
        .filter(|service| {
            listeners.iter().any(|l| &l.process == *service)
                || ctx
                    .execute(
                        &CommandSpec::new("systemctl", ["is-active", "--quiet", service.as_str()]),
                        Tolerance::Optional,
                    )
                    .succeeded()
        })
        .cloned()
        .collect()
}

/// Make sure `host.port` is free, stopping known services with the operator's consent.
///
/// Unknown processes are never killed: if the port is still held after the
/// known services are stopped, the run fails with `PortConflict`.
pub fn reconcile<R, I, P, H>(
    ctx: &AppContext<R, I, P, H>,
    host: &HostState,
) -> Result<ReconcileOutcome, AppError>
where
    R: CommandRunner,
    I: InputSource,
    P: PortProbe,
    H: HttpClient,
{
    let port = host.port;
    if !host.port_in_use() {
        println!("✅ Port {} is free", port);
        return Ok(ReconcileOutcome::AlreadyFree);
    }

    println!("⚠️  Port {} is in use:", port);
    for listener in &host.listeners {
        println!("  • {}", listener);
    }
    if host.competing_services.is_empty() {
        println!("ℹ️ No known web servers found to stop");
    } else {
        let names: Vec<&str> = host.competing_services.iter().map(String::as_str).collect();
        println!("ℹ️ Services that will be stopped and disabled: {}", names.join(", "));
    }

    let prompt = format!("Stop competing services to free port {}?", port);
    if !ctx.input().confirm(&prompt, true)? {
        return Err(AppError::PortConflict { port, owners: host.owners() });
    }

    let mut stopped = Vec::new();
    for service in &host.competing_services {
        let stop = ctx.execute(&CommandSpec::new("systemctl", ["stop", service.as_str()]), Tolerance::Optional);
        ctx.execute(&CommandSpec::new("systemctl", ["disable", service.as_str()]), Tolerance::Optional);
        if stop.succeeded() {
            info!(service = service.as_str(), "stopped competing service");
            stopped.push(service.clone());
        }
    }

    ctx.pause(ctx.settings().timing.reclaim_settle_secs);

    let remaining = foreign_listeners(ctx, port)?;
    if !remaining.is_empty() {
        let owners: BTreeSet<String> = remaining.into_iter().map(|l| l.process).collect();
        return Err(AppError::PortConflict { port, owners: owners.into_iter().collect() });
    }

    println!("✅ Port {} reclaimed", port);
    Ok(ReconcileOutcome::Reclaimed { stopped })
}
