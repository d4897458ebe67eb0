//! Container runtime and compose capability bootstrap.

use std::io::Write;

use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::app::AppContext;
use crate::app::services::compose::{ComposeInvocation, probe_capability};
use crate::domain::{AppError, CommandSpec, ComposeCapability, HostState, Tolerance};
use crate::ports::{CommandRunner, HttpClient, InputSource, PortProbe};

const PACKAGE_MANAGERS: [&str; 3] = ["apt-get", "dnf", "yum"];
const COMPOSE_PACKAGES: [&str; 3] = ["docker-compose-plugin", "docker-compose-v2", "docker-compose"];

/// Ensure a container runtime and a compose capability are available.
///
/// `host` is the snapshot taken during environment checks; probes are only
/// repeated after something was installed.
pub fn ensure_runtime<R, I, P, H>(
    ctx: &AppContext<R, I, P, H>,
    host: &HostState,
) -> Result<ComposeInvocation, AppError>
where
    R: CommandRunner,
    I: InputSource,
    P: PortProbe,
    H: HttpClient,
{
    let mut capability = host.compose;
    if host.runtime_present {
        println!("✅ Container runtime found");
    } else {
        install_runtime(ctx)?;
        capability = probe(ctx);
    }

    if capability == ComposeCapability::Absent {
        install_compose(ctx);
        capability = probe(ctx);
    }

    let invocation = ComposeInvocation::new(capability, &ctx.settings().compose_path())?;
    println!("✅ Using {}", capability.label());
    Ok(invocation)
}

fn probe<R, I, P, H>(ctx: &AppContext<R, I, P, H>) -> ComposeCapability
where
    R: CommandRunner,
    I: InputSource,
    P: PortProbe,
    H: HttpClient,
{
    let capability = probe_capability(|spec| ctx.execute(spec, Tolerance::Optional).succeeded());
    debug!(capability = capability.label(), "compose probe");
    capability
}

fn install_runtime<R, I, P, H>(ctx: &AppContext<R, I, P, H>) -> Result<(), AppError>
where
    R: CommandRunner,
    I: InputSource,
    P: PortProbe,
    H: HttpClient,
{
    let url = &ctx.settings().runtime_installer_url;
    println!("⏳ Installing container runtime from {}", url);

    let script = ctx.http().get_text(url.as_str())?;
    let file = write_installer(&script)?;
    let path = file.path().to_string_lossy().to_string();
    let result = ctx.execute_required(&CommandSpec::new("sh", [path.as_str()]));
    if let Err(err) = file.close() {
        debug!(%err, %path, "failed to remove installer script");
    }
    result?;

    ctx.execute_required(&CommandSpec::new("systemctl", ["enable", "--now", "docker"]))?;

    let present = ctx.execute(&CommandSpec::new("docker", ["--version"]), Tolerance::Optional);
    if !present.succeeded() {
        return Err(AppError::MissingDependency(
            "container runtime is still unavailable after running the installer".into(),
        ));
    }
    info!("container runtime installed");
    println!("✅ Container runtime installed");
    Ok(())
}

/// Store the downloaded script in a freshly created, owner-only temp file.
///
/// The file is removed when the handle is dropped or closed.
fn write_installer(script: &str) -> Result<NamedTempFile, AppError> {
    let mut file = tempfile::Builder::new()
        .prefix("mtdeploy-runtime-installer-")
        .suffix(".sh")
        .tempfile()?;
    file.write_all(script.as_bytes())?;
    file.flush()?;
    Ok(file)
}

/// Try every known compose package with every available package manager,
/// stopping at the first install that succeeds. All failures are tolerated.
fn install_compose<R, I, P, H>(ctx: &AppContext<R, I, P, H>)
where
    R: CommandRunner,
    I: InputSource,
    P: PortProbe,
    H: HttpClient,
{
    println!("⏳ Installing compose tooling");
    for manager in PACKAGE_MANAGERS.into_iter().filter(|m| ctx.runner().exists(m)) {
        if manager == "apt-get" {
            ctx.execute(&CommandSpec::new(manager, ["update"]), Tolerance::Optional);
        }
        for package in COMPOSE_PACKAGES {
            let spec = CommandSpec::new(manager, ["install", "-y", package]);
            if ctx.execute(&spec, Tolerance::Optional).succeeded() {
                info!(manager, package, "installed compose package");
                return;
            }
        }
    }
}
