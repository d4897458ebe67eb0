//! Start, verify, inspect, and tear down the managed service.

use std::fs;

use tracing::{debug, info, warn};

use crate::app::AppContext;
use crate::app::services::compose::{ComposeInvocation, probe_capability, reports_running};
use crate::domain::{
    AppError, CommandSpec, HealthReport, HealthWarning, ServiceConfig, ServiceStatus, Tolerance,
};
use crate::ports::{CommandRunner, HttpClient, InputSource, PortProbe};

/// Pull the image, bring the service up, and wait until it runs.
pub fn start<R, I, P, H>(
    ctx: &AppContext<R, I, P, H>,
    compose: &ComposeInvocation,
    port: u16,
) -> Result<(), AppError>
where
    R: CommandRunner,
    I: InputSource,
    P: PortProbe,
    H: HttpClient,
{
    let timing = &ctx.settings().timing;

    println!("⏳ Pulling {}", ctx.settings().image);
    ctx.execute_required(&compose.command(["pull"]))?;
    println!("⏳ Starting service");
    ctx.execute_required(&compose.command(["up", "-d"]))?;

    ctx.pause(timing.startup_initial_delay_secs);
    for attempt in 1..=timing.startup_attempts {
        if is_up(ctx, compose, port) {
            info!(attempt, "service is running");
            return Ok(());
        }
        debug!(attempt, "service not running yet");
        if attempt < timing.startup_attempts {
            ctx.pause(timing.startup_interval_secs);
        }
    }

    let tail = ctx.settings().log_tail_lines.to_string();
    let logs = ctx.execute(&compose.command(["logs", "--tail", tail.as_str()]), Tolerance::Optional);
    eprintln!("❌ Service did not start. Recent logs:");
    match logs.output() {
        Some(output) if !output.stdout.is_empty() || !output.stderr.is_empty() => {
            for line in output.stdout.lines().chain(output.stderr.lines()) {
                eprintln!("    {}", line);
            }
        }
        _ => eprintln!("    (no logs available)"),
    }

    Err(AppError::Startup(format!(
        "container is not running and port {} is not listening after {} checks",
        port, timing.startup_attempts
    )))
}

// Status text differs between compose implementations, so a listening port also counts.
fn is_up<R, I, P, H>(ctx: &AppContext<R, I, P, H>, compose: &ComposeInvocation, port: u16) -> bool
where
    R: CommandRunner,
    I: InputSource,
    P: PortProbe,
    H: HttpClient,
{
    for args in [vec!["ps", "--format", "json"], vec!["ps"]] {
        let outcome = ctx.execute(&compose.command(args), Tolerance::Optional);
        if outcome.output().is_some_and(|o| reports_running(&o.stdout)) {
            return true;
        }
    }
    ctx.ports().is_listening(port).unwrap_or_else(|err| {
        debug!(%err, "port probe failed");
        false
    })
}

/// Post-start probes. Failures are reported as warnings, never as errors.
pub fn verify<R, I, P, H>(ctx: &AppContext<R, I, P, H>, config: &ServiceConfig) -> HealthReport
where
    R: CommandRunner,
    I: InputSource,
    P: PortProbe,
    H: HttpClient,
{
    let mut report = HealthReport::default();

    match ctx.ports().is_listening(config.port) {
        Ok(true) => {}
        Ok(false) => report.push(HealthWarning::PortNotListening(config.port)),
        Err(err) => {
            debug!(%err, "port probe failed");
            report.push(HealthWarning::PortNotListening(config.port));
        }
    }

    if let Some(url) = config.metrics_url()
        && let Err(err) = ctx.http().get_text(&url)
    {
        report.push(HealthWarning::MetricsUnreachable { url, reason: err.to_string() });
    }

    for warning in &report.warnings {
        warn!(%warning, "health check");
    }
    report
}

/// Current state of the managed container.
pub fn status<R, I, P, H>(ctx: &AppContext<R, I, P, H>) -> ServiceStatus
where
    R: CommandRunner,
    I: InputSource,
    P: PortProbe,
    H: HttpClient,
{
    if !ctx.runner().exists("docker") {
        return ServiceStatus::Absent;
    }
    let spec = CommandSpec::new(
        "docker",
        ["inspect", "-f", "{{.State.Status}}", ctx.settings().container_name.as_str()],
    );
    match ctx.execute(&spec, Tolerance::Optional).output() {
        Some(output) if output.stdout.trim() == "running" => ServiceStatus::Running,
        Some(_) => ServiceStatus::Stopped,
        None => ServiceStatus::Absent,
    }
}

/// What a teardown found and removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StopOutcome {
    /// An install directory existed before teardown.
    pub was_installed: bool,
    /// The managed container existed and is gone now.
    pub removed_container: bool,
    pub removed_dir: bool,
    pub warnings: Vec<String>,
}

/// Tear the service down. Safe to call when nothing is installed.
pub fn stop<R, I, P, H>(ctx: &AppContext<R, I, P, H>, remove_data: bool) -> StopOutcome
where
    R: CommandRunner,
    I: InputSource,
    P: PortProbe,
    H: HttpClient,
{
    let settings = ctx.settings();
    let mut outcome =
        StopOutcome { was_installed: settings.install_dir.exists(), ..StopOutcome::default() };

    if ctx.runner().exists("docker") {
        let had_container = status(ctx) != ServiceStatus::Absent;
        let mut down = false;
        let compose_path = settings.compose_path();
        if compose_path.exists() {
            let capability =
                probe_capability(|spec| ctx.execute(spec, Tolerance::Optional).succeeded());
            if let Ok(compose) = ComposeInvocation::new(capability, &compose_path) {
                down = ctx
                    .execute(&compose.command(["down", "--remove-orphans"]), Tolerance::Optional)
                    .succeeded();
            }
        }
        let removed = ctx
            .execute(
                &CommandSpec::new("docker", ["rm", "-f", settings.container_name.as_str()]),
                Tolerance::Optional,
            )
            .succeeded();
        outcome.removed_container = had_container && (down || removed);
    }

    if remove_data && outcome.was_installed {
        match fs::remove_dir_all(&settings.install_dir) {
            Ok(()) => outcome.removed_dir = true,
            Err(err) => outcome.warnings.push(format!(
                "Failed to remove {}: {}",
                settings.install_dir.display(),
                err
            )),
        }
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        ComposeCapability, CommandOutput, InstallRequest, Listener, Secret, TlsDomain,
    };
    use crate::testing::{
        FakeCommandRunner, FakeHttpClient, FakePortProbe, ScriptedInput, test_context,
        test_settings,
    };
    use rand::rngs::OsRng;
    use tempfile::TempDir;

    fn compose_for(dir: &TempDir) -> ComposeInvocation {
        ComposeInvocation::new(
            ComposeCapability::Plugin,
            &test_settings(dir.path()).compose_path(),
        )
        .unwrap()
    }

    fn service_config(metrics_enabled: bool) -> ServiceConfig {
        let domain = TlsDomain::parse("example.com").unwrap();
        let request = InstallRequest { port: 443, tls_domain: domain.clone(), metrics_enabled };
        ServiceConfig::new(&request, Secret::generate(domain, &mut OsRng), "img:1", "mtproxy")
    }

    #[test]
    fn start_succeeds_when_compose_reports_running() {
        let dir = TempDir::new().unwrap();
        let runner = FakeCommandRunner::new();
        runner.respond("docker compose ps --format json", CommandOutput::success(r#"[{"State":"running"}]"#));
        let (input, ports, http) = (ScriptedInput::new(), FakePortProbe::free(), FakeHttpClient::new());
        let ctx = test_context(&runner, &input, &ports, &http, test_settings(dir.path()));

        start(&ctx, &compose_for(&dir), 443).unwrap();

        let calls = runner.calls();
        assert!(calls[0].ends_with("pull"));
        assert!(calls[1].ends_with("up -d"));
        assert!(ports.queries().is_empty());
    }

    #[test]
    fn start_falls_back_to_listening_port() {
        let dir = TempDir::new().unwrap();
        let runner = FakeCommandRunner::new();
        runner.respond("docker compose ps", CommandOutput::success("garbled"));
        let ports = FakePortProbe::free().then_held_by("telemt");
        let (input, http) = (ScriptedInput::new(), FakeHttpClient::new());
        let ctx = test_context(&runner, &input, &ports, &http, test_settings(dir.path()));

        assert!(start(&ctx, &compose_for(&dir), 443).is_ok());
        assert_eq!(ports.queries(), vec![443]);
    }

    #[test]
    fn start_fails_with_logs_after_grace_period() {
        let dir = TempDir::new().unwrap();
        let runner = FakeCommandRunner::new();
        runner.respond("docker compose logs", CommandOutput::success("panic: bad config"));
        let (input, ports, http) = (ScriptedInput::new(), FakePortProbe::free(), FakeHttpClient::new());
        let ctx = test_context(&runner, &input, &ports, &http, test_settings(dir.path()));

        let err = start(&ctx, &compose_for(&dir), 443).unwrap_err();
        assert!(matches!(err, AppError::Startup(_)));
        assert_eq!(runner.calls_matching("docker compose logs --tail 50").len(), 1);
        assert_eq!(ports.queries().len(), 2);
    }

    #[test]
    fn start_aborts_when_up_fails() {
        let dir = TempDir::new().unwrap();
        let runner = FakeCommandRunner::new();
        runner.respond("docker compose up", CommandOutput::failure(1, "port is already allocated"));
        let (input, ports, http) = (ScriptedInput::new(), FakePortProbe::free(), FakeHttpClient::new());
        let ctx = test_context(&runner, &input, &ports, &http, test_settings(dir.path()));

        let err = start(&ctx, &compose_for(&dir), 443).unwrap_err();
        assert!(err.to_string().contains("port is already allocated"));
        assert!(runner.calls_matching("docker compose ps").is_empty());
    }

    #[test]
    fn verify_reports_warnings_without_failing() {
        let dir = TempDir::new().unwrap();
        let runner = FakeCommandRunner::new();
        let (input, ports, http) = (ScriptedInput::new(), FakePortProbe::free(), FakeHttpClient::new());
        let ctx = test_context(&runner, &input, &ports, &http, test_settings(dir.path()));

        let report = verify(&ctx, &service_config(true));
        assert_eq!(report.warnings.len(), 2);
        assert!(matches!(report.warnings[0], HealthWarning::PortNotListening(443)));
        assert!(matches!(report.warnings[1], HealthWarning::MetricsUnreachable { .. }));
    }

    #[test]
    fn verify_probes_metrics_only_when_enabled() {
        let dir = TempDir::new().unwrap();
        let runner = FakeCommandRunner::new();
        let ports = FakePortProbe::free().then(vec![Listener { process: "telemt".into(), pid: None }]);
        let http = FakeHttpClient::new().with_body("http://127.0.0.1:9090/metrics", "up 1");
        let input = ScriptedInput::new();
        let ctx = test_context(&runner, &input, &ports, &http, test_settings(dir.path()));

        assert!(verify(&ctx, &service_config(false)).is_healthy());
        assert!(http.requests().is_empty());
        assert!(verify(&ctx, &service_config(true)).is_healthy());
        assert_eq!(http.requests(), vec!["http://127.0.0.1:9090/metrics".to_string()]);
    }

    #[test]
    fn stop_without_install_is_a_noop() {
        let dir = TempDir::new().unwrap();
        let runner = FakeCommandRunner::new();
        let (input, ports, http) = (ScriptedInput::new(), FakePortProbe::free(), FakeHttpClient::new());
        let ctx = test_context(&runner, &input, &ports, &http, test_settings(dir.path()));

        let first = stop(&ctx, true);
        let second = stop(&ctx, true);
        assert_eq!(first, StopOutcome::default());
        assert_eq!(second, StopOutcome::default());
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn stop_tears_down_and_removes_directory() {
        let dir = TempDir::new().unwrap();
        let settings = test_settings(dir.path());
        fs::create_dir_all(&settings.install_dir).unwrap();
        fs::write(settings.compose_path(), "services: {}\n").unwrap();

        let runner = FakeCommandRunner::new().with_programs(&["docker"]);
        runner.respond("docker compose down", CommandOutput::failure(1, "no such project"));
        runner.respond("docker rm", CommandOutput::failure(1, "No such container: mtproxy"));
        let (input, ports, http) = (ScriptedInput::new(), FakePortProbe::free(), FakeHttpClient::new());
        let install_dir = settings.install_dir.clone();
        let ctx = test_context(&runner, &input, &ports, &http, settings);

        let outcome = stop(&ctx, true);
        assert!(outcome.was_installed);
        assert!(!outcome.removed_container);
        assert!(outcome.removed_dir);
        assert!(!install_dir.exists());
        assert_eq!(runner.calls_matching("docker compose down --remove-orphans").len(), 1);
        assert_eq!(runner.calls_matching("docker rm -f mtproxy").len(), 1);
    }

    #[test]
    fn status_reads_container_state() {
        let dir = TempDir::new().unwrap();
        let runner = FakeCommandRunner::new().with_programs(&["docker"]);
        runner.respond("docker inspect", CommandOutput::success("running"));
        runner.respond("docker inspect", CommandOutput::success("exited"));
        runner.respond("docker inspect", CommandOutput::failure(1, "No such object: mtproxy"));
        let (input, ports, http) = (ScriptedInput::new(), FakePortProbe::free(), FakeHttpClient::new());
        let ctx = test_context(&runner, &input, &ports, &http, test_settings(dir.path()));

        assert_eq!(status(&ctx), ServiceStatus::Running);
        assert_eq!(status(&ctx), ServiceStatus::Stopped);
        assert_eq!(status(&ctx), ServiceStatus::Absent);
    }

    #[test]
    fn stop_removes_orphaned_container_without_install_dir() {
        let dir = TempDir::new().unwrap();
        let runner = FakeCommandRunner::new().with_programs(&["docker"]);
        runner.respond("docker inspect", CommandOutput::success("running"));
        let (input, ports, http) = (ScriptedInput::new(), FakePortProbe::free(), FakeHttpClient::new());
        let ctx = test_context(&runner, &input, &ports, &http, test_settings(dir.path()));

        let outcome = stop(&ctx, true);

        assert!(!outcome.was_installed);
        assert!(outcome.removed_container);
        assert!(!outcome.removed_dir);
        assert!(runner.calls_matching("docker compose").is_empty());
        assert_eq!(runner.calls_matching("docker rm -f mtproxy").len(), 1);
    }

    #[test]
    fn stop_reports_no_container_when_none_existed() {
        let dir = TempDir::new().unwrap();
        let runner = FakeCommandRunner::new().with_programs(&["docker"]);
        runner.respond("docker inspect", CommandOutput::failure(1, "No such object: mtproxy"));
        runner.respond("docker rm", CommandOutput::failure(1, "No such container: mtproxy"));
        let (input, ports, http) = (ScriptedInput::new(), FakePortProbe::free(), FakeHttpClient::new());
        let ctx = test_context(&runner, &input, &ports, &http, test_settings(dir.path()));

        assert_eq!(stop(&ctx, true), StopOutcome::default());
    }
}
