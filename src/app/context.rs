use std::thread;
use std::time::Duration;

use tracing::debug;

use crate::app::config::Settings;
use crate::domain::{AppError, CommandOutcome, CommandSpec, Tolerance};
use crate::ports::{CommandRunner, HttpClient, InputSource, PortProbe};

/// Application context holding dependencies for command execution.
pub struct AppContext<R, I, P, H> {
    runner: R,
    input: I,
    ports: P,
    http: H,
    settings: Settings,
}

impl<R, I, P, H> AppContext<R, I, P, H>
where
    R: CommandRunner,
    I: InputSource,
    P: PortProbe,
    H: HttpClient,
{
    /// Create a new application context.
    pub fn new(runner: R, input: I, ports: P, http: H, settings: Settings) -> Self {
        Self { runner, input, ports, http, settings }
    }

    /// Get a reference to the command runner.
    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Get a reference to the operator input source.
    pub fn input(&self) -> &I {
        &self.input
    }

    /// Get a reference to the socket table probe.
    pub fn ports(&self) -> &P {
        &self.ports
    }

    /// Get a reference to the HTTP client.
    pub fn http(&self) -> &H {
        &self.http
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Run `spec`, applying the caller's tolerance to any failure.
    pub fn execute(&self, spec: &CommandSpec, tolerance: Tolerance) -> CommandOutcome {
        let outcome = CommandOutcome::classify(spec, self.runner.run(spec), tolerance);
        if let CommandOutcome::FailedTolerated { command, reason } = &outcome {
            debug!(%command, %reason, "ignoring failure of optional command");
        }
        outcome
    }

    /// Run a command whose failure aborts the current operation.
    pub fn execute_required(&self, spec: &CommandSpec) -> Result<String, AppError> {
        let output = self.execute(spec, Tolerance::Required).into_result()?;
        Ok(output.map(|o| o.stdout).unwrap_or_default())
    }

    /// Block for a fixed number of seconds.
    pub fn pause(&self, secs: u64) {
        if secs > 0 {
            debug!(secs, "waiting");
            thread::sleep(Duration::from_secs(secs));
        }
    }
}
