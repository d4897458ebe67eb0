//! Test doubles for the ports.

mod fake_command_runner;
mod fake_http_client;
mod fake_port_probe;
mod scripted_input;

use std::path::Path;

pub use fake_command_runner::FakeCommandRunner;
pub use fake_http_client::FakeHttpClient;
pub use fake_port_probe::FakePortProbe;
pub use scripted_input::ScriptedInput;

use crate::app::AppContext;
use crate::app::config::{Settings, TimingSettings};

pub type TestContext<'a> =
    AppContext<&'a FakeCommandRunner, &'a ScriptedInput, &'a FakePortProbe, &'a FakeHttpClient>;

/// Settings rooted under `root` with every delay disabled.
pub fn test_settings(root: &Path) -> Settings {
    Settings {
        install_dir: root.join("mtproxy"),
        timing: TimingSettings {
            reclaim_settle_secs: 0,
            startup_initial_delay_secs: 0,
            startup_attempts: 2,
            startup_interval_secs: 0,
            http_timeout_secs: 1,
        },
        ..Settings::default()
    }
}

pub fn test_context<'a>(
    runner: &'a FakeCommandRunner,
    input: &'a ScriptedInput,
    ports: &'a FakePortProbe,
    http: &'a FakeHttpClient,
    settings: Settings,
) -> TestContext<'a> {
    AppContext::new(runner, input, ports, http, settings)
}
