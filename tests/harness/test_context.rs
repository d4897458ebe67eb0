//! Shared testing harness for `mtdeploy` integration tests.

use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Isolated settings and install directory for CLI exercises.
///
/// Settings point at a throwaway install directory, a container name no real
/// deployment uses, and a public IP endpoint that refuses connections.
pub(crate) struct TestContext {
    root: TempDir,
    settings_path: PathBuf,
}

impl TestContext {
    pub(crate) fn new() -> Self {
        let root = TempDir::new().expect("Failed to create temp directory for tests");
        let settings_path = root.path().join("mtdeploy.toml");
        let content = format!(
            r#"install_dir = "{}"
container_name = "mtdeploy-test-{}"
public_ip_endpoints = ["http://127.0.0.1:9/"]

[timing]
http_timeout_secs = 1
"#,
            root.path().join("mtproxy").display(),
            std::process::id()
        );
        fs::write(&settings_path, content).expect("Failed to write test settings");
        Self { root, settings_path }
    }

    /// Directory the CLI treats as the install location.
    pub(crate) fn install_dir(&self) -> PathBuf {
        self.root.path().join("mtproxy")
    }

    pub(crate) fn settings_path(&self) -> &Path {
        &self.settings_path
    }

    /// Build a command for the compiled binary, bound to the test settings.
    pub(crate) fn cli(&self) -> Command {
        let mut cmd = Command::cargo_bin("mtdeploy").expect("Failed to locate mtdeploy binary");
        cmd.arg("--config").arg(&self.settings_path).env_remove("MTDEPLOY_LOG");
        cmd
    }

    /// Write a configuration artifact as a previous install would have left it.
    pub(crate) fn write_saved_config(&self, port: u16, tls_domain: &str, raw_secret: &str) {
        fs::create_dir_all(self.install_dir()).expect("Failed to create install dir");
        let content = format!(
            r#"[server]
port = {}
listen_addr_ipv4 = "0.0.0.0"

[censorship]
tls_domain = "{}"
mask = true

[access.users]
proxy = "{}"
"#,
            port, tls_domain, raw_secret
        );
        fs::write(self.install_dir().join("config.toml"), content)
            .expect("Failed to write saved config");
    }

    /// Whether the test process runs as root, as reported by `id -u`.
    pub(crate) fn running_as_root() -> bool {
        std::process::Command::new("id")
            .arg("-u")
            .output()
            .map(|out| String::from_utf8_lossy(&out.stdout).trim() == "0")
            .unwrap_or(false)
    }
}
