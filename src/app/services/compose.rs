//! Invoking the compose tooling against the managed deployment descriptor.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::domain::{AppError, ComposeCapability, CommandSpec};

/// A resolved way to run compose commands against one descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposeInvocation {
    capability: ComposeCapability,
    file: PathBuf,
}

impl ComposeInvocation {
    /// Bind a capability to the descriptor at `file`.
    ///
    /// Fails for `ComposeCapability::Absent`, so holding an invocation proves a
    /// usable compose command was found.
    pub fn new(capability: ComposeCapability, file: &Path) -> Result<Self, AppError> {
        if capability == ComposeCapability::Absent {
            return Err(AppError::MissingDependency(
                "no docker compose plugin or docker-compose binary available".into(),
            ));
        }
        Ok(Self { capability, file: file.to_path_buf() })
    }

    pub fn capability(&self) -> ComposeCapability {
        self.capability
    }

    /// `<compose> -f <file> <args...>`
    pub fn command<I, S>(&self, args: I) -> CommandSpec
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let file = self.file.to_string_lossy().to_string();
        let base = match self.capability {
            ComposeCapability::Standalone => CommandSpec::new("docker-compose", ["-f".to_string(), file]),
            ComposeCapability::Plugin | ComposeCapability::Absent => {
                CommandSpec::new("docker", ["compose".to_string(), "-f".to_string(), file])
            }
        };
        base.with_args(args)
    }

    /// Shell form of a compose subcommand, for display to the operator.
    pub fn shell_command(&self, args: &str) -> String {
        let dir = self.file.parent().map(|p| p.display().to_string()).unwrap_or_else(|| ".".into());
        let program = match self.capability {
            ComposeCapability::Standalone => "docker-compose",
            ComposeCapability::Plugin | ComposeCapability::Absent => "docker compose",
        };
        format!("cd {} && {} {}", dir, program, args)
    }
}

/// Probe which compose capability is usable, without installing anything.
pub fn probe_capability(run_ok: impl Fn(&CommandSpec) -> bool) -> ComposeCapability {
    if run_ok(&CommandSpec::new("docker", ["compose", "version"])) {
        ComposeCapability::Plugin
    } else if run_ok(&CommandSpec::new("docker-compose", ["version"])) {
        ComposeCapability::Standalone
    } else {
        ComposeCapability::Absent
    }
}

#[derive(Deserialize)]
struct PsEntry {
    #[serde(rename = "State", default)]
    state: String,
}

/// Interpret `compose ps` output.
///
/// Newer plugins print a JSON array or one JSON object per line for
/// `--format json`; the standalone binary prints a table whose status column
/// reads `Up ...`.
pub fn reports_running(output: &str) -> bool {
    let trimmed = output.trim();
    if trimmed.is_empty() {
        return false;
    }
    if let Ok(entries) = serde_json::from_str::<Vec<PsEntry>>(trimmed) {
        return entries.iter().any(|e| e.state.eq_ignore_ascii_case("running"));
    }
    let json_lines: Vec<PsEntry> =
        trimmed.lines().filter_map(|line| serde_json::from_str(line.trim()).ok()).collect();
    if !json_lines.is_empty() {
        return json_lines.iter().any(|e| e.state.eq_ignore_ascii_case("running"));
    }
    trimmed.lines().any(|line| {
        line.split_whitespace().any(|word| word == "Up" || word.eq_ignore_ascii_case("running"))
    })
}
