use std::env;
use std::path::Path;
use std::process::Command;

use tracing::debug;

use crate::domain::{AppError, CommandOutput, CommandSpec};
use crate::ports::CommandRunner;

/// Runs commands with `std::process::Command`.
#[derive(Debug, Clone, Default)]
pub struct SystemCommandRunner;

impl SystemCommandRunner {
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for SystemCommandRunner {
    fn run(&self, spec: &CommandSpec) -> Result<CommandOutput, AppError> {
        debug!(command = %spec, "running");
        let output = Command::new(&spec.program).args(&spec.args).output().map_err(|e| {
            AppError::ExternalToolError {
                tool: spec.program.clone(),
                error: format!("Failed to execute {}: {}", spec.program, e),
            }
        })?;

        let result = CommandOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).trim().to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        };
        debug!(command = %spec, code = ?result.code, "finished");
        Ok(result)
    }

    fn exists(&self, program: &str) -> bool {
        if program.contains('/') {
            return is_executable(Path::new(program));
        }
        env::var_os("PATH")
            .map(|paths| env::split_paths(&paths).any(|dir| is_executable(&dir.join(program))))
            .unwrap_or(false)
    }
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata().map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0).unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
