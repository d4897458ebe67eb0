//! External command descriptions and their outcomes.

use std::fmt;

use crate::domain::AppError;

/// A program invocation, independent of how it gets executed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandSpec {
    pub fn new<I, S>(program: &str, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { program: program.to_string(), args: args.into_iter().map(Into::into).collect() }
    }

    /// Append more arguments.
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                write!(f, " '{}'", arg)?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        Ok(())
    }
}

/// Captured result of a process that ran to completion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(stdout: impl Into<String>) -> Self {
        Self { code: Some(0), stdout: stdout.into(), stderr: String::new() }
    }

    pub fn failure(code: i32, stderr: impl Into<String>) -> Self {
        Self { code: Some(code), stdout: String::new(), stderr: stderr.into() }
    }

    pub fn is_success(&self) -> bool {
        self.code == Some(0)
    }

    fn failure_reason(&self) -> String {
        let stderr = self.stderr.trim();
        let status = match self.code {
            Some(code) => format!("exit status {}", code),
            None => "terminated by signal".to_string(),
        };
        if stderr.is_empty() { status } else { format!("{}: {}", status, stderr) }
    }
}

/// Whether a failing command should abort the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tolerance {
    /// Failure is fatal.
    Required,
    /// Best effort; failure is recorded and swallowed.
    Optional,
}

/// Result of an external call after the caller's tolerance has been applied.
#[derive(Debug)]
pub enum CommandOutcome {
    Succeeded(CommandOutput),
    FailedTolerated { command: String, reason: String },
    FailedFatal(AppError),
}

impl CommandOutcome {
    /// Classify the raw result of running `spec`.
    pub fn classify(
        spec: &CommandSpec,
        result: Result<CommandOutput, AppError>,
        tolerance: Tolerance,
    ) -> Self {
        let reason = match result {
            Ok(output) if output.is_success() => return CommandOutcome::Succeeded(output),
            Ok(output) => output.failure_reason(),
            Err(err) => err.to_string(),
        };
        match tolerance {
            Tolerance::Optional => {
                CommandOutcome::FailedTolerated { command: spec.to_string(), reason }
            }
            Tolerance::Required => CommandOutcome::FailedFatal(AppError::ExternalToolError {
                tool: spec.to_string(),
                error: reason,
            }),
        }
    }

    pub fn succeeded(&self) -> bool {
        matches!(self, CommandOutcome::Succeeded(_))
    }

    /// Output of a successful run, if any.
    pub fn output(&self) -> Option<&CommandOutput> {
        match self {
            CommandOutcome::Succeeded(output) => Some(output),
            _ => None,
        }
    }

    /// Propagate fatal failures; tolerated failures become `None`.
    pub fn into_result(self) -> Result<Option<CommandOutput>, AppError> {
        match self {
            CommandOutcome::Succeeded(output) => Ok(Some(output)),
            CommandOutcome::FailedTolerated { .. } => Ok(None),
            CommandOutcome::FailedFatal(err) => Err(err),
        }
    }
}
