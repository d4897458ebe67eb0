use crate::domain::{AppError, CommandOutput, CommandSpec};

/// Executes external programs on the host.
pub trait CommandRunner {
    /// Run a command to completion and capture its output.
    ///
    /// A non-zero exit status is reported through `CommandOutput`; `Err` means
    /// the process could not be started at all.
    fn run(&self, spec: &CommandSpec) -> Result<CommandOutput, AppError>;

    /// Check whether `program` resolves to an executable on PATH.
    fn exists(&self, program: &str) -> bool;
}

impl<T: CommandRunner + ?Sized> CommandRunner for &T {
    fn run(&self, spec: &CommandSpec) -> Result<CommandOutput, AppError> {
        (**self).run(spec)
    }

    fn exists(&self, program: &str) -> bool {
        (**self).exists(program)
    }
}
