use crate::app::AppContext;
use crate::domain::{AppError, CommandSpec};
use crate::ports::{CommandRunner, HttpClient, InputSource, PortProbe};

/// Host utilities the install pipeline cannot work without.
pub const REQUIRED_TOOLS: [&str; 2] = ["ss", "systemctl"];

/// Fail with `Privilege` unless the effective user is root.
pub fn require_root<R, I, P, H>(ctx: &AppContext<R, I, P, H>) -> Result<(), AppError>
where
    R: CommandRunner,
    I: InputSource,
    P: PortProbe,
    H: HttpClient,
{
    let uid = ctx.execute_required(&CommandSpec::new("id", ["-u"]))?;
    if uid.trim() == "0" { Ok(()) } else { Err(AppError::Privilege) }
}

pub fn require_tools<R, I, P, H>(ctx: &AppContext<R, I, P, H>) -> Result<(), AppError>
where
    R: CommandRunner,
    I: InputSource,
    P: PortProbe,
    H: HttpClient,
{
    match REQUIRED_TOOLS.into_iter().find(|tool| !ctx.runner().exists(tool)) {
        Some(tool) => Err(AppError::MissingTool(tool.to_string())),
        None => Ok(()),
    }
}
