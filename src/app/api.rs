//! API Facade for the application.
//!
//! This module exposes high-level functions that glue together settings
//! loading, context creation, and command execution against the real host.

use std::path::Path;

use crate::adapters::{ReqwestHttpClient, SelectedInput, SsPortProbe, SystemCommandRunner};
use crate::app::config::Settings;
use crate::app::{
    AppContext,
    commands::{install, status, uninstall},
};

pub use crate::app::commands::install::InstallOptions;
pub use crate::app::commands::status::StatusOutcome;
pub use crate::app::services::lifecycle::StopOutcome;
pub use crate::domain::{AppError, ConnectionReport};

type HostContext =
    AppContext<SystemCommandRunner, SelectedInput, SsPortProbe<SystemCommandRunner>, ReqwestHttpClient>;

/// Create an `AppContext` bound to the local host.
fn create_context(config: Option<&Path>, assume_defaults: bool) -> Result<HostContext, AppError> {
    let settings = Settings::load(config)?;
    let http = ReqwestHttpClient::new(settings.timing.http_timeout_secs)?;
    Ok(AppContext::new(
        SystemCommandRunner::new(),
        SelectedInput::detect(assume_defaults),
        SsPortProbe::new(SystemCommandRunner::new()),
        http,
        settings,
    ))
}

/// Provision the proxy service and return its connection details.
///
/// With `assume_defaults`, every prompt takes its default answer.
pub fn install(
    config: Option<&Path>,
    options: &InstallOptions,
    assume_defaults: bool,
) -> Result<ConnectionReport, AppError> {
    let ctx = create_context(config, assume_defaults)?;
    install::execute(&ctx, options)
}

/// Remove the proxy service and its install directory.
pub fn uninstall(config: Option<&Path>) -> Result<StopOutcome, AppError> {
    let ctx = create_context(config, true)?;
    uninstall::execute(&ctx)
}

/// Read the saved install and report the service state.
pub fn status(config: Option<&Path>) -> Result<StatusOutcome, AppError> {
    let ctx = create_context(config, true)?;
    status::execute(&ctx)
}
