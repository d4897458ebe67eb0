use tracing::info;

use crate::app::AppContext;
use crate::app::commands::preflight;
use crate::app::services::lifecycle::{self, StopOutcome};
use crate::domain::{AppError, InstallState};
use crate::ports::{CommandRunner, HttpClient, InputSource, PortProbe};

/// Tear down the service and delete its install directory.
///
/// Succeeds on a host where nothing is installed.
pub fn execute<R, I, P, H>(ctx: &AppContext<R, I, P, H>) -> Result<StopOutcome, AppError>
where
    R: CommandRunner,
    I: InputSource,
    P: PortProbe,
    H: HttpClient,
{
    preflight::require_root(ctx)?;
    let outcome = lifecycle::stop(ctx, true);
    info!(
        state = %InstallState::Uninstalled,
        installed = outcome.was_installed,
        container = outcome.removed_container,
        "uninstall finished"
    );
    Ok(outcome)
}
