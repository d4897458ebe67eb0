//! Status command implementation.

use std::path::Path;

use crate::domain::{AppError, ServiceStatus};

/// Exits 1 when nothing is installed; a stopped service is still a successful query.
pub fn run_status(config: Option<&Path>) -> Result<i32, AppError> {
    let outcome = match crate::app::api::status(config) {
        Ok(outcome) => outcome,
        Err(AppError::NotInstalled(dir)) => {
            println!("ℹ️ No installation found at {}", dir);
            return Ok(1);
        }
        Err(err) => return Err(err),
    };

    match outcome.service {
        ServiceStatus::Running => println!("✅ Service is {}", outcome.service),
        ServiceStatus::Stopped | ServiceStatus::Absent => {
            println!("⚠️  Service is {}", outcome.service)
        }
    }
    super::install::print_connection(&outcome.connection)?;
    Ok(0)
}
