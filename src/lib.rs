//! mtdeploy: provision and manage a containerized MTProto proxy on a Linux host.

pub mod adapters;
pub mod app;
pub mod domain;
pub mod ports;

#[cfg(test)]
pub(crate) mod testing;

pub use app::api;
pub use app::api::{ConnectionReport, InstallOptions, StatusOutcome, StopOutcome};
pub use domain::AppError;
