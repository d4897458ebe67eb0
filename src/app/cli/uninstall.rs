//! Uninstall command implementation.

use std::path::Path;

use crate::app::api::StopOutcome;
use crate::domain::AppError;

pub fn run_uninstall(config: Option<&Path>) -> Result<(), AppError> {
    let outcome = crate::app::api::uninstall(config)?;
    for line in summary(&outcome) {
        println!("{}", line);
    }
    Ok(())
}

fn summary(outcome: &StopOutcome) -> Vec<String> {
    if !outcome.was_installed && !outcome.removed_container {
        return vec!["ℹ️ Nothing installed, nothing to remove".to_string()];
    }

    let mut lines = Vec::new();
    if outcome.removed_container {
        lines.push("✅ Stopped and removed the proxy container".to_string());
    }
    if outcome.removed_dir {
        lines.push("✅ Deleted installation files".to_string());
    }
    lines.extend(outcome.warnings.iter().map(|warning| format!("⚠️  {}", warning)));
    lines
}
