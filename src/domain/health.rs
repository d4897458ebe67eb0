use std::fmt;

/// Non-fatal finding from a post-start probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthWarning {
    PortNotListening(u16),
    MetricsUnreachable { url: String, reason: String },
    PublicIpUnknown(String),
}

impl fmt::Display for HealthWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HealthWarning::PortNotListening(port) => {
                write!(f, "Port {} is not listening yet; the proxy may still be starting", port)
            }
            HealthWarning::MetricsUnreachable { url, reason } => {
                write!(f, "Metrics endpoint {} did not respond: {}", url, reason)
            }
            HealthWarning::PublicIpUnknown(reason) => {
                write!(f, "Could not determine the public IP ({}); replace YOUR_SERVER_IP in the links", reason)
            }
        }
    }
}

/// Accumulated warnings from verification.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HealthReport {
    pub warnings: Vec<HealthWarning>,
}

impl HealthReport {
    pub fn is_healthy(&self) -> bool {
        self.warnings.is_empty()
    }

    pub fn push(&mut self, warning: HealthWarning) {
        self.warnings.push(warning);
    }
}

/// Observed state of the managed container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceStatus {
    Running,
    Stopped,
    Absent,
}

impl fmt::Display for ServiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ServiceStatus::Running => "running",
            ServiceStatus::Stopped => "stopped",
            ServiceStatus::Absent => "absent",
        };
        f.write_str(label)
    }
}
