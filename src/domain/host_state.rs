use std::collections::BTreeSet;
use std::fmt;

/// A process holding a listening socket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listener {
    pub process: String,
    pub pid: Option<u32>,
}

impl fmt::Display for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.pid {
            Some(pid) => write!(f, "{} (pid {})", self.process, pid),
            None => f.write_str(&self.process),
        }
    }
}

/// How the compose tooling can be invoked on this host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposeCapability {
    /// `docker compose ...`
    Plugin,
    /// `docker-compose ...`
    Standalone,
    Absent,
}

impl ComposeCapability {
    pub fn label(&self) -> &'static str {
        match self {
            ComposeCapability::Plugin => "docker compose (plugin)",
            ComposeCapability::Standalone => "docker-compose (standalone)",
            ComposeCapability::Absent => "absent",
        }
    }
}

/// Snapshot of the host taken at the start of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostState {
    pub port: u16,
    pub listeners: Vec<Listener>,
    pub competing_services: BTreeSet<String>,
    pub runtime_present: bool,
    pub compose: ComposeCapability,
}

impl HostState {
    pub fn port_in_use(&self) -> bool {
        !self.listeners.is_empty()
    }

    /// Distinct process names holding the port.
    pub fn owners(&self) -> Vec<String> {
        let names: BTreeSet<&str> = self.listeners.iter().map(|l| l.process.as_str()).collect();
        names.into_iter().map(str::to_string).collect()
    }
}
