use std::collections::VecDeque;
use std::sync::Mutex;

use crate::domain::{AppError, Listener};
use crate::ports::PortProbe;

/// `PortProbe` returning a sequence of socket-table snapshots; the last one repeats.
#[derive(Default)]
pub struct FakePortProbe {
    snapshots: Mutex<VecDeque<Vec<Listener>>>,
    queries: Mutex<Vec<u16>>,
}

impl FakePortProbe {
    /// Every query reports the port as free.
    pub fn free() -> Self {
        Self::default()
    }

    /// Queue the next snapshot.
    pub fn then(self, listeners: Vec<Listener>) -> Self {
        self.snapshots.lock().unwrap().push_back(listeners);
        self
    }

    pub fn then_free(self) -> Self {
        self.then(Vec::new())
    }

    pub fn then_held_by(self, process: &str) -> Self {
        self.then(vec![Listener { process: process.to_string(), pid: Some(4242) }])
    }

    pub fn queries(&self) -> Vec<u16> {
        self.queries.lock().unwrap().clone()
    }
}

impl PortProbe for FakePortProbe {
    fn listeners(&self, port: u16) -> Result<Vec<Listener>, AppError> {
        self.queries.lock().unwrap().push(port);
        let mut snapshots = self.snapshots.lock().unwrap();
        let current = if snapshots.len() > 1 {
            snapshots.pop_front().unwrap_or_default()
        } else {
            snapshots.front().cloned().unwrap_or_default()
        };
        Ok(current)
    }
}
