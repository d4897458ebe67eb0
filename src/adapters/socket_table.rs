//! Listening-socket lookup through `ss`.

use crate::domain::{AppError, CommandSpec, Listener};
use crate::ports::{CommandRunner, PortProbe};

/// Reads the TCP listening table with `ss -H -ltnp`.
#[derive(Debug, Clone)]
pub struct SsPortProbe<R: CommandRunner> {
    runner: R,
}

impl<R: CommandRunner> SsPortProbe<R> {
    pub fn new(runner: R) -> Self {
        Self { runner }
    }
}

impl<R: CommandRunner> PortProbe for SsPortProbe<R> {
    fn listeners(&self, port: u16) -> Result<Vec<Listener>, AppError> {
        let sport = format!(":{}", port);
        let spec = CommandSpec::new("ss", ["-H", "-ltnp", "sport", "=", sport.as_str()]);
        let output = self.runner.run(&spec)?;
        if !output.is_success() {
            return Err(AppError::ExternalToolError {
                tool: spec.to_string(),
                error: output.stderr,
            });
        }
        Ok(parse_listeners(&output.stdout))
    }
}

/// Parse `ss -ltnp` rows into listeners, one per distinct process.
pub fn parse_listeners(output: &str) -> Vec<Listener> {
    let mut listeners: Vec<Listener> = Vec::new();
    for line in output.lines().map(str::trim) {
        if line.is_empty() || line.starts_with("State") {
            continue;
        }
        let mut found = parse_users(line);
        if found.is_empty() {
            found.push(Listener { process: "unknown".to_string(), pid: None });
        }
        for listener in found {
            if !listeners.contains(&listener) {
                listeners.push(listener);
            }
        }
    }
    listeners
}

// users:(("nginx",pid=812,fd=6),("nginx",pid=813,fd=6))
fn parse_users(line: &str) -> Vec<Listener> {
    let Some(start) = line.find("users:(") else {
        return Vec::new();
    };
    line[start + "users:(".len()..]
        .split("(\"")
        .skip(1)
        .filter_map(|entry| {
            let (name, rest) = entry.split_once('"')?;
            let pid = rest
                .split(',')
                .find_map(|field| field.trim().strip_prefix("pid="))
                .and_then(|value| value.trim_end_matches(')').parse().ok());
            Some(Listener { process: name.to_string(), pid })
        })
        .collect()
}
