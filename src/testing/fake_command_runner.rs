use std::collections::{HashSet, VecDeque};
use std::sync::Mutex;

use crate::domain::{AppError, CommandOutput, CommandSpec};
use crate::ports::CommandRunner;

struct Script {
    pattern: Vec<String>,
    responses: VecDeque<Result<CommandOutput, String>>,
}

impl Script {
    fn matches(&self, tokens: &[&str]) -> bool {
        let Some((program, rest)) = self.pattern.split_first() else {
            return false;
        };
        if tokens.first() != Some(&program.as_str()) {
            return false;
        }
        let mut remaining = tokens[1..].iter();
        rest.iter().all(|wanted| remaining.any(|token| *token == wanted.as_str()))
    }

    fn next(&mut self) -> Result<CommandOutput, String> {
        if self.responses.len() > 1 {
            self.responses.pop_front().unwrap_or_else(|| Ok(CommandOutput::success("")))
        } else {
            self.responses.front().cloned().unwrap_or_else(|| Ok(CommandOutput::success("")))
        }
    }
}

/// Scripted `CommandRunner`.
///
/// A pattern such as `"docker compose up"` matches any command whose program is
/// `docker` and whose arguments contain `compose` and `up` in that order. The
/// most specific matching pattern wins. Multiple responses for one pattern are
/// returned in order and the last one repeats. Unscripted commands succeed
/// with empty output.
#[derive(Default)]
pub struct FakeCommandRunner {
    calls: Mutex<Vec<String>>,
    scripts: Mutex<Vec<Script>>,
    programs: Mutex<HashSet<String>>,
}

impl FakeCommandRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark programs as present on PATH.
    pub fn with_programs(self, programs: &[&str]) -> Self {
        self.programs.lock().unwrap().extend(programs.iter().map(|p| p.to_string()));
        self
    }

    pub fn add_program(&self, program: &str) {
        self.programs.lock().unwrap().insert(program.to_string());
    }

    pub fn respond(&self, pattern: &str, output: CommandOutput) {
        self.push(pattern, Ok(output));
    }

    /// Script a spawn failure (program could not be executed).
    pub fn respond_spawn_error(&self, pattern: &str, message: &str) {
        self.push(pattern, Err(message.to_string()));
    }

    fn push(&self, pattern: &str, response: Result<CommandOutput, String>) {
        let pattern: Vec<String> = pattern.split_whitespace().map(str::to_string).collect();
        let mut scripts = self.scripts.lock().unwrap();
        if let Some(script) = scripts.iter_mut().find(|s| s.pattern == pattern) {
            script.responses.push_back(response);
        } else {
            scripts.push(Script { pattern, responses: VecDeque::from([response]) });
        }
    }

    /// Every command line run so far.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Command lines containing every token of `pattern`, in order.
    pub fn calls_matching(&self, pattern: &str) -> Vec<String> {
        let script = Script {
            pattern: pattern.split_whitespace().map(str::to_string).collect(),
            responses: VecDeque::new(),
        };
        self.calls()
            .into_iter()
            .filter(|call| script.matches(&call.split_whitespace().collect::<Vec<_>>()))
            .collect()
    }
}

impl CommandRunner for FakeCommandRunner {
    fn run(&self, spec: &CommandSpec) -> Result<CommandOutput, AppError> {
        let line = spec.to_string();
        self.calls.lock().unwrap().push(line.clone());

        let tokens: Vec<&str> = line.split_whitespace().collect();
        let mut scripts = self.scripts.lock().unwrap();
        let best = scripts
            .iter_mut()
            .filter(|script| script.matches(&tokens))
            .max_by_key(|script| script.pattern.len());

        match best {
            Some(script) => script.next().map_err(|error| AppError::ExternalToolError {
                tool: spec.program.clone(),
                error,
            }),
            None => Ok(CommandOutput::success("")),
        }
    }

    fn exists(&self, program: &str) -> bool {
        self.programs.lock().unwrap().contains(program)
    }
}
