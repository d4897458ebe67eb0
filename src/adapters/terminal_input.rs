//! Input sources for operator prompts.

use std::io::IsTerminal;

use dialoguer::{Confirm, Input};

use crate::domain::AppError;
use crate::ports::InputSource;

/// Interactive prompts on the controlling terminal.
#[derive(Debug, Clone, Default)]
pub struct TerminalInput;

impl InputSource for TerminalInput {
    fn text(&self, prompt: &str, default: &str) -> Result<String, AppError> {
        Input::<String>::new()
            .with_prompt(prompt)
            .default(default.to_string())
            .interact_text()
            .map_err(|err| prompt_error(prompt, err))
    }

    fn confirm(&self, prompt: &str, default: bool) -> Result<bool, AppError> {
        Confirm::new()
            .with_prompt(prompt)
            .default(default)
            .interact()
            .map_err(|err| prompt_error(prompt, err))
    }
}

fn prompt_error(prompt: &str, err: dialoguer::Error) -> AppError {
    AppError::Prompt { prompt: prompt.to_string(), reason: err.to_string() }
}

/// Answers every prompt with its default, for piped or `--yes` runs.
#[derive(Debug, Clone, Default)]
pub struct DefaultsInput;

impl InputSource for DefaultsInput {
    fn text(&self, prompt: &str, default: &str) -> Result<String, AppError> {
        println!("{} [{}]: {}", prompt, default, default);
        Ok(default.to_string())
    }

    fn confirm(&self, prompt: &str, default: bool) -> Result<bool, AppError> {
        println!("{} [{}]", prompt, if default { "Y/n: yes" } else { "y/N: no" });
        Ok(default)
    }
}

/// Prompt source chosen once at startup.
pub enum SelectedInput {
    Terminal(TerminalInput),
    Defaults(DefaultsInput),
}

impl SelectedInput {
    /// Use the terminal only when both stdin and stdout are attached to one.
    pub fn detect(assume_defaults: bool) -> Self {
        if !assume_defaults && std::io::stdin().is_terminal() && std::io::stdout().is_terminal() {
            SelectedInput::Terminal(TerminalInput)
        } else {
            SelectedInput::Defaults(DefaultsInput)
        }
    }
}

impl InputSource for SelectedInput {
    fn text(&self, prompt: &str, default: &str) -> Result<String, AppError> {
        match self {
            SelectedInput::Terminal(input) => input.text(prompt, default),
            SelectedInput::Defaults(input) => input.text(prompt, default),
        }
    }

    fn confirm(&self, prompt: &str, default: bool) -> Result<bool, AppError> {
        match self {
            SelectedInput::Terminal(input) => input.confirm(prompt, default),
            SelectedInput::Defaults(input) => input.confirm(prompt, default),
        }
    }
}
