use std::collections::VecDeque;
use std::sync::Mutex;

use crate::domain::AppError;
use crate::ports::InputSource;

/// `InputSource` replaying prepared answers, falling back to each prompt's default.
#[derive(Default)]
pub struct ScriptedInput {
    texts: Mutex<VecDeque<String>>,
    confirms: Mutex<VecDeque<bool>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_texts(self, answers: &[&str]) -> Self {
        self.texts.lock().unwrap().extend(answers.iter().map(|a| a.to_string()));
        self
    }

    pub fn with_confirms(self, answers: &[bool]) -> Self {
        self.confirms.lock().unwrap().extend(answers.iter().copied());
        self
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

impl InputSource for ScriptedInput {
    fn text(&self, prompt: &str, default: &str) -> Result<String, AppError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(self.texts.lock().unwrap().pop_front().unwrap_or_else(|| default.to_string()))
    }

    fn confirm(&self, prompt: &str, default: bool) -> Result<bool, AppError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(self.confirms.lock().unwrap().pop_front().unwrap_or(default))
    }
}
