use crate::domain::AppError;

/// Source of operator answers.
///
/// The orchestration asks every question through this trait and never checks
/// whether a terminal is attached.
pub trait InputSource {
    /// Ask for a free-form value, returning `default` when the operator just presses enter.
    fn text(&self, prompt: &str, default: &str) -> Result<String, AppError>;

    /// Ask a yes/no question.
    fn confirm(&self, prompt: &str, default: bool) -> Result<bool, AppError>;
}

impl<T: InputSource + ?Sized> InputSource for &T {
    fn text(&self, prompt: &str, default: &str) -> Result<String, AppError> {
        (**self).text(prompt, default)
    }

    fn confirm(&self, prompt: &str, default: bool) -> Result<bool, AppError> {
        (**self).confirm(prompt, default)
    }
}
