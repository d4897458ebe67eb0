use std::fmt;

/// Progress marker for the install pipeline and the uninstall path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum InstallState {
    Start,
    EnvironmentChecked,
    RuntimeReady,
    Configured,
    FilesWritten,
    ServiceRunning,
    Verified,
    Reported,
    /// Terminal state of the uninstall entry point; never reached from `Start`.
    Uninstalled,
}

impl InstallState {
    /// The state that follows a successful step, or `None` for terminal states.
    pub fn next(self) -> Option<Self> {
        match self {
            InstallState::Start => Some(InstallState::EnvironmentChecked),
            InstallState::EnvironmentChecked => Some(InstallState::RuntimeReady),
            InstallState::RuntimeReady => Some(InstallState::Configured),
            InstallState::Configured => Some(InstallState::FilesWritten),
            InstallState::FilesWritten => Some(InstallState::ServiceRunning),
            InstallState::ServiceRunning => Some(InstallState::Verified),
            InstallState::Verified => Some(InstallState::Reported),
            InstallState::Reported | InstallState::Uninstalled => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        self.next().is_none()
    }
}

impl fmt::Display for InstallState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
