use crate::domain::{AppError, Listener};

/// Read access to the host's listening-socket table.
pub trait PortProbe {
    /// Processes listening on TCP `port`. Empty when the port is free.
    fn listeners(&self, port: u16) -> Result<Vec<Listener>, AppError>;

    fn is_listening(&self, port: u16) -> Result<bool, AppError> {
        Ok(!self.listeners(port)?.is_empty())
    }
}

impl<T: PortProbe + ?Sized> PortProbe for &T {
    fn listeners(&self, port: u16) -> Result<Vec<Listener>, AppError> {
        (**self).listeners(port)
    }
}
