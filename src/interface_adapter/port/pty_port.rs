use std::os::fd::RawFd;

use crate::domain::primitive::{TerminalSize, WindowId};
use crate::shared::error::AppError;

/// PTY (pseudo-terminal) operations port.
///
/// Defines the boundary between usecase and infrastructure for pty
/// management. Concrete implementations (e.g., PortablePtyAdapter) live in
/// infrastructure.
pub trait PtyPort: Send + Sync {
    /// Spawn a shell process on a pty sized to `size`, associating it with
    /// the given id. The child inherits the full parent environment.
    fn spawn(&mut self, id: WindowId, shell: &str, size: TerminalSize) -> Result<(), AppError>;

    /// Non-blocking read from the specified pty. An empty vec means no
    /// data was available; end-of-file surfaces as an error.
    fn read(&mut self, id: WindowId) -> Result<Vec<u8>, AppError>;

    /// Write data to the specified pty.
    fn write(&mut self, id: WindowId, data: &[u8]) -> Result<(), AppError>;

    /// Raw master file descriptor, for the poll set.
    fn raw_fd(&self, id: WindowId) -> Result<RawFd, AppError>;

    /// Deliver SIGWINCH to the child to provoke a repaint.
    fn signal_winch(&mut self, id: WindowId) -> Result<(), AppError>;

    /// Terminate the child (SIGTERM), reap it, and release the pty.
    fn kill(&mut self, id: WindowId) -> Result<(), AppError>;
}
