use crate::domain::primitive::{Cell, CursorPos, TerminalSize, WindowId};
use crate::shared::error::AppError;

/// Screen model operations port.
///
/// Defines the boundary between usecase and infrastructure for the parsed
/// terminal screen kept per shell. Concrete implementations (e.g.,
/// Vt100ScreenAdapter) live in infrastructure.
pub trait ScreenPort: Send + Sync {
    /// Initialize a screen model for the specified window. The size is
    /// fixed for the model's lifetime.
    fn create(&mut self, id: WindowId, size: TerminalSize) -> Result<(), AppError>;

    /// Parse ANSI byte sequences and update the screen model.
    fn process(&mut self, id: WindowId, data: &[u8]) -> Result<(), AppError>;

    /// Get the cell grid of the visible screen.
    fn cells(&self, id: WindowId) -> Result<&Vec<Vec<Cell>>, AppError>;

    /// Get the current cursor position.
    fn cursor(&self, id: WindowId) -> Result<CursorPos, AppError>;

    /// Take the window title set via OSC 0/2, if one arrived since the
    /// last call.
    fn take_title(&mut self, id: WindowId) -> Result<Option<String>, AppError>;

    /// Remove the screen model.
    fn remove(&mut self, id: WindowId) -> Result<(), AppError>;
}
