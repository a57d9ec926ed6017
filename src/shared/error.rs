use crate::domain::primitive::WindowId;

#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Failed to spawn pty: {0}")]
    PtySpawn(#[source] std::io::Error),

    #[error("Pty I/O error for window {id}: {source}")]
    PtyIo {
        id: WindowId,
        #[source]
        source: std::io::Error,
    },

    #[error("Window not found: {0}")]
    WindowNotFound(WindowId),

    #[error("Screen not found: {0}")]
    ScreenNotFound(WindowId),

    #[error("No main window")]
    NoMainWindow,

    #[error("No floating window")]
    NoFloatingWindow,
}
