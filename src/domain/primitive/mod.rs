pub mod cell;
pub mod terminal_size;
pub mod window_id;
pub mod window_rect;

pub use cell::{Cell, Color, CursorPos, Style, UnderlineKind};
pub use terminal_size::TerminalSize;
pub use window_id::WindowId;
pub use window_rect::WindowRect;
