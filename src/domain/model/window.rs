use crate::domain::primitive::{TerminalSize, WindowId, WindowRect};

/// Maximum byte length of a dynamic (OSC-set) title. Longer titles are
/// truncated silently.
pub const TITLE_CAPACITY: usize = 256;

/// A composited window: the borderless full-screen main window, or a
/// bordered floating window backed by its own shell.
///
/// The window itself is plain data; the PTY and screen model registered
/// under its id live in the ports.
pub struct Window {
    id: WindowId,
    rect: WindowRect,
    has_border: bool,
    default_title: String,
    title: String,
    visible: bool,
    has_pty: bool,
}

impl Window {
    /// The main window: spans the host terminal, no border, no PTY of its
    /// own (its shell is the process-level main shell).
    pub fn main(id: WindowId, size: TerminalSize) -> Self {
        Self {
            id,
            rect: WindowRect::new(0, 0, size.cols, size.rows),
            has_border: false,
            default_title: String::new(),
            title: String::new(),
            visible: true,
            has_pty: false,
        }
    }

    /// A bordered floating window backed by its own PTY shell. Starts
    /// hidden; the overlay controller flips visibility.
    pub fn floating(id: WindowId, rect: WindowRect, default_title: String) -> Self {
        Self {
            id,
            rect,
            has_border: true,
            default_title,
            title: String::new(),
            visible: false,
            has_pty: true,
        }
    }

    pub fn id(&self) -> WindowId {
        self.id
    }

    pub fn rect(&self) -> WindowRect {
        self.rect
    }

    pub fn has_border(&self) -> bool {
        self.has_border
    }

    pub fn has_pty(&self) -> bool {
        self.has_pty
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Dimensions of the screen model bound to this window: the interior
    /// when bordered, the full rect otherwise. Fixed for the window's
    /// lifetime.
    pub fn content_size(&self) -> TerminalSize {
        if self.has_border {
            self.rect.inset_size()
        } else {
            self.rect.size()
        }
    }

    /// Host-cell origin of the content area (inside the border if any).
    pub fn content_origin(&self) -> (u16, u16) {
        if self.has_border {
            (self.rect.x + 1, self.rect.y + 1)
        } else {
            (self.rect.x, self.rect.y)
        }
    }

    /// The effective title: the dynamic one when set, else the default.
    pub fn title(&self) -> &str {
        if self.title.is_empty() {
            &self.default_title
        } else {
            &self.title
        }
    }

    /// Update the dynamic title, truncating to [`TITLE_CAPACITY`] bytes on
    /// a character boundary.
    pub fn set_title(&mut self, title: &str) {
        let mut end = title.len().min(TITLE_CAPACITY);
        while !title.is_char_boundary(end) {
            end -= 1;
        }
        self.title.clear();
        self.title.push_str(&title[..end]);
    }
}
