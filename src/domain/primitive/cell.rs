#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Default,
    Indexed(u8),
    Rgb(u8, u8, u8),
}

/// Underline variants per the SGR 4:n extended sub-parameter form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnderlineKind {
    #[default]
    None,
    Single,
    Double,
    Curly,
    Dotted,
    Dashed,
}

impl UnderlineKind {
    /// Sub-parameter value used in `ESC[4:nm`. `None` has no encoding.
    pub fn sgr_param(&self) -> Option<u8> {
        match self {
            UnderlineKind::None => None,
            UnderlineKind::Single => Some(1),
            UnderlineKind::Double => Some(2),
            UnderlineKind::Curly => Some(3),
            UnderlineKind::Dotted => Some(4),
            UnderlineKind::Dashed => Some(5),
        }
    }
}

/// Visual attributes of a cell, compared by identity during row rendering
/// so that SGR transitions are only emitted at run boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Style {
    pub fg: Color,
    pub bg: Color,
    pub bold: bool,
    pub faint: bool,
    pub italic: bool,
    pub underline: UnderlineKind,
    pub blink: bool,
    pub inverse: bool,
    pub hidden: bool,
    pub strikethrough: bool,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            fg: Color::Default,
            bg: Color::Default,
            bold: false,
            faint: false,
            italic: false,
            underline: UnderlineKind::None,
            blink: false,
            inverse: false,
            hidden: false,
            strikethrough: false,
        }
    }
}

impl Style {
    /// True when the style needs no SGR sequence at all.
    pub fn is_plain(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub style: Style,
    pub width: u8, // 1 for normal, 2 for wide, 0 for wide-char continuation
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            style: Style::default(),
            width: 1,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CursorPos {
    pub row: u16,
    pub col: u16,
}
