use std::io::{self, Write};

use unicode_width::UnicodeWidthChar;

use crate::domain::model::{Window, WindowManager};
use crate::domain::primitive::{Cell, Style};
use crate::infrastructure::render::styler;
use crate::interface_adapter::port::ScreenPort;

pub const ENTER_ALTERNATE_SCREEN: &[u8] = b"\x1b[?1049h";
pub const LEAVE_ALTERNATE_SCREEN: &[u8] = b"\x1b[?1049l";

/// Absolute cursor positioning; host cells are 0-indexed, CSI H is
/// 1-indexed.
fn move_to<W: Write>(out: &mut W, col: u16, row: u16) -> io::Result<()> {
    write!(out, "\x1b[{};{}H", row + 1, col + 1)
}

/// Full overlay frame: hide cursor, clear, main window, floating windows
/// on top, user-visible cursor on the active floating window, show cursor.
/// One flush at the end; the caller hands in a buffered writer.
pub fn render_all<W: Write, S: ScreenPort>(
    out: &mut W,
    windows: &WindowManager,
    screens: &S,
) -> io::Result<()> {
    render_frame(out, windows, screens, true)
}

/// Same frame without the floating windows and cursor repositioning; used
/// for the last coherent paint before leaving the alternate screen.
pub fn render_main_only<W: Write, S: ScreenPort>(
    out: &mut W,
    windows: &WindowManager,
    screens: &S,
) -> io::Result<()> {
    render_frame(out, windows, screens, false)
}

fn render_frame<W: Write, S: ScreenPort>(
    out: &mut W,
    windows: &WindowManager,
    screens: &S,
    include_floating: bool,
) -> io::Result<()> {
    out.write_all(b"\x1b[?25l")?;
    out.write_all(b"\x1b[H\x1b[2J")?;

    if let Some(main) = windows.main()
        && let Ok(cells) = screens.cells(main.id())
    {
        render_window(out, main, cells)?;
    }

    if include_floating {
        for window in windows.floating() {
            if let Ok(cells) = screens.cells(window.id()) {
                render_window(out, window, cells)?;
            }
        }
        if let Some(window) = windows.floating().iter().find(|w| w.is_visible())
            && let Ok(cursor) = screens.cursor(window.id())
        {
            let (ox, oy) = window.content_origin();
            move_to(out, ox + cursor.col, oy + cursor.row)?;
        }
    }

    out.write_all(b"\x1b[?25h")?;
    out.flush()
}

/// Paint one window from its screen model: border (if any), then content.
/// Hidden windows are a no-op.
pub fn render_window<W: Write>(
    out: &mut W,
    window: &Window,
    cells: &[Vec<Cell>],
) -> io::Result<()> {
    if !window.is_visible() {
        return Ok(());
    }
    if window.has_border() {
        render_border(out, window)?;
    }
    render_content(out, window, cells)
}

fn render_border<W: Write>(out: &mut W, window: &Window) -> io::Result<()> {
    let rect = window.rect();
    let inner = rect.width.saturating_sub(2) as usize;

    styler::write_sgr(out, &Style::default())?;
    move_to(out, rect.x, rect.y)?;
    out.write_all("╭".as_bytes())?;

    // Title centered in the top rule, one flanking space each side; two
    // cells are reserved for those spaces so the rule never disappears
    // around a long title.
    let title = trim_to_width(window.title(), inner.saturating_sub(2));
    let title_width: usize = title.chars().filter_map(|c| c.width()).sum();
    let total = if title_width > 0 { title_width + 2 } else { 0 };
    let pad_before = (inner - total) / 2;
    let pad_after = inner - total - pad_before;

    write_rule(out, pad_before)?;
    if title_width > 0 {
        write!(out, " {title} ")?;
    }
    write_rule(out, pad_after)?;
    out.write_all("╮".as_bytes())?;

    for r in 1..rect.height.saturating_sub(1) {
        move_to(out, rect.x, rect.y + r)?;
        out.write_all("│".as_bytes())?;
        move_to(out, rect.x + rect.width - 1, rect.y + r)?;
        out.write_all("│".as_bytes())?;
    }

    if rect.height >= 2 {
        move_to(out, rect.x, rect.y + rect.height - 1)?;
        out.write_all("╰".as_bytes())?;
        write_rule(out, inner)?;
        out.write_all("╯".as_bytes())?;
    }
    Ok(())
}

fn write_rule<W: Write>(out: &mut W, count: usize) -> io::Result<()> {
    for _ in 0..count {
        out.write_all("─".as_bytes())?;
    }
    Ok(())
}

/// Longest prefix of `title` whose display width fits in `max_width`.
fn trim_to_width(title: &str, max_width: usize) -> &str {
    let mut width = 0;
    for (i, c) in title.char_indices() {
        let w = c.width().unwrap_or(0);
        if width + w > max_width {
            return &title[..i];
        }
        width += w;
    }
    title
}

/// Emit the content rows. Each row is positioned absolutely, cells are
/// written with style transitions only at run boundaries, and the row is
/// reset and padded with spaces out to the content width. Rows below the
/// model are blank.
fn render_content<W: Write>(out: &mut W, window: &Window, cells: &[Vec<Cell>]) -> io::Result<()> {
    let (ox, oy) = window.content_origin();
    let size = window.content_size();
    let cols = size.cols as usize;

    for r in 0..size.rows as usize {
        move_to(out, ox, oy + r as u16)?;
        let mut current = Style::default();
        let mut col = 0usize;

        if let Some(row) = cells.get(r) {
            for cell in row.iter().filter(|c| c.width != 0) {
                let w = if cell.width == 2 { 2 } else { 1 };
                if col + w > cols {
                    break;
                }
                if cell.style != current {
                    styler::write_sgr(out, &cell.style)?;
                    current = cell.style;
                }
                write!(out, "{}", cell.ch)?;
                col += w;
            }
        }

        if !current.is_plain() {
            out.write_all(b"\x1b[0m")?;
        }
        for _ in col..cols {
            out.write_all(b" ")?;
        }
    }
    Ok(())
}
