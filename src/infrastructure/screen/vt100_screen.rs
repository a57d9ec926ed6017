use std::collections::HashMap;

use crate::domain::primitive::{Cell, Color, CursorPos, Style, TerminalSize, UnderlineKind, WindowId};
use crate::interface_adapter::port::screen_port::ScreenPort;
use crate::shared::error::AppError;

/// Callbacks for capturing OSC 0/2 window title sequences.
#[derive(Debug, Default)]
struct Vt100Callbacks {
    title: Option<String>,
}

impl vt100::Callbacks for Vt100Callbacks {
    fn set_window_title(&mut self, _: &mut vt100::Screen, title: &[u8]) {
        self.title = Some(String::from_utf8_lossy(title).into_owned());
    }

    fn set_window_icon_name(&mut self, _: &mut vt100::Screen, name: &[u8]) {
        self.title = Some(String::from_utf8_lossy(name).into_owned());
    }
}

/// Per-window state managed by Vt100ScreenAdapter.
struct Vt100Instance {
    parser: vt100::Parser<Vt100Callbacks>,
    /// Cache for `cells()` which must return `&Vec<Vec<Cell>>`.
    cached_cells: Vec<Vec<Cell>>,
}

/// ScreenPort implementation backed by the `vt100` crate.
///
/// All terminal emulation is delegated to vt100; this adapter only converts
/// its screen into domain cells and surfaces the OSC title hook. Models are
/// sized at creation and never resized.
pub struct Vt100ScreenAdapter {
    instances: HashMap<WindowId, Vt100Instance>,
}

impl Vt100ScreenAdapter {
    pub fn new() -> Self {
        Self {
            instances: HashMap::new(),
        }
    }
}

fn convert_color(color: vt100::Color) -> Color {
    match color {
        vt100::Color::Default => Color::Default,
        vt100::Color::Idx(idx) => Color::Indexed(idx),
        vt100::Color::Rgb(r, g, b) => Color::Rgb(r, g, b),
    }
}

fn convert_cell(vt_cell: &vt100::Cell) -> Cell {
    Cell {
        ch: vt_cell.contents().chars().next().unwrap_or(' '),
        style: Style {
            fg: convert_color(vt_cell.fgcolor()),
            bg: convert_color(vt_cell.bgcolor()),
            bold: vt_cell.bold(),
            faint: vt_cell.dim(),
            italic: vt_cell.italic(),
            underline: if vt_cell.underline() {
                UnderlineKind::Single
            } else {
                UnderlineKind::None
            },
            blink: false,
            inverse: vt_cell.inverse(),
            hidden: false,
            strikethrough: false,
        },
        width: if vt_cell.is_wide_continuation() {
            0
        } else if vt_cell.is_wide() {
            2
        } else {
            1
        },
    }
}

fn rebuild_cell_cache(parser: &vt100::Parser<Vt100Callbacks>, cache: &mut Vec<Vec<Cell>>) {
    let screen = parser.screen();
    let rows = screen.size().0 as usize;
    let cols = screen.size().1 as usize;

    cache.resize_with(rows, Vec::new);
    cache.truncate(rows);

    for (r, row) in cache.iter_mut().enumerate().take(rows) {
        row.resize(cols, Cell::default());
        row.truncate(cols);

        for (c, cell) in row.iter_mut().enumerate().take(cols) {
            if let Some(vt_cell) = screen.cell(r as u16, c as u16) {
                *cell = convert_cell(vt_cell);
            } else {
                *cell = Cell::default();
            }
        }
    }
}

impl ScreenPort for Vt100ScreenAdapter {
    fn create(&mut self, id: WindowId, size: TerminalSize) -> Result<(), AppError> {
        let callbacks = Vt100Callbacks::default();
        let parser = vt100::Parser::new_with_callbacks(size.rows, size.cols, 10_000, callbacks);
        let mut cached_cells = Vec::new();
        rebuild_cell_cache(&parser, &mut cached_cells);
        self.instances.insert(
            id,
            Vt100Instance {
                parser,
                cached_cells,
            },
        );
        Ok(())
    }

    fn process(&mut self, id: WindowId, data: &[u8]) -> Result<(), AppError> {
        let inst = self
            .instances
            .get_mut(&id)
            .ok_or(AppError::ScreenNotFound(id))?;
        inst.parser.process(data);
        rebuild_cell_cache(&inst.parser, &mut inst.cached_cells);
        Ok(())
    }

    fn cells(&self, id: WindowId) -> Result<&Vec<Vec<Cell>>, AppError> {
        self.instances
            .get(&id)
            .map(|inst| &inst.cached_cells)
            .ok_or(AppError::ScreenNotFound(id))
    }

    fn cursor(&self, id: WindowId) -> Result<CursorPos, AppError> {
        self.instances
            .get(&id)
            .map(|inst| {
                let pos = inst.parser.screen().cursor_position();
                CursorPos {
                    row: pos.0,
                    col: pos.1,
                }
            })
            .ok_or(AppError::ScreenNotFound(id))
    }

    fn take_title(&mut self, id: WindowId) -> Result<Option<String>, AppError> {
        self.instances
            .get_mut(&id)
            .map(|inst| inst.parser.callbacks_mut().title.take())
            .ok_or(AppError::ScreenNotFound(id))
    }

    fn remove(&mut self, id: WindowId) -> Result<(), AppError> {
        self.instances
            .remove(&id)
            .ok_or(AppError::ScreenNotFound(id))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_size() -> TerminalSize {
        TerminalSize::new(80, 24)
    }

    fn id(n: u32) -> WindowId {
        WindowId::new(n)
    }

    fn row_text(cells: &[Cell]) -> String {
        cells.iter().map(|c| c.ch).collect::<String>()
    }

    // ─── ScreenPort contract tests ───

    #[test]
    fn create_initializes_blank_screen() {
        let mut adapter = Vt100ScreenAdapter::new();
        adapter.create(id(1), default_size()).unwrap();

        let cells = adapter.cells(id(1)).unwrap();
        assert_eq!(cells.len(), 24);
        assert_eq!(cells[0].len(), 80);
        assert_eq!(cells[0][0].ch, ' ');
    }

    #[test]
    fn process_updates_cells_and_cursor() {
        let mut adapter = Vt100ScreenAdapter::new();
        adapter.create(id(1), default_size()).unwrap();
        adapter.process(id(1), b"hello\r\n").unwrap();

        let cells = adapter.cells(id(1)).unwrap();
        assert_eq!(row_text(&cells[0][..5]), "hello");
        assert_eq!(
            adapter.cursor(id(1)).unwrap(),
            CursorPos { row: 1, col: 0 }
        );
    }

    #[test]
    fn process_split_anywhere_yields_identical_state() {
        let stream: &[u8] = b"\x1b[1;31mbold red\x1b[0m\r\nline\xe3\x81\x82\x1b[2;3Hx";

        let mut whole = Vt100ScreenAdapter::new();
        whole.create(id(1), default_size()).unwrap();
        whole.process(id(1), stream).unwrap();

        for split in 0..=stream.len() {
            let mut parts = Vt100ScreenAdapter::new();
            parts.create(id(1), default_size()).unwrap();
            parts.process(id(1), &stream[..split]).unwrap();
            parts.process(id(1), &stream[split..]).unwrap();

            assert_eq!(
                parts.cells(id(1)).unwrap(),
                whole.cells(id(1)).unwrap(),
                "split at byte {split} diverged"
            );
            assert_eq!(parts.cursor(id(1)).unwrap(), whole.cursor(id(1)).unwrap());
        }
    }

    #[test]
    fn sgr_attributes_are_captured_per_cell() {
        let mut adapter = Vt100ScreenAdapter::new();
        adapter.create(id(1), default_size()).unwrap();
        adapter.process(id(1), b"\x1b[1;31mx\x1b[0m").unwrap();

        let cell = adapter.cells(id(1)).unwrap()[0][0];
        assert_eq!(cell.ch, 'x');
        assert!(cell.style.bold);
        assert_eq!(cell.style.fg, Color::Indexed(1));

        let blank = adapter.cells(id(1)).unwrap()[0][1];
        assert!(blank.style.is_plain());
    }

    #[test]
    fn wide_characters_mark_continuation_cells() {
        let mut adapter = Vt100ScreenAdapter::new();
        adapter.create(id(1), default_size()).unwrap();
        adapter.process(id(1), "あ".as_bytes()).unwrap();

        let cells = adapter.cells(id(1)).unwrap();
        assert_eq!(cells[0][0].width, 2);
        assert_eq!(cells[0][1].width, 0);
    }

    // ─── OSC title hook ───

    #[test]
    fn osc0_title_with_bel_terminator_is_captured() {
        let mut adapter = Vt100ScreenAdapter::new();
        adapter.create(id(1), default_size()).unwrap();
        adapter.process(id(1), b"\x1b]0;hi\x07").unwrap();

        assert_eq!(adapter.take_title(id(1)).unwrap(), Some("hi".to_string()));
    }

    #[test]
    fn osc2_title_with_st_terminator_is_captured() {
        let mut adapter = Vt100ScreenAdapter::new();
        adapter.create(id(1), default_size()).unwrap();
        adapter.process(id(1), b"\x1b]2;status\x1b\\").unwrap();

        assert_eq!(
            adapter.take_title(id(1)).unwrap(),
            Some("status".to_string())
        );
    }

    #[test]
    fn take_title_is_consumed_once() {
        let mut adapter = Vt100ScreenAdapter::new();
        adapter.create(id(1), default_size()).unwrap();
        adapter.process(id(1), b"\x1b]0;once\x07").unwrap();

        assert!(adapter.take_title(id(1)).unwrap().is_some());
        assert!(adapter.take_title(id(1)).unwrap().is_none());
    }

    #[test]
    fn no_title_when_none_was_set() {
        let mut adapter = Vt100ScreenAdapter::new();
        adapter.create(id(1), default_size()).unwrap();
        adapter.process(id(1), b"plain output").unwrap();

        assert!(adapter.take_title(id(1)).unwrap().is_none());
    }

    // ─── Lookup failures ───

    #[test]
    fn operations_on_unknown_id_fail() {
        let mut adapter = Vt100ScreenAdapter::new();
        assert!(matches!(
            adapter.process(id(9), b"x").unwrap_err(),
            AppError::ScreenNotFound(_)
        ));
        assert!(adapter.cells(id(9)).is_err());
        assert!(adapter.cursor(id(9)).is_err());
    }
}
