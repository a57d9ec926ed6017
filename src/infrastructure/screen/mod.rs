pub mod vt100_screen;

pub use vt100_screen::Vt100ScreenAdapter;
