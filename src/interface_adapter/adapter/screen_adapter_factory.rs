use crate::infrastructure::screen::Vt100ScreenAdapter;

/// Creates a concrete ScreenPort implementation (vt100 crate-based).
pub fn create_screen_adapter() -> Vt100ScreenAdapter {
    Vt100ScreenAdapter::new()
}
