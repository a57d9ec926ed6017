use crate::domain::model::Window;
use crate::domain::primitive::WindowId;

/// Owns the single main window and the ordered floating list.
///
/// Composition order is fixed: main first, then floating windows in
/// creation order; later windows paint over earlier ones. Nothing ever
/// reorders the list.
#[derive(Default)]
pub struct WindowManager {
    main: Option<Window>,
    floating: Vec<Window>,
}

impl WindowManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_main(&mut self, window: Window) {
        self.main = Some(window);
    }

    pub fn main(&self) -> Option<&Window> {
        self.main.as_ref()
    }

    /// Append a floating window and return its id.
    pub fn push_floating(&mut self, window: Window) -> WindowId {
        let id = window.id();
        self.floating.push(window);
        id
    }

    pub fn floating(&self) -> &[Window] {
        &self.floating
    }

    pub fn floating_mut(&mut self) -> &mut [Window] {
        &mut self.floating
    }

    pub fn find_floating(&self, id: WindowId) -> Option<&Window> {
        self.floating.iter().find(|w| w.id() == id)
    }

    pub fn find_floating_mut(&mut self, id: WindowId) -> Option<&mut Window> {
        self.floating.iter_mut().find(|w| w.id() == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::primitive::{TerminalSize, WindowRect};

    fn float(id: u32) -> Window {
        Window::floating(
            WindowId::new(id),
            WindowRect::new(0, 0, 10, 5),
            format!("f{id}"),
        )
    }

    #[test]
    fn new_manager_is_empty() {
        let wm = WindowManager::new();
        assert!(wm.main().is_none());
        assert!(wm.floating().is_empty());
    }

    #[test]
    fn push_floating_returns_id_and_appends() {
        let mut wm = WindowManager::new();
        let id = wm.push_floating(float(7));
        assert_eq!(id, WindowId::new(7));
        assert_eq!(wm.floating().len(), 1);
    }

    #[test]
    fn floating_list_preserves_creation_order() {
        let mut wm = WindowManager::new();
        wm.set_main(Window::main(WindowId::new(1), TerminalSize::new(80, 24)));
        wm.push_floating(float(2));
        wm.push_floating(float(3));

        let order: Vec<u32> = wm.floating().iter().map(|w| w.id().value()).collect();
        assert_eq!(order, vec![2, 3]);
        assert_eq!(wm.main().unwrap().id(), WindowId::new(1));
    }

    #[test]
    fn find_floating_locates_by_id() {
        let mut wm = WindowManager::new();
        wm.push_floating(float(2));
        wm.push_floating(float(3));

        assert!(wm.find_floating(WindowId::new(3)).is_some());
        assert!(wm.find_floating(WindowId::new(9)).is_none());
    }

    #[test]
    fn find_floating_mut_allows_title_updates() {
        let mut wm = WindowManager::new();
        wm.push_floating(float(2));

        wm.find_floating_mut(WindowId::new(2))
            .expect("window exists")
            .set_title("build");
        assert_eq!(wm.find_floating(WindowId::new(2)).unwrap().title(), "build");
    }
}
