use crate::domain::model::{QueryForwarder, Window, WindowManager};
use crate::domain::primitive::{TerminalSize, WindowId, WindowRect};
use crate::interface_adapter::port::{PtyPort, ScreenPort};
use crate::shared::error::AppError;

/// Orchestrates the proxy's mutable state: the window manager, both ports,
/// the capability-query forwarder, and the overlay flag.
///
/// The event loop owns a `ProxyUsecase` (through the controller) and calls
/// into it on every poll wake; all rendering and host-terminal I/O stays
/// with the caller.
pub struct ProxyUsecase<P: PtyPort, S: ScreenPort> {
    windows: WindowManager,
    query_forwarder: QueryForwarder,
    pending_forwards: Vec<Vec<u8>>,
    overlay_visible: bool,
    next_id: u32,
    pty_port: P,
    screen_port: S,
}

impl<P: PtyPort, S: ScreenPort> ProxyUsecase<P, S> {
    pub fn new(pty_port: P, screen_port: S) -> Self {
        Self {
            windows: WindowManager::new(),
            query_forwarder: QueryForwarder::new(),
            pending_forwards: Vec::new(),
            overlay_visible: false,
            next_id: 1,
            pty_port,
            screen_port,
        }
    }

    fn shell_command() -> String {
        std::env::var("SHELL").unwrap_or_else(|_| "/bin/sh".to_string())
    }

    /// Spawn the main shell and bind it to a borderless window spanning the
    /// host terminal.
    pub fn open_main_window(&mut self, size: TerminalSize) -> Result<WindowId, AppError> {
        let id = WindowId::new(self.next_id);
        self.next_id += 1;

        let shell = Self::shell_command();
        self.pty_port.spawn(id, &shell, size)?;
        self.screen_port.create(id, size)?;
        self.windows.set_main(Window::main(id, size));
        Ok(id)
    }

    /// Spawn a shell for a bordered floating window. The screen model and
    /// pty are sized to the content area inside the border.
    pub fn open_floating_window(&mut self, rect: WindowRect) -> Result<WindowId, AppError> {
        let id = WindowId::new(self.next_id);
        self.next_id += 1;

        let shell = Self::shell_command();
        let title = shell
            .rsplit('/')
            .next()
            .unwrap_or(shell.as_str())
            .to_string();

        let window = Window::floating(id, rect, title);
        let content = window.content_size();
        self.pty_port.spawn(id, &shell, content)?;
        self.screen_port.create(id, content)?;
        self.windows.push_floating(window);
        Ok(id)
    }

    pub fn main_id(&self) -> Option<WindowId> {
        self.windows.main().map(|w| w.id())
    }

    pub fn floating_id(&self) -> Option<WindowId> {
        self.windows.floating().first().map(|w| w.id())
    }

    /// Feed main-shell output into its screen model.
    pub fn process_main_output(&mut self, data: &[u8]) -> Result<(), AppError> {
        let id = self.main_id().ok_or(AppError::NoMainWindow)?;
        self.screen_port.process(id, data)
    }

    /// Feed floating-shell output: capability queries are stripped and
    /// queued for replay to the user terminal (arming the one-shot response
    /// route), the rest updates the screen model, and any OSC 0/2 title is
    /// applied to the window.
    pub fn process_floating_output(&mut self, id: WindowId, data: &[u8]) -> Result<(), AppError> {
        let scanned = self.query_forwarder.scan(id, data);
        self.pending_forwards.extend(scanned.queries);
        self.screen_port.process(id, &scanned.stripped)?;

        if let Some(title) = self.screen_port.take_title(id)?
            && let Some(window) = self.windows.find_floating_mut(id)
        {
            window.set_title(&title);
        }
        Ok(())
    }

    /// Drain the queries queued by `process_floating_output` for verbatim
    /// replay on the user terminal.
    pub fn take_query_forwards(&mut self) -> Vec<Vec<u8>> {
        std::mem::take(&mut self.pending_forwards)
    }

    /// Whether a forwarded query is still waiting for its response.
    pub fn has_pending_query(&self) -> bool {
        self.query_forwarder.is_armed()
    }

    /// Deliver a DA/DSR response read from the user terminal to the pty
    /// that issued the query. Returns false (leaving `data` to be treated
    /// as keystrokes) when no route is armed.
    pub fn route_query_response(&mut self, data: &[u8]) -> Result<bool, AppError> {
        match self.query_forwarder.take_pending() {
            Some(id) => {
                self.pty_port.write(id, data)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn write_to_main(&mut self, data: &[u8]) -> Result<(), AppError> {
        let id = self.main_id().ok_or(AppError::NoMainWindow)?;
        self.pty_port.write(id, data)
    }

    pub fn write_to_floating(&mut self, data: &[u8]) -> Result<(), AppError> {
        let id = self.floating_id().ok_or(AppError::NoFloatingWindow)?;
        self.pty_port.write(id, data)
    }

    pub fn is_overlay_visible(&self) -> bool {
        self.overlay_visible
    }

    pub fn show_overlay(&mut self) {
        self.overlay_visible = true;
        for window in self.windows.floating_mut() {
            window.set_visible(true);
        }
    }

    /// Leave overlay mode and nudge the main shell with SIGWINCH so
    /// prompt/full-screen programs repaint the primary screen.
    pub fn hide_overlay(&mut self) {
        self.overlay_visible = false;
        for window in self.windows.floating_mut() {
            window.set_visible(false);
        }
        if let Some(id) = self.main_id() {
            let _ = self.pty_port.signal_winch(id);
        }
    }

    /// Terminate every child and release ptys and screen models. Floating
    /// shells go first; failures are ignored, exit must proceed.
    pub fn shutdown(&mut self) {
        let floating: Vec<WindowId> = self
            .windows
            .floating()
            .iter()
            .filter(|w| w.has_pty())
            .map(|w| w.id())
            .collect();
        for id in floating {
            let _ = self.pty_port.kill(id);
            let _ = self.screen_port.remove(id);
        }
        if let Some(id) = self.main_id() {
            let _ = self.pty_port.kill(id);
            let _ = self.screen_port.remove(id);
        }
    }

    pub fn windows(&self) -> &WindowManager {
        &self.windows
    }

    pub fn pty_port(&self) -> &P {
        &self.pty_port
    }

    pub fn pty_port_mut(&mut self) -> &mut P {
        &mut self.pty_port
    }

    pub fn screen_port(&self) -> &S {
        &self.screen_port
    }
}
