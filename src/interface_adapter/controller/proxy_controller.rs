use crate::interface_adapter::port::{PtyPort, ScreenPort};
use crate::shared::error::AppError;
use crate::usecase::proxy_usecase::ProxyUsecase;

/// Event-loop happenings (infrastructure-independent).
///
/// Each variant maps to a usecase method. The proxy runner converts poll
/// wakes into `AppAction`s and forwards them through
/// `ProxyController::dispatch`.
pub enum AppAction {
    /// Main shell produced output; update its screen model.
    FeedMainOutput(Vec<u8>),
    /// Floating shell produced output; scan queries, update model + title.
    FeedFloatingOutput(Vec<u8>),
    /// User keystrokes bound for the main shell.
    WriteToMain(Vec<u8>),
    /// User keystrokes bound for the floating shell.
    WriteToFloating(Vec<u8>),
    /// A DA/DSR response to hand to whichever pty asked.
    RouteQueryResponse(Vec<u8>),
    /// Overlay becomes visible (frame emission is the runner's job).
    ShowOverlay,
    /// Overlay goes away; the main child gets its SIGWINCH nudge.
    HideOverlay,
}

/// Thin controller that translates `AppAction`s into usecase calls.
///
/// Lives in `interface_adapter` so it has no dependency on infrastructure
/// (poll, termios, stdout). The runner owns a `ProxyController` and uses
/// the usecase accessors for read-side state (frames, pending query
/// forwards) around `dispatch`.
pub struct ProxyController<P: PtyPort, S: ScreenPort> {
    usecase: ProxyUsecase<P, S>,
}

impl<P: PtyPort, S: ScreenPort> ProxyController<P, S> {
    pub fn new(usecase: ProxyUsecase<P, S>) -> Self {
        Self { usecase }
    }

    pub fn dispatch(&mut self, action: AppAction) -> Result<(), AppError> {
        match action {
            AppAction::FeedMainOutput(data) => self.usecase.process_main_output(&data),
            AppAction::FeedFloatingOutput(data) => {
                let id = self
                    .usecase
                    .floating_id()
                    .ok_or(AppError::NoFloatingWindow)?;
                self.usecase.process_floating_output(id, &data)
            }
            AppAction::WriteToMain(data) => self.usecase.write_to_main(&data),
            AppAction::WriteToFloating(data) => self.usecase.write_to_floating(&data),
            AppAction::RouteQueryResponse(data) => {
                self.usecase.route_query_response(&data).map(|_| ())
            }
            AppAction::ShowOverlay => {
                self.usecase.show_overlay();
                Ok(())
            }
            AppAction::HideOverlay => {
                self.usecase.hide_overlay();
                Ok(())
            }
        }
    }

    /// Read accessor for frame composition.
    pub fn usecase(&self) -> &ProxyUsecase<P, S> {
        &self.usecase
    }

    /// Mutable accessor for operations outside `dispatch()`, such as
    /// draining pending query forwards or shutdown.
    pub fn usecase_mut(&mut self) -> &mut ProxyUsecase<P, S> {
        &mut self.usecase
    }
}
