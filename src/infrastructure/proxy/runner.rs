use std::io::{self, Write};
use std::os::fd::RawFd;

use anyhow::Context;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use tracing::{error, info, warn};

use crate::domain::primitive::{TerminalSize, WindowId, WindowRect};
use crate::infrastructure::proxy::{input, poller};
use crate::infrastructure::render::compositor;
use crate::interface_adapter::controller::{AppAction, ProxyController};
use crate::interface_adapter::port::{PtyPort, ScreenPort};

const STDIN_FD: RawFd = 0;
const READ_CHUNK: usize = 4096;

/// Bounds for the pre-overlay drain of main-shell output.
const DRAIN_ROUNDS: usize = 5;
const DRAIN_POLL_MS: i32 = 1;

/// Restores cooked mode if the loop unwinds; the ordinary exit paths run
/// the explicit cleanup in `run` first, for which this is a no-op.
struct RawModeGuard;

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
    }
}

/// Host terminal size, falling back to 24x80 when the query fails (e.g.
/// stdout is not a tty).
fn host_size() -> TerminalSize {
    crossterm::terminal::size()
        .map(|(cols, rows)| TerminalSize::new(cols, rows))
        .unwrap_or(TerminalSize::new(80, 24))
}

/// Startup geometry for the overlay window: centered, two thirds of the
/// host in each dimension.
fn overlay_rect(host: TerminalSize) -> WindowRect {
    let width = (host.cols * 2 / 3).max(20).min(host.cols);
    let height = (host.rows * 2 / 3).max(6).min(host.rows);
    WindowRect::new(
        (host.cols - width) / 2,
        (host.rows - height) / 2,
        width,
        height,
    )
}

/// Initialize the proxy, run the event loop, and clean up on every path:
/// cooked mode is always restored and both shells are terminated.
pub fn run<P: PtyPort, S: ScreenPort>(mut controller: ProxyController<P, S>) -> anyhow::Result<()> {
    let host = host_size();
    info!("host terminal {}x{}", host.cols, host.rows);

    let main_id = controller
        .usecase_mut()
        .open_main_window(host)
        .context("failed to start the main shell")?;
    let float_id = controller
        .usecase_mut()
        .open_floating_window(overlay_rect(host))
        .context("failed to start the overlay shell")?;

    enable_raw_mode().context("failed to set raw mode on the terminal")?;
    let _guard = RawModeGuard;

    let result = main_loop(&mut controller, main_id, float_id);

    // The loop can end with the overlay still up (main shell died under
    // it); emit the balancing alternate-screen leave before restoring.
    if controller.usecase().is_overlay_visible() {
        let mut stdout = io::stdout();
        let _ = stdout.write_all(compositor::LEAVE_ALTERNATE_SCREEN);
        let _ = stdout.flush();
    }
    let _ = disable_raw_mode();
    controller.usecase_mut().shutdown();
    info!("proxy stopped");
    result
}

fn main_loop<P: PtyPort, S: ScreenPort>(
    controller: &mut ProxyController<P, S>,
    main_id: WindowId,
    float_id: WindowId,
) -> anyhow::Result<()> {
    let mut stdout = io::stdout();
    let mut frame: Vec<u8> = Vec::with_capacity(64 * 1024);

    let main_fd = controller.usecase().pty_port().raw_fd(main_id)?;
    let mut float_fd = controller.usecase().pty_port().raw_fd(float_id)?;

    loop {
        let events = poller::wait(&[STDIN_FD, main_fd, float_fd], -1)?;
        let (stdin_ev, main_ev, float_ev) = (events[0], events[1], events[2]);

        if stdin_ev.readable {
            let mut buf = [0u8; READ_CHUNK];
            let n = match read_fd(STDIN_FD, &mut buf) {
                Ok(0) => {
                    info!("stdin closed");
                    break;
                }
                Ok(n) => n,
                Err(e) => {
                    error!("stdin read failed: {e}");
                    break;
                }
            };
            let data = &buf[..n];

            if controller.usecase().has_pending_query() && input::is_query_response(data) {
                // A dead overlay shell swallows its response silently.
                let _ = controller.dispatch(AppAction::RouteQueryResponse(data.to_vec()));
            } else if input::is_overlay_hotkey(data) {
                toggle_overlay(controller, &mut stdout, &mut frame, main_id, main_fd)?;
            } else if controller.usecase().is_overlay_visible() {
                let _ = controller.dispatch(AppAction::WriteToFloating(data.to_vec()));
            } else if let Err(e) = controller.dispatch(AppAction::WriteToMain(data.to_vec())) {
                error!("write to main shell failed: {e}");
                break;
            }
        }

        if main_ev.readable {
            match controller.usecase_mut().pty_port_mut().read(main_id) {
                Ok(data) if data.is_empty() => {}
                Ok(data) => {
                    controller.dispatch(AppAction::FeedMainOutput(data.clone()))?;
                    if controller.usecase().is_overlay_visible() {
                        write_full_frame(controller, &mut stdout, &mut frame)?;
                    } else {
                        stdout.write_all(&data)?;
                        stdout.flush()?;
                    }
                }
                Err(e) => {
                    info!("main shell ended: {e}");
                    break;
                }
            }
        }
        if main_ev.hangup {
            info!("main shell hung up");
            break;
        }

        if float_fd >= 0 {
            if float_ev.readable {
                match controller.usecase_mut().pty_port_mut().read(float_id) {
                    Ok(data) if data.is_empty() => {}
                    Ok(data) => {
                        controller.dispatch(AppAction::FeedFloatingOutput(data))?;

                        // Capability queries go to the real terminal; its
                        // answer comes back through the one-shot route.
                        let forwards = controller.usecase_mut().take_query_forwards();
                        if !forwards.is_empty() {
                            for query in forwards {
                                stdout.write_all(&query)?;
                            }
                            stdout.flush()?;
                        }

                        if controller.usecase().is_overlay_visible() {
                            write_full_frame(controller, &mut stdout, &mut frame)?;
                        }
                    }
                    Err(e) => {
                        warn!("overlay shell read failed: {e}");
                    }
                }
            }
            if float_ev.hangup {
                // The overlay stays toggleable but inert; writes to its
                // pty fail silently from here on.
                info!("overlay shell hung up");
                float_fd = -1;
            }
        }
    }

    Ok(())
}

fn toggle_overlay<P: PtyPort, S: ScreenPort>(
    controller: &mut ProxyController<P, S>,
    stdout: &mut io::Stdout,
    frame: &mut Vec<u8>,
    main_id: WindowId,
    main_fd: RawFd,
) -> anyhow::Result<()> {
    if controller.usecase().is_overlay_visible() {
        info!("overlay hidden");
        frame.clear();
        compositor::render_main_only(
            frame,
            controller.usecase().windows(),
            controller.usecase().screen_port(),
        )?;
        frame.extend_from_slice(compositor::LEAVE_ALTERNATE_SCREEN);
        stdout.write_all(frame)?;
        stdout.flush()?;
        controller.dispatch(AppAction::HideOverlay)?;
    } else {
        info!("overlay shown");
        drain_main(controller, stdout, main_id, main_fd)?;
        controller.dispatch(AppAction::ShowOverlay)?;
        frame.clear();
        frame.extend_from_slice(compositor::ENTER_ALTERNATE_SCREEN);
        compositor::render_all(
            frame,
            controller.usecase().windows(),
            controller.usecase().screen_port(),
        )?;
        stdout.write_all(frame)?;
        stdout.flush()?;
    }
    Ok(())
}

/// Before leaving the primary screen, give the main shell a short window
/// to finish writing so the screen model agrees with what the user saw.
/// Bounded so a chatty shell cannot stall the toggle.
fn drain_main<P: PtyPort, S: ScreenPort>(
    controller: &mut ProxyController<P, S>,
    stdout: &mut io::Stdout,
    main_id: WindowId,
    main_fd: RawFd,
) -> anyhow::Result<()> {
    for _ in 0..DRAIN_ROUNDS {
        let events = poller::wait(&[main_fd], DRAIN_POLL_MS)?;
        if !events[0].readable {
            break;
        }
        match controller.usecase_mut().pty_port_mut().read(main_id) {
            Ok(data) if !data.is_empty() => {
                controller.dispatch(AppAction::FeedMainOutput(data.clone()))?;
                stdout.write_all(&data)?;
                stdout.flush()?;
            }
            _ => break,
        }
    }
    Ok(())
}

/// Compose one full frame into the reusable buffer and hand it to the
/// terminal in a single write + flush.
fn write_full_frame<P: PtyPort, S: ScreenPort>(
    controller: &ProxyController<P, S>,
    stdout: &mut io::Stdout,
    frame: &mut Vec<u8>,
) -> io::Result<()> {
    frame.clear();
    compositor::render_all(
        frame,
        controller.usecase().windows(),
        controller.usecase().screen_port(),
    )?;
    stdout.write_all(frame)?;
    stdout.flush()
}

/// Direct read(2). Stdin must bypass the std buffered handle so poll(2)
/// readability and actual reads stay in agreement.
fn read_fd(fd: RawFd, buf: &mut [u8]) -> io::Result<usize> {
    // SAFETY: buf is a valid writable region for the duration of the call.
    let n = unsafe { libc::read(fd, buf.as_mut_ptr() as *mut libc::c_void, buf.len()) };
    if n < 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(n as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlay_rect_is_centered_two_thirds() {
        let rect = overlay_rect(TerminalSize::new(120, 36));
        assert_eq!(rect, WindowRect::new(20, 6, 80, 24));
    }

    #[test]
    fn overlay_rect_respects_minimums_on_small_hosts() {
        let rect = overlay_rect(TerminalSize::new(24, 8));
        assert_eq!(rect.width, 20);
        assert_eq!(rect.height, 6);
        assert_eq!(rect.x, 2);
        assert_eq!(rect.y, 1);
    }

    #[test]
    fn overlay_rect_never_exceeds_the_host() {
        let rect = overlay_rect(TerminalSize::new(10, 4));
        assert!(rect.width <= 10);
        assert!(rect.height <= 4);
        assert_eq!(rect.x, 0);
        assert_eq!(rect.y, 0);
    }
}
