use std::collections::HashMap;
use std::io::{self, Read, Write};
use std::os::fd::RawFd;
use std::sync::Mutex;

use portable_pty::{CommandBuilder, PtySize, native_pty_system};

use crate::domain::primitive::{TerminalSize, WindowId};
use crate::interface_adapter::port::pty_port::PtyPort;
use crate::shared::error::AppError;

/// Internal state for a single spawned pty process.
struct PtyInstance {
    _master: Box<dyn portable_pty::MasterPty + Send>,
    child: Box<dyn portable_pty::Child + Send + Sync>,
    reader: Box<dyn Read + Send>,
    writer: Box<dyn Write + Send>,
    raw_fd: RawFd,
    child_pid: Option<u32>,
}

/// Concrete implementation of `PtyPort` using the `portable-pty` crate.
///
/// Manages the main-shell and floating-shell ptys indexed by `WindowId`.
/// The inner `HashMap` is wrapped in a `Mutex` to satisfy the `Sync` bound
/// required by `PtyPort`. Since all mutating `PtyPort` methods take
/// `&mut self`, exclusive access is guaranteed at the type level and the
/// lock will never actually contend.
pub struct PortablePtyAdapter {
    instances: Mutex<HashMap<WindowId, PtyInstance>>,
}

impl PortablePtyAdapter {
    pub fn new() -> Self {
        Self {
            instances: Mutex::new(HashMap::new()),
        }
    }
}

/// Convert domain `TerminalSize` to portable-pty `PtySize`.
fn to_pty_size(size: TerminalSize) -> PtySize {
    PtySize {
        rows: size.rows,
        cols: size.cols,
        pixel_width: 0,
        pixel_height: 0,
    }
}

/// Set the file descriptor to non-blocking mode using libc fcntl.
///
/// # Safety
/// Calls libc::fcntl which is an unsafe FFI function. The fd must be a
/// valid open file descriptor.
fn set_nonblocking(fd: RawFd) -> io::Result<()> {
    // SAFETY: `fd` is a valid open file descriptor obtained from the pty
    // master. `fcntl` with `F_GETFL`/`F_SETFL` is safe for valid fds.
    unsafe {
        let flags = libc::fcntl(fd, libc::F_GETFL);
        if flags < 0 {
            return Err(io::Error::last_os_error());
        }
        let result = libc::fcntl(fd, libc::F_SETFL, flags | libc::O_NONBLOCK);
        if result < 0 {
            return Err(io::Error::last_os_error());
        }
    }
    Ok(())
}

/// Deliver `signal` to `pid`.
fn send_signal(pid: u32, signal: libc::c_int) -> io::Result<()> {
    // SAFETY: plain kill(2) on a pid this adapter spawned and still tracks.
    let result = unsafe { libc::kill(pid as libc::pid_t, signal) };
    if result < 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

impl PtyPort for PortablePtyAdapter {
    fn spawn(&mut self, id: WindowId, shell: &str, size: TerminalSize) -> Result<(), AppError> {
        let pty_system = native_pty_system();

        let pair = pty_system
            .openpty(to_pty_size(size))
            .map_err(|e| AppError::PtySpawn(io::Error::other(e.to_string())))?;

        let mut cmd = CommandBuilder::new(shell);
        // The shell inherits the full parent environment; TERM is pinned to
        // what the vt100 screen model actually understands.
        cmd.env("TERM", "xterm-256color");

        let child = pair
            .slave
            .spawn_command(cmd)
            .map_err(|e| AppError::PtySpawn(io::Error::other(e.to_string())))?;
        let child_pid = child.process_id();

        let reader = pair
            .master
            .try_clone_reader()
            .map_err(|e| AppError::PtySpawn(io::Error::other(e.to_string())))?;

        let writer = pair
            .master
            .take_writer()
            .map_err(|e| AppError::PtySpawn(io::Error::other(e.to_string())))?;

        // The poll set needs the master fd, and reads must be non-blocking.
        // The reader shares the same underlying file description as the
        // master, so O_NONBLOCK set on the master affects reads as well.
        let raw_fd = pair.master.as_raw_fd().ok_or_else(|| {
            AppError::PtySpawn(io::Error::other("pty master has no file descriptor"))
        })?;
        set_nonblocking(raw_fd).map_err(AppError::PtySpawn)?;

        let instance = PtyInstance {
            _master: pair.master,
            child,
            reader,
            writer,
            raw_fd,
            child_pid,
        };

        let mut instances = self.instances.lock().expect("pty instances lock poisoned");
        instances.insert(id, instance);
        Ok(())
    }

    fn read(&mut self, id: WindowId) -> Result<Vec<u8>, AppError> {
        let mut instances = self.instances.lock().expect("pty instances lock poisoned");
        let instance = instances.get_mut(&id).ok_or(AppError::WindowNotFound(id))?;

        let mut buf = [0u8; 4096];
        match instance.reader.read(&mut buf) {
            Ok(0) => Err(AppError::PtyIo {
                id,
                source: io::Error::new(io::ErrorKind::UnexpectedEof, "pty closed"),
            }),
            Ok(n) => Ok(buf[..n].to_vec()),
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => Ok(Vec::new()),
            Err(e) => Err(AppError::PtyIo { id, source: e }),
        }
    }

    fn write(&mut self, id: WindowId, data: &[u8]) -> Result<(), AppError> {
        let mut instances = self.instances.lock().expect("pty instances lock poisoned");
        let instance = instances.get_mut(&id).ok_or(AppError::WindowNotFound(id))?;

        instance
            .writer
            .write_all(data)
            .map_err(|e| AppError::PtyIo { id, source: e })
    }

    fn raw_fd(&self, id: WindowId) -> Result<RawFd, AppError> {
        let instances = self.instances.lock().expect("pty instances lock poisoned");
        instances
            .get(&id)
            .map(|inst| inst.raw_fd)
            .ok_or(AppError::WindowNotFound(id))
    }

    fn signal_winch(&mut self, id: WindowId) -> Result<(), AppError> {
        let instances = self.instances.lock().expect("pty instances lock poisoned");
        let instance = instances.get(&id).ok_or(AppError::WindowNotFound(id))?;

        match instance.child_pid {
            Some(pid) => send_signal(pid, libc::SIGWINCH).map_err(|e| AppError::PtyIo {
                id,
                source: e,
            }),
            None => Ok(()),
        }
    }

    fn kill(&mut self, id: WindowId) -> Result<(), AppError> {
        let mut instances = self.instances.lock().expect("pty instances lock poisoned");
        let mut instance = instances.remove(&id).ok_or(AppError::WindowNotFound(id))?;

        if let Some(pid) = instance.child_pid {
            let _ = send_signal(pid, libc::SIGTERM);
        }
        // Dropping the instance closes the master fd, which hangs up the
        // slave side; a shell that ignores SIGTERM still exits on hangup.
        // Reap opportunistically without blocking shutdown.
        let _ = instance.child.try_wait();
        Ok(())
    }
}
