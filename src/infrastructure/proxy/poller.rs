use std::io;
use std::os::fd::RawFd;

/// Readiness of one polled file descriptor.
#[derive(Debug, Clone, Copy, Default)]
pub struct FdEvents {
    pub readable: bool,
    pub hangup: bool,
}

/// Block until one of `fds` is readable or hung up, or until `timeout_ms`
/// elapses (-1 blocks forever). Results align with the input slice.
///
/// Negative fds are skipped, matching poll(2) semantics; a disabled pty
/// slot is represented as -1. EINTR restarts the wait.
pub fn wait(fds: &[RawFd], timeout_ms: i32) -> io::Result<Vec<FdEvents>> {
    let mut pfds: Vec<libc::pollfd> = fds
        .iter()
        .map(|&fd| libc::pollfd {
            fd,
            events: libc::POLLIN,
            revents: 0,
        })
        .collect();

    loop {
        // SAFETY: `pfds` is a valid array of initialized pollfd structs for
        // the duration of the call.
        let rc = unsafe { libc::poll(pfds.as_mut_ptr(), pfds.len() as libc::nfds_t, timeout_ms) };
        if rc >= 0 {
            break;
        }
        let err = io::Error::last_os_error();
        if err.kind() != io::ErrorKind::Interrupted {
            return Err(err);
        }
    }

    Ok(pfds
        .iter()
        .map(|p| FdEvents {
            readable: p.revents & libc::POLLIN != 0,
            hangup: p.revents & (libc::POLLHUP | libc::POLLERR) != 0,
        })
        .collect())
}
