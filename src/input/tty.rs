//! Scoped raw-mode handle on the controlling terminal.

use crate::model::TtyError;
use std::fs::{File, OpenOptions};
use std::io::{self, Read};
use std::os::fd::AsRawFd;
use std::os::unix::fs::OpenOptionsExt;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Controlling terminal device.
pub const TTY_PATH: &str = "/dev/tty";

/// `/dev/tty` in non-canonical, no-echo, non-blocking-read mode.
///
/// The saved attributes are restored and the descriptor closed exactly once,
/// when the guard is dropped.
pub struct RawTty {
    file: File,
    saved: libc::termios,
}

impl RawTty {
    /// Open [`TTY_PATH`] in raw mode.
    pub fn open() -> Result<Self, TtyError> {
        Self::open_path(Path::new(TTY_PATH))
    }

    /// Open `path` in raw mode.
    ///
    /// SIGTTIN is ignored first so reading from a background process group
    /// does not stop the process.
    pub fn open_path(path: &Path) -> Result<Self, TtyError> {
        // SAFETY: installing SIG_IGN has no handler code to run.
        unsafe {
            libc::signal(libc::SIGTTIN, libc::SIG_IGN);
        }

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .custom_flags(libc::O_NOCTTY)
            .open(path)
            .map_err(|source| TtyError::Open {
                path: PathBuf::from(path),
                source,
            })?;
        let fd = file.as_raw_fd();

        // SAFETY: termios is plain data; tcgetattr fully initialises it on success.
        let mut saved: libc::termios = unsafe { std::mem::zeroed() };
        // SAFETY: `fd` is open for the lifetime of `file`.
        if unsafe { libc::tcgetattr(fd, &mut saved) } != 0 {
            return Err(TtyError::Attributes {
                op: "read",
                source: io::Error::last_os_error(),
            });
        }

        let mut raw = saved;
        raw.c_lflag &= !(libc::ICANON | libc::ECHO);
        raw.c_cc[libc::VMIN] = 0;
        raw.c_cc[libc::VTIME] = 0;
        // SAFETY: as above; `raw` is a valid termios derived from the device.
        if unsafe { libc::tcsetattr(fd, libc::TCSANOW, &raw) } != 0 {
            return Err(TtyError::Attributes {
                op: "set",
                source: io::Error::last_os_error(),
            });
        }

        tracing::debug!(path = %path.display(), "Terminal switched to raw input");
        Ok(Self { file, saved })
    }

    /// Wait up to `timeout` for input. Interrupted waits report no input.
    pub fn poll_readable(&self, timeout: Duration) -> io::Result<bool> {
        let mut pfd = libc::pollfd {
            fd: self.file.as_raw_fd(),
            events: libc::POLLIN,
            revents: 0,
        };
        let millis = libc::c_int::try_from(timeout.as_millis()).unwrap_or(libc::c_int::MAX);
        // SAFETY: one valid pollfd for the duration of the call.
        let ready = unsafe { libc::poll(&mut pfd, 1, millis) };
        if ready < 0 {
            let err = io::Error::last_os_error();
            return if err.kind() == io::ErrorKind::Interrupted {
                Ok(false)
            } else {
                Err(err)
            };
        }
        if pfd.revents & (libc::POLLERR | libc::POLLHUP | libc::POLLNVAL) != 0 {
            return Err(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "terminal device hung up",
            ));
        }
        Ok(ready > 0)
    }

    /// Read whatever is available; `Ok(0)` when nothing is.
    pub fn read(&self, buf: &mut [u8]) -> io::Result<usize> {
        match (&self.file).read(buf) {
            Err(e) if matches!(e.kind(), io::ErrorKind::Interrupted | io::ErrorKind::WouldBlock) => Ok(0),
            other => other,
        }
    }
}

impl Drop for RawTty {
    fn drop(&mut self) {
        // SAFETY: the descriptor is still open; `file` closes it after this.
        let rc = unsafe { libc::tcsetattr(self.file.as_raw_fd(), libc::TCSANOW, &self.saved) };
        if rc != 0 {
            tracing::warn!(error = %io::Error::last_os_error(), "Failed to restore terminal attributes");
        } else {
            tracing::debug!("Terminal attributes restored");
        }
    }
}
