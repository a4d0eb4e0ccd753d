//! Liveness of the external editor process.

use std::io;

/// Watched process id; the pager lives as long as this process does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessWatch {
    pid: libc::pid_t,
}

impl ProcessWatch {
    /// Watch `pid`. Returns `None` for ids that do not name a single process.
    pub fn new(pid: u32) -> Option<Self> {
        libc::pid_t::try_from(pid)
            .ok()
            .filter(|pid| *pid > 0)
            .map(|pid| Self { pid })
    }

    /// The watched id.
    pub fn pid(&self) -> u32 {
        self.pid.unsigned_abs()
    }

    /// Probe with signal 0. Only "no such process" counts as dead; a
    /// permission error means the process exists.
    pub fn is_alive(&self) -> bool {
        // SAFETY: signal 0 performs the permission and existence checks only.
        let result = unsafe { libc::kill(self.pid, 0) };
        if result == 0 {
            return true;
        }
        io::Error::last_os_error().raw_os_error() != Some(libc::ESRCH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::process::Command;

    #[test]
    fn current_process_is_alive() {
        let watch = ProcessWatch::new(std::process::id()).unwrap();
        assert!(watch.is_alive());
    }

    #[test]
    fn reaped_child_is_dead() {
        let mut child = Command::new("true").spawn().unwrap();
        let pid = child.id();
        child.wait().unwrap();
        assert!(!ProcessWatch::new(pid).unwrap().is_alive());
    }

    #[test]
    fn zero_and_overflowing_ids_are_rejected() {
        assert!(ProcessWatch::new(0).is_none());
        assert!(ProcessWatch::new(u32::MAX).is_none());
    }
}
