//! Advisory per-buffer-name creation lock (spec §4.1.3).
//!
//! Used solely to serialize the narrow "create-or-reclaim the buffer and
//! stamp the owner pid" critical section (spec §4.7). Backed by `flock(2)`
//! on a small lock file in a well-known directory; blocking acquisition
//! with a timeout is implemented by polling the non-blocking form, since
//! `flock` itself has no timed variant.

use crate::error::{PlatformError, Result};
use std::fs::{File, OpenOptions};
use std::os::unix::io::AsRawFd;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(2);

/// An acquired creation lock. Unlocked and closed on drop.
pub struct LockGuard {
    file: File,
    path: PathBuf,
}

impl LockGuard {
    /// Blocks (polling) until the advisory lock on `path` is acquired or
    /// `timeout` elapses.
    pub fn acquire(path: &Path, timeout: Duration) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).read(true).write(true).open(path)?;
        let deadline = Instant::now() + timeout;

        loop {
            let rc = unsafe { libc::flock(file.as_raw_fd(), libc::LOCK_EX | libc::LOCK_NB) };
            if rc == 0 {
                return Ok(Self { file, path: path.to_path_buf() });
            }
            let errno = std::io::Error::last_os_error().raw_os_error().unwrap_or(0);
            if errno != libc::EWOULDBLOCK {
                return Err(PlatformError::Io(std::io::Error::last_os_error()));
            }
            if Instant::now() >= deadline {
                return Err(PlatformError::LockTimeout(path.display().to_string()));
            }
            std::thread::sleep(POLL_INTERVAL);
        }
    }
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        let _ = unsafe { libc::flock(self.file.as_raw_fd(), libc::LOCK_UN) };
        let _ = &self.path;
    }
}
