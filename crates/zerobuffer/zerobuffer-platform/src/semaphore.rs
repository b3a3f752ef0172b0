//! POSIX named counting semaphores: create-or-open, timed wait, post.
//!
//! Semantics required by spec §4.1.2: no lost wakeups, non-negative count,
//! and a `wait_timeout` that returns a distinct "timed out" outcome rather
//! than conflating it with "would block forever" or an error.

use crate::error::{PlatformError, Result};
use std::ffi::CString;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    Signaled,
    TimedOut,
}

/// A handle to a named POSIX semaphore.
///
/// `Send` because ownership (and thus the syscalls made through it) can
/// move between threads; not `Sync` by convention here even though the
/// kernel object itself is thread-safe, because callers share one handle
/// per `Reader`/`Writer` and those types are documented single-threaded
/// (spec §5).
pub struct NamedSemaphore {
    handle: *mut libc::sem_t,
    name: String,
}

unsafe impl Send for NamedSemaphore {}

impl NamedSemaphore {
    /// Creates a new named semaphore with the given initial count, failing
    /// if one already exists under this name (`O_CREAT | O_EXCL`).
    pub fn create(name: &str, initial_value: u32) -> Result<Self> {
        let c_name = to_cstring(name)?;
        let handle = unsafe {
            libc::sem_open(
                c_name.as_ptr(),
                libc::O_CREAT | libc::O_EXCL,
                0o600u32,
                initial_value,
            )
        };
        check_handle(handle, name)?;
        Ok(Self { handle, name: name.to_string() })
    }

    /// Opens an existing named semaphore.
    pub fn open(name: &str) -> Result<Self> {
        let c_name = to_cstring(name)?;
        let handle = unsafe { libc::sem_open(c_name.as_ptr(), 0) };
        check_handle(handle, name)?;
        Ok(Self { handle, name: name.to_string() })
    }

    /// Increments the semaphore count, waking one waiter if any is blocked.
    pub fn post(&self) -> Result<()> {
        let rc = unsafe { libc::sem_post(self.handle) };
        if rc != 0 {
            return Err(last_os_error("sem_post", &self.name));
        }
        Ok(())
    }

    /// Blocks until the count is positive (decrementing it) or `timeout`
    /// elapses, whichever comes first.
    #[cfg(target_os = "linux")]
    pub fn wait_timeout(&self, timeout: Duration) -> Result<WaitOutcome> {
        let mut ts = unsafe { std::mem::zeroed::<libc::timespec>() };
        if unsafe { libc::clock_gettime(libc::CLOCK_REALTIME, &mut ts) } != 0 {
            return Err(last_os_error("clock_gettime", &self.name));
        }
        ts.tv_sec += timeout.as_secs() as libc::time_t;
        ts.tv_nsec += timeout.subsec_nanos() as libc::c_long;
        if ts.tv_nsec >= 1_000_000_000 {
            ts.tv_sec += 1;
            ts.tv_nsec -= 1_000_000_000;
        }

        loop {
            let rc = unsafe { libc::sem_timedwait(self.handle, &ts) };
            if rc == 0 {
                return Ok(WaitOutcome::Signaled);
            }
            let errno = io_errno();
            match errno {
                libc::EINTR => continue,
                libc::ETIMEDOUT => return Ok(WaitOutcome::TimedOut),
                _ => return Err(last_os_error("sem_timedwait", &self.name)),
            }
        }
    }

    /// Portable fallback for platforms without `sem_timedwait` (notably
    /// macOS): poll `sem_trywait` with a short sleep, exactly the approach
    /// used for cross-process semaphore waits when a timed primitive isn't
    /// available on the host OS.
    #[cfg(not(target_os = "linux"))]
    pub fn wait_timeout(&self, timeout: Duration) -> Result<WaitOutcome> {
        let deadline = std::time::Instant::now() + timeout;
        const POLL_INTERVAL: Duration = Duration::from_millis(1);
        loop {
            let rc = unsafe { libc::sem_trywait(self.handle) };
            if rc == 0 {
                return Ok(WaitOutcome::Signaled);
            }
            let errno = io_errno();
            if errno != libc::EAGAIN {
                return Err(last_os_error("sem_trywait", &self.name));
            }
            if std::time::Instant::now() >= deadline {
                return Ok(WaitOutcome::TimedOut);
            }
            std::thread::sleep(POLL_INTERVAL.min(deadline - std::time::Instant::now()).max(Duration::from_micros(100)));
        }
    }

    /// Removes the name so future `open`/`create` calls see a fresh
    /// semaphore. Existing handles (in this or other processes) remain
    /// valid until closed, mirroring `SharedMemory::unlink`.
    pub fn unlink(name: &str) -> Result<()> {
        let c_name = to_cstring(name)?;
        let rc = unsafe { libc::sem_unlink(c_name.as_ptr()) };
        if rc != 0 {
            let errno = io_errno();
            if errno != libc::ENOENT {
                return Err(last_os_error("sem_unlink", name));
            }
        }
        Ok(())
    }
}

impl Drop for NamedSemaphore {
    fn drop(&mut self) {
        unsafe {
            libc::sem_close(self.handle);
        }
    }
}

fn to_cstring(name: &str) -> Result<CString> {
    CString::new(name).map_err(|_| PlatformError::InvalidName(name.to_string()))
}

fn check_handle(handle: *mut libc::sem_t, name: &str) -> Result<()> {
    if handle == libc::SEM_FAILED {
        return Err(last_os_error("sem_open", name));
    }
    Ok(())
}

fn io_errno() -> i32 {
    io::Error::last_os_error().raw_os_error().unwrap_or(0)
}

fn last_os_error(op: &str, name: &str) -> PlatformError {
    let err = io::Error::last_os_error();
    if crate::error::is_resource_exhaustion(err.raw_os_error().unwrap_or(0)) {
        return PlatformError::ResourceExhausted(format!("{op}({name}): {err}"));
    }
    PlatformError::Semaphore(format!("{op}({name}) failed: {err}"))
}

use std::io;
