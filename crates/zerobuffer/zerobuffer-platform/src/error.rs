use std::io;

/// Failures from the OS-primitive layer: shared memory, named semaphores,
/// the creation lock, and the liveness probe.
#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("name '{0}' is not valid for an OS-resolved shared resource")]
    InvalidName(String),

    #[error("named semaphore operation failed: {0}")]
    Semaphore(String),

    #[error("timed out waiting for the creation lock on '{0}'")]
    LockTimeout(String),

    #[error("system resource exhausted: {0}")]
    ResourceExhausted(String),
}

pub type Result<T> = std::result::Result<T, PlatformError>;

/// `true` for the errno values that mean "the OS has run out of some
/// resource" (too many open files/semaphores, no space for a new mapping)
/// rather than "this particular name/operation is invalid" — spec §6.4
/// names `SystemResourceExhausted` as its own error kind, distinct from a
/// generic I/O failure.
pub(crate) fn is_resource_exhaustion(errno: i32) -> bool {
    matches!(errno, libc::ENOSPC | libc::ENOMEM | libc::EMFILE | libc::ENFILE)
}
