//! Resource naming conventions for a ZeroBuffer buffer name `N` (spec §6.1).
//!
//! - Shared memory object: a regular file named `N` under a shared-memory
//!   backed directory (`/dev/shm` on Linux; the caller's temp directory
//!   elsewhere). POSIX requires a leading `/` for `shm_open`-style names;
//!   we sidestep that API and use plain files so the same code path works
//!   on every unix, matching the convention `lithos-mmap` uses for its
//!   memory-mapped files.
//! - Semaphores: `sem-w-<N>` (data-available, writer posts) and
//!   `sem-r-<N>` (space-available, reader posts), as named POSIX
//!   semaphores (`sem_open`), which do require the leading `/`.
//! - Creation lock file: `<N>.lock` under the same well-known directory.

use crate::error::{PlatformError, Result};
use std::path::{Path, PathBuf};

/// Maximum buffer name length. POSIX semaphore names are commonly capped at
/// 251 usable characters (`NAME_MAX` minus the `sem.` prefix on Linux); we
/// pick a conservative limit that leaves room for our own prefixes.
pub const MAX_NAME_LEN: usize = 200;

pub fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() || name.len() > MAX_NAME_LEN || name.contains('/') || name.contains('\0') {
        return Err(PlatformError::InvalidName(name.to_string()));
    }
    Ok(())
}

pub fn shm_path(base_dir: &Path, name: &str) -> PathBuf {
    base_dir.join(format!("zerobuffer-{name}"))
}

pub fn lock_path(base_dir: &Path, name: &str) -> PathBuf {
    base_dir.join(format!("zerobuffer-{name}.lock"))
}

/// POSIX named-semaphore name for the "data available" semaphore (writer posts).
pub fn sem_name_write(name: &str) -> String {
    format!("/zb-w-{name}")
}

/// POSIX named-semaphore name for the "space available" semaphore (reader posts).
pub fn sem_name_read(name: &str) -> String {
    format!("/zb-r-{name}")
}

/// Default directory for the shared-memory backing files.
///
/// Linux exposes a tmpfs at `/dev/shm` shared by all processes; other unixes
/// (and the CI sandboxes this crate is tested in) may not have it, so we
/// fall back to the system temp directory.
pub fn default_shm_dir() -> PathBuf {
    let dev_shm = Path::new("/dev/shm");
    if dev_shm.is_dir() {
        dev_shm.to_path_buf()
    } else {
        std::env::temp_dir()
    }
}

/// Default directory for per-buffer creation-lock files.
pub fn default_lock_dir() -> PathBuf {
    std::env::temp_dir().join("zerobuffer-locks")
}
