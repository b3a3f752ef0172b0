//! `zerobuffer-platform`: OS primitives for the ZeroBuffer shared-memory
//! transport.
//!
//! This crate is the one place that talks to the operating system: named
//! shared memory, named counting semaphores, the per-buffer-name creation
//! lock, and a process-liveness probe. Everything above this crate
//! (`zerobuffer-core`, `zerobuffer`) works in terms of these abstractions
//! and never calls into `libc` directly.
//!
//! Only unix targets are implemented; there is no portable subset of this
//! crate's surface that would work unmodified on Windows (named semaphores
//! and shared memory follow different OS APIs there), so the crate simply
//! does not build outside `cfg(unix)`.

#![cfg(unix)]

mod error;
mod liveness;
mod lock;
pub mod naming;
mod semaphore;
mod shm;

pub use error::{PlatformError, Result};
pub use liveness::{current_pid, is_process_alive};
pub use lock::LockGuard;
pub use semaphore::{NamedSemaphore, WaitOutcome};
pub use shm::SharedMemory;
