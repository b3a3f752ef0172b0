//! `zerobuffer-core`: the on-memory ZeroBuffer protocol — OIEB layout,
//! frame header format, and the ring-buffer engine (spec §3, §4.2, §4.3).
//!
//! This crate does no I/O and makes no OS calls; it only interprets bytes
//! it is given pointers to. `zerobuffer-platform` supplies the shared
//! memory, semaphores, and liveness probe; `zerobuffer` wires the two
//! together into the `Reader`/`Writer`/duplex API.

pub mod error;
pub mod frame;
pub mod layout;
pub mod oieb;
pub mod ring;

pub use error::CoreError;
pub use frame::{framed_len, FrameHeader, ALIGNMENT, HEADER_SIZE};
pub use layout::{BufferConfig, RegionLayout};
pub use oieb::Oieb;
pub use ring::{HeaderPeek, PrepareOutcome, RingEngine};
