//! ZeroBuffer: a single-producer / single-consumer shared-memory transport
//! for large, variable-sized binary frames.
//!
//! A writer and a reader in independent processes exchange frames through a
//! named shared-memory ring buffer, coordinated by two counting semaphores.
//! The reader observes each frame in place (zero-copy) and holds a borrow
//! into shared memory ([`Frame`]) until it releases it.
//!
//! ```no_run
//! use std::time::Duration;
//! use zerobuffer::{BufferConfig, Reader, Writer};
//!
//! # fn main() -> zerobuffer::Result<()> {
//! let mut reader = Reader::create("example", BufferConfig::new(0, 1 << 20))?;
//! let mut writer = Writer::connect("example")?;
//!
//! writer.write_frame(b"hello", Duration::from_secs(1))?;
//! let frame = reader.read_frame(Duration::from_secs(1))?;
//! assert_eq!(&frame[..], b"hello");
//! reader.release_frame(frame);
//! # Ok(())
//! # }
//! ```
//!
//! Logging is emitted via `tracing` at connect, disconnect, stale-buffer
//! reclamation, and corruption; install a subscriber (e.g.
//! `tracing-subscriber`) in the host application to see it.

mod duplex;
mod error;
mod frame;
mod reader;
mod region;
mod writer;

pub use duplex::{
    DuplexClient, DuplexServer, ServerHandler, ServerHandlerMut, DEFAULT_DUPLEX_METADATA_SIZE, DEFAULT_DUPLEX_PAYLOAD_SIZE,
};
pub use error::{Result, ZeroBufferError};
pub use frame::Frame;
pub use reader::Reader;
pub use writer::Writer;

pub use zerobuffer_config::RuntimeConfig;
pub use zerobuffer_core::BufferConfig;
