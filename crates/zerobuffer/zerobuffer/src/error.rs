//! Public error surface (spec §6.4), unifying `zerobuffer-core`'s
//! protocol-level errors and `zerobuffer-platform`'s OS-level errors with
//! the liveness/timeout/lifecycle errors that only this layer can detect.

use zerobuffer_core::CoreError;
use zerobuffer_platform::PlatformError;

#[derive(Debug, thiserror::Error)]
pub enum ZeroBufferError {
    #[error("a live reader already owns buffer '{0}'")]
    BufferAlreadyExists(String),

    #[error("no buffer named '{0}' exists")]
    BufferNotFound(String),

    #[error("buffer '{0}' already has a connected writer")]
    WriterAlreadyConnected(String),

    #[error("the reader for this buffer has died")]
    ReaderDead,

    #[error("the writer for this buffer has died")]
    WriterDead,

    #[error("operation timed out")]
    Timeout,

    #[error("frame size must be non-zero")]
    InvalidFrameSize,

    #[error("frame of {requested} bytes can never fit in a {capacity}-byte payload ring")]
    FrameTooLargeForBuffer { requested: u64, capacity: u64 },

    #[error("metadata has already been set for this buffer")]
    MetadataAlreadySet,

    #[error("metadata of {requested} bytes exceeds the {capacity}-byte metadata area")]
    MetadataTooLarge { requested: u64, capacity: u64 },

    #[error("corrupted frame header: {0}")]
    CorruptedHeader(String),

    #[error("system resource exhausted: {0}")]
    SystemResourceExhausted(String),

    #[error(transparent)]
    Platform(PlatformError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ZeroBufferError>;

impl From<PlatformError> for ZeroBufferError {
    fn from(e: PlatformError) -> Self {
        match e {
            PlatformError::ResourceExhausted(reason) => ZeroBufferError::SystemResourceExhausted(reason),
            other => ZeroBufferError::Platform(other),
        }
    }
}

impl From<CoreError> for ZeroBufferError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::InvalidFrameSize => ZeroBufferError::InvalidFrameSize,
            CoreError::FrameTooLargeForBuffer { requested, capacity } => {
                ZeroBufferError::FrameTooLargeForBuffer { requested, capacity }
            }
            CoreError::MetadataAlreadySet => ZeroBufferError::MetadataAlreadySet,
            CoreError::MetadataTooLarge { requested, capacity } => {
                ZeroBufferError::MetadataTooLarge { requested, capacity }
            }
            CoreError::CorruptedHeader { offset, reason } => {
                ZeroBufferError::CorruptedHeader(format!("at payload offset {offset}: {reason}"))
            }
        }
    }
}
