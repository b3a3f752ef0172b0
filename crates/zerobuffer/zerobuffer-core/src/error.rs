/// Errors raised purely by the on-memory protocol: bad headers, oversized
/// frames/metadata, and the write-once metadata rule. Liveness- and
/// timeout-flavored errors (`ReaderDead`, `WriterDead`, `Timeout`,
/// `BufferAlreadyExists`, ...) live one layer up in `zerobuffer`, since they
/// need the platform's semaphores and pid probe, not just the shared bytes.
#[derive(Debug, thiserror::Error, Clone, Copy, PartialEq, Eq)]
pub enum CoreError {
    #[error("frame size must be non-zero")]
    InvalidFrameSize,

    #[error("frame of {requested} bytes can never fit in a {capacity}-byte payload ring")]
    FrameTooLargeForBuffer { requested: u64, capacity: u64 },

    #[error("metadata has already been set for this buffer")]
    MetadataAlreadySet,

    #[error("metadata of {requested} bytes exceeds the {capacity}-byte metadata area")]
    MetadataTooLarge { requested: u64, capacity: u64 },

    #[error("corrupted frame header at payload offset {offset}: {reason}")]
    CorruptedHeader { offset: u64, reason: &'static str },
}

pub type Result<T> = std::result::Result<T, CoreError>;
