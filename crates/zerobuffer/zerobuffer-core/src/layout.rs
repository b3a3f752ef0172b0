//! Shared-memory region layout (spec §3.1): OIEB, then metadata area, then
//! payload ring, back to back in one contiguous mapping.

use crate::frame::{align_up, ALIGNMENT};
use crate::oieb::OIEB_SIZE;

/// Per-buffer sizing chosen by the caller of `Reader::create` (spec §6.3).
#[derive(Debug, Clone, Copy)]
pub struct BufferConfig {
    pub metadata_size: u64,
    pub payload_size: u64,
}

impl BufferConfig {
    /// Rounds `payload_size` up to the frame alignment. Every write the ring
    /// engine ever performs advances `write_pos` by a multiple of
    /// `ALIGNMENT`, so an unaligned `payload_size` could leave a tail
    /// shorter than `ALIGNMENT` but still nonzero at wrap time, which
    /// `write_wrap_marker` cannot place a header in; rounding here keeps
    /// that tail always either 0 or a full alignment step.
    pub fn new(metadata_size: u64, payload_size: u64) -> Self {
        Self { metadata_size, payload_size: align_up(payload_size, ALIGNMENT) }
    }
}

/// Byte offsets and total size of a region built from a `BufferConfig`.
#[derive(Debug, Clone, Copy)]
pub struct RegionLayout {
    pub metadata_offset: u64,
    pub payload_offset: u64,
    pub total_size: u64,
}

impl RegionLayout {
    pub fn new(cfg: BufferConfig) -> Self {
        let metadata_offset = OIEB_SIZE;
        let payload_offset = metadata_offset + cfg.metadata_size;
        let total_size = payload_offset + cfg.payload_size;
        Self { metadata_offset, payload_offset, total_size }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_packs_oieb_metadata_payload_back_to_back() {
        let layout = RegionLayout::new(BufferConfig::new(64, 10240));
        assert_eq!(layout.metadata_offset, OIEB_SIZE);
        assert_eq!(layout.payload_offset, OIEB_SIZE + 64);
        assert_eq!(layout.total_size, OIEB_SIZE + 64 + 10240);
    }

    #[test]
    fn payload_size_is_rounded_up_to_the_frame_alignment() {
        let cfg = BufferConfig::new(0, 10241);
        assert_eq!(cfg.payload_size, 10248);

        let cfg = BufferConfig::new(0, 10240);
        assert_eq!(cfg.payload_size, 10240, "already-aligned sizes pass through unchanged");
    }
}
