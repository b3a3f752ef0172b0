//! Frame header layout (spec §3.3): 16 bytes, little-endian, immediately
//! preceding every frame body (and every wrap marker) in the payload ring.

pub const HEADER_SIZE: u64 = 16;
pub const ALIGNMENT: u64 = 8;

#[repr(C)]
#[derive(Clone, Copy, Debug)]
pub struct FrameHeader {
    /// Frame body length in bytes. Zero marks a wrap marker (spec §3.3/§4.3.2).
    pub payload_size: u64,
    pub sequence_number: u64,
}

impl FrameHeader {
    pub const WRAP_MARKER_PAYLOAD_SIZE: u64 = 0;

    #[inline]
    pub fn is_wrap_marker(&self) -> bool {
        self.payload_size == Self::WRAP_MARKER_PAYLOAD_SIZE
    }

    /// Reads a header out of the given little-endian byte slice.
    pub fn read_from(bytes: &[u8]) -> FrameHeader {
        debug_assert!(bytes.len() >= HEADER_SIZE as usize);
        let payload_size = u64::from_le_bytes(bytes[0..8].try_into().unwrap());
        let sequence_number = u64::from_le_bytes(bytes[8..16].try_into().unwrap());
        FrameHeader { payload_size, sequence_number }
    }

    /// Writes this header as little-endian bytes into the given slice.
    pub fn write_into(&self, bytes: &mut [u8]) {
        debug_assert!(bytes.len() >= HEADER_SIZE as usize);
        bytes[0..8].copy_from_slice(&self.payload_size.to_le_bytes());
        bytes[8..16].copy_from_slice(&self.sequence_number.to_le_bytes());
    }
}

/// Total ring space a frame of body length `body_len` consumes: header,
/// body, and alignment padding (spec §3.3, 8-byte alignment pinned via
/// `Oieb::FLAG_ALIGN_8`).
#[inline]
pub fn framed_len(body_len: u64) -> u64 {
    align_up(HEADER_SIZE + body_len, ALIGNMENT)
}

#[inline]
pub fn align_up(n: u64, align: u64) -> u64 {
    debug_assert!(align.is_power_of_two());
    (n + align - 1) & !(align - 1)
}
