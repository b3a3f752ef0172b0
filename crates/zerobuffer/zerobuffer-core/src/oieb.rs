//! The Operational Information Exchange Block (spec §3.2): the fixed-layout
//! control block at offset 0 of every ZeroBuffer shared-memory region.
//!
//! Grounded on `lithos-icc`'s `RingHeader` (`shm_layout.rs`): a `#[repr(C)]`
//! header validated by magic/version, with the hot cursor fields as atomics
//! so reader and writer in separate processes can publish/observe them with
//! acquire/release ordering (spec §4.2) instead of a seqlock, since here the
//! semaphores — not a spin-retry read — are what make the peer wait.

use std::sync::atomic::{AtomicU16, AtomicU64, Ordering};

pub const MAGIC: [u8; 4] = *b"ZBUF";
pub const VERSION_MAJOR: u8 = 1;
pub const VERSION_MINOR: u8 = 0;

/// Frame bodies are padded to 8-byte alignment within the ring (pinned open
/// question from spec §9); recorded in `flags` so a peer can, in principle,
/// detect a mismatched convention instead of silently misparsing frames.
pub const FLAG_ALIGN_8: u16 = 1 << 0;
/// Set exactly once, the same instant `metadata_written` is published, so
/// that a zero-length metadata payload is distinguishable from "never set".
pub const FLAG_METADATA_SET: u16 = 1 << 1;

/// Total size of the OIEB, fixed at 128 bytes (recommended by spec §3.2),
/// cache-line padded so it never shares a line with the metadata area.
pub const OIEB_SIZE: u64 = 128;

#[repr(C)]
pub struct Oieb {
    pub magic: [u8; 4],
    pub version_major: u8,
    pub version_minor: u8,
    pub flags: AtomicU16,

    pub oieb_size: u64,
    pub metadata_size: u64,
    pub metadata_written: AtomicU64,
    pub payload_size: u64,

    pub write_pos: AtomicU64,
    pub read_pos: AtomicU64,
    pub bytes_in_use: AtomicU64,
    pub next_sequence: AtomicU64,

    pub reader_pid: AtomicU64,
    pub writer_pid: AtomicU64,

    _pad: [u8; 40],
}

const _: () = assert!(std::mem::size_of::<Oieb>() == OIEB_SIZE as usize);

impl Oieb {
    /// Initializes a freshly created region's header in place. Only called
    /// by `Reader::create` while holding the creation lock and before any
    /// other party can observe the region.
    pub fn init_in_place(slot: &mut std::mem::MaybeUninit<Oieb>, metadata_size: u64, payload_size: u64) {
        slot.write(Oieb {
            magic: MAGIC,
            version_major: VERSION_MAJOR,
            version_minor: VERSION_MINOR,
            flags: AtomicU16::new(FLAG_ALIGN_8),
            oieb_size: OIEB_SIZE,
            metadata_size,
            metadata_written: AtomicU64::new(0),
            payload_size,
            write_pos: AtomicU64::new(0),
            read_pos: AtomicU64::new(0),
            bytes_in_use: AtomicU64::new(0),
            next_sequence: AtomicU64::new(1),
            reader_pid: AtomicU64::new(0),
            writer_pid: AtomicU64::new(0),
            _pad: [0; 40],
        });
    }

    pub fn validate_magic_and_version(&self) -> Result<(), &'static str> {
        if self.magic != MAGIC {
            return Err("bad magic");
        }
        if self.version_major != VERSION_MAJOR {
            return Err("incompatible version_major");
        }
        if self.oieb_size != OIEB_SIZE {
            return Err("unexpected oieb_size");
        }
        Ok(())
    }

    pub fn metadata_is_set(&self) -> bool {
        self.flags.load(Ordering::Acquire) & FLAG_METADATA_SET != 0
    }

    pub fn metadata_len(&self) -> u64 {
        self.metadata_written.load(Ordering::Acquire)
    }

    pub fn reader_pid(&self) -> u32 {
        self.reader_pid.load(Ordering::Acquire) as u32
    }

    pub fn writer_pid(&self) -> u32 {
        self.writer_pid.load(Ordering::Acquire) as u32
    }

    pub fn set_reader_pid(&self, pid: u32) {
        self.reader_pid.store(pid as u64, Ordering::Release);
    }

    pub fn set_writer_pid(&self, pid: u32) {
        self.writer_pid.store(pid as u64, Ordering::Release);
    }

    pub fn bytes_in_use(&self) -> u64 {
        self.bytes_in_use.load(Ordering::Acquire)
    }
}
