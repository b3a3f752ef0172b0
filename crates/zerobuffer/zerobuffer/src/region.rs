//! Maps a named shared-memory file into a `RingEngine` view. Shared
//! plumbing used by both `Reader` and `Writer`.

use crate::error::{Result, ZeroBufferError};
use std::mem::MaybeUninit;
use std::path::Path;
use zerobuffer_core::{BufferConfig, Oieb, RegionLayout, RingEngine};
use zerobuffer_platform::SharedMemory;

pub(crate) struct MappedRegion {
    shm: SharedMemory,
    layout: RegionLayout,
}

impl MappedRegion {
    /// Creates a brand-new region of exactly the size `cfg` calls for and
    /// initializes its OIEB. Fails if a file already exists at `path`.
    pub fn create_exclusive(path: &Path, cfg: BufferConfig) -> Result<Self> {
        let layout = RegionLayout::new(cfg);
        let mut shm = SharedMemory::create_exclusive(path, layout.total_size)?;
        unsafe {
            let slot = shm.as_mut_ptr() as *mut MaybeUninit<Oieb>;
            Oieb::init_in_place(&mut *slot, cfg.metadata_size, cfg.payload_size);
        }
        Ok(Self { shm, layout })
    }

    /// Opens an existing region, discovering its layout from the OIEB that
    /// is already there.
    pub fn open(path: &Path) -> Result<Self> {
        let shm = SharedMemory::open(path)?;
        if (shm.len() as u64) < zerobuffer_core::oieb::OIEB_SIZE {
            return Err(ZeroBufferError::CorruptedHeader("region smaller than one OIEB".into()));
        }
        let oieb = unsafe { &*(shm.as_ptr() as *const Oieb) };
        oieb.validate_magic_and_version()
            .map_err(|reason| ZeroBufferError::CorruptedHeader(reason.to_string()))?;
        let cfg = BufferConfig::new(oieb.metadata_size, oieb.payload_size);
        let layout = RegionLayout::new(cfg);
        if (shm.len() as u64) < layout.total_size {
            return Err(ZeroBufferError::CorruptedHeader("region smaller than its own declared layout".into()));
        }
        Ok(Self { shm, layout })
    }

    pub fn oieb(&self) -> &Oieb {
        unsafe { &*(self.shm.as_ptr() as *const Oieb) }
    }

    /// Builds a `RingEngine` over this region's metadata and payload areas.
    ///
    /// Takes `&self`, not `&mut self`: the underlying OS mapping is
    /// read-write regardless of Rust-level mutability, and within one
    /// process exactly one role (`Reader` xor `Writer`) holds this mapping
    /// at a time, with the public `Reader`/`Writer` methods themselves
    /// requiring `&mut self` to prevent interleaved misuse. Cross-process
    /// synchronization is the semaphores' job, not the borrow checker's.
    pub fn engine(&self) -> RingEngine<'_> {
        let base = self.shm.as_ptr() as *mut u8;
        unsafe {
            let oieb = base as *const Oieb;
            let metadata = base.add(self.layout.metadata_offset as usize);
            let payload = base.add(self.layout.payload_offset as usize);
            RingEngine::new(oieb, metadata, payload)
        }
    }
}
