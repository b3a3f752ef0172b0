//! Named shared memory: create-or-open by path, map read/write, unlink.
//!
//! Grounded on `lithos-mmap`'s `MmapFileMut`/`MmapFile`, generalized from a
//! single `create_rw`/`open_rw` pair into the create-or-open + unlink
//! surface the buffer-creation protocol (spec §4.7) needs.

use crate::error::{is_resource_exhaustion, PlatformError, Result};
use memmap2::MmapMut;
use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;

/// A read-write memory-mapped region backed by a named file.
///
/// Owns both the file handle and the mapping; dropping it unmaps the region
/// but does not remove the backing file — removal is the explicit `unlink`
/// below, called only by the party that owns buffer teardown (the reader).
pub struct SharedMemory {
    _file: File,
    mmap: MmapMut,
}

/// Reclassifies an I/O failure as `PlatformError::ResourceExhausted` when
/// its errno means the OS is out of some resource (disk space, memory, file
/// descriptors) rather than this particular path/name being invalid — spec
/// §6.4 names `SystemResourceExhausted` as distinct from a generic I/O error.
fn classify(err: io::Error) -> PlatformError {
    if is_resource_exhaustion(err.raw_os_error().unwrap_or(0)) {
        PlatformError::ResourceExhausted(err.to_string())
    } else {
        PlatformError::Io(err)
    }
}

impl SharedMemory {
    /// Opens an existing shared memory file, mapping the whole thing read-write.
    pub fn open(path: &Path) -> Result<Self> {
        let file = OpenOptions::new().read(true).write(true).open(path).map_err(classify)?;
        let mmap = unsafe { MmapMut::map_mut(&file).map_err(classify)? };
        Ok(Self { _file: file, mmap })
    }

    /// Creates a fresh shared memory file of exactly `size_bytes`, failing if
    /// one already exists at `path`. Used by `Reader::create` once the
    /// creation lock has established there is no live owner.
    pub fn create_exclusive(path: &Path, size_bytes: u64) -> Result<Self> {
        let file = OpenOptions::new()
            .create_new(true)
            .read(true)
            .write(true)
            .open(path)
            .map_err(classify)?;
        file.set_len(size_bytes).map_err(classify)?;
        let mmap = unsafe { MmapMut::map_mut(&file).map_err(classify)? };
        Ok(Self { _file: file, mmap })
    }

    /// Removes the backing file. Existing mappings (in this or other
    /// processes) remain valid until unmapped; POSIX unlink-while-mapped
    /// semantics are exactly what we want for "destroy detaches the name,
    /// live holders keep working".
    pub fn unlink(path: &Path) -> Result<()> {
        match std::fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn exists(path: &Path) -> bool {
        path.is_file()
    }

    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut u8 {
        self.mmap.as_mut_ptr()
    }

    #[inline]
    pub fn as_ptr(&self) -> *const u8 {
        self.mmap.as_ptr()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.mmap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mmap.is_empty()
    }
}
