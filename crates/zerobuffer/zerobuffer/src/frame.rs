//! The borrowed frame returned by `Reader::read_frame` (spec §3.4, §9): a
//! scoped guard over bytes living in shared memory. Dropping it runs the
//! release protocol — advance `read_pos`, post `sem-r` — so a caller cannot
//! forget to release. The Rust borrow checker, not a runtime flag, is what
//! prevents calling `read_frame` again while one is outstanding: `read_frame`
//! takes `&mut Reader` and ties this type's lifetime to that borrow.

use crate::region::MappedRegion;
use std::ops::Deref;
use zerobuffer_core::HeaderPeek;
use zerobuffer_platform::NamedSemaphore;

pub struct Frame<'a> {
    data: *const u8,
    len: usize,
    sequence: u64,
    peek: HeaderPeek,
    region: &'a MappedRegion,
    sem_r: &'a NamedSemaphore,
}

impl<'a> Frame<'a> {
    pub(crate) fn new(
        data: *const u8,
        len: usize,
        sequence: u64,
        peek: HeaderPeek,
        region: &'a MappedRegion,
        sem_r: &'a NamedSemaphore,
    ) -> Self {
        Self { data, len, sequence, peek, region, sem_r }
    }

    /// The sequence number the writer assigned this frame (spec §4.3.4).
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn as_bytes(&self) -> &[u8] {
        // Safe: this data is owned by a mapping that outlives `'a`, and the
        // single-outstanding-frame rule (enforced by the `&mut Reader`
        // borrow this value holds) means nothing else touches this span
        // until `Drop` runs.
        unsafe { std::slice::from_raw_parts(self.data, self.len) }
    }
}

impl Deref for Frame<'_> {
    type Target = [u8];
    fn deref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl AsRef<[u8]> for Frame<'_> {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl Drop for Frame<'_> {
    fn drop(&mut self) {
        self.region.engine().release_read(&self.peek);
        // The peer only blocks on this permit; nothing useful to do with a
        // post failure here beyond what `Drop` can already report.
        let _ = self.sem_r.post();
    }
}
