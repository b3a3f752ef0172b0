//! Writer role (spec §4.5): connects to an existing buffer, publishes
//! metadata once, produces frames, signals data.

use crate::error::{Result, ZeroBufferError};
use crate::region::MappedRegion;
use std::time::Duration;
use zerobuffer_config::RuntimeConfig;
use zerobuffer_core::{framed_len, PrepareOutcome};
use zerobuffer_platform::{current_pid, is_process_alive, naming, LockGuard, NamedSemaphore, SharedMemory, WaitOutcome};

pub struct Writer {
    name: String,
    region: MappedRegion,
    sem_w: NamedSemaphore,
    sem_r: NamedSemaphore,
    poisoned: bool,
    frames_written: u64,
    bytes_written: u64,
}

impl Writer {
    /// Connects to an existing buffer `name`, using default runtime tunables.
    pub fn connect(name: &str) -> Result<Self> {
        Self::connect_with_runtime(name, &RuntimeConfig::default())
    }

    /// Connects to an existing buffer `name` (spec §4.5): the creation lock
    /// serializes this against a concurrent `Reader::create` reclaiming the
    /// same name, requires a live reader, and stamps this process's pid as
    /// the exclusive writer.
    pub fn connect_with_runtime(name: &str, runtime: &RuntimeConfig) -> Result<Self> {
        naming::validate_name(name)?;
        let shm_path = naming::shm_path(&runtime.shm_dir(), name);
        let lock_path = naming::lock_path(&runtime.lock_dir(), name);
        let sem_w_name = naming::sem_name_write(name);
        let sem_r_name = naming::sem_name_read(name);

        let _lock = LockGuard::acquire(&lock_path, runtime.default_timeout())?;

        if !SharedMemory::exists(&shm_path) {
            return Err(ZeroBufferError::BufferNotFound(name.to_string()));
        }
        let region = MappedRegion::open(&shm_path)?;

        let reader_pid = region.oieb().reader_pid();
        if reader_pid == 0 || !is_process_alive(reader_pid) {
            return Err(ZeroBufferError::ReaderDead);
        }
        let prior_writer = region.oieb().writer_pid();
        if prior_writer != 0 && is_process_alive(prior_writer) {
            return Err(ZeroBufferError::WriterAlreadyConnected(name.to_string()));
        }

        let sem_w = NamedSemaphore::open(&sem_w_name)?;
        let sem_r = NamedSemaphore::open(&sem_r_name)?;
        region.oieb().set_writer_pid(current_pid());
        tracing::info!(name, "writer connected");

        Ok(Self {
            name: name.to_string(),
            region,
            sem_w,
            sem_r,
            poisoned: false,
            frames_written: 0,
            bytes_written: 0,
        })
    }

    /// Publishes the write-once metadata area (spec §4.3.6).
    pub fn set_metadata(&mut self, bytes: &[u8]) -> Result<()> {
        self.check_not_poisoned()?;
        self.region.engine().set_metadata(bytes).map_err(Into::into)
    }

    /// Writes one frame, blocking on `sem-r` while the ring has no room
    /// (spec §4.3.2). Internal wrap-marker retries never wait on a
    /// semaphore; only a genuine `InsufficientSpace` does.
    pub fn write_frame(&mut self, body: &[u8], timeout: Duration) -> Result<()> {
        self.check_not_poisoned()?;
        self.region.engine().validate_write_len(body.len() as u64)?;
        let total = framed_len(body.len() as u64);

        loop {
            let outcome = match self.region.engine().prepare_write(total) {
                Ok(outcome) => outcome,
                Err(e) => {
                    self.poisoned = true;
                    tracing::error!(name = %self.name, "corrupted frame header, writer poisoned");
                    return Err(e.into());
                }
            };
            match outcome {
                PrepareOutcome::Ready => break,
                PrepareOutcome::WrappedRetry => continue,
                PrepareOutcome::InsufficientSpace => {
                    match self.sem_r.wait_timeout(timeout)? {
                        WaitOutcome::Signaled => continue,
                        WaitOutcome::TimedOut => {
                            let pid = self.region.oieb().reader_pid();
                            if pid != 0 && !is_process_alive(pid) {
                                return Err(ZeroBufferError::ReaderDead);
                            }
                            return Err(ZeroBufferError::Timeout);
                        }
                    }
                }
            }
        }

        self.region.engine().commit_write(body);
        self.sem_w.post()?;
        self.frames_written += 1;
        self.bytes_written += body.len() as u64;
        Ok(())
    }

    /// Largest frame body this buffer's ring could ever hold. Used by the
    /// duplex server's fill-in-place handler variant to size its reservation.
    pub fn max_frame_body_len(&self) -> u64 {
        self.region.oieb().payload_size.saturating_sub(zerobuffer_core::HEADER_SIZE)
    }

    /// Fills the response body in place instead of copying it in from a
    /// caller-owned buffer (spec §9 duplex fill-in-place variant). `fill`
    /// receives a writable view of up to `max_body_len` bytes and returns
    /// how many of them it actually wrote. Returns that length.
    pub fn write_frame_with<F>(&mut self, max_body_len: u64, timeout: Duration, fill: F) -> Result<usize>
    where
        F: FnOnce(&mut [u8]) -> usize,
    {
        self.check_not_poisoned()?;
        self.region.engine().validate_write_len(max_body_len)?;
        let total = framed_len(max_body_len);

        loop {
            let outcome = match self.region.engine().prepare_write(total) {
                Ok(outcome) => outcome,
                Err(e) => {
                    self.poisoned = true;
                    return Err(e.into());
                }
            };
            match outcome {
                PrepareOutcome::Ready => break,
                PrepareOutcome::WrappedRetry => continue,
                PrepareOutcome::InsufficientSpace => {
                    match self.sem_r.wait_timeout(timeout)? {
                        WaitOutcome::Signaled => continue,
                        WaitOutcome::TimedOut => {
                            let pid = self.region.oieb().reader_pid();
                            if pid != 0 && !is_process_alive(pid) {
                                return Err(ZeroBufferError::ReaderDead);
                            }
                            return Err(ZeroBufferError::Timeout);
                        }
                    }
                }
            }
        }

        let slot = self.region.engine().reserve_write(max_body_len);
        let written = fill(slot).min(max_body_len as usize);
        self.region.engine().commit_reserved(written as u64);
        self.sem_w.post()?;
        self.frames_written += 1;
        self.bytes_written += written as u64;
        Ok(written)
    }

    pub fn is_reader_connected(&self) -> bool {
        let pid = self.region.oieb().reader_pid();
        pid != 0 && is_process_alive(pid)
    }

    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }

    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    fn check_not_poisoned(&self) -> Result<()> {
        if self.poisoned {
            return Err(ZeroBufferError::CorruptedHeader("writer previously observed a corrupted frame header".into()));
        }
        Ok(())
    }
}

impl Drop for Writer {
    fn drop(&mut self) {
        self.region.oieb().set_writer_pid(0);
        tracing::debug!(name = %self.name, "writer disconnected");
    }
}
