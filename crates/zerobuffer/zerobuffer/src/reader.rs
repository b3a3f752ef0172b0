//! Reader role (spec §4.4): creates or reclaims the buffer, owns teardown,
//! consumes frames, signals space.

use crate::error::{Result, ZeroBufferError};
use crate::frame::Frame;
use crate::region::MappedRegion;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use zerobuffer_config::RuntimeConfig;
use zerobuffer_core::BufferConfig;
use zerobuffer_platform::{current_pid, is_process_alive, naming, LockGuard, NamedSemaphore, SharedMemory, WaitOutcome};

pub struct Reader {
    name: String,
    shm_path: PathBuf,
    sem_w_name: String,
    sem_r_name: String,
    region: MappedRegion,
    sem_w: NamedSemaphore,
    sem_r: NamedSemaphore,
    poisoned: bool,
}

impl Reader {
    /// Creates or reclaims buffer `name`, using default runtime tunables.
    pub fn create(name: &str, cfg: BufferConfig) -> Result<Self> {
        Self::create_with_runtime(name, cfg, &RuntimeConfig::default())
    }

    /// Creates or reclaims buffer `name` under a caller-supplied runtime
    /// configuration (spec §4.7): acquire the creation lock, then either
    /// make a fresh region or, if one exists and its reader is dead,
    /// unlink and retry.
    pub fn create_with_runtime(name: &str, cfg: BufferConfig, runtime: &RuntimeConfig) -> Result<Self> {
        naming::validate_name(name)?;
        let shm_path = naming::shm_path(&runtime.shm_dir(), name);
        let lock_path = naming::lock_path(&runtime.lock_dir(), name);
        let sem_w_name = naming::sem_name_write(name);
        let sem_r_name = naming::sem_name_read(name);

        let _lock = LockGuard::acquire(&lock_path, runtime.default_timeout())?;

        loop {
            if !SharedMemory::exists(&shm_path) {
                let region = MappedRegion::create_exclusive(&shm_path, cfg)?;
                region.oieb().set_reader_pid(current_pid());
                let sem_w = NamedSemaphore::create(&sem_w_name, 0)?;
                let sem_r = NamedSemaphore::create(&sem_r_name, 0)?;
                tracing::info!(name, metadata_size = cfg.metadata_size, payload_size = cfg.payload_size, "created zerobuffer region");
                return Ok(Self {
                    name: name.to_string(),
                    shm_path,
                    sem_w_name,
                    sem_r_name,
                    region,
                    sem_w,
                    sem_r,
                    poisoned: false,
                });
            }

            let existing = MappedRegion::open(&shm_path)?;
            let prior_reader = existing.oieb().reader_pid();
            if prior_reader != 0 && is_process_alive(prior_reader) {
                return Err(ZeroBufferError::BufferAlreadyExists(name.to_string()));
            }
            tracing::warn!(name, prior_reader, "reclaiming stale zerobuffer region left by a dead reader");
            drop(existing);
            SharedMemory::unlink(&shm_path)?;
            let _ = NamedSemaphore::unlink(&sem_w_name);
            let _ = NamedSemaphore::unlink(&sem_r_name);
        }
    }

    /// Blocks for the next frame (spec §4.3.3). Wrap markers are absorbed
    /// internally without consuming an extra `sem-w` permit (spec §4.3.5).
    pub fn read_frame(&mut self, timeout: Duration) -> Result<Frame<'_>> {
        self.check_not_poisoned()?;

        match self.sem_w.wait_timeout(timeout)? {
            WaitOutcome::TimedOut => return Err(self.classify_timeout_as_writer()),
            WaitOutcome::Signaled => {}
        }

        loop {
            let peek = match self.region.engine().peek_header() {
                Ok(peek) => peek,
                Err(e) => {
                    self.poisoned = true;
                    tracing::error!(name = %self.name, "corrupted frame header, reader poisoned");
                    return Err(e.into());
                }
            };

            if peek.is_wrap {
                self.region.engine().consume_wrap_marker(&peek);
                self.sem_r.post()?;
                continue;
            }

            let engine = self.region.engine();
            let body = engine.frame_body(&peek);
            let data = body.as_ptr();
            let len = body.len();
            let sequence = peek.sequence;
            return Ok(Frame::new(data, len, sequence, peek, &self.region, &self.sem_r));
        }
    }

    /// Releases a previously read frame. Equivalent to dropping it; kept as
    /// an explicit method to match the public API shape (spec §6.3).
    pub fn release_frame(&mut self, frame: Frame<'_>) {
        drop(frame);
    }

    pub fn get_metadata(&self) -> Vec<u8> {
        self.region.engine().metadata_view().to_vec()
    }

    pub fn get_metadata_view(&self) -> &[u8] {
        self.region.engine().metadata_view()
    }

    /// Polls, up to `timeout`, for the writer to have stamped a non-zero pid.
    pub fn is_writer_connected(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        loop {
            if self.region.oieb().writer_pid() != 0 {
                return true;
            }
            if Instant::now() >= deadline {
                return false;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    fn check_not_poisoned(&self) -> Result<()> {
        if self.poisoned {
            return Err(ZeroBufferError::CorruptedHeader("reader previously observed a corrupted frame header".into()));
        }
        Ok(())
    }

    fn classify_timeout_as_writer(&self) -> ZeroBufferError {
        let pid = self.region.oieb().writer_pid();
        if pid != 0 && !is_process_alive(pid) {
            ZeroBufferError::WriterDead
        } else {
            ZeroBufferError::Timeout
        }
    }
}

impl Drop for Reader {
    fn drop(&mut self) {
        self.region.oieb().set_reader_pid(0);
        let _ = SharedMemory::unlink(&self.shm_path);
        let _ = NamedSemaphore::unlink(&self.sem_w_name);
        let _ = NamedSemaphore::unlink(&self.sem_r_name);
        tracing::debug!(name = %self.name, "reader destroyed, buffer resources unlinked");
    }
}
