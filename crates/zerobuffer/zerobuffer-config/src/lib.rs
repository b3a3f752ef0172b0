//! Process-wide runtime configuration for zerobuffer.
//!
//! Mirrors the shape of `onyx-config`/`obsidian-config` in the teacher
//! repo: a `serde`-derived struct loadable from TOML, with defaults, and a
//! `thiserror` error type for load failures. This is deployment
//! configuration — where the creation-lock directory lives, how finely to
//! poll while blocked — not per-buffer API input; per-buffer sizing
//! (`metadata_size`/`payload_size`) is `zerobuffer_core::BufferConfig`,
//! passed directly at call sites.

use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read { path: PathBuf, #[source] source: std::io::Error },

    #[error("failed to parse config file {path}: {source}")]
    Parse { path: PathBuf, #[source] source: toml::de::Error },
}

/// Runtime tunables, not part of the shared-memory wire format.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Directory holding per-buffer-name creation lock files (spec §4.1.3).
    pub lock_dir: Option<PathBuf>,
    /// Directory holding the shared-memory backing files (spec §6.1).
    pub shm_dir: Option<PathBuf>,
    /// Default timeout, in milliseconds, for blocking operations that
    /// don't receive an explicit timeout from the caller.
    pub default_timeout_ms: u64,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self { lock_dir: None, shm_dir: None, default_timeout_ms: 5_000 }
    }
}

impl RuntimeConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })
    }

    pub fn default_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.default_timeout_ms)
    }

    pub fn lock_dir(&self) -> PathBuf {
        self.lock_dir.clone().unwrap_or_else(zerobuffer_platform::naming::default_lock_dir)
    }

    pub fn shm_dir(&self) -> PathBuf {
        self.shm_dir.clone().unwrap_or_else(zerobuffer_platform::naming::default_shm_dir)
    }
}
