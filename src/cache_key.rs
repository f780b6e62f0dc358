//! Cache key derivation for results of the region pipeline.
//!
//! The pipeline is a pure function of the page and its settings, so callers
//! are free to memoize it. This module only computes the key; storage and
//! expiry belong to the caller.

use std::path::Path;
use std::time::UNIX_EPOCH;

use sha2::{Digest, Sha256};

use crate::core::PipelineConfig;
use crate::error::{RegionError, Result};

/// Everything that identifies one pipeline run over one file.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheKeyInput {
    pub path: String,
    /// Modification time in seconds since the Unix epoch
    pub mtime: f64,
    pub size: u64,
    pub proximity_threshold: f32,
    pub row_tolerance: f32,
    pub extraction_model: String,
}

impl CacheKeyInput {
    /// Collect file identity from the filesystem and settings from `config`.
    pub fn for_file(path: &Path, config: &PipelineConfig) -> Result<Self> {
        let io_err = |source| RegionError::Io {
            path: path.to_path_buf(),
            source,
        };

        let meta = std::fs::metadata(path).map_err(io_err)?;
        let modified = meta.modified().map_err(io_err)?;
        // Pre-epoch timestamps count as 0
        let mtime = modified
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs_f64())
            .unwrap_or(0.0);

        Ok(Self {
            path: path.display().to_string(),
            mtime,
            size: meta.len(),
            proximity_threshold: config.proximity_threshold,
            row_tolerance: config.row_tolerance,
            extraction_model: config.extraction_model.clone(),
        })
    }
}

/// SHA-256 hex digest of `path_mtime_size_proximity_rowtolerance_model`.
pub fn cache_key(input: &CacheKeyInput) -> String {
    let mut hasher = Sha256::new();
    hasher.update(key_data(input).as_bytes());
    format!("{:x}", hasher.finalize())
}

/// The hashed string. `mtime` always carries a fractional part
/// (`1700000000.0`) so keys line up with caches written by the Python
/// service. Whole-number thresholds print without one (`30`).
fn key_data(input: &CacheKeyInput) -> String {
    format!(
        "{}_{:?}_{}_{}_{}_{}",
        input.path,
        input.mtime,
        input.size,
        input.proximity_threshold,
        input.row_tolerance,
        input.extraction_model
    )
}

/// Convenience wrapper: stat `path` and derive its key under `config`.
pub fn cache_key_for_file(path: &Path, config: &PipelineConfig) -> Result<String> {
    Ok(cache_key(&CacheKeyInput::for_file(path, config)?))
}
