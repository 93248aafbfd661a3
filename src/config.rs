//! Configuration for hashtree
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

/// Minimum usable capacity: one superblock slot plus one root record slot.
pub const MIN_CAPACITY: u64 = 2 * crate::index::SLOT_SIZE as u64;

/// Main configuration for a hashtree store
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Path of the single backing file holding superblock + records
    pub path: PathBuf,

    /// Requested byte capacity of the backing file. The file is zero-extended
    /// to at least this size on open; it never shrinks. Clamped up to
    /// [`MIN_CAPACITY`] so the superblock and root always fit.
    pub min_size: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./hashtree.db"),
            min_size: 16 * 1024 * 1024, // 16 MB ≈ 200k records
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Requested capacity with the two-slot floor applied
    pub fn effective_size(&self) -> u64 {
        self.min_size.max(MIN_CAPACITY)
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the backing file path
    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.path = path.into();
        self
    }

    /// Set the requested byte capacity
    pub fn min_size(mut self, size: u64) -> Self {
        self.config.min_size = size;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
