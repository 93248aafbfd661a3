//! Persistent Store
//!
//! The public face of the index: hex-string keys and values over the
//! byte-level [`HashIndex`]. Every key/value at this layer is a 64-character
//! hex content hash; anything else fails fast with
//! [`HashTreeError::MalformedHash`](crate::HashTreeError::MalformedHash).
//! Turning arbitrary data into such hashes is the content-addressable
//! store's job (see [`crate::content`]), not this layer's.

use std::path::Path;

use crate::config::Config;
use crate::error::Result;
use crate::hash;
use crate::index::{HashIndex, Slot};

/// A persistent hash-to-hash store backed by a single mapped file
pub struct HashStore {
    index: HashIndex,
    config: Config,
}

impl HashStore {
    /// Open or create a store with the given config
    pub fn open(config: Config) -> Result<Self> {
        let index = HashIndex::open(&config.path, config.effective_size())?;

        tracing::debug!(
            path = %config.path.display(),
            declared_size = index.declared_size(),
            next_free = %index.next_free(),
            "opened hash store"
        );

        Ok(Self { index, config })
    }

    /// Open with a path and requested capacity (convenience method)
    pub fn open_path(path: impl AsRef<Path>, min_size: u64) -> Result<Self> {
        Self::open(
            Config::builder()
                .path(path.as_ref())
                .min_size(min_size)
                .build(),
        )
    }

    /// Look up the value hash stored for `key_hash`
    pub fn get(&self, key_hash: &str) -> Result<Option<String>> {
        let key = hash::decode(key_hash)?;
        Ok(self.index.get(&key)?.map(|value| hash::encode(&value)))
    }

    /// Insert or update the value hash stored for `key_hash`
    pub fn set(&mut self, key_hash: &str, value_hash: &str) -> Result<()> {
        let key = hash::decode(key_hash)?;
        let value = hash::decode(value_hash)?;
        self.index.set(&key, &value)
    }

    /// Zero-extend the backing file to at least `min_size` bytes
    pub fn grow(&mut self, min_size: u64) -> Result<()> {
        self.index.grow(min_size)
    }

    /// Flush dirty pages to the backing file
    pub fn flush(&self) -> Result<()> {
        self.index.flush()
    }

    // =========================================================================
    // Accessors (for diagnostics and tests)
    // =========================================================================

    /// The configuration this store was opened with
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Slot of the tree root
    pub fn root_slot(&self) -> Slot {
        self.index.root()
    }

    /// Slot the next allocation will hand out
    pub fn next_free(&self) -> Slot {
        self.index.next_free()
    }

    /// Declared byte capacity from the superblock
    pub fn declared_size(&self) -> u64 {
        self.index.declared_size()
    }

    /// Diagnostic magic text from the superblock
    pub fn magic(&self) -> String {
        self.index.magic()
    }

    /// Number of records currently allocated (root included)
    pub fn record_count(&self) -> u64 {
        self.index.next_free().0 - crate::index::FIRST_RECORD_SLOT
    }

    /// Byte-level index, for callers that want raw digests
    pub fn index(&self) -> &HashIndex {
        &self.index
    }
}
