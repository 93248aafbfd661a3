//! Content-addressable store boundary
//!
//! The index only ever sees content hashes; this module is the boundary to
//! whatever actually holds the content. [`ContentStore`] is that contract,
//! and [`MemoryStore`] is the in-process implementation used by tests and
//! the CLI.
//!
//! The SHA-256 of the empty input is reserved: a blob store cannot tell
//! "stored the empty blob" from "nothing there" by payload alone, so the
//! empty case travels as [`EMPTY_HASH`].

use bytes::Bytes;
use parking_lot::RwLock;
use sha2::{Digest as _, Sha256};
use std::collections::HashMap;

use crate::error::Result;

/// Content hash of the empty input (SHA-256 of zero bytes)
pub const EMPTY_HASH: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

/// Compute the SHA-256 content hash of `bytes` as lowercase hex
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// A store addressed purely by content hash
pub trait ContentStore {
    /// Store `data`, returning its content hash
    fn put(&self, data: &[u8]) -> Result<String>;

    /// Fetch the content behind `hash`, or `None` if this store never saw it
    fn get(&self, hash: &str) -> Result<Option<Bytes>>;
}

/// In-process content store over a hash map
///
/// Internally synchronized so one instance can serve readers concurrently;
/// the index itself stays single-writer regardless.
#[derive(Default)]
pub struct MemoryStore {
    blobs: RwLock<HashMap<String, Bytes>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct blobs held
    pub fn len(&self) -> usize {
        self.blobs.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.blobs.read().is_empty()
    }
}

impl ContentStore for MemoryStore {
    fn put(&self, data: &[u8]) -> Result<String> {
        let hash = sha256_hex(data);
        self.blobs
            .write()
            .entry(hash.clone())
            .or_insert_with(|| Bytes::copy_from_slice(data));
        Ok(hash)
    }

    fn get(&self, hash: &str) -> Result<Option<Bytes>> {
        Ok(self.blobs.read().get(hash).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_is_deterministic_and_deduplicating() {
        let store = MemoryStore::new();

        let a = store.put(b"hello").unwrap();
        let b = store.put(b"hello").unwrap();

        assert_eq!(a, b);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(&a).unwrap().unwrap(), Bytes::from_static(b"hello"));
    }

    #[test]
    fn missing_hash_is_none() {
        let store = MemoryStore::new();
        assert_eq!(store.get(&"0".repeat(64)).unwrap(), None);
    }

    #[test]
    fn empty_input_hashes_to_reserved_hash() {
        assert_eq!(sha256_hex(b""), EMPTY_HASH);

        let store = MemoryStore::new();
        assert_eq!(store.put(b"").unwrap(), EMPTY_HASH);
    }
}
