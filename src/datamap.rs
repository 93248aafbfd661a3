//! DataMap
//!
//! Typed map over the hash index plus a content store: keys and values are
//! arbitrary serde-serializable data, uploaded as blobs, with only their
//! content hashes entering the index.
//!
//! ## Upload rules
//! - A string that already *is* a 64-hex content hash passes through
//!   unchanged (it addresses existing content; re-wrapping it would change
//!   its identity).
//! - The empty string uploads as zero bytes, landing on the reserved
//!   [`EMPTY_HASH`](crate::content::EMPTY_HASH).
//! - Everything else is stored as its JSON encoding.
//!
//! ## Download rules
//! - Empty blob (or the reserved empty hash with no blob) → empty string.
//! - A hash the content store has never seen decodes to the hash string
//!   itself, so hash-valued entries survive a store that only indexed them.

use serde::Serialize;
use serde_json::Value;

use crate::config::Config;
use crate::content::{ContentStore, EMPTY_HASH};
use crate::error::Result;
use crate::hash;
use crate::store::HashStore;

/// A typed key-value map over content-addressed storage
pub struct DataMap<S: ContentStore> {
    store: HashStore,
    content: S,
}

impl<S: ContentStore> DataMap<S> {
    /// Open or create the backing index and wrap it with `content`
    pub fn open(config: Config, content: S) -> Result<Self> {
        Ok(Self {
            store: HashStore::open(config)?,
            content,
        })
    }

    /// Open with a path and requested capacity (convenience method)
    pub fn open_path(
        path: impl AsRef<std::path::Path>,
        min_size: u64,
        content: S,
    ) -> Result<Self> {
        Ok(Self {
            store: HashStore::open_path(path, min_size)?,
            content,
        })
    }

    /// Set `key` to `value`. Both sides are uploaded to the content store;
    /// the index records only the hash-to-hash association.
    pub fn set<K: Serialize, V: Serialize>(&mut self, key: &K, value: &V) -> Result<()> {
        let key_hash = self.upload(key)?;
        let value_hash = self.upload(value)?;
        self.store.set(&key_hash, &value_hash)
    }

    /// Get the value stored for `key`, or `None` if it was never set
    pub fn get<K: Serialize>(&self, key: &K) -> Result<Option<Value>> {
        let key_hash = self.upload(key)?;
        match self.store.get(&key_hash)? {
            Some(value_hash) => Ok(Some(self.download(&value_hash)?)),
            None => Ok(None),
        }
    }

    /// The underlying hash-to-hash store
    pub fn store(&self) -> &HashStore {
        &self.store
    }

    /// The content store behind this map
    pub fn content(&self) -> &S {
        &self.content
    }

    fn upload<T: Serialize>(&self, data: &T) -> Result<String> {
        let json = serde_json::to_value(data)?;

        if let Value::String(s) = &json {
            if hash::is_content_hash(s) {
                return Ok(s.clone());
            }
            if s.is_empty() {
                return self.content.put(b"");
            }
        }

        self.content.put(&serde_json::to_vec(&json)?)
    }

    fn download(&self, hash: &str) -> Result<Value> {
        match self.content.get(hash)? {
            Some(bytes) if bytes.is_empty() => Ok(Value::String(String::new())),
            Some(bytes) => Ok(serde_json::from_slice(&bytes)?),
            None if hash == EMPTY_HASH => Ok(Value::String(String::new())),
            // Content never stored here: the hash itself is the best answer
            None => Ok(Value::String(hash.to_string())),
        }
    }
}
