//! Tree Engine
//!
//! Ordered insert and exact-match lookup over record slots reachable from
//! the superblock's root, plus the bump allocator that hands out new slots.
//!
//! ## Algorithm
//! Keys compare byte-wise (the same total order as comparing their hex
//! encodings). Lookup walks left on less, right on greater, stops at equal
//! or at a missing child. Insert walks the same way and fills the missing
//! child with a freshly allocated record; repeat inserts of a key only
//! rewrite its value, never the tree shape.
//!
//! There is no rebalancing: keys are cryptographic digests, so insertion
//! order is effectively uniform random and expected depth stays logarithmic.
//!
//! Every slot dereference is bounds-checked against the mapped length.
//! Running out of room surfaces as [`HashTreeError::Capacity`]; the mapping
//! only ever grows through an explicit [`HashIndex::grow`].

use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::config::MIN_CAPACITY;
use crate::error::{HashTreeError, Result};
use crate::hash::Digest;
use crate::mapping::Mapping;

use super::record::{RecordMut, RecordView};
use super::superblock::{SuperblockMut, SuperblockView, MAGIC_TAG};
use super::{Slot, FIRST_RECORD_SLOT, SLOT_SIZE};

/// The on-disk binary search tree
///
/// Owns the mapping of the backing file. `get` needs `&self`, `set` needs
/// `&mut self`; the single-writer assumption of the format is exactly
/// Rust's borrow rule, so no locking happens here.
pub struct HashIndex {
    mapping: Mapping,
}

impl HashIndex {
    /// Open or create the index file at `path`.
    ///
    /// Zero-extends the file to at least `min_size` bytes (clamped up so
    /// superblock and root always fit), writes the diagnostic magic text on
    /// first use, raises `declared_size` monotonically, and allocates the
    /// root slot if the file has never held one. Re-opening an existing
    /// file is a no-op beyond the capacity check.
    pub fn open(path: &Path, min_size: u64) -> Result<Self> {
        let requested = min_size.max(MIN_CAPACITY);
        let mapping = Mapping::open(path, requested)?;

        let mut index = Self { mapping };
        index.initialize(requested)?;

        Ok(index)
    }

    fn initialize(&mut self, requested: u64) -> Result<()> {
        let (magic_empty, declared, next_free) = {
            let sb = self.superblock();
            (sb.magic_is_empty(), sb.declared_size(), sb.next_free())
        };

        if magic_empty {
            let created = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0);
            let tag = format!(
                "{}\n{}\n{}\n{}\n",
                MAGIC_TAG,
                self.mapping.path().display(),
                requested,
                created
            );
            self.superblock_mut().set_magic(&tag);
        }

        if declared < requested {
            self.superblock_mut().set_declared_size(requested);
        }

        if next_free.0 < FIRST_RECORD_SLOT {
            // Fresh file: hand the first usable slot to the root. The slot
            // is all zeroes, i.e. an unassigned record, until the first
            // insert claims it.
            let root = Slot(FIRST_RECORD_SLOT);
            let mut sb = self.superblock_mut();
            sb.set_root(root);
            sb.set_next_free(Slot(root.0 + 1));

            tracing::info!(
                path = %self.mapping.path().display(),
                capacity = requested,
                "initialized index superblock"
            );
        }

        Ok(())
    }

    // =========================================================================
    // Lookup / Insert
    // =========================================================================

    /// Exact-match lookup. Returns the stored value digest, or `None` if the
    /// key was never set.
    pub fn get(&self, key: &Digest) -> Result<Option<Digest>> {
        let mut current = self.superblock().root();

        loop {
            let record = self.record(current)?;
            let node_key = record.key();

            if *key == node_key {
                return Ok(Some(record.value()));
            }

            let child = if *key < node_key {
                record.left()
            } else {
                record.right()
            };

            match child {
                Some(slot) => current = slot,
                None => return Ok(None),
            }
        }
    }

    /// Insert or update. Walks to the key's position, allocating and wiring
    /// a new leaf if the key is absent, then writes the value in place.
    pub fn set(&mut self, key: &Digest, value: &Digest) -> Result<()> {
        let mut current = self.superblock().root();

        loop {
            let (node_key, unassigned, left, right) = {
                let record = self.record(current)?;
                (
                    record.key(),
                    record.is_unassigned(),
                    record.left(),
                    record.right(),
                )
            };

            if unassigned {
                // Lazily-initialized root on first insert: claim it in place.
                self.record_mut(current)?.set_key(key);
                break;
            }

            if *key == node_key {
                break;
            }

            let child = if *key < node_key { left } else { right };
            match child {
                Some(slot) => current = slot,
                None => {
                    // The new record's key is on disk before the parent
                    // pointer makes it reachable.
                    let leaf = self.allocate(key)?;
                    let mut parent = self.record_mut(current)?;
                    if *key < node_key {
                        parent.set_left(leaf);
                    } else {
                        parent.set_right(leaf);
                    }
                    current = leaf;
                    break;
                }
            }
        }

        self.record_mut(current)?.set_value(value);
        Ok(())
    }

    // =========================================================================
    // Bump Allocator
    // =========================================================================

    /// Take the slot at `next_free`, write `key` into it, advance the
    /// counter. Slots are never reclaimed; `next_free` only ever moves
    /// forward, by exactly one per call.
    ///
    /// Fails with [`HashTreeError::Capacity`] before touching any state if
    /// the slot's byte range is beyond the mapped length.
    fn allocate(&mut self, key: &Digest) -> Result<Slot> {
        let slot = self.superblock().next_free();

        // A fresh slot is all zeroes (the file is zero-extended), so only
        // the key needs writing here.
        self.record_mut(slot)?.set_key(key);
        self.superblock_mut().set_next_free(Slot(slot.0 + 1));

        Ok(slot)
    }

    /// Zero-extend the backing file to at least `min_size` bytes, remap, and
    /// raise `declared_size`. The explicit escape hatch for a store that ran
    /// into [`HashTreeError::Capacity`].
    pub fn grow(&mut self, min_size: u64) -> Result<()> {
        let requested = min_size.max(MIN_CAPACITY);
        self.mapping.grow(requested)?;

        if self.superblock().declared_size() < requested {
            self.superblock_mut().set_declared_size(requested);
        }

        Ok(())
    }

    /// Flush dirty pages of the mapping to the backing file
    pub fn flush(&self) -> Result<()> {
        self.mapping.flush()
    }

    // =========================================================================
    // Slot access
    // =========================================================================

    fn slot_range(&self, slot: Slot) -> Result<std::ops::Range<usize>> {
        let start = slot.byte_offset();
        let end = start + SLOT_SIZE as u64;

        if end > self.mapping.len() as u64 {
            return Err(HashTreeError::Capacity {
                slot: slot.0,
                mapped: self.mapping.len(),
            });
        }

        Ok(start as usize..end as usize)
    }

    fn record(&self, slot: Slot) -> Result<RecordView<'_>> {
        let range = self.slot_range(slot)?;
        Ok(RecordView::new(&self.mapping.bytes()[range]))
    }

    fn record_mut(&mut self, slot: Slot) -> Result<RecordMut<'_>> {
        let range = self.slot_range(slot)?;
        Ok(RecordMut::new(&mut self.mapping.bytes_mut()[range]))
    }

    // `open` clamps the mapping to at least two slots, so slot 0 always fits.
    fn superblock(&self) -> SuperblockView<'_> {
        SuperblockView::new(&self.mapping.bytes()[..SLOT_SIZE])
    }

    fn superblock_mut(&mut self) -> SuperblockMut<'_> {
        SuperblockMut::new(&mut self.mapping.bytes_mut()[..SLOT_SIZE])
    }

    // =========================================================================
    // Accessors (for diagnostics and tests)
    // =========================================================================

    /// Slot of the tree root
    pub fn root(&self) -> Slot {
        self.superblock().root()
    }

    /// Slot the next allocation will hand out
    pub fn next_free(&self) -> Slot {
        self.superblock().next_free()
    }

    /// Declared byte capacity recorded in the superblock
    pub fn declared_size(&self) -> u64 {
        self.superblock().declared_size()
    }

    /// Diagnostic magic text
    pub fn magic(&self) -> String {
        self.superblock().magic()
    }

    /// Actual mapped length in bytes
    pub fn mapped_len(&self) -> usize {
        self.mapping.len()
    }

    /// Read-only view of a record slot, bounds-checked
    pub fn record_at(&self, slot: Slot) -> Result<RecordView<'_>> {
        self.record(slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn digest(byte: u8) -> Digest {
        [byte; 32]
    }

    fn open_small(dir: &TempDir) -> HashIndex {
        // Room for the superblock plus a handful of records
        HashIndex::open(&dir.path().join("index.db"), 16 * SLOT_SIZE as u64).unwrap()
    }

    #[test]
    fn fresh_index_allocates_root() {
        let dir = TempDir::new().unwrap();
        let index = open_small(&dir);

        assert_eq!(index.root(), Slot(1));
        assert_eq!(index.next_free(), Slot(2));
        assert!(index.magic().starts_with("hashtree\n"));
    }

    #[test]
    fn first_insert_claims_root_in_place() {
        let dir = TempDir::new().unwrap();
        let mut index = open_small(&dir);

        index.set(&digest(0x55), &digest(0x99)).unwrap();

        // No new slot was allocated for the first key
        assert_eq!(index.next_free(), Slot(2));
        assert_eq!(index.get(&digest(0x55)).unwrap(), Some(digest(0x99)));
    }

    #[test]
    fn children_wire_by_comparison_order() {
        let dir = TempDir::new().unwrap();
        let mut index = open_small(&dir);

        index.set(&digest(0x80), &digest(1)).unwrap();
        index.set(&digest(0x10), &digest(2)).unwrap();
        index.set(&digest(0xF0), &digest(3)).unwrap();

        let root = index.record_at(index.root()).unwrap();
        let left = root.left().expect("smaller key wired left");
        let right = root.right().expect("larger key wired right");

        assert_eq!(index.record_at(left).unwrap().key(), digest(0x10));
        assert_eq!(index.record_at(right).unwrap().key(), digest(0xF0));
    }

    #[test]
    fn repeat_insert_updates_value_only() {
        let dir = TempDir::new().unwrap();
        let mut index = open_small(&dir);

        index.set(&digest(0x42), &digest(1)).unwrap();
        index.set(&digest(0x42), &digest(2)).unwrap();
        index.set(&digest(0x42), &digest(3)).unwrap();

        assert_eq!(index.get(&digest(0x42)).unwrap(), Some(digest(3)));
        assert_eq!(index.next_free(), Slot(2));
    }

    #[test]
    fn lookup_on_empty_tree_is_absent() {
        let dir = TempDir::new().unwrap();
        let index = open_small(&dir);

        assert_eq!(index.get(&digest(0x01)).unwrap(), None);
    }

    #[test]
    fn allocation_past_mapping_is_a_capacity_error() {
        let dir = TempDir::new().unwrap();
        // Exactly superblock + root: the second distinct key has nowhere to go
        let mut index =
            HashIndex::open(&dir.path().join("index.db"), 2 * SLOT_SIZE as u64).unwrap();

        index.set(&digest(0x50), &digest(1)).unwrap();
        let err = index.set(&digest(0x60), &digest(2)).unwrap_err();
        assert!(matches!(err, HashTreeError::Capacity { slot: 2, .. }));

        // The failed allocation must not have advanced the counter
        assert_eq!(index.next_free(), Slot(2));

        // Explicit growth unblocks it
        index.grow(8 * SLOT_SIZE as u64).unwrap();
        index.set(&digest(0x60), &digest(2)).unwrap();
        assert_eq!(index.get(&digest(0x60)).unwrap(), Some(digest(2)));
    }

    #[test]
    fn reopen_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("index.db");

        let (root, next_free, declared, magic) = {
            let mut index = HashIndex::open(&path, 16 * SLOT_SIZE as u64).unwrap();
            index.set(&digest(0x11), &digest(0x22)).unwrap();
            index.flush().unwrap();
            (
                index.root(),
                index.next_free(),
                index.declared_size(),
                index.magic(),
            )
        };

        let index = HashIndex::open(&path, 16 * SLOT_SIZE as u64).unwrap();
        assert_eq!(index.root(), root);
        assert_eq!(index.next_free(), next_free);
        assert_eq!(index.declared_size(), declared);
        assert_eq!(index.magic(), magic);
        assert_eq!(index.get(&digest(0x11)).unwrap(), Some(digest(0x22)));
    }

    #[test]
    fn declared_size_is_monotonic() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("index.db");

        HashIndex::open(&path, 4096).unwrap();
        let index = HashIndex::open(&path, 1024).unwrap();
        assert_eq!(index.declared_size(), 4096);

        drop(index);
        let index = HashIndex::open(&path, 8192).unwrap();
        assert_eq!(index.declared_size(), 8192);
    }
}
