//! Superblock
//!
//! Index metadata living in slot 0 of the mapped file:
//!
//! ```text
//! [0..56]   magic          descriptive text, null-padded, diagnostic only
//! [56..64]  declared_size  u64 LE, intended byte capacity, never shrinks
//! [64..72]  root           u64 LE, slot of the tree root
//! [72..80]  next_free      u64 LE, slot handed out by the next allocation
//! ```
//!
//! The magic text records the format name, source path, capacity and
//! creation time of the file. It is never parsed or validated; it exists so
//! `head -c 56` on the file tells a human what it is.

use super::{Slot, SLOT_SIZE};

/// Width of the magic/tag region in bytes
pub const MAGIC_SIZE: usize = 56;

/// Format name written as the first line of the magic text
pub const MAGIC_TAG: &str = "hashtree";

const DECLARED_SIZE_RANGE: std::ops::Range<usize> = 56..64;
const ROOT_RANGE: std::ops::Range<usize> = 64..72;
const NEXT_FREE_RANGE: std::ops::Range<usize> = 72..80;

/// Read-only view of the superblock slot
pub struct SuperblockView<'a> {
    bytes: &'a [u8],
}

impl<'a> SuperblockView<'a> {
    /// Wrap slot 0. `bytes` must be exactly one slot long.
    pub fn new(bytes: &'a [u8]) -> Self {
        debug_assert_eq!(bytes.len(), SLOT_SIZE);
        Self { bytes }
    }

    /// Magic text with trailing null padding stripped
    pub fn magic(&self) -> String {
        let raw = &self.bytes[..MAGIC_SIZE];
        let end = raw.iter().position(|&b| b == 0).unwrap_or(MAGIC_SIZE);
        String::from_utf8_lossy(&raw[..end]).into_owned()
    }

    /// Whether the magic region has never been written
    pub fn magic_is_empty(&self) -> bool {
        self.bytes[..MAGIC_SIZE].iter().all(|&b| b == 0)
    }

    pub fn declared_size(&self) -> u64 {
        read_u64(&self.bytes[DECLARED_SIZE_RANGE])
    }

    pub fn root(&self) -> Slot {
        Slot(read_u64(&self.bytes[ROOT_RANGE]))
    }

    pub fn next_free(&self) -> Slot {
        Slot(read_u64(&self.bytes[NEXT_FREE_RANGE]))
    }
}

/// Writable view of the superblock slot
pub struct SuperblockMut<'a> {
    bytes: &'a mut [u8],
}

impl<'a> SuperblockMut<'a> {
    /// Wrap slot 0. `bytes` must be exactly one slot long.
    pub fn new(bytes: &'a mut [u8]) -> Self {
        debug_assert_eq!(bytes.len(), SLOT_SIZE);
        Self { bytes }
    }

    /// Write the magic text, truncated to the region and null-padded
    pub fn set_magic(&mut self, text: &str) {
        let raw = text.as_bytes();
        let len = raw.len().min(MAGIC_SIZE);
        self.bytes[..len].copy_from_slice(&raw[..len]);
        self.bytes[len..MAGIC_SIZE].fill(0);
    }

    pub fn set_declared_size(&mut self, size: u64) {
        self.bytes[DECLARED_SIZE_RANGE].copy_from_slice(&size.to_le_bytes());
    }

    pub fn set_root(&mut self, root: Slot) {
        self.bytes[ROOT_RANGE].copy_from_slice(&root.0.to_le_bytes());
    }

    pub fn set_next_free(&mut self, next_free: Slot) {
        self.bytes[NEXT_FREE_RANGE].copy_from_slice(&next_free.0.to_le_bytes());
    }
}

fn read_u64(bytes: &[u8]) -> u64 {
    u64::from_le_bytes(bytes.try_into().expect("u64 field is 8 bytes"))
}
