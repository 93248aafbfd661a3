//! Record Accessor
//!
//! Interprets one 80-byte slot window as a tree node. Field layout within
//! the window:
//!
//! ```text
//! [0..32]   key    raw digest bytes
//! [32..64]  value  raw digest bytes
//! [64..72]  left   u64 LE child slot, 0 = absent
//! [72..80]  right  u64 LE child slot, 0 = absent
//! ```

use crate::hash::{Digest, HASH_SIZE, UNASSIGNED};

use super::{Slot, SLOT_SIZE};

const KEY_RANGE: std::ops::Range<usize> = 0..HASH_SIZE;
const VALUE_RANGE: std::ops::Range<usize> = HASH_SIZE..2 * HASH_SIZE;
const LEFT_RANGE: std::ops::Range<usize> = 64..72;
const RIGHT_RANGE: std::ops::Range<usize> = 72..80;

/// Read-only view of a record slot
pub struct RecordView<'a> {
    bytes: &'a [u8],
}

impl<'a> RecordView<'a> {
    /// Wrap a slot window. `bytes` must be exactly one slot long.
    pub fn new(bytes: &'a [u8]) -> Self {
        debug_assert_eq!(bytes.len(), SLOT_SIZE);
        Self { bytes }
    }

    pub fn key(&self) -> Digest {
        let mut digest = UNASSIGNED;
        digest.copy_from_slice(&self.bytes[KEY_RANGE]);
        digest
    }

    pub fn value(&self) -> Digest {
        let mut digest = UNASSIGNED;
        digest.copy_from_slice(&self.bytes[VALUE_RANGE]);
        digest
    }

    pub fn left(&self) -> Option<Slot> {
        Slot::from_link(read_u64(&self.bytes[LEFT_RANGE]))
    }

    pub fn right(&self) -> Option<Slot> {
        Slot::from_link(read_u64(&self.bytes[RIGHT_RANGE]))
    }

    /// Whether this record's key has never been assigned.
    ///
    /// Only the literal all-zero key field counts; content hashes come out
    /// of a cryptographic digest, which never produces 32 zero bytes in
    /// practice.
    pub fn is_unassigned(&self) -> bool {
        self.key() == UNASSIGNED
    }
}

/// Writable view of a record slot
pub struct RecordMut<'a> {
    bytes: &'a mut [u8],
}

impl<'a> RecordMut<'a> {
    /// Wrap a slot window. `bytes` must be exactly one slot long.
    pub fn new(bytes: &'a mut [u8]) -> Self {
        debug_assert_eq!(bytes.len(), SLOT_SIZE);
        Self { bytes }
    }

    pub fn set_key(&mut self, key: &Digest) {
        self.bytes[KEY_RANGE].copy_from_slice(key);
    }

    pub fn set_value(&mut self, value: &Digest) {
        self.bytes[VALUE_RANGE].copy_from_slice(value);
    }

    pub fn set_left(&mut self, child: Slot) {
        self.bytes[LEFT_RANGE].copy_from_slice(&child.0.to_le_bytes());
    }

    pub fn set_right(&mut self, child: Slot) {
        self.bytes[RIGHT_RANGE].copy_from_slice(&child.0.to_le_bytes());
    }
}

fn read_u64(bytes: &[u8]) -> u64 {
    u64::from_le_bytes(bytes.try_into().expect("u64 field is 8 bytes"))
}
