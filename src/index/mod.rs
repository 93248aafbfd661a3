//! Index Module
//!
//! The on-disk binary search tree over content hashes.
//!
//! ## Responsibilities
//! - Fixed 80-byte slot layout for superblock and records
//! - Bump allocation of record slots (append-only, no reuse)
//! - Ordered insert and exact-match lookup over the mapped bytes
//!
//! ## File Format (all integers little-endian)
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ Slot 0: Superblock                          │
//! │ ┌───────────┬─────────┬────────┬──────────┐ │
//! │ │ Magic (56)│ Size (8)│Root (8)│ Free (8) │ │
//! │ └───────────┴─────────┴────────┴──────────┘ │
//! ├─────────────────────────────────────────────┤
//! │ Slot 1..: Records                           │
//! │ ┌──────────┬──────────┬─────────┬─────────┐ │
//! │ │ Key (32) │ Val (32) │Left (8) │Right (8)│ │
//! │ └──────────┴──────────┴─────────┴─────────┘ │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! Child offset 0 is the null sentinel: slot 0 holds the superblock, so no
//! record can ever live there. An all-zero key marks a record whose key has
//! not been assigned yet (only ever the freshly allocated root).

mod record;
mod superblock;
mod tree;

pub use record::{RecordMut, RecordView};
pub use superblock::{SuperblockMut, SuperblockView};
pub use tree::HashIndex;

/// Fixed size of every slot (superblock and records alike)
pub const SLOT_SIZE: usize = 80;

/// First slot available to records; slot 0 is the superblock
pub const FIRST_RECORD_SLOT: u64 = 1;

/// A record-slot offset into the mapped region.
///
/// The wire format stores child links as raw u64 slot numbers with 0 meaning
/// "absent"; the API side keeps that sentinel out of sight behind
/// [`Slot::from_link`] / [`Slot::to_link`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Slot(pub u64);

impl Slot {
    /// Byte offset of this slot's window within the mapped region
    pub fn byte_offset(self) -> u64 {
        self.0 * SLOT_SIZE as u64
    }

    /// Decode an on-disk child link (0 = absent)
    pub fn from_link(raw: u64) -> Option<Slot> {
        if raw == 0 {
            None
        } else {
            Some(Slot(raw))
        }
    }

    /// Encode an optional child link for disk
    pub fn to_link(link: Option<Slot>) -> u64 {
        link.map_or(0, |slot| slot.0)
    }
}

impl std::fmt::Display for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
