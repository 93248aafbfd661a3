//! # hashtree
//!
//! A persistent content-hash index: an append-only binary search tree kept
//! inside a single memory-mapped file. Keys and values are both fixed-length
//! content hashes (32 bytes, 64 hex characters); records are allocated by a
//! bump allocator and never freed, so the file only ever grows.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                  DataMap                     │
//! │      (typed keys/values ⇄ content hashes)    │
//! └──────────┬─────────────────────┬────────────┘
//!            │                     │
//!            ▼                     ▼
//!   ┌─────────────────┐   ┌─────────────────┐
//!   │    HashStore    │   │  ContentStore   │
//!   │  (hex strings)  │   │  (blob ⇄ hash)  │
//!   └────────┬────────┘   └─────────────────┘
//!            │
//!            ▼
//!   ┌─────────────────┐
//!   │    HashIndex    │
//!   │ (BST over slots)│
//!   └────────┬────────┘
//!            │
//!            ▼
//!   ┌─────────────────┐
//!   │     Mapping     │
//!   │  (mmap'd file)  │
//!   └─────────────────┘
//! ```
//!
//! Single-writer by construction: `set` takes `&mut self`, the mapped region
//! is never locked, and multi-process coordination is the caller's problem.

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod hash;
pub mod mapping;
pub mod index;
pub mod store;
pub mod content;
pub mod datamap;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use config::Config;
pub use content::{ContentStore, MemoryStore};
pub use datamap::DataMap;
pub use error::{HashTreeError, Result};
pub use index::{HashIndex, Slot};
pub use store::HashStore;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of hashtree
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
