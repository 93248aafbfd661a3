//! Tests for DataMap over the in-process content store
//!
//! These tests verify:
//! - JSON round trips for strings, numbers and structured values
//! - Overwrites at the typed layer
//! - Content-hash passthrough for already-hashed strings
//! - The reserved empty-content hash behavior

use hashtree::{ContentStore, DataMap, MemoryStore};
use serde_json::{json, Value};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_map() -> (TempDir, DataMap<MemoryStore>) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("map.db");
    let map = DataMap::open_path(&path, 64 * 80, MemoryStore::new()).unwrap();
    (temp_dir, map)
}

// =============================================================================
// Round Trips
// =============================================================================

#[test]
fn test_string_round_trip() {
    let (_temp, mut map) = setup_map();

    map.set(&"name", &"alice").unwrap();
    assert_eq!(map.get(&"name").unwrap(), Some(json!("alice")));
}

#[test]
fn test_structured_values() {
    let (_temp, mut map) = setup_map();

    map.set(&"config", &json!({ "retries": 3, "verbose": true })).unwrap();
    map.set(&42u32, &json!(["a", "b", "c"])).unwrap();

    assert_eq!(
        map.get(&"config").unwrap(),
        Some(json!({ "retries": 3, "verbose": true }))
    );
    assert_eq!(map.get(&42u32).unwrap(), Some(json!(["a", "b", "c"])));
}

#[test]
fn test_unset_key_is_absent() {
    let (_temp, map) = setup_map();
    assert_eq!(map.get(&"missing").unwrap(), None);
}

#[test]
fn test_overwrite_replaces_value() {
    let (_temp, mut map) = setup_map();

    map.set(&"k", &1).unwrap();
    map.set(&"k", &2).unwrap();

    assert_eq!(map.get(&"k").unwrap(), Some(json!(2)));
    // Only one index entry exists for the key
    assert_eq!(map.store().record_count(), 1);
}

// =============================================================================
// Hash Passthrough & Empty Content
// =============================================================================

#[test]
fn test_hash_strings_pass_through_unwrapped() {
    let (_temp, mut map) = setup_map();

    // A value that already is a content hash is indexed verbatim, never
    // re-uploaded, so downloading it without its blob yields the hash itself.
    let value_hash = "ab".repeat(32);
    map.set(&"pointer", &value_hash).unwrap();

    assert_eq!(map.get(&"pointer").unwrap(), Some(Value::String(value_hash)));
}

#[test]
fn test_hash_keys_address_the_same_entry() {
    let (_temp, mut map) = setup_map();

    let key_hash = map.content().put(b"\"shared\"").unwrap();
    map.set(&"shared", &"via-plain").unwrap();

    // The hash string and the plain string are the same key
    assert_eq!(map.get(&key_hash).unwrap(), Some(json!("via-plain")));
}

#[test]
fn test_empty_string_value() {
    let (_temp, mut map) = setup_map();

    map.set(&"empty", &"").unwrap();
    assert_eq!(map.get(&"empty").unwrap(), Some(json!("")));
}
