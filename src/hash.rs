//! Content-hash text handling
//!
//! Keys and values at the store surface are 64-character lowercase hex
//! digests of 32 raw bytes. This module converts between the two forms and
//! fails fast on anything of the wrong shape.

use crate::error::{HashTreeError, Result};

/// Width of a raw content hash in bytes
pub const HASH_SIZE: usize = 32;

/// Width of a content hash in hex characters
pub const HASH_HEX_LEN: usize = 2 * HASH_SIZE;

/// A raw content hash as stored in a record slot
pub type Digest = [u8; HASH_SIZE];

/// The all-zero digest marking an unassigned record
pub const UNASSIGNED: Digest = [0u8; HASH_SIZE];

/// Check whether a string has the exact shape of a content hash
/// (64 lowercase hex characters)
pub fn is_content_hash(s: &str) -> bool {
    s.len() == HASH_HEX_LEN
        && s.bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}

/// Decode a hex hash string into its raw digest
///
/// Rejects anything that does not decode to exactly [`HASH_SIZE`] bytes.
pub fn decode(s: &str) -> Result<Digest> {
    if s.len() != HASH_HEX_LEN {
        return Err(HashTreeError::MalformedHash(s.to_string()));
    }

    let mut digest = UNASSIGNED;
    hex::decode_to_slice(s, &mut digest)
        .map_err(|_| HashTreeError::MalformedHash(s.to_string()))?;

    Ok(digest)
}

/// Encode a raw digest as lowercase hex
pub fn encode(digest: &Digest) -> String {
    hex::encode(digest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_rejects_wrong_length() {
        assert!(decode("abcd").is_err());
        assert!(decode(&"a".repeat(63)).is_err());
        assert!(decode(&"a".repeat(65)).is_err());
    }

    #[test]
    fn decode_rejects_non_hex() {
        assert!(decode(&"g".repeat(64)).is_err());
    }

    #[test]
    fn round_trip() {
        let hex_str = "ab".repeat(32);
        let digest = decode(&hex_str).unwrap();
        assert_eq!(encode(&digest), hex_str);
    }

    #[test]
    fn shape_check() {
        assert!(is_content_hash(&"0".repeat(64)));
        assert!(is_content_hash(&"f".repeat(64)));
        assert!(!is_content_hash(&"F".repeat(64)));
        assert!(!is_content_hash("hello"));
    }
}
