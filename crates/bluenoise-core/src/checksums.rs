//! Content digests.

use sha2::{Digest, Sha256};

/// Lowercase hex SHA-256 of `data`.
#[must_use]
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

/// File name a key's metadata record is stored under.
///
/// Keys may contain any printable character, so they are hashed rather than
/// used as path components.
#[must_use]
pub fn key_digest(key: &str) -> String {
    sha256_hex(key.as_bytes())
}
