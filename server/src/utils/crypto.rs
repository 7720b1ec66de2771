//! Cryptographic utility functions

use sha2::{Digest, Sha256};

/// Compute the SHA-256 hash of a string as lowercase hex
pub fn sha256_hex(data: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data.as_bytes());
    hex::encode(hasher.finalize())
}
