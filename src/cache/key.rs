use sha2::{Digest, Sha256};

/// Derive a filesystem-safe cache key from an arbitrary string (usually a URL).
///
/// SHA-256, lowercase hex: fixed 64-character length, no path separators,
/// collisions only at cryptographically negligible probability.
pub fn cache_key(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}
