//! Salted hashing of revoked values.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use sha2::{Digest, Sha256};

/// Hashes `value` with `salt` prepended: unpadded URL-safe base64 of SHA-256.
#[must_use]
pub fn hash_value(salt: &str, value: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(value.as_bytes());
    URL_SAFE_NO_PAD.encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_value_known_digest() {
        // SHA-256("abc")
        assert_eq!(
            hash_value("", "abc"),
            "ungWv48Bz-pBQUDeXa4iI7ADYaOWF3qctBD_YfIAFa0"
        );
    }

    #[test]
    fn test_hash_value_salted() {
        assert_eq!(hash_value("a", "bc"), hash_value("", "abc"));
        assert_ne!(hash_value("salt", "abc"), hash_value("", "abc"));
    }
}
