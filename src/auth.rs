//! Password digest generation and verification
//!
//! Uses the same double SHA-256 scheme that powers Pi-hole's web password:
//! `hex(sha256(hex(sha256(password))))`. This is kept for compatibility with
//! existing `password_hash` config values and is weaker than a salted KDF;
//! it is not a pattern to copy into new systems.

use sha2::{Digest, Sha256};

/// Compute the double SHA-256 digest of a password, hex-encoded (64 chars).
pub fn password_hash(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    let first = format!("{:x}", hasher.finalize());

    let mut hasher = Sha256::new();
    hasher.update(first.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Check a password against a stored digest.
///
/// The comparison is constant-time over equal-length inputs so that digest
/// contents cannot be probed byte-by-byte through response timing.
pub fn verify_password(password: &str, digest: &str) -> bool {
    constant_time_eq(password_hash(password).as_bytes(), digest.as_bytes())
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_deterministic() {
        assert_eq!(password_hash("hunter2"), password_hash("hunter2"));
    }

    #[test]
    fn test_hash_is_hex_encoded_sha256() {
        let digest = password_hash("hunter2");
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_different_passwords_differ() {
        assert_ne!(password_hash("hunter2"), password_hash("hunter3"));
    }

    #[test]
    fn test_double_hash_differs_from_single() {
        // A single round of sha256("password") is a well-known vector; the
        // stored digest must be the second round, not the first.
        let single = "5e884898da28047151d0e56f8dc6292773603d0d6aabbdd62a11ef721d1542d8";
        assert_ne!(password_hash("password"), single);
    }

    #[test]
    fn test_verify_roundtrip() {
        let digest = password_hash("hunter2");
        assert!(verify_password("hunter2", &digest));
        assert!(!verify_password("hunter3", &digest));
        assert!(!verify_password("", &digest));
    }

    #[test]
    fn test_verify_rejects_malformed_digest() {
        assert!(!verify_password("hunter2", ""));
        assert!(!verify_password("hunter2", "not-a-digest"));
    }

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq(b"abc", b"abc"));
        assert!(!constant_time_eq(b"abc", b"abd"));
        assert!(!constant_time_eq(b"abc", b"abcd"));
    }
}
