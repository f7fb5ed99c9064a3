//! One-way password digests for node and edge gates.
//!
//! Passwords are stored and compared as SHA-256 hex digests only; the
//! raw value never leaves the request that carried it.

use std::fmt::Write;

use sha2::{Digest, Sha256};

/// Returns the lowercase SHA-256 hex digest of `raw`.
#[must_use]
pub fn digest(raw: &str) -> String {
    let hash = Sha256::digest(raw.as_bytes());
    let mut out = String::with_capacity(hash.len() * 2);
    for byte in hash {
        let _ = write!(out, "{byte:02x}");
    }
    out
}

/// Checks a supplied raw password against a stored digest.
#[must_use]
pub fn verify(raw: &str, expected_digest: &str) -> bool {
    digest(raw).eq_ignore_ascii_case(expected_digest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_is_stable_lowercase_hex() {
        let d = digest("ADVENTURE");
        assert_eq!(d.len(), 64);
        assert!(d.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert_eq!(d, digest("ADVENTURE"));
    }

    #[test]
    fn test_verify_accepts_match_and_rejects_mismatch() {
        let stored = digest("ADVENTURE");
        assert!(verify("ADVENTURE", &stored));
        assert!(!verify("WRONG", &stored));
    }

    #[test]
    fn test_verify_is_case_insensitive_on_digest_not_password() {
        let stored = digest("secret").to_uppercase();
        assert!(verify("secret", &stored));
        assert!(!verify("SECRET", &stored));
    }
}
