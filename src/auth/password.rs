//! Password hashing strategies.
//!
//! Two interchangeable schemes, selected per deployment via
//! `auth.password_scheme`:
//!
//! - `bcrypt` (default): self-salted iterated hash, verified through the
//!   algorithm's own constant-time check.
//! - `sha256`: unsalted SHA-256 rendered as lowercase hex. Kept only for
//!   compatibility with stores migrated from the legacy deployment;
//!   identical passwords produce identical digests and there is no
//!   per-user salt. Do not pick this for new installations.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Password hashing scheme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PasswordScheme {
    /// Salted, iterated bcrypt hash.
    #[default]
    Bcrypt,
    /// Legacy unsalted SHA-256 hex digest.
    Sha256,
}

impl PasswordScheme {
    /// Hash a plaintext password for storage.
    pub fn hash(&self, password: &str) -> Result<String> {
        match self {
            PasswordScheme::Bcrypt => {
                // Use a lower cost factor for development speed
                let cost = if cfg!(debug_assertions) { 4 } else { 10 };
                bcrypt::hash(password, cost).context("Failed to hash password")
            }
            PasswordScheme::Sha256 => Ok(hex::encode(Sha256::digest(password.as_bytes()))),
        }
    }

    /// Verify a plaintext password against a stored hash.
    ///
    /// A malformed or mismatched stored hash verifies as false; it never
    /// aborts the request pipeline.
    pub fn verify(&self, password: &str, stored: &str) -> bool {
        match self {
            PasswordScheme::Bcrypt => bcrypt::verify(password, stored).unwrap_or(false),
            PasswordScheme::Sha256 => {
                hex::encode(Sha256::digest(password.as_bytes())) == stored.to_lowercase()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bcrypt_round_trip() {
        let scheme = PasswordScheme::Bcrypt;
        let hash = scheme.hash("Secret1").unwrap();
        assert!(hash.starts_with("$2"));
        assert!(scheme.verify("Secret1", &hash));
        assert!(!scheme.verify("Secret2", &hash));
    }

    #[test]
    fn test_bcrypt_malformed_hash_is_failure_not_panic() {
        let scheme = PasswordScheme::Bcrypt;
        assert!(!scheme.verify("Secret1", "not-a-bcrypt-hash"));
        assert!(!scheme.verify("Secret1", ""));
    }

    #[test]
    fn test_sha256_known_digest() {
        let scheme = PasswordScheme::Sha256;
        let hash = scheme.hash("password").unwrap();
        // Lowercase hex, fixed output for a fixed input
        assert_eq!(
            hash,
            "5e884898da28047151d0e56f8dc6292773603d0d6aabbdd62a11ef721d1542d8"
        );
        assert!(scheme.verify("password", &hash));
        assert!(!scheme.verify("Password", &hash));
    }

    #[test]
    fn test_sha256_accepts_uppercase_stored_digest() {
        let scheme = PasswordScheme::Sha256;
        let hash = scheme.hash("password").unwrap().to_uppercase();
        assert!(scheme.verify("password", &hash));
    }

    #[test]
    fn test_schemes_are_not_interchangeable() {
        let bcrypt_hash = PasswordScheme::Bcrypt.hash("Secret1").unwrap();
        assert!(!PasswordScheme::Sha256.verify("Secret1", &bcrypt_hash));

        let sha_hash = PasswordScheme::Sha256.hash("Secret1").unwrap();
        assert!(!PasswordScheme::Bcrypt.verify("Secret1", &sha_hash));
    }
}
