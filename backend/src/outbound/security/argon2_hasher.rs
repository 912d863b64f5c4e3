//! Argon2id adapter for the password-hashing port.
//!
//! Hashes are PHC strings with a fresh random 16-byte salt per call, so the
//! stored form is self-describing and two members with the same password
//! never share a hash. Verification goes through the `argon2` verifier,
//! which compares digests without short-circuiting on the stored hash.

use argon2::{Argon2, PasswordHasher as _, PasswordVerifier as _};
use password_hash::{PasswordHash, SaltString};

use crate::domain::ports::{PasswordHashError, PasswordHasher};

/// Argon2id password hashing with default parameters.
#[derive(Debug, Default, Clone, Copy)]
pub struct Argon2PasswordHasher;

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, plaintext: &str) -> Result<String, PasswordHashError> {
        let mut salt_bytes = [0u8; 16];
        getrandom::getrandom(&mut salt_bytes)
            .map_err(|error| PasswordHashError::hash(error.to_string()))?;
        let salt = SaltString::encode_b64(&salt_bytes)
            .map_err(|error| PasswordHashError::hash(error.to_string()))?;
        let phc = Argon2::default()
            .hash_password(plaintext.as_bytes(), &salt)
            .map_err(|error| PasswordHashError::hash(error.to_string()))?
            .to_string();
        Ok(phc)
    }

    fn verify(&self, plaintext: &str, hash: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(hash) else {
            return false;
        };
        Argon2::default()
            .verify_password(plaintext.as_bytes(), &parsed)
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn hash_and_verify_round_trip() {
        let hasher = Argon2PasswordHasher;
        let hash = hasher.hash("password123").expect("hashing succeeds");

        assert!(hash.starts_with("$argon2"));
        assert!(hasher.verify("password123", &hash));
        assert!(!hasher.verify("password124", &hash));
    }

    #[rstest]
    fn salting_makes_hashes_unique() {
        let hasher = Argon2PasswordHasher;
        let first = hasher.hash("password123").expect("hashing succeeds");
        let second = hasher.hash("password123").expect("hashing succeeds");
        assert_ne!(first, second);
    }

    #[rstest]
    #[case("")]
    #[case("plaintext-left-over")]
    fn malformed_stored_hashes_verify_false(#[case] stored: &str) {
        assert!(!Argon2PasswordHasher.verify("password123", stored));
    }
}
