//! Port abstraction for one-way password hashing.

use crate::domain::error::DomainError;

/// Errors raised while hashing a password.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PasswordHashError {
    /// Hashing failed (salt generation or parameter errors).
    #[error("password hashing failed: {message}")]
    Hash {
        /// Adapter-level detail, logged but never sent to clients.
        message: String,
    },
}

impl PasswordHashError {
    /// Create a hashing error with the given message.
    pub fn hash(message: impl Into<String>) -> Self {
        Self::Hash {
            message: message.into(),
        }
    }
}

impl From<PasswordHashError> for DomainError {
    fn from(value: PasswordHashError) -> Self {
        let PasswordHashError::Hash { message } = value;
        tracing::error!(error = %message, "password hashing failure");
        DomainError::internal("Server error")
    }
}

/// One-way, salted password hashing and verification.
///
/// Implementations must never retain or log the plaintext, and verification
/// must be safe against timing comparison of the stored hash.
pub trait PasswordHasher: Send + Sync {
    /// Hash a plaintext password into a self-describing storable string.
    fn hash(&self, plaintext: &str) -> Result<String, PasswordHashError>;

    /// Check a plaintext password against a stored hash.
    ///
    /// Malformed stored hashes verify as `false` rather than erroring, so a
    /// corrupt record behaves like a wrong password.
    fn verify(&self, plaintext: &str, hash: &str) -> bool;
}

/// Reversible fake hasher for handler tests, where Argon2 cost is noise.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixturePasswordHasher;

const FIXTURE_PREFIX: &str = "fixture$";

impl PasswordHasher for FixturePasswordHasher {
    fn hash(&self, plaintext: &str) -> Result<String, PasswordHashError> {
        Ok(format!("{FIXTURE_PREFIX}{plaintext}"))
    }

    fn verify(&self, plaintext: &str, hash: &str) -> bool {
        hash.strip_prefix(FIXTURE_PREFIX) == Some(plaintext)
    }
}
