//! Port abstraction for stateless signed session tokens.
//!
//! Sessions are deliberately stateless: a token binds one member id for a
//! fixed window and cannot be revoked before it expires. No server-side
//! session state exists anywhere.

use crate::domain::error::DomainError;
use crate::domain::member::MemberId;

/// Fixed validity window for issued tokens, in days.
pub const SESSION_TTL_DAYS: i64 = 30;

/// Errors raised while issuing or verifying tokens.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionTokenError {
    /// Token could not be produced.
    #[error("token issuance failed: {message}")]
    Issue {
        /// Adapter-level detail, logged but never sent to clients.
        message: String,
    },
    /// Token is malformed, forged, or carries an unusable subject.
    #[error("invalid session token")]
    Invalid,
    /// Token signature checks out but the validity window has passed.
    #[error("session token expired")]
    Expired,
}

impl SessionTokenError {
    /// Create an issuance error with the given message.
    pub fn issue(message: impl Into<String>) -> Self {
        Self::Issue {
            message: message.into(),
        }
    }
}

impl From<SessionTokenError> for DomainError {
    fn from(value: SessionTokenError) -> Self {
        // Verification failures are mapped to 401 by the identity extractor;
        // reaching here means issuance broke, which is a server fault.
        tracing::error!(error = %value, "session token failure");
        DomainError::internal("Server error")
    }
}

/// Issue and verify signed, time-bounded session tokens.
pub trait SessionTokenService: Send + Sync {
    /// Produce a token binding `member` for [`SESSION_TTL_DAYS`].
    fn issue(&self, member: &MemberId) -> Result<String, SessionTokenError>;

    /// Verify signature and expiry, returning the bound member id.
    fn verify(&self, token: &str) -> Result<MemberId, SessionTokenError>;
}
