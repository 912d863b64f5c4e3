//! Domain-level error type.
//!
//! Transport agnostic: the HTTP adapter maps these onto status codes and the
//! uniform response envelope. Handlers and ports construct errors through the
//! convenience constructors so the failure taxonomy stays closed.

use std::fmt;

/// Stable machine-readable code describing the failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorCode {
    /// The request is malformed or fails field validation.
    Validation,
    /// Authentication is missing, invalid, or the login pair is wrong.
    Unauthorized,
    /// Authenticated but not permitted to act on this target.
    Forbidden,
    /// The referenced member does not exist.
    NotFound,
    /// A uniqueness rule was violated (duplicate email on registration).
    Conflict,
    /// The client exceeded the request-rate abuse guard.
    TooManyRequests,
    /// An unexpected store or runtime failure.
    Internal,
}

/// Domain error carried from handlers and ports to the transport layer.
///
/// ## Invariants
/// - `message` is non-empty; constructors replace blank messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainError {
    code: ErrorCode,
    message: String,
}

impl DomainError {
    /// Create a new error, falling back to a generic message when the
    /// supplied one is blank.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            "request failed".to_owned()
        } else {
            message
        };
        Self { code, message }
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Human-readable message returned to clients.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Convenience constructor for [`ErrorCode::Validation`].
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Validation, message)
    }

    /// Convenience constructor for [`ErrorCode::Unauthorized`].
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized, message)
    }

    /// Convenience constructor for [`ErrorCode::Forbidden`].
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Forbidden, message)
    }

    /// Convenience constructor for [`ErrorCode::NotFound`].
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    /// Convenience constructor for [`ErrorCode::Conflict`].
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Conflict, message)
    }

    /// Convenience constructor for [`ErrorCode::TooManyRequests`].
    pub fn too_many_requests(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::TooManyRequests, message)
    }

    /// Convenience constructor for [`ErrorCode::Internal`].
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Internal, message)
    }
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for DomainError {}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(DomainError::validation("bad"), ErrorCode::Validation)]
    #[case(DomainError::unauthorized("no"), ErrorCode::Unauthorized)]
    #[case(DomainError::forbidden("own profile only"), ErrorCode::Forbidden)]
    #[case(DomainError::not_found("missing"), ErrorCode::NotFound)]
    #[case(DomainError::conflict("duplicate"), ErrorCode::Conflict)]
    #[case(DomainError::internal("boom"), ErrorCode::Internal)]
    fn constructors_set_codes(#[case] error: DomainError, #[case] expected: ErrorCode) {
        assert_eq!(error.code(), expected);
    }

    #[rstest]
    fn blank_messages_are_replaced() {
        let error = DomainError::internal("   ");
        assert_eq!(error.message(), "request failed");
    }

    #[rstest]
    fn display_uses_message() {
        let error = DomainError::not_found("Family member not found");
        assert_eq!(error.to_string(), "Family member not found");
    }
}
