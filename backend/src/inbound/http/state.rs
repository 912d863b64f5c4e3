//! Shared HTTP adapter state.
//!
//! Handlers accept this via `actix_web::web::Data`, so they depend only on
//! domain ports and remain testable without real infrastructure.

use std::sync::Arc;

use crate::domain::ports::{MemberRepository, PasswordHasher, SessionTokenService};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Member store access.
    pub members: Arc<dyn MemberRepository>,
    /// One-way password hashing.
    pub passwords: Arc<dyn PasswordHasher>,
    /// Session token issue/verify.
    pub tokens: Arc<dyn SessionTokenService>,
}

impl HttpState {
    /// Bundle port implementations for the HTTP layer.
    pub fn new(
        members: Arc<dyn MemberRepository>,
        passwords: Arc<dyn PasswordHasher>,
        tokens: Arc<dyn SessionTokenService>,
    ) -> Self {
        Self {
            members,
            passwords,
            tokens,
        }
    }
}
