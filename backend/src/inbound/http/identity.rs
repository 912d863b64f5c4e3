//! Bearer-credential extractor establishing per-request identity.
//!
//! Handlers that need identity take [`RequestIdentity`] as an argument.
//! Extraction fails with 401 when the request carries no usable credential
//! (missing header, wrong scheme, malformed/expired/forged token). A valid
//! token whose member has since disappeared extracts successfully as an
//! *absent* identity: authorization then operates on `None` and denies, and
//! `GET /api/auth/me` answers 401.

use actix_web::http::header;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::LocalBoxFuture;

use crate::domain::ports::{MemberRepository as _, SessionTokenService as _};
use crate::domain::{DomainError, Member};

use super::state::HttpState;

const NOT_AUTHORIZED: &str = "Not authorized to access this route";

/// Identity resolved from the request's bearer token.
#[derive(Debug, Clone)]
pub struct RequestIdentity(Option<Member>);

impl RequestIdentity {
    /// The resolved member, absent when the token's subject no longer
    /// exists in the store.
    pub fn member(&self) -> Option<&Member> {
        self.0.as_ref()
    }

    /// Require a present member, answering 401 otherwise.
    pub fn require(&self) -> Result<&Member, DomainError> {
        self.member()
            .ok_or_else(|| DomainError::unauthorized(NOT_AUTHORIZED))
    }

    #[cfg(test)]
    pub(crate) fn fixture(member: Option<Member>) -> Self {
        Self(member)
    }
}

fn bearer_token(header_value: Option<&str>) -> Result<&str, DomainError> {
    let value = header_value.ok_or_else(|| DomainError::unauthorized(NOT_AUTHORIZED))?;
    match value.split_once(' ') {
        Some(("Bearer", token)) if !token.is_empty() => Ok(token),
        _ => Err(DomainError::unauthorized(NOT_AUTHORIZED)),
    }
}

impl FromRequest for RequestIdentity {
    type Error = DomainError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let state = req.app_data::<web::Data<HttpState>>().cloned();
        let authorization = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);

        Box::pin(async move {
            let state = state
                .ok_or_else(|| DomainError::internal("HTTP state is not configured"))?;
            let token = bearer_token(authorization.as_deref())?;
            let member_id = state
                .tokens
                .verify(token)
                .map_err(|_| DomainError::unauthorized(NOT_AUTHORIZED))?;
            let member = state.members.find_by_id(&member_id).await?;
            if member.is_none() {
                tracing::warn!(member = %member_id, "valid token for a missing member");
            }
            Ok(Self(member))
        })
    }
}
