//! JWT (HS256) adapter for the session-token port.
//!
//! Tokens carry only the member id and the issue/expiry instants. The
//! signature is an HMAC over the server-held secret; there is no per-session
//! server state and no revocation list.

use chrono::Utc;
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::MemberId;
use crate::domain::ports::{SESSION_TTL_DAYS, SessionTokenError, SessionTokenService};

const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

/// Claims embedded in a session token.
#[derive(Debug, Serialize, Deserialize)]
struct SessionClaims {
    /// Bound member id.
    sub: Uuid,
    /// Issue instant (Unix seconds).
    iat: i64,
    /// Expiry instant (Unix seconds).
    exp: i64,
}

/// HS256-signed stateless session tokens.
pub struct JwtSessionTokens {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtSessionTokens {
    /// Build a token service over the given signing secret.
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Tokens carry no audience claim.
        validation.validate_aud = false;
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        }
    }
}

impl std::fmt::Debug for JwtSessionTokens {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Keys stay out of debug output.
        f.debug_struct("JwtSessionTokens").finish_non_exhaustive()
    }
}

impl SessionTokenService for JwtSessionTokens {
    fn issue(&self, member: &MemberId) -> Result<String, SessionTokenError> {
        let now = Utc::now().timestamp();
        let claims = SessionClaims {
            sub: *member.as_uuid(),
            iat: now,
            exp: now + SESSION_TTL_DAYS * SECONDS_PER_DAY,
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|error| SessionTokenError::issue(error.to_string()))
    }

    fn verify(&self, token: &str) -> Result<MemberId, SessionTokenError> {
        let data = decode::<SessionClaims>(token, &self.decoding_key, &self.validation).map_err(
            |error| match error.kind() {
                ErrorKind::ExpiredSignature => SessionTokenError::Expired,
                _ => SessionTokenError::Invalid,
            },
        )?;
        Ok(MemberId::from_uuid(data.claims.sub))
    }
}
