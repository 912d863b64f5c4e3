//! Token adapters implementing the session-token port.

mod jwt_session_tokens;

pub use jwt_session_tokens::JwtSessionTokens;
