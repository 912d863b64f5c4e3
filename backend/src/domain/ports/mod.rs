//! Domain ports and supporting types for the hexagonal boundary.

mod member_repository;
mod password_hasher;
mod session_tokens;

pub use member_repository::{FixtureMemberRepository, MemberRepository, MemberStoreError};
pub use password_hasher::{FixturePasswordHasher, PasswordHashError, PasswordHasher};
pub use session_tokens::{SESSION_TTL_DAYS, SessionTokenError, SessionTokenService};
