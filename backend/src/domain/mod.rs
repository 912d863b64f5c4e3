//! Transport-agnostic domain model: members, credentials, authority rules,
//! and the ports adapters implement.

pub mod auth;
pub mod error;
pub mod member;
pub mod policy;
pub mod ports;

pub use auth::{AuthValidationError, LoginCredentials, Registration, RegistrationExtras};
pub use error::{DomainError, ErrorCode};
pub use member::{
    AccountRole, Email, FamilyRole, Member, MemberId, MemberProfilePatch, MemberValidationError,
    NewMember, SocialLinks, TreePosition,
};
pub use policy::can_edit;
