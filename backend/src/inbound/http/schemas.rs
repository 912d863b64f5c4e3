//! Wire-level request and response types.
//!
//! The member DTO is the only serialized form of a member record; it has no
//! password-hash field, so no response path can leak credentials.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{AccountRole, FamilyRole, Member, SocialLinks, TreePosition};

/// Serialized member record as returned to clients.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MemberDto {
    /// Stable identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Login email.
    pub email: String,
    /// Administrative authority.
    pub account_role: AccountRole,
    /// Tree placement role.
    pub family_role: FamilyRole,
    /// Portrait URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
    /// Free-form biography.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    /// Public links.
    pub social_links: SocialLinks,
    /// Tree slot.
    pub position: TreePosition,
}

impl From<&Member> for MemberDto {
    fn from(member: &Member) -> Self {
        Self {
            id: *member.id().as_uuid(),
            name: member.name().to_owned(),
            email: member.email().as_ref().to_owned(),
            account_role: member.account_role(),
            family_role: member.family_role(),
            profile_image: member.profile_image().map(str::to_owned),
            bio: member.bio().map(str::to_owned),
            social_links: member.social_links().clone(),
            position: member.position(),
        }
    }
}

/// Registration request body for `POST /api/auth/register`.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// Display name (required).
    pub name: String,
    /// Login email (required, unique).
    pub email: String,
    /// Plaintext password (required, hashed before storage).
    pub password: String,
    /// Requested authority; defaults to `member`.
    pub account_role: Option<AccountRole>,
    /// Tree role; defaults to `Son`.
    pub family_role: Option<FamilyRole>,
    /// Portrait URL.
    pub profile_image: Option<String>,
    /// Free-form biography.
    pub bio: Option<String>,
    /// Public links.
    pub social_links: Option<SocialLinks>,
    /// Tree slot; defaults to the start of the children row.
    pub position: Option<TreePosition>,
}

/// Login request body for `POST /api/auth/login`.
///
/// Fields are optional so the handler can answer missing and blank values
/// with the same message instead of a serde-shaped error.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// Login email.
    pub email: Option<String>,
    /// Plaintext password.
    pub password: Option<String>,
}

/// Profile update body for `PUT /api/family/{id}`.
///
/// Mirrors the mutable-field allow-list. Anything else in the body,
/// including `email`, `password`, and `accountRole`, is ignored at
/// deserialization, which is the outer half of the protected-field
/// stripping (the patch type itself is the inner half).
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMemberRequest {
    /// Replacement display name.
    pub name: Option<String>,
    /// Replacement tree role.
    pub family_role: Option<FamilyRole>,
    /// Replacement portrait URL.
    pub profile_image: Option<String>,
    /// Replacement biography.
    pub bio: Option<String>,
    /// Replacement public links.
    pub social_links: Option<SocialLinks>,
    /// Replacement tree slot.
    pub position: Option<TreePosition>,
}

/// Success envelope carrying a fresh session token and its member.
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    /// Always `true`.
    pub success: bool,
    /// Signed session token.
    pub token: String,
    /// The authenticated member.
    pub user: MemberDto,
}

impl AuthResponse {
    /// Build the envelope for a freshly issued token.
    pub fn new(token: String, member: &Member) -> Self {
        Self {
            success: true,
            token,
            user: MemberDto::from(member),
        }
    }
}

/// Success envelope carrying one member record.
#[derive(Debug, Serialize, ToSchema)]
pub struct MemberResponse {
    /// Always `true`.
    pub success: bool,
    /// The requested member.
    pub data: MemberDto,
}

impl MemberResponse {
    /// Build the envelope for one member.
    pub fn new(member: &Member) -> Self {
        Self {
            success: true,
            data: MemberDto::from(member),
        }
    }
}

/// Success envelope carrying the whole family in tree order.
#[derive(Debug, Serialize, ToSchema)]
pub struct FamilyListResponse {
    /// Always `true`.
    pub success: bool,
    /// Number of members returned.
    pub count: usize,
    /// Members ordered by `(position.row, position.order)`.
    pub data: Vec<MemberDto>,
}

impl FamilyListResponse {
    /// Build the envelope for an ordered member list.
    pub fn new(members: &[Member]) -> Self {
        let data: Vec<MemberDto> = members.iter().map(MemberDto::from).collect();
        Self {
            success: true,
            count: data.len(),
            data,
        }
    }
}

/// Uniform error envelope.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Always `false`.
    pub success: bool,
    /// Human-readable failure description.
    pub message: String,
}

impl ErrorResponse {
    /// Build the envelope for a failure message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}
