//! Family API handlers.
//!
//! ```text
//! GET /api/family          public, tree order
//! GET /api/family/{id}     public
//! PUT /api/family/{id}     bearer token + admin-or-self
//! ```

use std::str::FromStr;

use actix_web::{get, put, web};

use crate::domain::ports::MemberRepository as _;
use crate::domain::{DomainError, MemberId, MemberProfilePatch, can_edit};

use super::ApiResult;
use super::identity::RequestIdentity;
use super::schemas::{ErrorResponse, FamilyListResponse, MemberResponse, UpdateMemberRequest};
use super::state::HttpState;

const MEMBER_NOT_FOUND: &str = "Family member not found";
const OWN_PROFILE_ONLY: &str = "You can only edit your own profile";

/// Parse a path id, treating unparseable ids like absent records.
fn parse_member_id(raw: &str) -> Result<MemberId, DomainError> {
    MemberId::from_str(raw).map_err(|_| DomainError::not_found(MEMBER_NOT_FOUND))
}

impl TryFrom<UpdateMemberRequest> for MemberProfilePatch {
    type Error = DomainError;

    fn try_from(value: UpdateMemberRequest) -> Result<Self, Self::Error> {
        let UpdateMemberRequest {
            name,
            family_role,
            profile_image,
            bio,
            social_links,
            position,
        } = value;
        let name = match name {
            Some(name) => {
                let trimmed = name.trim();
                if trimmed.is_empty() {
                    return Err(DomainError::validation("name must not be empty"));
                }
                Some(trimmed.to_owned())
            }
            None => None,
        };
        Ok(Self {
            name,
            family_role,
            profile_image,
            bio,
            social_links,
            position,
        })
    }
}

/// List every family member in tree order.
#[utoipa::path(
    get,
    path = "/api/family",
    responses(
        (status = 200, description = "Members ordered by (row, order)", body = FamilyListResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tags = ["family"],
    operation_id = "listFamily",
    security([])
)]
#[get("")]
pub async fn list_family(state: web::Data<HttpState>) -> ApiResult<web::Json<FamilyListResponse>> {
    let members = state.members.list_all().await?;
    Ok(web::Json(FamilyListResponse::new(&members)))
}

/// Fetch one family member.
#[utoipa::path(
    get,
    path = "/api/family/{id}",
    params(("id" = String, Path, description = "Member identifier")),
    responses(
        (status = 200, description = "The member", body = MemberResponse),
        (status = 404, description = "No such member", body = ErrorResponse)
    ),
    tags = ["family"],
    operation_id = "getFamilyMember",
    security([])
)]
#[get("/{id}")]
pub async fn get_family_member(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<MemberResponse>> {
    let id = parse_member_id(&path)?;
    let member = state
        .members
        .find_by_id(&id)
        .await?
        .ok_or_else(|| DomainError::not_found(MEMBER_NOT_FOUND))?;
    Ok(web::Json(MemberResponse::new(&member)))
}

/// Update a member profile.
///
/// Authorization runs against the target id before the record is touched:
/// admins may edit anyone, members only themselves. The request body is
/// reduced to the mutable-field allow-list, so protected fields in the
/// payload are ignored no matter who calls.
#[utoipa::path(
    put,
    path = "/api/family/{id}",
    params(("id" = String, Path, description = "Member identifier")),
    request_body = UpdateMemberRequest,
    responses(
        (status = 200, description = "The updated member", body = MemberResponse),
        (status = 400, description = "Validation failure", body = ErrorResponse),
        (status = 401, description = "Missing or invalid bearer token", body = ErrorResponse),
        (status = 403, description = "Not allowed to edit this profile", body = ErrorResponse),
        (status = 404, description = "No such member", body = ErrorResponse)
    ),
    tags = ["family"],
    operation_id = "updateFamilyMember"
)]
#[put("/{id}")]
pub async fn update_family_member(
    state: web::Data<HttpState>,
    identity: RequestIdentity,
    path: web::Path<String>,
    payload: web::Json<UpdateMemberRequest>,
) -> ApiResult<web::Json<MemberResponse>> {
    let target = parse_member_id(&path)?;
    if !can_edit(identity.member(), &target) {
        return Err(DomainError::forbidden(OWN_PROFILE_ONLY));
    }

    let patch = MemberProfilePatch::try_from(payload.into_inner())?;
    let member = state
        .members
        .update_profile(&target, patch)
        .await?
        .ok_or_else(|| DomainError::not_found(MEMBER_NOT_FOUND))?;

    tracing::info!(member = %member.id(), "profile updated");
    Ok(web::Json(MemberResponse::new(&member)))
}
