//! Internal Diesel row structs for database operations.
//!
//! Implementation details of the persistence layer; never exposed to the
//! domain. Conversions to and from domain types live next to the structs so
//! the repository reads top-down.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::{
    AccountRole, Email, FamilyRole, Member, MemberId, MemberProfilePatch, NewMember, SocialLinks,
    TreePosition,
};

use super::schema::members;

/// Row struct for reading from the members table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = members)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct MemberRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub account_role: String,
    pub family_role: String,
    pub profile_image: Option<String>,
    pub bio: Option<String>,
    pub social_links: serde_json::Value,
    pub position_row: i32,
    pub position_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MemberRow {
    /// Convert a database row into a domain member.
    ///
    /// Unexpected stored values degrade to safe defaults with a warning
    /// rather than failing the whole read: unknown account roles become
    /// `member` (never `admin`), unknown family roles become `Son`, and
    /// out-of-range positions snap back into range.
    pub(crate) fn into_member(self) -> Result<Member, String> {
        let email = Email::new(&self.email)
            .map_err(|error| format!("stored email {:?} is invalid: {error}", self.email))?;

        let account_role = AccountRole::parse(&self.account_role).unwrap_or_else(|| {
            tracing::warn!(value = %self.account_role, id = %self.id, "unknown account role, demoting to member");
            AccountRole::Member
        });
        let family_role = FamilyRole::parse(&self.family_role).unwrap_or_else(|| {
            tracing::warn!(value = %self.family_role, id = %self.id, "unknown family role, defaulting to Son");
            FamilyRole::Son
        });

        let social_links: SocialLinks =
            serde_json::from_value(self.social_links).unwrap_or_else(|error| {
                tracing::warn!(id = %self.id, %error, "unreadable social links, dropping");
                SocialLinks::default()
            });

        let row = u32::try_from(self.position_row).unwrap_or(1).max(1);
        let order = u32::try_from(self.position_order).unwrap_or(1).max(1);
        let position = TreePosition::new(row, order)
            .map_err(|error| format!("stored position is invalid: {error}"))?;

        Ok(Member::new(
            MemberId::from_uuid(self.id),
            NewMember {
                name: self.name,
                email,
                password_hash: self.password_hash,
                account_role,
                family_role,
                profile_image: self.profile_image,
                bio: self.bio,
                social_links,
                position,
            },
        ))
    }
}

/// Insertable struct for creating new member records.
#[derive(Debug, Insertable)]
#[diesel(table_name = members)]
pub(crate) struct NewMemberRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub account_role: String,
    pub family_role: String,
    pub profile_image: Option<String>,
    pub bio: Option<String>,
    pub social_links: serde_json::Value,
    pub position_row: i32,
    pub position_order: i32,
}

impl NewMemberRow {
    /// Build an insertable row for a fresh identifier and field bundle.
    pub(crate) fn from_new_member(id: MemberId, fields: &NewMember) -> Self {
        Self {
            id: *id.as_uuid(),
            name: fields.name.clone(),
            email: fields.email.as_ref().to_owned(),
            password_hash: fields.password_hash.clone(),
            account_role: fields.account_role.as_str().to_owned(),
            family_role: fields.family_role.as_str().to_owned(),
            profile_image: fields.profile_image.clone(),
            bio: fields.bio.clone(),
            social_links: serde_json::to_value(&fields.social_links)
                .unwrap_or_else(|_| serde_json::Value::Object(serde_json::Map::new())),
            position_row: position_component(fields.position.row()),
            position_order: position_component(fields.position.order()),
        }
    }
}

/// Changeset covering exactly the allow-listed profile fields.
///
/// `None` fields are skipped by Diesel, which matches patch semantics. No
/// email, password, or account-role column appears here, so the update
/// statement cannot touch them regardless of what the caller sends.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = members)]
pub(crate) struct MemberProfileChangeset {
    pub name: Option<String>,
    pub family_role: Option<String>,
    pub profile_image: Option<String>,
    pub bio: Option<String>,
    pub social_links: Option<serde_json::Value>,
    pub position_row: Option<i32>,
    pub position_order: Option<i32>,
    pub updated_at: DateTime<Utc>,
}

impl From<MemberProfilePatch> for MemberProfileChangeset {
    fn from(patch: MemberProfilePatch) -> Self {
        let MemberProfilePatch {
            name,
            family_role,
            profile_image,
            bio,
            social_links,
            position,
        } = patch;
        Self {
            name,
            family_role: family_role.map(|role| role.as_str().to_owned()),
            profile_image,
            bio,
            social_links: social_links.and_then(|links| serde_json::to_value(&links).ok()),
            position_row: position.map(|p| position_component(p.row())),
            position_order: position.map(|p| position_component(p.order())),
            updated_at: Utc::now(),
        }
    }
}

fn position_component(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}
