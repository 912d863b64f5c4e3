//! Port abstraction for member persistence adapters.

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use crate::domain::error::DomainError;
use crate::domain::member::{Email, Member, MemberId, MemberProfilePatch, NewMember};

/// Persistence errors raised by member repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MemberStoreError {
    /// Store connection could not be established or was lost.
    #[error("member store connection failed: {message}")]
    Connection {
        /// Adapter-level detail, logged but never sent to clients.
        message: String,
    },
    /// Query or mutation failed during execution.
    #[error("member store query failed: {message}")]
    Query {
        /// Adapter-level detail, logged but never sent to clients.
        message: String,
    },
    /// The email is already registered to another member.
    #[error("email already registered: {email}")]
    DuplicateEmail {
        /// Offending address.
        email: String,
    },
}

impl MemberStoreError {
    /// Create a connection error with the given message.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create a query error with the given message.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }

    /// Create a duplicate-email error for the given address.
    pub fn duplicate_email(email: impl Into<String>) -> Self {
        Self::DuplicateEmail {
            email: email.into(),
        }
    }
}

impl From<MemberStoreError> for DomainError {
    fn from(value: MemberStoreError) -> Self {
        match value {
            MemberStoreError::DuplicateEmail { .. } => {
                DomainError::conflict("User already exists")
            }
            MemberStoreError::Connection { message } | MemberStoreError::Query { message } => {
                tracing::error!(error = %message, "member store failure");
                DomainError::internal("Server error")
            }
        }
    }
}

/// Store access for member records.
///
/// Single-record operations only; no call spans more than one member, so
/// adapters need no multi-record transactions.
#[async_trait]
pub trait MemberRepository: Send + Sync {
    /// Insert a new member record.
    ///
    /// Fails with [`MemberStoreError::DuplicateEmail`] when the email is
    /// already registered.
    async fn create(&self, fields: NewMember) -> Result<Member, MemberStoreError>;

    /// Fetch a member by identifier.
    async fn find_by_id(&self, id: &MemberId) -> Result<Option<Member>, MemberStoreError>;

    /// Fetch a member by login email.
    async fn find_by_email(&self, email: &Email) -> Result<Option<Member>, MemberStoreError>;

    /// List every member ordered ascending by `(position.row, position.order)`.
    async fn list_all(&self) -> Result<Vec<Member>, MemberStoreError>;

    /// Apply a profile patch to the identified member.
    ///
    /// Returns `None` when the id does not resolve. The patch type itself
    /// restricts which fields can change; adapters must not widen it.
    async fn update_profile(
        &self,
        id: &MemberId,
        patch: MemberProfilePatch,
    ) -> Result<Option<Member>, MemberStoreError>;
}

/// In-memory repository used by tests and by demo deployments that run
/// without a configured database.
#[derive(Debug, Default)]
pub struct FixtureMemberRepository {
    members: Mutex<Vec<Member>>,
}

impl FixtureMemberRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Member>> {
        self.members.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl MemberRepository for FixtureMemberRepository {
    async fn create(&self, fields: NewMember) -> Result<Member, MemberStoreError> {
        let mut members = self.lock();
        if members.iter().any(|m| m.email() == &fields.email) {
            return Err(MemberStoreError::duplicate_email(fields.email.as_ref()));
        }
        let member = Member::new(MemberId::random(), fields);
        members.push(member.clone());
        Ok(member)
    }

    async fn find_by_id(&self, id: &MemberId) -> Result<Option<Member>, MemberStoreError> {
        Ok(self.lock().iter().find(|m| m.id() == id).cloned())
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<Member>, MemberStoreError> {
        Ok(self.lock().iter().find(|m| m.email() == email).cloned())
    }

    async fn list_all(&self) -> Result<Vec<Member>, MemberStoreError> {
        let mut members = self.lock().clone();
        // Stable sort keeps insertion order for members sharing a slot.
        members.sort_by_key(|m| m.position().sort_key());
        Ok(members)
    }

    async fn update_profile(
        &self,
        id: &MemberId,
        patch: MemberProfilePatch,
    ) -> Result<Option<Member>, MemberStoreError> {
        let mut members = self.lock();
        match members.iter_mut().find(|m| m.id() == id) {
            Some(member) => {
                member.apply(patch);
                Ok(Some(member.clone()))
            }
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::member::{AccountRole, FamilyRole, SocialLinks, TreePosition};
    use rstest::rstest;

    fn fields(email: &str, row: u32, order: u32) -> NewMember {
        NewMember {
            name: "Fixture".to_owned(),
            email: Email::new(email).expect("valid email"),
            password_hash: "$argon2id$test".to_owned(),
            account_role: AccountRole::Member,
            family_role: FamilyRole::Son,
            profile_image: None,
            bio: None,
            social_links: SocialLinks::default(),
            position: TreePosition::new(row, order).expect("valid position"),
        }
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected_and_nothing_is_stored() {
        let repo = FixtureMemberRepository::new();
        repo.create(fields("john@aguasan.com", 1, 1))
            .await
            .expect("first create succeeds");

        let err = repo
            .create(fields("John@Aguasan.com", 1, 2))
            .await
            .expect_err("same email must fail");
        assert!(matches!(err, MemberStoreError::DuplicateEmail { .. }));
        assert_eq!(repo.list_all().await.expect("list").len(), 1);
    }

    #[tokio::test]
    async fn list_all_orders_by_row_then_order() {
        let repo = FixtureMemberRepository::new();
        for (email, row, order) in [
            ("c@x.com", 2, 2),
            ("a@x.com", 1, 1),
            ("d@x.com", 2, 1),
            ("b@x.com", 1, 2),
        ] {
            repo.create(fields(email, row, order)).await.expect("create");
        }

        let keys: Vec<_> = repo
            .list_all()
            .await
            .expect("list")
            .iter()
            .map(|m| m.position().sort_key())
            .collect();
        assert_eq!(keys, vec![(1, 1), (1, 2), (2, 1), (2, 2)]);
    }

    #[tokio::test]
    async fn update_profile_on_unknown_id_returns_none() {
        let repo = FixtureMemberRepository::new();
        let updated = repo
            .update_profile(&MemberId::random(), MemberProfilePatch::default())
            .await
            .expect("update call succeeds");
        assert!(updated.is_none());
    }

    #[tokio::test]
    async fn update_profile_applies_patch_and_persists() {
        let repo = FixtureMemberRepository::new();
        let created = repo
            .create(fields("sarah@aguasan.com", 2, 2))
            .await
            .expect("create");

        let patch = MemberProfilePatch {
            bio: Some("Second child.".to_owned()),
            ..MemberProfilePatch::default()
        };
        let updated = repo
            .update_profile(created.id(), patch)
            .await
            .expect("update call succeeds")
            .expect("member exists");
        assert_eq!(updated.bio(), Some("Second child."));

        let reread = repo
            .find_by_id(created.id())
            .await
            .expect("find")
            .expect("member exists");
        assert_eq!(reread.bio(), Some("Second child."));
        assert_eq!(reread.email(), created.email());
    }

    #[rstest]
    fn store_errors_map_to_domain_codes() {
        use crate::domain::error::ErrorCode;

        let conflict: DomainError = MemberStoreError::duplicate_email("a@b.com").into();
        assert_eq!(conflict.code(), ErrorCode::Conflict);
        assert_eq!(conflict.message(), "User already exists");

        let internal: DomainError = MemberStoreError::query("boom").into();
        assert_eq!(internal.code(), ErrorCode::Internal);
    }
}
