//! PostgreSQL-backed `MemberRepository` implementation using Diesel.
//!
//! All operations touch a single row; the unique index on `email` is the
//! only cross-row rule and surfaces as `DuplicateEmail` on insert.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::ports::{MemberRepository, MemberStoreError};
use crate::domain::{Email, Member, MemberId, MemberProfilePatch, NewMember};

use super::models::{MemberProfileChangeset, MemberRow, NewMemberRow};
use super::pool::{DbPool, PoolError};
use super::schema::members;

/// Diesel-backed implementation of the `MemberRepository` port.
#[derive(Clone)]
pub struct DieselMemberRepository {
    pool: DbPool,
}

impl DieselMemberRepository {
    /// Create a new repository over the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> MemberStoreError {
    match error {
        PoolError::Build { message } | PoolError::Checkout { message } => {
            MemberStoreError::connection(message)
        }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> MemberStoreError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        other => debug!(error = %other, "diesel operation failed"),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            MemberStoreError::connection("database connection error")
        }
        _ => MemberStoreError::query("database error"),
    }
}

fn map_create_error(error: diesel::result::Error, email: &str) -> MemberStoreError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    if let DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) = error {
        return MemberStoreError::duplicate_email(email);
    }
    map_diesel_error(error)
}

#[async_trait]
impl MemberRepository for DieselMemberRepository {
    async fn create(&self, fields: NewMember) -> Result<Member, MemberStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewMemberRow::from_new_member(MemberId::random(), &fields);

        let inserted: MemberRow = diesel::insert_into(members::table)
            .values(&row)
            .returning(MemberRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|error| map_create_error(error, fields.email.as_ref()))?;

        inserted.into_member().map_err(MemberStoreError::query)
    }

    async fn find_by_id(&self, id: &MemberId) -> Result<Option<Member>, MemberStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<MemberRow> = members::table
            .find(*id.as_uuid())
            .select(MemberRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(|r| r.into_member().map_err(MemberStoreError::query))
            .transpose()
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<Member>, MemberStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<MemberRow> = members::table
            .filter(members::email.eq(email.as_ref()))
            .select(MemberRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(|r| r.into_member().map_err(MemberStoreError::query))
            .transpose()
    }

    async fn list_all(&self) -> Result<Vec<Member>, MemberStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<MemberRow> = members::table
            .order((
                members::position_row.asc(),
                members::position_order.asc(),
                // Creation time breaks ties so rendering stays stable.
                members::created_at.asc(),
            ))
            .select(MemberRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter()
            .map(|r| r.into_member().map_err(MemberStoreError::query))
            .collect()
    }

    async fn update_profile(
        &self,
        id: &MemberId,
        patch: MemberProfilePatch,
    ) -> Result<Option<Member>, MemberStoreError> {
        if patch.is_empty() {
            // Nothing to set; report the current record.
            return self.find_by_id(id).await;
        }

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changeset = MemberProfileChangeset::from(patch);
        let row: Option<MemberRow> = diesel::update(members::table.find(*id.as_uuid()))
            .set(&changeset)
            .returning(MemberRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(|r| r.into_member().map_err(MemberStoreError::query))
            .transpose()
    }
}
