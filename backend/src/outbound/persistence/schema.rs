//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the migrations exactly; regenerate with
//! `diesel print-schema` after schema changes.

diesel::table! {
    /// Family member accounts.
    ///
    /// One row per member/account. `email` carries a unique constraint; the
    /// `(position_row, position_order)` pair drives tree rendering order.
    members (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Display name.
        name -> Varchar,
        /// Unique login email (stored lower-cased).
        email -> Varchar,
        /// Argon2 PHC string.
        password_hash -> Varchar,
        /// Administrative authority (`admin` / `member`).
        account_role -> Varchar,
        /// Tree placement role (`Father` / `Mother` / `Son` / `Daughter`).
        family_role -> Varchar,
        /// Optional portrait URL.
        profile_image -> Nullable<Varchar>,
        /// Optional free-form biography.
        bio -> Nullable<Text>,
        /// Public links object.
        social_links -> Jsonb,
        /// Tree row, 1-based.
        position_row -> Int4,
        /// Sort key within the row, 1-based.
        position_order -> Int4,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}
