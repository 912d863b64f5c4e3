//! Family-profile service library.
//!
//! A public family-tree read API backed by a CRUD/auth API with role-based
//! edit permissions. Layout follows ports and adapters: `domain` holds the
//! model and port traits, `inbound` the HTTP surface, `outbound` the
//! PostgreSQL, Argon2, and JWT adapters, and `server` the wiring.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
