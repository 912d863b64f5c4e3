//! Shared fixtures for HTTP handler tests.

use std::sync::Arc;

use actix_web::{App, web};

use crate::domain::ports::{
    FixtureMemberRepository, FixturePasswordHasher, MemberRepository as _, PasswordHasher as _,
    SessionTokenService as _,
};
use crate::domain::{
    AccountRole, Email, FamilyRole, Member, NewMember, SocialLinks, TreePosition,
};
use crate::outbound::tokens::JwtSessionTokens;

use super::auth::{current_member, login, register};
use super::error::json_error_handler;
use super::family::{get_family_member, list_family, update_family_member};
use super::state::HttpState;

pub(crate) const TEST_SECRET: &[u8] = b"famtree-test-secret-0123456789abcdef";
pub(crate) const TEST_PASSWORD: &str = "password123";

/// State over in-memory fixtures with the real JWT adapter.
pub(crate) fn test_state() -> web::Data<HttpState> {
    web::Data::new(HttpState::new(
        Arc::new(FixtureMemberRepository::new()),
        Arc::new(FixturePasswordHasher),
        Arc::new(JwtSessionTokens::new(TEST_SECRET)),
    ))
}

/// App exposing the full API surface over the given state.
pub(crate) fn test_app(
    state: web::Data<HttpState>,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(state)
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .service(
            web::scope("/api/auth")
                .service(register)
                .service(login)
                .service(current_member),
        )
        .service(
            web::scope("/api/family")
                .service(list_family)
                .service(get_family_member)
                .service(update_family_member),
        )
}

/// Insert a member straight through the repository, password `password123`.
pub(crate) async fn seed_member(
    state: &HttpState,
    name: &str,
    email: &str,
    account_role: AccountRole,
    row: u32,
    order: u32,
) -> Member {
    let password_hash = state
        .passwords
        .hash(TEST_PASSWORD)
        .expect("fixture hashing succeeds");
    state
        .members
        .create(NewMember {
            name: name.to_owned(),
            email: Email::new(email).expect("valid email"),
            password_hash,
            account_role,
            family_role: FamilyRole::Son,
            profile_image: None,
            bio: None,
            social_links: SocialLinks::default(),
            position: TreePosition::new(row, order).expect("valid position"),
        })
        .await
        .expect("seeding succeeds")
}

/// Issue a session token for the given member.
pub(crate) fn token_for(state: &HttpState, member: &Member) -> String {
    state.tokens.issue(member.id()).expect("issue succeeds")
}

/// Minimal registration body with defaults for the optional fields.
pub(crate) fn register_json(name: &str, email: &str, password: &str) -> serde_json::Value {
    serde_json::json!({
        "name": name,
        "email": email,
        "password": password,
    })
}
