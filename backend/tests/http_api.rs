//! End-to-end HTTP tests over the full API surface.
//!
//! These drive the real handlers, extractor, Argon2 hasher, and JWT adapter
//! against the in-memory member store, exercising the whole request path
//! short of PostgreSQL itself.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test, web};
use serde_json::{Value, json};

use famtree_backend::domain::ports::FixtureMemberRepository;
use famtree_backend::inbound::http::auth::{current_member, login, register};
use famtree_backend::inbound::http::error::json_error_handler;
use famtree_backend::inbound::http::family::{
    get_family_member, list_family, update_family_member,
};
use famtree_backend::inbound::http::state::HttpState;
use famtree_backend::outbound::security::Argon2PasswordHasher;
use famtree_backend::outbound::tokens::JwtSessionTokens;

const SECRET: &[u8] = b"integration-secret-0123456789abcdef";

fn app_state() -> web::Data<HttpState> {
    web::Data::new(HttpState::new(
        Arc::new(FixtureMemberRepository::new()),
        Arc::new(Argon2PasswordHasher),
        Arc::new(JwtSessionTokens::new(SECRET)),
    ))
}

macro_rules! init_app {
    ($state:expr) => {
        actix_test::init_service(
            App::new()
                .app_data($state)
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
                ),
        )
        .await
    };
}

async fn register_member(
    app: &impl actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
    >,
    body: Value,
) -> Value {
    let request = actix_test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(body)
        .to_request();
    let response = actix_test::call_service(app, request).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    actix_test::read_body_json(response).await
}

fn john() -> Value {
    json!({
        "name": "John Aguasan",
        "email": "john@x.com",
        "password": "password123",
        "accountRole": "admin",
        "familyRole": "Father",
        "position": {"row": 1, "order": 1}
    })
}

fn sarah() -> Value {
    json!({
        "name": "Sarah Aguasan",
        "email": "sarah@x.com",
        "password": "password123",
        "familyRole": "Daughter",
        "position": {"row": 2, "order": 2}
    })
}

fn michael() -> Value {
    json!({
        "name": "Michael Aguasan",
        "email": "michael@x.com",
        "password": "password123",
        "position": {"row": 2, "order": 1}
    })
}

fn token_of(body: &Value) -> String {
    body.get("token")
        .and_then(Value::as_str)
        .expect("token present")
        .to_owned()
}

fn id_of(body: &Value) -> String {
    body.pointer("/user/id")
        .and_then(Value::as_str)
        .expect("user id present")
        .to_owned()
}

#[actix_web::test]
async fn edit_authority_matrix() {
    let state = app_state();
    let app = init_app!(state.clone());

    let john = register_member(&app, john()).await;
    let sarah = register_member(&app, sarah()).await;
    let michael = register_member(&app, michael()).await;
    let sarah_id = id_of(&sarah);

    // A third member editing Sarah is refused.
    let request = actix_test::TestRequest::put()
        .uri(&format!("/api/family/{sarah_id}"))
        .insert_header(("Authorization", format!("Bearer {}", token_of(&michael))))
        .set_json(json!({"bio": "not yours"}))
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Sarah edits herself.
    let request = actix_test::TestRequest::put()
        .uri(&format!("/api/family/{sarah_id}"))
        .insert_header(("Authorization", format!("Bearer {}", token_of(&sarah))))
        .set_json(json!({"bio": "self-portrait"}))
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::OK);

    // The admin edits Sarah too.
    let request = actix_test::TestRequest::put()
        .uri(&format!("/api/family/{sarah_id}"))
        .insert_header(("Authorization", format!("Bearer {}", token_of(&john))))
        .set_json(json!({"bio": "updated by dad"}))
        .to_request();
    let body: Value = actix_test::call_and_read_body_json(&app, request).await;
    assert_eq!(
        body.pointer("/data/bio").and_then(Value::as_str),
        Some("updated by dad")
    );
}

#[actix_web::test]
async fn protected_fields_are_immutable_through_updates() {
    let state = app_state();
    let app = init_app!(state.clone());

    let sarah = register_member(&app, sarah()).await;
    let sarah_id = id_of(&sarah);

    let request = actix_test::TestRequest::put()
        .uri(&format!("/api/family/{sarah_id}"))
        .insert_header(("Authorization", format!("Bearer {}", token_of(&sarah))))
        .set_json(json!({
            "name": "Sarah Renamed",
            "email": "stolen@evil.com",
            "password": "newpassword",
            "accountRole": "admin"
        }))
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::OK);

    // Login still works with the original pair only, and the role is intact.
    let request = actix_test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({"email": "sarah@x.com", "password": "password123"}))
        .to_request();
    let body: Value = actix_test::call_and_read_body_json(&app, request).await;
    assert_eq!(body.get("success").and_then(Value::as_bool), Some(true));
    assert_eq!(
        body.pointer("/user/accountRole").and_then(Value::as_str),
        Some("member")
    );
    assert_eq!(
        body.pointer("/user/name").and_then(Value::as_str),
        Some("Sarah Renamed")
    );

    let request = actix_test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({"email": "stolen@evil.com", "password": "newpassword"}))
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn family_listing_is_public_and_ordered() {
    let state = app_state();
    let app = init_app!(state.clone());

    // Register out of tree order.
    register_member(&app, sarah()).await;
    register_member(&app, john()).await;
    register_member(&app, michael()).await;

    let request = actix_test::TestRequest::get().uri("/api/family").to_request();
    let body: Value = actix_test::call_and_read_body_json(&app, request).await;

    assert_eq!(body.get("count").and_then(Value::as_u64), Some(3));
    let positions: Vec<(u64, u64)> = body
        .get("data")
        .and_then(Value::as_array)
        .expect("data array")
        .iter()
        .map(|m| {
            (
                m.pointer("/position/row").and_then(Value::as_u64).expect("row"),
                m.pointer("/position/order").and_then(Value::as_u64).expect("order"),
            )
        })
        .collect();
    let mut sorted = positions.clone();
    sorted.sort_unstable();
    assert_eq!(positions, sorted);

    // No response ever carries password material.
    for member in body.get("data").and_then(Value::as_array).expect("array") {
        let object = member.as_object().expect("object");
        assert!(!object.keys().any(|k| k.to_lowercase().contains("password")));
    }
}

#[actix_web::test]
async fn duplicate_registration_is_a_conflict() {
    let state = app_state();
    let app = init_app!(state.clone());

    register_member(&app, sarah()).await;
    let request = actix_test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(sarah())
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body.get("success").and_then(Value::as_bool), Some(false));
    assert_eq!(
        body.get("message").and_then(Value::as_str),
        Some("User already exists")
    );

    let request = actix_test::TestRequest::get().uri("/api/family").to_request();
    let body: Value = actix_test::call_and_read_body_json(&app, request).await;
    assert_eq!(body.get("count").and_then(Value::as_u64), Some(1));
}

#[actix_web::test]
async fn expired_and_foreign_tokens_are_unauthenticated_everywhere() {
    let state = app_state();
    let app = init_app!(state.clone());

    let sarah = register_member(&app, sarah()).await;
    let sarah_id = id_of(&sarah);

    // A token signed with someone else's secret.
    let foreign = JwtSessionTokens::new(b"some-other-secret-0123456789abcdef");
    let foreign_token = {
        use famtree_backend::domain::ports::SessionTokenService as _;
        let id = sarah_id.parse().expect("valid member id");
        foreign.issue(&id).expect("issue succeeds")
    };

    // A correctly signed token whose expiry is in the past.
    #[derive(serde::Serialize)]
    struct Claims<'a> {
        sub: &'a str,
        iat: i64,
        exp: i64,
    }
    let now = chrono::Utc::now().timestamp();
    let expired_token = jsonwebtoken::encode(
        &jsonwebtoken::Header::new(jsonwebtoken::Algorithm::HS256),
        &Claims {
            sub: &sarah_id,
            iat: now - 7200,
            exp: now - 3600,
        },
        &jsonwebtoken::EncodingKey::from_secret(SECRET),
    )
    .expect("encode succeeds");

    for token in [foreign_token, expired_token] {
        let request = actix_test::TestRequest::get()
            .uri("/api/auth/me")
            .insert_header(("Authorization", format!("Bearer {token}")))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let request = actix_test::TestRequest::put()
            .uri(&format!("/api/family/{sarah_id}"))
            .insert_header(("Authorization", format!("Bearer {token}")))
            .set_json(json!({"bio": "nope"}))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}

#[actix_web::test]
async fn malformed_json_answers_in_the_uniform_envelope() {
    let state = app_state();
    let app = init_app!(state);

    let request = actix_test::TestRequest::post()
        .uri("/api/auth/login")
        .insert_header(("Content-Type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body.get("success").and_then(Value::as_bool), Some(false));
    assert!(body.get("message").and_then(Value::as_str).is_some());
}

#[actix_web::test]
async fn registration_validates_required_fields() {
    let state = app_state();
    let app = init_app!(state);

    for body in [
        json!({"name": "  ", "email": "a@b.com", "password": "password123"}),
        json!({"name": "A", "email": "not-an-email", "password": "password123"}),
        json!({"name": "A", "email": "a@b.com", "password": "short"}),
        json!({"name": "A", "email": "a@b.com", "password": "password123",
               "position": {"row": 0, "order": 1}}),
    ] {
        let request = actix_test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(body)
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body.get("success").and_then(Value::as_bool), Some(false));
    }
}
