//! Auth API handlers.
//!
//! ```text
//! POST /api/auth/register {"name":"...","email":"...","password":"..."}
//! POST /api/auth/login    {"email":"...","password":"..."}
//! GET  /api/auth/me       (bearer token)
//! ```

use actix_web::{HttpResponse, get, post, web};
use tracing::info;

use crate::domain::auth::{
    AuthValidationError, LoginCredentials, Registration, RegistrationExtras,
};
use crate::domain::member::MemberValidationError;
use crate::domain::ports::{MemberRepository as _, PasswordHasher as _, SessionTokenService as _};
use crate::domain::DomainError;

use super::ApiResult;
use super::identity::RequestIdentity;
use super::schemas::{AuthResponse, ErrorResponse, LoginRequest, MemberResponse, RegisterRequest};
use super::state::HttpState;

const INVALID_CREDENTIALS: &str = "Invalid credentials";
const MISSING_LOGIN_FIELDS: &str = "Please provide an email and password";

impl TryFrom<RegisterRequest> for Registration {
    type Error = AuthValidationError;

    fn try_from(value: RegisterRequest) -> Result<Self, Self::Error> {
        let RegisterRequest {
            name,
            email,
            password,
            account_role,
            family_role,
            profile_image,
            bio,
            social_links,
            position,
        } = value;
        Self::try_from_parts(
            &name,
            &email,
            &password,
            RegistrationExtras {
                account_role,
                family_role,
                profile_image,
                bio,
                social_links,
                position,
            },
        )
    }
}

/// Register a new member and start a session.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Member created", body = AuthResponse),
        (status = 400, description = "Validation failure or email already registered", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tags = ["auth"],
    operation_id = "register",
    security([])
)]
#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let registration = Registration::try_from(payload.into_inner())
        .map_err(|error| DomainError::validation(error.to_string()))?;

    let password_hash = state.passwords.hash(registration.password())?;
    let member = state
        .members
        .create(registration.into_new_member(password_hash))
        .await?;
    let token = state.tokens.issue(member.id())?;

    info!(member = %member.id(), "member registered");
    Ok(HttpResponse::Created().json(AuthResponse::new(token, &member)))
}

/// Authenticate a member and start a session.
///
/// Unknown email and wrong password answer with an identical status and
/// message so the endpoint cannot be used to enumerate accounts.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = AuthResponse),
        (status = 400, description = "Missing email or password", body = ErrorResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let LoginRequest { email, password } = payload.into_inner();
    let (Some(email), Some(password)) = (email, password) else {
        return Err(DomainError::validation(MISSING_LOGIN_FIELDS));
    };

    let credentials = match LoginCredentials::try_from_parts(&email, &password) {
        Ok(credentials) => credentials,
        Err(
            AuthValidationError::EmptyPassword
            | AuthValidationError::Member(MemberValidationError::EmptyEmail),
        ) => return Err(DomainError::validation(MISSING_LOGIN_FIELDS)),
        // A malformed address cannot match a stored record; answer exactly
        // like an unknown email.
        Err(_) => return Err(DomainError::unauthorized(INVALID_CREDENTIALS)),
    };

    let member = state
        .members
        .find_by_email(credentials.email())
        .await?
        .ok_or_else(|| DomainError::unauthorized(INVALID_CREDENTIALS))?;

    if !state
        .passwords
        .verify(credentials.password(), member.password_hash())
    {
        return Err(DomainError::unauthorized(INVALID_CREDENTIALS));
    }

    let token = state.tokens.issue(member.id())?;
    info!(member = %member.id(), "member logged in");
    Ok(HttpResponse::Ok().json(AuthResponse::new(token, &member)))
}

/// Return the calling member's own record.
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "The authenticated member", body = MemberResponse),
        (status = 401, description = "Missing or invalid bearer token", body = ErrorResponse)
    ),
    tags = ["auth"],
    operation_id = "currentMember"
)]
#[get("/me")]
pub async fn current_member(identity: RequestIdentity) -> ApiResult<web::Json<MemberResponse>> {
    let member = identity.require()?;
    Ok(web::Json(MemberResponse::new(member)))
}
