//! OpenAPI document served by Swagger UI in debug builds.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::member::{AccountRole, FamilyRole, SocialLinks, TreePosition};
use crate::inbound::http::schemas::{
    AuthResponse, ErrorResponse, FamilyListResponse, LoginRequest, MemberDto, MemberResponse,
    RegisterRequest, UpdateMemberRequest,
};

/// Registers the bearer-token security scheme referenced by protected paths.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_token",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Public OpenAPI surface used by Swagger UI and tooling.
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::inbound::http::auth::register,
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::current_member,
        crate::inbound::http::family::list_family,
        crate::inbound::http::family::get_family_member,
        crate::inbound::http::family::update_family_member,
        crate::inbound::http::health::live,
        crate::inbound::http::health::ready,
    ),
    components(schemas(
        MemberDto,
        RegisterRequest,
        LoginRequest,
        UpdateMemberRequest,
        AuthResponse,
        MemberResponse,
        FamilyListResponse,
        ErrorResponse,
        AccountRole,
        FamilyRole,
        SocialLinks,
        TreePosition,
    )),
    modifiers(&SecurityAddon),
    security(("bearer_token" = [])),
    tags(
        (name = "auth", description = "Registration, login, and session identity"),
        (name = "family", description = "Public tree reads and authorized profile edits"),
        (name = "health", description = "Probe endpoints"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_builds_and_lists_every_route() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/auth/register",
            "/api/auth/login",
            "/api/auth/me",
            "/api/family",
            "/api/family/{id}",
            "/health/live",
            "/health/ready",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing path {path}");
        }
    }
}
