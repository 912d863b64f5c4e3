//! Server construction and middleware wiring.

mod config;

pub use config::Settings;

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::http::header;
use actix_web::{App, HttpServer, web};
use tracing::{info, warn};

#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[cfg(debug_assertions)]
use crate::doc::ApiDoc;
use crate::domain::ports::{FixtureMemberRepository, MemberRepository};
use crate::inbound::http::auth::{current_member, login, register};
use crate::inbound::http::error::json_error_handler;
use crate::inbound::http::family::{get_family_member, list_family, update_family_member};
use crate::inbound::http::health::{HealthState, live, ready};
use crate::inbound::http::state::HttpState;
use crate::middleware::RateLimit;
use crate::outbound::persistence::{DbPool, DieselMemberRepository, run_migrations};
use crate::outbound::security::Argon2PasswordHasher;
use crate::outbound::tokens::JwtSessionTokens;

/// Resolve the token signing secret.
///
/// Debug builds fall back to an ephemeral random secret with a warning, so
/// local development works out of the box; release builds refuse to start
/// without one because every restart would silently invalidate all sessions.
fn signing_secret(settings: &Settings) -> std::io::Result<Vec<u8>> {
    if let Some(secret) = &settings.secret {
        return Ok(secret.clone().into_bytes());
    }
    if cfg!(debug_assertions) {
        warn!("FAMILY_TREE_SECRET is not set; using an ephemeral signing secret (dev only)");
        let mut bytes = [0u8; 32];
        getrandom::getrandom(&mut bytes)
            .map_err(|error| std::io::Error::other(format!("secret generation failed: {error}")))?;
        Ok(bytes.to_vec())
    } else {
        Err(std::io::Error::other(
            "FAMILY_TREE_SECRET must be set in release builds",
        ))
    }
}

/// Pick the member store: PostgreSQL when configured, in-memory otherwise.
async fn build_member_store(settings: &Settings) -> std::io::Result<Arc<dyn MemberRepository>> {
    match settings.database_url.clone() {
        Some(url) => {
            let migration_url = url.clone();
            tokio::task::spawn_blocking(move || run_migrations(&migration_url))
                .await
                .map_err(|error| std::io::Error::other(format!("migration task failed: {error}")))?
                .map_err(|error| std::io::Error::other(error.to_string()))?;

            let pool = DbPool::connect(&url)
                .await
                .map_err(|error| std::io::Error::other(error.to_string()))?;
            info!("member store: PostgreSQL");
            Ok(Arc::new(DieselMemberRepository::new(pool)))
        }
        None => {
            warn!("FAMILY_TREE_DATABASE_URL is not set; member records live in memory only");
            Ok(Arc::new(FixtureMemberRepository::new()))
        }
    }
}

/// Wire state and middleware, bind, and serve until shutdown.
///
/// Actix installs its own SIGINT/SIGTERM handling, so in-flight requests
/// drain before the process exits.
///
/// # Errors
///
/// Returns an error when configuration is unusable, the store cannot be
/// prepared, or the listener fails to bind.
pub async fn run(settings: Settings) -> std::io::Result<()> {
    let secret = signing_secret(&settings)?;
    let members = build_member_store(&settings).await?;

    let state = web::Data::new(HttpState::new(
        members,
        Arc::new(Argon2PasswordHasher),
        Arc::new(JwtSessionTokens::new(&secret)),
    ));
    let health_state = web::Data::new(HealthState::new());
    let server_health_state = health_state.clone();

    let client_origin = settings.client_origin().to_owned();
    let api_rate = RateLimit::new(settings.rate_window(), settings.rate_max_requests());
    let auth_rate = RateLimit::new(settings.auth_rate_window(), settings.auth_rate_max_requests());
    let port = settings.port();

    let server = HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin(&client_origin)
            .allowed_methods(vec!["GET", "POST", "PUT"])
            .allowed_headers(vec![
                header::AUTHORIZATION,
                header::CONTENT_TYPE,
                header::ACCEPT,
            ])
            .supports_credentials()
            .max_age(3600);

        let api = web::scope("/api")
            .wrap(api_rate.clone())
            .service(
                web::scope("/auth")
                    .wrap(auth_rate.clone())
                    .service(register)
                    .service(login)
                    .service(current_member),
            )
            .service(
                web::scope("/family")
                    .service(list_family)
                    .service(get_family_member)
                    .service(update_family_member),
            );

        let app = App::new()
            .app_data(state.clone())
            .app_data(server_health_state.clone())
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .wrap(cors)
            .service(api)
            .service(ready)
            .service(live);

        #[cfg(debug_assertions)]
        let app =
            app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

        app
    })
    .bind(("0.0.0.0", port))?;

    info!(port, "server listening");
    health_state.mark_ready();
    server.run().await
}
