//! Server settings loaded via OrthoConfig.
//!
//! Every knob is reachable as a CLI flag or as an environment variable with
//! the `FAMILY_TREE_` prefix (e.g. `FAMILY_TREE_DATABASE_URL`). Optional
//! values fall back through the accessors so defaults live in one place.

use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_CLIENT_ORIGIN: &str = "http://localhost:5173";
const DEFAULT_RATE_WINDOW_SECS: u64 = 60;
const DEFAULT_RATE_MAX_REQUESTS: usize = 120;
const DEFAULT_AUTH_RATE_WINDOW_SECS: u64 = 60;
const DEFAULT_AUTH_RATE_MAX_REQUESTS: usize = 10;

/// Configuration values controlling the HTTP server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "FAMILY_TREE")]
pub struct Settings {
    /// Session-token signing secret. Required outside debug builds.
    pub secret: Option<String>,
    /// PostgreSQL connection string. Without it the server keeps member
    /// records in memory only.
    pub database_url: Option<String>,
    /// Listening port.
    pub port: Option<u16>,
    /// Allowed cross-origin client address.
    pub client_origin: Option<String>,
    /// General API rate-limit window, in seconds.
    pub rate_window_secs: Option<u64>,
    /// Requests allowed per client within the general window.
    pub rate_max_requests: Option<usize>,
    /// Authentication-route rate-limit window, in seconds.
    pub auth_rate_window_secs: Option<u64>,
    /// Requests allowed per client within the authentication window.
    pub auth_rate_max_requests: Option<usize>,
}

impl Settings {
    /// Load from CLI arguments and `FAMILY_TREE_*` environment variables.
    ///
    /// # Errors
    ///
    /// Fails when a supplied value cannot be parsed into its field type.
    pub fn load_from_env() -> std::io::Result<Self> {
        Self::load_from_iter(std::env::args_os())
            .map_err(|error| std::io::Error::other(format!("failed to load settings: {error}")))
    }

    /// Listening port, falling back to the default.
    pub fn port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }

    /// CORS origin, falling back to the local Vite dev server.
    pub fn client_origin(&self) -> &str {
        self.client_origin.as_deref().unwrap_or(DEFAULT_CLIENT_ORIGIN)
    }

    /// General API rate-limit window.
    pub fn rate_window(&self) -> Duration {
        Duration::from_secs(self.rate_window_secs.unwrap_or(DEFAULT_RATE_WINDOW_SECS))
    }

    /// General API request ceiling per window.
    pub fn rate_max_requests(&self) -> usize {
        self.rate_max_requests.unwrap_or(DEFAULT_RATE_MAX_REQUESTS)
    }

    /// Authentication-route rate-limit window.
    pub fn auth_rate_window(&self) -> Duration {
        Duration::from_secs(
            self.auth_rate_window_secs
                .unwrap_or(DEFAULT_AUTH_RATE_WINDOW_SECS),
        )
    }

    /// Authentication-route request ceiling per window.
    pub fn auth_rate_max_requests(&self) -> usize {
        self.auth_rate_max_requests
            .unwrap_or(DEFAULT_AUTH_RATE_MAX_REQUESTS)
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for settings parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    fn load_from_empty_args() -> Settings {
        Settings::load_from_iter([OsString::from("famtree-backend")]).expect("settings should load")
    }

    #[rstest]
    fn default_values_are_used_when_missing() {
        let _guard = lock_env([
            ("FAMILY_TREE_SECRET", None::<String>),
            ("FAMILY_TREE_DATABASE_URL", None::<String>),
            ("FAMILY_TREE_PORT", None::<String>),
            ("FAMILY_TREE_CLIENT_ORIGIN", None::<String>),
            ("FAMILY_TREE_RATE_WINDOW_SECS", None::<String>),
            ("FAMILY_TREE_RATE_MAX_REQUESTS", None::<String>),
            ("FAMILY_TREE_AUTH_RATE_WINDOW_SECS", None::<String>),
            ("FAMILY_TREE_AUTH_RATE_MAX_REQUESTS", None::<String>),
        ]);

        let settings = load_from_empty_args();
        assert!(settings.secret.is_none());
        assert!(settings.database_url.is_none());
        assert_eq!(settings.port(), DEFAULT_PORT);
        assert_eq!(settings.client_origin(), DEFAULT_CLIENT_ORIGIN);
        assert_eq!(settings.rate_window(), Duration::from_secs(60));
        assert_eq!(settings.auth_rate_max_requests(), 10);
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("FAMILY_TREE_SECRET", Some("super-secret".to_owned())),
            (
                "FAMILY_TREE_DATABASE_URL",
                Some("postgres://localhost/famtree".to_owned()),
            ),
            ("FAMILY_TREE_PORT", Some("8081".to_owned())),
            (
                "FAMILY_TREE_CLIENT_ORIGIN",
                Some("https://family.example".to_owned()),
            ),
            ("FAMILY_TREE_RATE_WINDOW_SECS", Some("30".to_owned())),
            ("FAMILY_TREE_RATE_MAX_REQUESTS", Some("50".to_owned())),
            ("FAMILY_TREE_AUTH_RATE_WINDOW_SECS", Some("120".to_owned())),
            ("FAMILY_TREE_AUTH_RATE_MAX_REQUESTS", Some("5".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(settings.secret.as_deref(), Some("super-secret"));
        assert_eq!(
            settings.database_url.as_deref(),
            Some("postgres://localhost/famtree")
        );
        assert_eq!(settings.port(), 8081);
        assert_eq!(settings.client_origin(), "https://family.example");
        assert_eq!(settings.rate_window(), Duration::from_secs(30));
        assert_eq!(settings.rate_max_requests(), 50);
        assert_eq!(settings.auth_rate_window(), Duration::from_secs(120));
        assert_eq!(settings.auth_rate_max_requests(), 5);
    }
}
