//! Service entry-point: loads settings, initialises tracing, and serves.

use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use famtree_backend::server::{Settings, run};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = Settings::load_from_env()?;
    run(settings).await
}
