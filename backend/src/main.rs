//! DevMatch entry-point: loads settings, prepares storage and serves the API
//! and pages.

use std::sync::Arc;

use actix_web::cookie::SameSite;
use actix_web::web;
use mockable::DefaultClock;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use devmatch::inbound::http::health::HealthState;
use devmatch::outbound::auth::JwtTokenIssuer;
use devmatch::outbound::persistence::{DbPool, run_migrations};
use devmatch::server::{ServerConfig, ServerSettings, StartupError, create_server};

async fn server_config(settings: &ServerSettings) -> Result<ServerConfig, StartupError> {
    let tokens = JwtTokenIssuer::new(
        &settings.jwt_secret()?,
        settings.token_lifetimes(),
        Arc::new(DefaultClock),
    );
    let config = ServerConfig::new(
        settings.session_key()?,
        settings.cookie_secure(),
        SameSite::Lax,
        settings.bind_addr()?,
        Arc::new(tokens),
    );

    let Some(pool_config) = settings.pool_config() else {
        return Ok(config);
    };
    run_migrations(pool_config.database_url()).await?;
    let pool = DbPool::new(pool_config).await?;
    Ok(config.with_db_pool(pool))
}

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

    let settings = ServerSettings::load_from_process()?;
    let config = server_config(&settings).await?;
    let bind_addr = config.bind_addr();

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config)?;
    info!(%bind_addr, "devmatch listening");
    server.await
}
