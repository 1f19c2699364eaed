//! Backend entry-point: loads settings, prepares storage and serves the API.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

mod server;

use std::net::SocketAddr;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use recipe_backend::config::AppSettings;
use recipe_backend::inbound::http::health::HealthState;
use recipe_backend::inbound::http::session_config::{BuildMode, session_settings};
use recipe_backend::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use server::{ServerConfig, create_server};

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

    let settings = AppSettings::load().map_err(std::io::Error::other)?;
    let session = session_settings(&settings, BuildMode::from_debug_assertions())
        .map_err(std::io::Error::other)?;
    let bind_addr: SocketAddr = settings.bind_addr().parse().map_err(|err| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("invalid bind address {}: {err}", settings.bind_addr()),
        )
    })?;

    let mut config = ServerConfig::new(
        session.key,
        session.cookie_secure,
        session.same_site,
        bind_addr,
        settings.public_base_url(),
    );

    match settings.database_url.as_deref() {
        Some(url) => {
            if settings.run_migrations() {
                migrate(url).await?;
            }
            let pool = DbPool::new(PoolConfig::new(url).with_max_size(settings.pool_max_size()))
                .await
                .map_err(|err| std::io::Error::other(format!("database pool: {err}")))?;
            config = config.with_db_pool(pool);
        }
        None => warn!("no database configured; serving fixture data"),
    }

    #[cfg(feature = "metrics")]
    let config = config.with_metrics(Some(server::metrics::prometheus()?));

    let health_state = web::Data::new(HealthState::new());
    info!(%bind_addr, "starting server");
    create_server(health_state, config)?.await
}

async fn migrate(database_url: &str) -> std::io::Result<()> {
    let url = database_url.to_owned();
    let applied = tokio::task::spawn_blocking(move || run_pending_migrations(&url))
        .await
        .map_err(|err| std::io::Error::other(format!("migration task failed: {err}")))?
        .map_err(|err| std::io::Error::other(err.to_string()))?;
    info!(applied, "database migrations applied");
    Ok(())
}
