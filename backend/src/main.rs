//! Backend entry-point: loads settings, wires adapters and serves the API.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

mod server;

use std::env;

use actix_web::web;
use color_eyre::eyre::{Context, Result};
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use qwiksale::inbound::http::health::HealthState;
use qwiksale::inbound::http::session_config::{BuildMode, session_settings_from_env};
use qwiksale::outbound::persistence::{DbPool, probe_table, run_pending_migrations};
use server::{ServerConfig, ServerSettings, create_server};

const SERVICES_TABLE: &str = "services";

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings =
        ServerSettings::load_from_iter(env::args_os()).context("failed to load server settings")?;
    let session = session_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .context("invalid session configuration")?;

    let mut config = ServerConfig::new(
        session.key,
        session.cookie_secure,
        session.same_site,
        settings.bind_addr()?,
    )
    .with_allowlist(settings.allowlist());

    match env::var("DATABASE_URL").ok().filter(|url| !url.trim().is_empty()) {
        Some(database_url) => {
            if settings.run_migrations {
                run_pending_migrations(&database_url)
                    .await
                    .context("failed to apply migrations")?;
            }
            let pool = DbPool::new(settings.pool_config(database_url))
                .await
                .context("failed to build database pool")?;
            let services_table = probe_table(&pool, SERVICES_TABLE)
                .await
                .context("failed to probe optional tables")?;
            config = config.with_db_pool(pool, services_table);
        }
        None => warn!("DATABASE_URL not set; using fixture adapters"),
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config)?;
    info!("qwiksale listening");
    let outcome = server.await;
    health_state.mark_unhealthy();
    outcome.context("server terminated with an error")
}
