//! Seed the marketplace database from the bundled catalogue.
//!
//! Generation knobs come from `SEED_*` variables; see
//! [`qwiksale::seeding::SeedSettings`].
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::env;
use std::ffi::OsString;
use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Context, Result, eyre};
use mockable::DefaultClock;
use ortho_config::OrthoConfig;
use tokio::runtime::Builder;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use qwiksale::domain::ports::SeedingResult;
use qwiksale::outbound::persistence::{
    DbPool, DieselSeedRepository, PoolConfig, run_pending_migrations,
};
use qwiksale::seeding::{SeedSettings, seed_database};

/// `qwiksale-seed` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "qwiksale-seed",
    about = "Seed the QwikSale database with catalogue and synthetic rows",
    version
)]
struct CliArgs {
    /// Database connection URL. Falls back to `DATABASE_URL` when omitted.
    #[arg(long = "database-url", value_name = "url")]
    database_url: Option<String>,
    /// Apply pending migrations before seeding.
    #[arg(long)]
    migrate: bool,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .context("create Tokio runtime")?;
    runtime.block_on(async_main())
}

async fn async_main() -> Result<()> {
    let args = CliArgs::parse();
    let settings = SeedSettings::load_from_iter([OsString::from("qwiksale-seed")])
        .context("failed to load SEED_* settings")?;
    let database_url = args
        .database_url
        .or_else(|| env::var("DATABASE_URL").ok())
        .filter(|url| !url.trim().is_empty())
        .ok_or_else(|| eyre!("DATABASE_URL or --database-url is required"))?;

    if args.migrate {
        run_pending_migrations(&database_url)
            .await
            .context("failed to apply migrations")?;
    }
    let pool = DbPool::new(PoolConfig::new(database_url).with_max_size(2))
        .await
        .context("failed to connect to the database")?;
    let repository = DieselSeedRepository::new(pool, Arc::new(DefaultClock));

    let outcome = seed_database(&settings, Arc::new(repository))
        .await
        .context("seeding failed")?;
    match outcome.result {
        SeedingResult::Applied => info!(
            seed_key = %outcome.seed_key,
            users = outcome.counts.users,
            products = outcome.counts.products,
            services = outcome.counts.services,
            carriers = outcome.counts.carriers,
            "database seeded"
        ),
        SeedingResult::AlreadySeeded => info!(
            seed_key = %outcome.seed_key,
            "seed key already applied; set SEED_RESET=true to reseed"
        ),
    }
    Ok(())
}
