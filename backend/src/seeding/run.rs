//! Seeding orchestration for the `qwiksale-seed` binary and fixture mode.

use std::sync::Arc;

use mockable::Clock;
use seed_data::{GenerationError, generate_dataset};
use thiserror::Error;
use tracing::info;

use crate::domain::ports::{SeedRepository, SeedingResult};
use crate::domain::{CatalogueSeeder, SeedOutcome, SeedingError};

use super::catalogue_file::{CatalogueLoadError, load_catalogue};
use super::config::SeedSettings;
use super::fixtures::{FixtureRowError, FixtureRows};

/// Errors returned by a seeding run.
#[derive(Debug, Error)]
pub enum SeedRunError {
    /// Catalogue could not be loaded.
    #[error(transparent)]
    Catalogue(#[from] CatalogueLoadError),
    /// Generation or persistence failed.
    #[error(transparent)]
    Seeding(#[from] SeedingError),
    /// Dataset generation failed while building fixture rows.
    #[error(transparent)]
    Generation(#[from] GenerationError),
    /// A generated row was rejected by the domain.
    #[error(transparent)]
    FixtureRow(#[from] FixtureRowError),
}

/// Load the configured catalogue and write it through `repository`.
///
/// # Examples
///
/// ```rust,no_run
/// use std::sync::Arc;
///
/// use mockable::DefaultClock;
/// use qwiksale::outbound::persistence::{DbPool, DieselSeedRepository, PoolConfig};
/// use qwiksale::seeding::{SeedSettings, seed_database};
///
/// # async fn run(settings: SeedSettings) -> Result<(), Box<dyn std::error::Error>> {
/// let pool = DbPool::new(PoolConfig::new("postgres://localhost/qwiksale")).await?;
/// let repository = DieselSeedRepository::new(pool, Arc::new(DefaultClock));
/// let outcome = seed_database(&settings, Arc::new(repository)).await?;
/// println!("{} products", outcome.counts.products);
/// # Ok(())
/// # }
/// ```
///
/// # Errors
///
/// Returns [`SeedRunError`] when the catalogue is unreadable, generation
/// fails or the repository rejects the run.
pub async fn seed_database<R>(
    settings: &SeedSettings,
    repository: Arc<R>,
) -> Result<SeedOutcome, SeedRunError>
where
    R: SeedRepository + ?Sized,
{
    let path = settings.catalogue_path();
    let catalogue = load_catalogue(&path)?;
    info!(path = %path.display(), "seed catalogue loaded");

    let outcome = CatalogueSeeder::new(repository)
        .seed(&catalogue, settings.run())
        .await?;
    match outcome.result {
        SeedingResult::Applied => info!(seed_key = %outcome.seed_key, "seed applied"),
        SeedingResult::AlreadySeeded => {
            info!(seed_key = %outcome.seed_key, "seed already applied; skipping");
        }
    }
    Ok(outcome)
}

/// Rows for running without a database, generated from the configured
/// catalogue.
///
/// # Errors
///
/// Returns [`SeedRunError`] when the catalogue cannot be loaded or expanded.
pub fn fixture_rows(settings: &SeedSettings, clock: &dyn Clock) -> Result<FixtureRows, SeedRunError> {
    let catalogue = load_catalogue(&settings.catalogue_path())?;
    let dataset = generate_dataset(&catalogue, &settings.dataset_options())?;
    Ok(FixtureRows::from_dataset(&dataset, clock.utc())?)
}
