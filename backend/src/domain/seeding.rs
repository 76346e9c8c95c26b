//! Catalogue seeding orchestration.
//!
//! Expands the base catalogue into a deterministic dataset with
//! [`seed_data::generate_dataset`] and hands it to the [`SeedRepository`]
//! port, which writes everything in one transaction.

use std::sync::Arc;

use seed_data::{Catalogue, DatasetOptions, GenerationError, SeedDataset, generate_dataset};
use thiserror::Error;
use tracing::info;

use crate::domain::ports::{SeedRepository, SeedRepositoryError, SeedRequest, SeedingResult};

/// Row counts of a generated dataset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedCounts {
    /// Users, including generated demo users.
    pub users: usize,
    /// Products, including clones.
    pub products: usize,
    /// Services.
    pub services: usize,
    /// Carrier profiles.
    pub carriers: usize,
}

impl SeedCounts {
    fn of(dataset: &SeedDataset) -> Self {
        Self {
            users: dataset.users.len(),
            products: dataset.products.len(),
            services: dataset.services.len(),
            carriers: dataset.carriers.len(),
        }
    }
}

/// Parameters of one seeding run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedRun {
    /// Key recorded in `seed_runs`.
    pub seed_key: String,
    /// Wipe marketplace tables before inserting.
    pub reset: bool,
    /// Generation knobs.
    pub options: DatasetOptions,
}

/// Result of a seeding run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedOutcome {
    /// Key recorded in `seed_runs`.
    pub seed_key: String,
    /// Rows generated for the run.
    pub counts: SeedCounts,
    /// Whether the rows were written.
    pub result: SeedingResult,
}

/// Errors raised while preparing or applying a seed.
#[derive(Debug, Error)]
pub enum SeedingError {
    /// Dataset generation failed.
    #[error("seed generation failed: {0}")]
    Generation(#[from] GenerationError),
    /// Seed value cannot be stored in a BIGINT column.
    #[error("seed value {seed} exceeds maximum representable value")]
    SeedOverflow {
        /// Rejected seed.
        seed: u64,
    },
    /// Persistence adapter failed.
    #[error("seed persistence error: {0}")]
    Persistence(#[from] SeedRepositoryError),
}

/// Service that seeds the marketplace from a catalogue.
#[derive(Clone)]
pub struct CatalogueSeeder<R: ?Sized> {
    repository: Arc<R>,
}

impl<R: ?Sized> CatalogueSeeder<R> {
    /// Create a seeder over the given persistence adapter.
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }
}

impl<R> CatalogueSeeder<R>
where
    R: SeedRepository + ?Sized,
{
    /// Generate the dataset for `run` and persist it.
    ///
    /// # Errors
    ///
    /// Returns [`SeedingError`] if generation or persistence fails.
    pub async fn seed(
        &self,
        catalogue: &Catalogue,
        run: SeedRun,
    ) -> Result<SeedOutcome, SeedingError> {
        let seed = i64::try_from(run.options.seed).map_err(|_| SeedingError::SeedOverflow {
            seed: run.options.seed,
        })?;
        let dataset = generate_dataset(catalogue, &run.options)?;
        let counts = SeedCounts::of(&dataset);

        let request = SeedRequest {
            seed_key: run.seed_key.clone(),
            reset: run.reset,
            seed,
            dataset,
        };
        let result = self.repository.apply_seed(request).await?;
        info!(
            seed_key = %run.seed_key,
            reset = run.reset,
            users = counts.users,
            products = counts.products,
            services = counts.services,
            carriers = counts.carriers,
            ?result,
            "seeding finished"
        );

        Ok(SeedOutcome {
            seed_key: run.seed_key,
            counts,
            result,
        })
    }
}
