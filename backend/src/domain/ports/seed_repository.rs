//! Port for writing a generated dataset.
//!
//! Adapters must write the `seed_runs` record and every row in one
//! transaction, so a failed run leaves nothing behind.

use async_trait::async_trait;
use seed_data::SeedDataset;

use super::define_port_error;

define_port_error! {
    /// Errors raised by seed repository adapters.
    pub enum SeedRepositoryError {
        /// Connection could not be established.
        Connection { message: String } => "seeding connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "seeding query failed: {message}",
    }
}

/// Whether a seed run wrote anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedingResult {
    /// Rows were written and the run recorded.
    Applied,
    /// The key was already recorded and reset was not requested.
    AlreadySeeded,
}

/// One seed run's payload.
#[derive(Debug, Clone)]
pub struct SeedRequest {
    /// Key recorded in `seed_runs`.
    pub seed_key: String,
    /// Delete marketplace rows (and all run records) first.
    pub reset: bool,
    /// RNG seed recorded with the run.
    pub seed: i64,
    /// Rows to insert.
    pub dataset: SeedDataset,
}

/// Port for applying a seed run atomically.
///
/// Implementations must:
/// - when `reset` is set, delete rows of every marketplace table that
///   exists, children first;
/// - insert the run record with `ON CONFLICT DO NOTHING` and return
///   `AlreadySeeded` without writing rows when it already existed;
/// - upsert users by email and insert listings and carriers;
/// - roll back everything if any step fails.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SeedRepository: Send + Sync {
    /// Apply a seed run.
    async fn apply_seed(&self, request: SeedRequest) -> Result<SeedingResult, SeedRepositoryError>;
}
