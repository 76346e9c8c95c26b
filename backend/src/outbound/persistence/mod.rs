//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the driven ports, backed by PostgreSQL via
//! `diesel-async` with `bb8` connection pooling.
//!
//! - **Thin adapters**: implementations only translate between Diesel rows
//!   and domain types. Filtering mirrors the domain semantics in SQL.
//! - **Internal models**: row structs (`models.rs`) and table definitions
//!   (`schema.rs`) never leave this module.
//! - **Optional tables**: `services`, `favorites`, `payments`,
//!   `support_tickets` and `reports` may be missing on older deployments.
//!   Adapters probe or map "relation does not exist" instead of failing.
//!
//! # Example
//!
//! ```rust,no_run
//! use qwiksale::outbound::persistence::{DbPool, DieselUserDirectory, PoolConfig};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/qwiksale")).await?;
//! let users = DieselUserDirectory::new(pool);
//! # let _ = users;
//! # Ok(())
//! # }
//! ```

mod diesel_carrier_repository;
pub(crate) mod diesel_helpers;
mod diesel_listing_sources;
mod diesel_metrics_source;
mod diesel_seed_repository;
mod diesel_user_directory;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_carrier_repository::DieselCarrierRepository;
pub use diesel_helpers::probe_table;
pub use diesel_listing_sources::{DieselProductSource, DieselServiceSource};
pub use diesel_metrics_source::DieselMetricsSource;
pub use diesel_seed_repository::DieselSeedRepository;
pub use diesel_user_directory::DieselUserDirectory;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
