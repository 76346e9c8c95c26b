//! Seeding the marketplace from the bundled catalogue.
//!
//! Settings come from `SEED_*` variables. The same catalogue also feeds the
//! fixture adapters used when the server runs without a database.

mod catalogue_file;
mod config;
mod fixtures;
mod run;

pub use catalogue_file::{CatalogueLoadError, load_catalogue};
pub use config::{DEMO_USER_COUNT, SeedSettings, default_catalogue_path};
pub use fixtures::{FixtureRowError, FixtureRows};
pub use run::{SeedRunError, fixture_rows, seed_database};
