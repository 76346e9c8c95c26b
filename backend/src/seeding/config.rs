//! Seed run configuration loaded via OrthoConfig.

use std::path::PathBuf;

use ortho_config::OrthoConfig;
use seed_data::DatasetOptions;
use serde::Deserialize;

use crate::domain::SeedRun;

const DEFAULT_SEED_KEY: &str = "qwiksale-dev";
const DEFAULT_RNG_SEED: u64 = 42;
const DEFAULT_MIN_PRODUCTS: usize = 120;
/// Demo users generated when `SEED_DEMO` is enabled.
pub const DEMO_USER_COUNT: usize = 12;

/// Catalogue shipped with the backend.
pub fn default_catalogue_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures")
        .join("seed")
        .join("catalogue.json")
}

/// Settings for one seeding run, read from `SEED_*` variables and flags.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "SEED")]
pub struct SeedSettings {
    /// Wipe marketplace tables before inserting.
    #[ortho_config(default = false)]
    pub reset: bool,
    /// Add generated demo users and attribute clones to them.
    #[ortho_config(default = false)]
    pub demo: bool,
    /// Minimum number of product rows after expansion.
    pub min_products: Option<usize>,
    /// RNG seed; equal seeds give equal datasets.
    pub rng: Option<u64>,
    /// Catalogue override.
    pub catalogue_path: Option<PathBuf>,
    /// Key recorded in `seed_runs`.
    pub key: Option<String>,
}

impl SeedSettings {
    /// Configured seed key, falling back to the default.
    pub fn seed_key(&self) -> &str {
        self.key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .unwrap_or(DEFAULT_SEED_KEY)
    }

    /// Configured catalogue path, falling back to the bundled catalogue.
    pub fn catalogue_path(&self) -> PathBuf {
        self.catalogue_path
            .clone()
            .unwrap_or_else(default_catalogue_path)
    }

    /// Generation knobs for these settings.
    pub fn dataset_options(&self) -> DatasetOptions {
        DatasetOptions {
            seed: self.rng.unwrap_or(DEFAULT_RNG_SEED),
            min_products: self.min_products.unwrap_or(DEFAULT_MIN_PRODUCTS),
            demo_users: if self.demo { DEMO_USER_COUNT } else { 0 },
        }
    }

    /// The run these settings describe.
    pub fn run(&self) -> SeedRun {
        SeedRun {
            seed_key: self.seed_key().to_owned(),
            reset: self.reset,
            options: self.dataset_options(),
        }
    }
}
