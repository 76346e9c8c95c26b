//! Deterministic seed data for the QwikSale marketplace.
//!
//! The crate loads a versioned JSON catalogue of users, base products, base
//! services and carriers, and expands it into a dataset large enough for
//! local development and demos. All randomness flows from a single seed, so
//! the same catalogue and seed always produce identical rows.
//!
//! The output types are independent of backend domain types; the backend
//! converts them at the point of insertion.
//!
//! # Example
//!
//! ```
//! use seed_data::{Catalogue, expand_products};
//!
//! let json = r#"{
//!     "version": 1,
//!     "users": [{
//!         "id": "3fa85f64-5717-4562-b3fc-2c963f66afa6",
//!         "email": "wanjiku@example.com",
//!         "name": "Wanjiku"
//!     }],
//!     "products": [{
//!         "name": "Mountain bike",
//!         "description": "Hardly used",
//!         "category": "Sports",
//!         "subcategory": "Bicycles",
//!         "price": 18000
//!     }]
//! }"#;
//!
//! let catalogue = Catalogue::from_json(json).expect("valid catalogue");
//! let products = expand_products(&catalogue, 5, 42).expect("expanded");
//! assert_eq!(products.len(), 5);
//! assert_eq!(products, expand_products(&catalogue, 5, 42).expect("expanded"));
//! ```

mod catalogue;
mod error;
mod generator;
mod seed;
mod validation;

pub use catalogue::{
    Catalogue, CatalogueCarrier, CatalogueProduct, CatalogueService, CatalogueUser,
    CatalogueVehicle,
};
pub use error::{CatalogueError, GenerationError};
pub use generator::{
    DatasetOptions, expand_products, generate_dataset, generate_demo_users, jitter_price,
    placeholder_image,
};
pub use seed::{
    CarrierSeed, ConditionSeed, ProductSeed, RateTypeSeed, RoleSeed, SeedDataset, ServiceSeed,
    TierSeed, UserSeed, VehicleSeed,
};
pub use validation::{is_plausible_email, normalise_email};
