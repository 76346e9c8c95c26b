//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driving ports (`*Query`, `*Command`, [`AdminAccess`], [`LoginService`])
//! are what inbound adapters call. Driven ports ([`UserDirectory`],
//! [`ListingSource`], [`CarrierRepository`], [`MetricsSource`],
//! [`SeedRepository`]) are implemented by outbound adapters and come with
//! in-memory fixtures for running without a database.

mod macros;
pub(crate) use macros::define_port_error;

mod admin_access;
mod admin_users_command;
mod admin_users_query;
mod carrier_repository;
mod carriers_command;
mod carriers_query;
mod listing_source;
mod listings_command;
mod listings_query;
mod login_service;
mod metrics_query;
mod metrics_source;
mod seed_repository;
mod user_directory;

pub use admin_access::AdminAccess;
#[cfg(test)]
pub use admin_access::MockAdminAccess;
pub use admin_users_command::AdminUsersCommand;
#[cfg(test)]
pub use admin_users_command::MockAdminUsersCommand;
pub use admin_users_query::AdminUsersQuery;
#[cfg(test)]
pub use admin_users_query::MockAdminUsersQuery;
#[cfg(test)]
pub use carrier_repository::MockCarrierRepository;
pub use carrier_repository::{CarrierRepository, CarrierRepositoryError, FixtureCarrierRepository};
#[cfg(test)]
pub use carriers_command::MockCarriersCommand;
pub use carriers_command::{CarriersCommand, EnforcementOutcome};
pub use carriers_query::CarriersQuery;
#[cfg(test)]
pub use carriers_query::MockCarriersQuery;
#[cfg(test)]
pub use listing_source::MockListingSource;
pub use listing_source::{FixtureListingSource, ListingSource, ListingSourceError};
pub use listings_command::ListingsCommand;
#[cfg(test)]
pub use listings_command::MockListingsCommand;
pub use listings_query::ListingsQuery;
#[cfg(test)]
pub use listings_query::MockListingsQuery;
pub use login_service::LoginService;
#[cfg(test)]
pub use login_service::MockLoginService;
pub use metrics_query::MetricsQuery;
#[cfg(test)]
pub use metrics_query::MockMetricsQuery;
#[cfg(test)]
pub use metrics_source::MockMetricsSource;
pub use metrics_source::{FixtureMetricsSource, MetricsSource, MetricsSourceError};
#[cfg(test)]
pub use seed_repository::MockSeedRepository;
pub use seed_repository::{SeedRepository, SeedRepositoryError, SeedRequest, SeedingResult};
#[cfg(test)]
pub use user_directory::MockUserDirectory;
pub use user_directory::{
    FIXTURE_ADMIN_ID, FixtureUserDirectory, UserDirectory, UserDirectoryError,
};
