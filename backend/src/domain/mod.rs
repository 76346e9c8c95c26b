//! Domain primitives, aggregates, and services.
//!
//! Purpose: define the strongly typed marketplace entities used by the API
//! and persistence layers, and the services that implement the driving ports
//! on top of the driven ones. Transport concerns stay in `inbound`; storage
//! concerns stay in `outbound`.
//!
//! Public surface:
//! - Error (alias to `error::Error`): API error response payload.
//! - ErrorCode (alias to `error::ErrorCode`): stable error identifier.
//! - Listing types: [`Listing`], [`ListingFilter`], [`ListingSort`].
//! - Carrier types: [`CarrierProfile`], [`EnforcementAction`].
//! - User types: [`UserAccount`], [`UserChange`], [`Role`].
//! - Services wiring ports together, e.g. [`ListingsService`].

pub mod admin;
pub(crate) mod admin_service;
pub mod auth;
pub mod carrier;
mod carriers_service;
pub mod error;
pub mod listing;
mod listings_service;
mod login_service;
pub mod metrics;
mod metrics_service;
pub mod ports;
pub mod seeding;
pub mod trace_id;
pub mod user;

pub use self::admin::{AdminAllowlist, AdminLevel, AdminPrincipal};
pub use self::admin_service::AdminService;
pub use self::auth::{DEV_PASSWORD, LoginCredentials, LoginIdentifier, LoginValidationError};
pub use self::carrier::{
    CarrierFilter, CarrierProfile, CarrierStatus, CarrierSummary, CarrierTier, CarrierValueError,
    DEFAULT_SUSPENSION_DAYS, EnforcementAction, EnforcementError, MAX_SUSPENSION_DAYS,
    apply_enforcement,
};
pub use self::carriers_service::CarriersService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::listing::{
    Condition, KindFilter, Listing, ListingFilter, ListingFilterError, ListingKind, ListingSort,
    ListingDetails, ListingStatus, ListingValueError, ModerationChange,
};
pub use self::listings_service::ListingsService;
pub use self::login_service::DirectoryLoginService;
pub use self::metrics::{AdminMetrics, MetricCounts, RECENT_WINDOW_DAYS};
pub use self::metrics_service::MetricsService;
pub use self::seeding::{CatalogueSeeder, SeedCounts, SeedOutcome, SeedRun, SeedingError};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    Email, Role, UserAccount, UserChange, UserFilter, UserId, UserValidationError,
};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use qwiksale::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("admin access required"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
