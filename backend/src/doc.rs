//! OpenAPI documentation configuration.
//!
//! This module defines the [`ApiDoc`] struct which generates the OpenAPI
//! specification for the REST API. It registers:
//!
//! - **Paths**: every handler in the inbound layer (auth, admin, search,
//!   health)
//! - **Schemas**: domain payloads plus documentation-only mirrors such as
//!   [`ListingPageSchema`] for generic envelopes
//! - **Security**: Session cookie authentication scheme
//!
//! The generated specification is used by Swagger UI (debug builds) and
//! exported via `cargo run --bin openapi-dump` for external tooling.

use crate::domain::ports::EnforcementOutcome;
use crate::domain::{
    AdminLevel, AdminMetrics, CarrierProfile, CarrierStatus, CarrierSummary, CarrierTier,
    Condition, Error, ErrorCode, Listing, ListingKind, ListingStatus, MetricCounts,
    ModerationChange, Role, UserAccount,
};
use crate::inbound::http::admin_carriers::EnforcementBody;
use crate::inbound::http::admin_users::UserPatch;
use crate::inbound::http::auth::{LoginRequest, LoginResponse};
use crate::inbound::http::schemas::ListingPageSchema;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/auth/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "QwikSale marketplace API",
        description = "Admin moderation, carrier enforcement, public search and health probes.",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::logout,
        crate::inbound::http::admin_listings::list_listings,
        crate::inbound::http::admin_listings::moderate_listing,
        crate::inbound::http::admin_metrics::metrics,
        crate::inbound::http::admin_users::list_users,
        crate::inbound::http::admin_users::update_user,
        crate::inbound::http::admin_carriers::list_carriers,
        crate::inbound::http::admin_carriers::enforce,
        crate::inbound::http::search::products,
        crate::inbound::http::search::services,
        crate::inbound::http::search::search,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        LoginRequest,
        LoginResponse,
        Listing,
        ListingKind,
        ListingStatus,
        Condition,
        ListingPageSchema,
        ModerationChange,
        UserAccount,
        Role,
        AdminLevel,
        UserPatch,
        CarrierProfile,
        CarrierSummary,
        CarrierStatus,
        CarrierTier,
        EnforcementBody,
        EnforcementOutcome,
        MetricCounts,
        AdminMetrics,
    )),
    tags(
        (name = "auth", description = "Session login and logout"),
        (name = "admin", description = "Moderation surface; requires an admin session"),
        (name = "search", description = "Public product and service search"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
