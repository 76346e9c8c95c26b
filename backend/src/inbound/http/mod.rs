//! HTTP inbound adapter exposing REST endpoints.
//!
//! Handlers translate query strings and JSON bodies into domain types, call
//! the driving ports held in [`state::HttpState`], and render envelopes or
//! flat arrays. Every `/api/admin/*` handler takes an
//! [`admin_guard::AdminSession`] so authorisation happens before any work.

pub mod admin_carriers;
pub mod admin_guard;
pub mod admin_listings;
pub mod admin_metrics;
pub mod admin_users;
pub mod auth;
pub mod cache_control;
pub mod error;
pub mod health;
pub mod listing_params;
pub mod paging_headers;
pub mod schemas;
pub mod search;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod validation;

pub use error::ApiResult;

use actix_web::web;

/// Register every `/api` route on `cfg`.
///
/// Health probes live outside `/api` and are registered by the server.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(auth::login)
        .service(auth::logout)
        .service(search::products)
        .service(search::services)
        .service(search::search)
        .service(admin_listings::list_listings)
        .service(admin_listings::moderate_listing)
        .service(admin_users::list_users)
        .service(admin_users::update_user)
        .service(admin_carriers::list_carriers)
        .service(admin_carriers::enforce)
        .service(admin_metrics::metrics);
}
