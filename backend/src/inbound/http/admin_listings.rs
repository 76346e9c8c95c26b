//! Admin listings endpoints.
//!
//! ```text
//! GET   /api/admin/listings?type=all&q=phone&status=HIDDEN&page=2
//! PATCH /api/admin/listings/{kind}/{id} {"status":"HIDDEN","featured":false}
//! ```

use actix_web::{HttpResponse, get, patch, web};

use crate::domain::{Error, Listing, ListingKind, ModerationChange};
use crate::inbound::http::ApiResult;
use crate::inbound::http::admin_guard::AdminSession;
use crate::inbound::http::cache_control::admin_header;
use crate::inbound::http::listing_params::ListingParams;
use crate::inbound::http::schemas::ListingPageSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{LISTING_PAGE_LIMITS, parse_choice, parse_uuid};

/// Page through products and services with any filter.
#[utoipa::path(
    get,
    path = "/api/admin/listings",
    params(ListingParams),
    responses(
        (status = 200, description = "One page of listings", body = ListingPageSchema),
        (status = 400, description = "Invalid parameter", body = Error),
        (status = 401, description = "Login required", body = Error),
        (status = 403, description = "Admin access required", body = Error),
        (status = 503, description = "Database unavailable", body = Error)
    ),
    tags = ["admin"],
    operation_id = "adminListListings"
)]
#[get("/admin/listings")]
pub async fn list_listings(
    _admin: AdminSession,
    state: web::Data<HttpState>,
    params: web::Query<ListingParams>,
) -> ApiResult<HttpResponse> {
    let query = params.into_inner().parse(LISTING_PAGE_LIMITS)?;
    let envelope = state
        .listings
        .list_listings(&query.filter, query.sort, query.page)
        .await?;
    Ok(HttpResponse::Ok()
        .insert_header(admin_header())
        .json(envelope))
}

/// Hide, restore, sell or feature one listing.
#[utoipa::path(
    patch,
    path = "/api/admin/listings/{kind}/{id}",
    params(
        ("kind" = String, Path, description = "`product` or `service`"),
        ("id" = String, Path, description = "Listing id")
    ),
    request_body = ModerationChange,
    responses(
        (status = 200, description = "Updated listing", body = Listing),
        (status = 400, description = "Empty or invalid change", body = Error),
        (status = 401, description = "Login required", body = Error),
        (status = 403, description = "Admin access required", body = Error),
        (status = 404, description = "No such listing", body = Error)
    ),
    tags = ["admin"],
    operation_id = "adminModerateListing"
)]
#[patch("/admin/listings/{kind}/{id}")]
pub async fn moderate_listing(
    _admin: AdminSession,
    state: web::Data<HttpState>,
    path: web::Path<(String, String)>,
    change: web::Json<ModerationChange>,
) -> ApiResult<HttpResponse> {
    let (raw_kind, raw_id) = path.into_inner();
    let kind = parse_choice::<ListingKind>("kind", Some(raw_kind))?
        .ok_or_else(|| Error::not_found("listing not found"))?;
    let id = parse_uuid("id", &raw_id)?;
    let listing = state
        .listings_command
        .moderate_listing(kind, id, change.into_inner())
        .await?;
    Ok(HttpResponse::Ok()
        .insert_header(admin_header())
        .json(listing))
}

#[cfg(test)]
#[path = "admin_listings_tests.rs"]
mod tests;
