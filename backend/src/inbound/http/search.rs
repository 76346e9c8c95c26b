//! Public product and service search.
//!
//! ```text
//! GET /api/products?q=phone&minPrice=1000&sort=price_asc
//! GET /api/services?category=Repairs
//! GET /api/search?type=all&q=nairobi
//! ```
//!
//! Anonymous visitors only ever see `ACTIVE` listings, whatever `status`
//! they ask for.

use actix_web::{HttpResponse, get, web};
use pagination::PageLimits;

use crate::domain::{Error, ListingKind};
use crate::inbound::http::ApiResult;
use crate::inbound::http::cache_control::public_search_header;
use crate::inbound::http::listing_params::ListingParams;
use crate::inbound::http::schemas::ListingPageSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{LISTING_PAGE_LIMITS, PUBLIC_PAGE_LIMITS};

async fn search_kind(
    state: &HttpState,
    params: ListingParams,
    limits: PageLimits,
    kind: Option<ListingKind>,
) -> ApiResult<HttpResponse> {
    let query = params.parse(limits)?.public(kind);
    let envelope = state
        .listings
        .list_listings(&query.filter, query.sort, query.page)
        .await?;
    Ok(HttpResponse::Ok()
        .insert_header(public_search_header())
        .json(envelope))
}

/// Active products.
#[utoipa::path(
    get,
    path = "/api/products",
    params(ListingParams),
    responses(
        (status = 200, description = "One page of products", body = ListingPageSchema),
        (status = 400, description = "Invalid parameter", body = Error)
    ),
    tags = ["search"],
    operation_id = "searchProducts"
)]
#[get("/products")]
pub async fn products(
    state: web::Data<HttpState>,
    params: web::Query<ListingParams>,
) -> ApiResult<HttpResponse> {
    search_kind(
        &state,
        params.into_inner(),
        PUBLIC_PAGE_LIMITS,
        Some(ListingKind::Product),
    )
    .await
}

/// Active services. Brand and condition filters are ignored.
#[utoipa::path(
    get,
    path = "/api/services",
    params(ListingParams),
    responses(
        (status = 200, description = "One page of services", body = ListingPageSchema),
        (status = 400, description = "Invalid parameter", body = Error)
    ),
    tags = ["search"],
    operation_id = "searchServices"
)]
#[get("/services")]
pub async fn services(
    state: web::Data<HttpState>,
    params: web::Query<ListingParams>,
) -> ApiResult<HttpResponse> {
    search_kind(
        &state,
        params.into_inner(),
        PUBLIC_PAGE_LIMITS,
        Some(ListingKind::Service),
    )
    .await
}

/// Active products and services through the combined aggregator.
#[utoipa::path(
    get,
    path = "/api/search",
    params(ListingParams),
    responses(
        (status = 200, description = "One page of listings", body = ListingPageSchema),
        (status = 400, description = "Invalid parameter", body = Error),
        (status = 503, description = "Database unavailable", body = Error)
    ),
    tags = ["search"],
    operation_id = "searchListings"
)]
#[get("/search")]
pub async fn search(
    state: web::Data<HttpState>,
    params: web::Query<ListingParams>,
) -> ApiResult<HttpResponse> {
    search_kind(&state, params.into_inner(), LISTING_PAGE_LIMITS, None).await
}

#[cfg(test)]
mod tests {
    //! Public search visibility and headers.

    use super::*;
    use crate::inbound::http::cache_control::PUBLIC_SHORT_LIVED;
    use crate::inbound::http::test_utils::{fixture_state, test_app};
    use actix_web::http::StatusCode;
    use actix_web::test;
    use rstest::rstest;
    use serde_json::Value;

    async fn get(uri: &str) -> (StatusCode, Option<String>, Value) {
        let app = test::init_service(test_app(fixture_state(), |cfg| {
            cfg.service(products).service(services).service(search);
        }))
        .await;
        let res = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        let status = res.status();
        let cache = res
            .headers()
            .get("Cache-Control")
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        (status, cache, test::read_body_json(res).await)
    }

    fn kinds(body: &Value) -> Vec<&str> {
        body.get("items")
            .and_then(Value::as_array)
            .expect("items array")
            .iter()
            .filter_map(|row| row.get("kind").and_then(Value::as_str))
            .collect()
    }

    #[rstest]
    #[case("/api/products", 2, "product")]
    #[case("/api/products?status=HIDDEN", 2, "product")]
    #[case("/api/products?type=service", 2, "product")]
    #[case("/api/services?brand=Acme&condition=pre-owned", 1, "service")]
    #[actix_web::test]
    async fn kind_endpoints_show_active_rows_only(
        #[case] uri: &str,
        #[case] expected_total: u64,
        #[case] expected_kind: &str,
    ) {
        let (status, cache, body) = get(uri).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(cache.as_deref(), Some(PUBLIC_SHORT_LIVED));
        assert_eq!(body.get("total").and_then(Value::as_u64), Some(expected_total));
        assert!(kinds(&body).iter().all(|kind| *kind == expected_kind));
    }

    #[actix_web::test]
    async fn combined_search_mixes_kinds() {
        let (status, _, body) = get("/api/search?type=all").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.get("total").and_then(Value::as_u64), Some(3));
        let kinds = kinds(&body);
        assert!(kinds.contains(&"product"));
        assert!(kinds.contains(&"service"));
    }

    #[rstest]
    #[case("/api/products?pageSize=500", 48)]
    #[case("/api/search?pageSize=500", 100)]
    #[actix_web::test]
    async fn page_size_clamps_per_endpoint(#[case] uri: &str, #[case] expected: u64) {
        let (_, _, body) = get(uri).await;
        assert_eq!(body.get("pageSize").and_then(Value::as_u64), Some(expected));
    }

    #[actix_web::test]
    async fn invalid_sort_is_rejected() {
        let (status, _, body) = get("/api/search?sort=sideways").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body.pointer("/details/field").and_then(Value::as_str),
            Some("sort")
        );
    }
}
