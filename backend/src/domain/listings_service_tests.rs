//! Tests for the listings aggregator.

use super::*;
use crate::domain::ports::MockListingSource;
use crate::domain::{ErrorCode, KindFilter, ListingDetails, ListingStatus};
use chrono::{TimeDelta, TimeZone, Utc};
use pagination::PageLimits;
use rstest::rstest;

fn listing(kind: ListingKind, n: u128) -> Listing {
    let base = Utc
        .with_ymd_and_hms(2026, 2, 1, 8, 0, 0)
        .single()
        .expect("valid timestamp");
    Listing {
        id: Uuid::from_u128(n),
        kind,
        name: format!("{kind} {n}"),
        category: "Electronics".to_owned(),
        subcategory: "Phones".to_owned(),
        price: Some(1_000),
        featured: false,
        status: ListingStatus::Active,
        image: None,
        location: None,
        seller_id: None,
        seller_name: None,
        created_at: base - TimeDelta::minutes(i64::try_from(n).expect("small")),
        details: ListingDetails::default(),
    }
}

/// The `slice` of a source holding `total` rows.
fn rows(kind: ListingKind, slice: SourceSlice, total: u64) -> Vec<Listing> {
    let end = total.min(slice.offset.saturating_add(slice.limit));
    (slice.offset..end)
        .map(|n| listing(kind, u128::from(n)))
        .collect()
}

fn page(page: u32, size: u32) -> PageRequest {
    PageRequest::new(page, size, PageLimits::new(24, 100))
}

fn source_with(kind: ListingKind, total: u64) -> MockListingSource {
    let mut source = MockListingSource::new();
    source.expect_count().returning(move |_| Ok(total));
    source
        .expect_fetch()
        .returning(move |_, _, slice| Ok(rows(kind, slice, total)));
    source
}

fn missing_services() -> MockListingSource {
    let mut source = MockListingSource::new();
    source
        .expect_count()
        .returning(|_| Err(ListingSourceError::missing("services")));
    source.expect_fetch().times(0);
    source
}

fn service(products: MockListingSource, services: Option<MockListingSource>) -> ListingsService {
    ListingsService::new(
        Arc::new(products),
        services.map(|source| Arc::new(source) as Arc<dyn ListingSource>),
    )
}

fn kinds(envelope: &Envelope<Listing>) -> (usize, usize) {
    let products = envelope
        .items
        .iter()
        .filter(|row| row.kind == ListingKind::Product)
        .count();
    (products, envelope.items.len() - products)
}

#[rstest]
#[tokio::test]
async fn all_kinds_split_the_page_between_tables() {
    let svc = service(
        source_with(ListingKind::Product, 40),
        Some(source_with(ListingKind::Service, 6)),
    );
    let envelope = svc
        .list_listings(&ListingFilter::default(), ListingSort::Newest, page(1, 10))
        .await
        .expect("page served");
    assert_eq!(envelope.total, 46);
    assert_eq!(envelope.total_pages, 5);
    assert_eq!(kinds(&envelope), (5, 5));
}

#[rstest]
#[tokio::test]
async fn products_fill_the_page_once_services_run_out() {
    let svc = service(
        source_with(ListingKind::Product, 40),
        Some(source_with(ListingKind::Service, 6)),
    );
    let envelope = svc
        .list_listings(&ListingFilter::default(), ListingSort::Newest, page(2, 10))
        .await
        .expect("page served");
    assert_eq!(kinds(&envelope), (9, 1));
}

#[rstest]
#[tokio::test]
async fn merged_rows_follow_the_sort() {
    let svc = service(
        source_with(ListingKind::Product, 4),
        Some(source_with(ListingKind::Service, 4)),
    );
    let envelope = svc
        .list_listings(&ListingFilter::default(), ListingSort::Newest, page(1, 8))
        .await
        .expect("page served");
    let newest_first = envelope
        .items
        .windows(2)
        .all(|pair| matches!(pair, [a, b] if a.created_at >= b.created_at));
    assert!(newest_first);
}

#[rstest]
#[tokio::test]
async fn single_kind_uses_plain_offsets() {
    let mut products = MockListingSource::new();
    products.expect_count().returning(|_| Ok(30));
    products
        .expect_fetch()
        .withf(|_, _, slice| *slice == SourceSlice { offset: 20, limit: 10 })
        .times(1)
        .returning(|_, _, slice| Ok(rows(ListingKind::Product, slice, 30)));
    let mut services = MockListingSource::new();
    services.expect_count().times(0);

    let filter = ListingFilter {
        kind: KindFilter::Only(ListingKind::Product),
        ..ListingFilter::default()
    };
    let envelope = service(products, Some(services))
        .list_listings(&filter, ListingSort::Newest, page(3, 10))
        .await
        .expect("page served");
    assert_eq!(envelope.items.len(), 10);
    assert_eq!(envelope.total, 30);
}

#[rstest]
#[tokio::test]
async fn pages_past_the_end_skip_the_fetch() {
    let mut products = MockListingSource::new();
    products.expect_count().returning(|_| Ok(3));
    products.expect_fetch().times(0);
    let filter = ListingFilter {
        kind: KindFilter::Only(ListingKind::Product),
        ..ListingFilter::default()
    };
    let envelope = service(products, None)
        .list_listings(&filter, ListingSort::Newest, page(4, 10))
        .await
        .expect("page served");
    assert!(envelope.items.is_empty());
    assert_eq!(envelope.total_pages, 1);
}

#[rstest]
#[case::unwired(None)]
#[case::missing(Some(missing_services()))]
#[tokio::test]
async fn absent_services_contribute_nothing(#[case] services: Option<MockListingSource>) {
    let svc = service(source_with(ListingKind::Product, 12), services);
    let envelope = svc
        .list_listings(&ListingFilter::default(), ListingSort::Newest, page(1, 10))
        .await
        .expect("degrades to products only");
    assert_eq!(envelope.total, 12);
    assert_eq!(kinds(&envelope), (10, 0));
}

#[rstest]
#[tokio::test]
async fn services_only_without_table_is_empty() {
    let mut products = MockListingSource::new();
    products.expect_count().times(0);
    let filter = ListingFilter {
        kind: KindFilter::Only(ListingKind::Service),
        ..ListingFilter::default()
    };
    let envelope = service(products, None)
        .list_listings(&filter, ListingSort::Newest, page(1, 10))
        .await
        .expect("empty page");
    assert_eq!(envelope.total, 0);
}

#[rstest]
#[tokio::test]
async fn product_only_filters_skip_services() {
    let mut services = MockListingSource::new();
    services.expect_count().times(0);
    services.expect_fetch().times(0);
    let filter = ListingFilter {
        brand: Some("Samsung".to_owned()),
        ..ListingFilter::default()
    };
    let envelope = service(source_with(ListingKind::Product, 3), Some(services))
        .list_listings(&filter, ListingSort::Newest, page(1, 10))
        .await
        .expect("page served");
    assert_eq!(kinds(&envelope), (3, 0));
    assert_eq!(envelope.total, 3);
}

#[rstest]
#[tokio::test]
async fn last_single_kind_page_is_short() {
    let filter = ListingFilter {
        kind: KindFilter::Only(ListingKind::Product),
        ..ListingFilter::default()
    };
    let envelope = service(source_with(ListingKind::Product, 25), None)
        .list_listings(&filter, ListingSort::Newest, page(3, 10))
        .await
        .expect("page served");
    assert_eq!(envelope.items.len(), 5);
    assert_eq!(envelope.total_pages, 3);
}

#[rstest]
#[case(ListingSourceError::connection("refused"), ErrorCode::ServiceUnavailable)]
#[case(ListingSourceError::query("bad row"), ErrorCode::InternalError)]
#[case(ListingSourceError::missing("products"), ErrorCode::InternalError)]
#[tokio::test]
async fn product_failures_fail_the_request(
    #[case] failure: ListingSourceError,
    #[case] expected: ErrorCode,
) {
    let mut products = MockListingSource::new();
    products.expect_count().return_once(move |_| Err(failure));
    let err = service(products, None)
        .list_listings(&ListingFilter::default(), ListingSort::Newest, page(1, 10))
        .await
        .expect_err("products are required");
    assert_eq!(err.code(), expected);
}

#[rstest]
#[tokio::test]
async fn inverted_price_range_is_rejected() {
    let filter = ListingFilter {
        min_price: Some(500),
        max_price: Some(100),
        ..ListingFilter::default()
    };
    let err = service(MockListingSource::new(), None)
        .list_listings(&filter, ListingSort::Newest, page(1, 10))
        .await
        .expect_err("invalid range");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(
        err.details().and_then(|details| details.get("field")),
        Some(&json!("minPrice"))
    );
}

#[rstest]
#[tokio::test]
async fn empty_moderation_is_rejected() {
    let err = service(MockListingSource::new(), None)
        .moderate_listing(ListingKind::Product, Uuid::nil(), ModerationChange::default())
        .await
        .expect_err("empty change");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}

#[rstest]
#[tokio::test]
async fn moderation_returns_the_updated_row() {
    let mut products = MockListingSource::new();
    products
        .expect_moderate()
        .withf(|id, change| *id == Uuid::from_u128(3) && change.featured == Some(true))
        .return_once(|id, _| {
            let mut row = listing(ListingKind::Product, id.as_u128());
            row.featured = true;
            Ok(Some(row))
        });
    let change = ModerationChange {
        status: None,
        featured: Some(true),
    };
    let row = service(products, None)
        .moderate_listing(ListingKind::Product, Uuid::from_u128(3), change)
        .await
        .expect("moderated");
    assert!(row.featured);
}

#[rstest]
#[case::unknown_row(Some(Ok(None)))]
#[case::missing_table(Some(Err(ListingSourceError::missing("services"))))]
#[case::unwired(None)]
#[tokio::test]
async fn moderating_absent_services_is_not_found(
    #[case] outcome: Option<Result<Option<Listing>, ListingSourceError>>,
) {
    let services = outcome.map(|outcome| {
        let mut source = MockListingSource::new();
        source.expect_moderate().return_once(move |_, _| outcome);
        source
    });
    let change = ModerationChange {
        status: Some(ListingStatus::Hidden),
        featured: None,
    };
    let err = service(MockListingSource::new(), services)
        .moderate_listing(ListingKind::Service, Uuid::nil(), change)
        .await
        .expect_err("not found");
    assert_eq!(err.code(), ErrorCode::NotFound);
}
