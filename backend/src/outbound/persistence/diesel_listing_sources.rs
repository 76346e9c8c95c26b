//! PostgreSQL-backed listing sources, one per table.
//!
//! `products` always exists. `services` may not; every query against it maps
//! "relation does not exist" to [`ListingSourceError::Missing`] so the
//! aggregator can fall back to products alone.

use async_trait::async_trait;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use pagination::SourceSlice;
use uuid::Uuid;

use crate::domain::ports::{ListingSource, ListingSourceError};
use crate::domain::{Listing, ListingFilter, ListingKind, ListingSort, ModerationChange};

use super::diesel_helpers::{
    collect_rows, contains_pattern, count_total, exact_pattern, map_diesel_error, map_pool_error,
    missing_relation, offset_limit,
};
use super::models::{ProductListingRow, ProductModeration, ServiceListingRow, ServiceModeration};
use super::pool::DbPool;
use super::schema::{products, services};

fn diesel_error(
    operation: &'static str,
) -> impl FnOnce(diesel::result::Error) -> ListingSourceError {
    move |error| match missing_relation(&error) {
        Some(relation) => ListingSourceError::missing(relation),
        None => map_diesel_error(
            error,
            operation,
            ListingSourceError::query,
            ListingSourceError::connection,
        ),
    }
}

/// Filters both tables share.
macro_rules! shared_filters {
    ($query:ident, $table:ident, $filter:expr) => {{
        let filter: &ListingFilter = $filter;
        if let Some(category) = filter.category.as_deref() {
            $query = $query.filter($table::category.ilike(exact_pattern(category)));
        }
        if let Some(subcategory) = filter.subcategory.as_deref() {
            $query = $query.filter($table::subcategory.ilike(exact_pattern(subcategory)));
        }
        if let Some(status) = filter.status {
            $query = $query.filter($table::status.eq(status.as_str()));
        }
        if let Some(featured) = filter.featured {
            $query = $query.filter($table::featured.eq(featured));
        }
        if let Some(seller) = filter.seller_id.as_ref() {
            $query = $query.filter($table::seller_id.eq(*seller.as_uuid()));
        }
        if let Some(min) = filter.min_price {
            $query = $query.filter($table::price.ge(min));
        }
        if let Some(max) = filter.max_price {
            $query = $query.filter($table::price.le(max));
        }
        $query
    }};
}

fn filtered_products(filter: &ListingFilter) -> products::BoxedQuery<'static, Pg> {
    let mut query = products::table.into_boxed();
    if let Some(needle) = filter.q.as_deref() {
        let pattern = contains_pattern(needle);
        query = query.filter(
            products::name
                .ilike(pattern.clone())
                .or(products::description.ilike(pattern.clone()))
                .or(products::category.ilike(pattern.clone()))
                .or(products::brand.assume_not_null().ilike(pattern)),
        );
    }
    if let Some(brand) = filter.brand.as_deref() {
        query = query.filter(products::brand.assume_not_null().ilike(exact_pattern(brand)));
    }
    if let Some(condition) = filter.condition {
        query = query.filter(products::condition.eq(condition.as_str()));
    }
    shared_filters!(query, products, filter)
}

fn filtered_services(filter: &ListingFilter) -> services::BoxedQuery<'static, Pg> {
    let mut query = services::table.into_boxed();
    if let Some(needle) = filter.q.as_deref() {
        let pattern = contains_pattern(needle);
        query = query.filter(
            services::name
                .ilike(pattern.clone())
                .or(services::description.ilike(pattern.clone()))
                .or(services::category.ilike(pattern.clone()))
                .or(services::service_area.assume_not_null().ilike(pattern)),
        );
    }
    shared_filters!(query, services, filter)
}

/// Generates a [`ListingSource`] over one table.
///
/// `$applies` decides whether a filter can match the table at all; when it
/// cannot, the source answers without a round trip.
macro_rules! diesel_listing_source {
    (
        $(#[$meta:meta])*
        $name:ident,
        table: $table:ident,
        kind: $kind:expr,
        row: $row:ty,
        moderation: $moderation:ident,
        filtered: $filtered:ident,
        applies: $applies:expr $(,)?
    ) => {
        $(#[$meta])*
        #[derive(Clone)]
        pub struct $name {
            pool: DbPool,
        }

        impl $name {
            /// Create a source over the given pool.
            pub fn new(pool: DbPool) -> Self {
                Self { pool }
            }
        }

        #[async_trait]
        impl ListingSource for $name {
            async fn count(&self, filter: &ListingFilter) -> Result<u64, ListingSourceError> {
                let applies: fn(&ListingFilter) -> bool = $applies;
                if !applies(filter) {
                    return Ok(0);
                }
                let mut conn = self
                    .pool
                    .get()
                    .await
                    .map_err(|err| map_pool_error(err, ListingSourceError::connection))?;
                $filtered(filter)
                    .count()
                    .get_result::<i64>(&mut conn)
                    .await
                    .map(count_total)
                    .map_err(diesel_error(concat!("count ", stringify!($table))))
            }

            async fn fetch(
                &self,
                filter: &ListingFilter,
                sort: ListingSort,
                slice: SourceSlice,
            ) -> Result<Vec<Listing>, ListingSourceError> {
                let applies: fn(&ListingFilter) -> bool = $applies;
                if slice.is_empty() || !applies(filter) {
                    return Ok(Vec::new());
                }
                let (offset, limit) = offset_limit(slice);
                let query = $filtered(filter);
                let query = match sort {
                    ListingSort::Newest => {
                        query.order(($table::created_at.desc(), $table::id.desc()))
                    }
                    ListingSort::PriceAsc => query.order((
                        $table::price.asc().nulls_last(),
                        $table::created_at.desc(),
                        $table::id.desc(),
                    )),
                    ListingSort::PriceDesc => query.order((
                        $table::price.desc().nulls_last(),
                        $table::created_at.desc(),
                        $table::id.desc(),
                    )),
                    ListingSort::Featured => query.order((
                        $table::featured.desc(),
                        $table::created_at.desc(),
                        $table::id.desc(),
                    )),
                };
                let mut conn = self
                    .pool
                    .get()
                    .await
                    .map_err(|err| map_pool_error(err, ListingSourceError::connection))?;
                let rows = query
                    .offset(offset)
                    .limit(limit)
                    .select(<$row>::as_select())
                    .load::<$row>(&mut conn)
                    .await
                    .map_err(diesel_error(concat!("page ", stringify!($table))))?;
                collect_rows(
                    rows.into_iter().map(|row| row.into_listing($kind)),
                    ListingSourceError::query,
                )
            }

            async fn moderate(
                &self,
                id: Uuid,
                change: ModerationChange,
            ) -> Result<Option<Listing>, ListingSourceError> {
                let changeset = $moderation {
                    status: change.status.map(|status| status.as_str()),
                    featured: change.featured,
                };
                let mut conn = self
                    .pool
                    .get()
                    .await
                    .map_err(|err| map_pool_error(err, ListingSourceError::connection))?;
                diesel::update($table::table.find(id))
                    .set(&changeset)
                    .returning(<$row>::as_returning())
                    .get_result::<$row>(&mut conn)
                    .await
                    .optional()
                    .map_err(diesel_error(concat!("moderate ", stringify!($table))))?
                    .map(|row| row.into_listing($kind).map_err(ListingSourceError::query))
                    .transpose()
            }
        }
    };
}

diesel_listing_source!(
    /// Listing source over the `products` table.
    DieselProductSource,
    table: products,
    kind: ListingKind::Product,
    row: ProductListingRow,
    moderation: ProductModeration,
    filtered: filtered_products,
    applies: |_| true,
);

diesel_listing_source!(
    /// Listing source over the optional `services` table.
    ///
    /// Brand and condition filters only exist on products, so a filter
    /// using them matches no services.
    DieselServiceSource,
    table: services,
    kind: ListingKind::Service,
    row: ServiceListingRow,
    moderation: ServiceModeration,
    filtered: filtered_services,
    applies: |filter| !filter.is_product_only(),
);
