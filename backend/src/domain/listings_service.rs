//! Listings aggregator over the products and services tables.
//!
//! A page of `kind=all` is served from both tables at once. Each table is
//! counted separately, [`split_page`] turns the two totals into per-table
//! windows, and the rows are merged with the sort's comparator. The
//! services table is optional: when it is not wired, or reports itself
//! missing, it contributes no rows.

use std::sync::Arc;

use async_trait::async_trait;
use pagination::{Envelope, PageRequest, SourceSlice, split_page};
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::ports::{ListingSource, ListingSourceError, ListingsCommand, ListingsQuery};
use crate::domain::{
    Error, Listing, ListingFilter, ListingFilterError, ListingKind, ListingSort, ModerationChange,
};

fn map_source_error(kind: ListingKind, error: ListingSourceError) -> Error {
    match error {
        ListingSourceError::Connection { message } => {
            Error::service_unavailable(format!("{kind} listings unavailable: {message}"))
        }
        ListingSourceError::Query { message } => {
            Error::internal(format!("{kind} listings query failed: {message}"))
        }
        ListingSourceError::Missing { relation } => {
            Error::internal(format!("required relation {relation} is missing"))
        }
    }
}

fn filter_error(error: &ListingFilterError) -> Error {
    let field = match error {
        ListingFilterError::NegativePrice { field } => *field,
        ListingFilterError::InvertedPriceRange { .. } => "minPrice",
    };
    Error::invalid_request(error.to_string())
        .with_details(json!({ "field": field, "code": "invalid_range" }))
}

/// Service implementing the listing query and moderation ports.
#[derive(Clone)]
pub struct ListingsService {
    products: Arc<dyn ListingSource>,
    services: Option<Arc<dyn ListingSource>>,
}

impl ListingsService {
    /// Create the service; pass `None` for `services` when the table is
    /// absent from the database.
    pub fn new(products: Arc<dyn ListingSource>, services: Option<Arc<dyn ListingSource>>) -> Self {
        Self { products, services }
    }

    fn source(&self, kind: ListingKind) -> Option<&Arc<dyn ListingSource>> {
        match kind {
            ListingKind::Product => Some(&self.products),
            ListingKind::Service => self.services.as_ref(),
        }
    }

    fn wanted(filter: &ListingFilter, kind: ListingKind) -> bool {
        filter.kind.includes(kind)
            && !(kind == ListingKind::Service && filter.is_product_only())
    }

    /// Swallow a missing services table, fail on anything else.
    fn degrade(kind: ListingKind, error: ListingSourceError) -> Result<(), Error> {
        match error {
            ListingSourceError::Missing { relation } if kind == ListingKind::Service => {
                warn!(%relation, "services table missing; serving products only");
                Ok(())
            }
            other => Err(map_source_error(kind, other)),
        }
    }

    async fn count(&self, kind: ListingKind, filter: &ListingFilter) -> Result<u64, Error> {
        let Some(source) = self.source(kind).filter(|_| Self::wanted(filter, kind)) else {
            return Ok(0);
        };
        match source.count(filter).await {
            Ok(total) => Ok(total),
            Err(error) => Self::degrade(kind, error).map(|()| 0),
        }
    }

    async fn fetch(
        &self,
        kind: ListingKind,
        filter: &ListingFilter,
        sort: ListingSort,
        slice: SourceSlice,
    ) -> Result<Vec<Listing>, Error> {
        let Some(source) = self.source(kind).filter(|_| !slice.is_empty()) else {
            return Ok(Vec::new());
        };
        match source.fetch(filter, sort, slice).await {
            Ok(rows) => Ok(rows),
            Err(error) => Self::degrade(kind, error).map(|()| Vec::new()),
        }
    }

    fn single_kind(filter: &ListingFilter) -> Option<ListingKind> {
        match (
            Self::wanted(filter, ListingKind::Product),
            Self::wanted(filter, ListingKind::Service),
        ) {
            (true, false) => Some(ListingKind::Product),
            (false, true) => Some(ListingKind::Service),
            _ => None,
        }
    }
}

#[async_trait]
impl ListingsQuery for ListingsService {
    async fn list_listings(
        &self,
        filter: &ListingFilter,
        sort: ListingSort,
        page: PageRequest,
    ) -> Result<Envelope<Listing>, Error> {
        filter.validate().map_err(|err| filter_error(&err))?;

        if let Some(kind) = Self::single_kind(filter) {
            let total = self.count(kind, filter).await?;
            let slice = SourceSlice {
                offset: page.offset(),
                limit: u64::from(page.page_size()),
            };
            let rows = if total > slice.offset {
                self.fetch(kind, filter, sort, slice).await?
            } else {
                Vec::new()
            };
            return Ok(Envelope::new(page, total, rows));
        }

        let product_total = self.count(ListingKind::Product, filter).await?;
        let service_total = self.count(ListingKind::Service, filter).await?;
        let split = split_page(&page, product_total, service_total);

        let mut rows = self
            .fetch(ListingKind::Product, filter, sort, split.primary)
            .await?;
        rows.extend(
            self.fetch(ListingKind::Service, filter, sort, split.secondary)
                .await?,
        );
        rows.sort_by(|a, b| sort.compare(a, b));

        Ok(Envelope::new(
            page,
            product_total.saturating_add(service_total),
            rows,
        ))
    }
}

#[async_trait]
impl ListingsCommand for ListingsService {
    async fn moderate_listing(
        &self,
        kind: ListingKind,
        id: Uuid,
        change: ModerationChange,
    ) -> Result<Listing, Error> {
        if change.is_empty() {
            return Err(Error::invalid_request(
                "moderation change must set status or featured",
            ));
        }
        let not_found = || Error::not_found(format!("{kind} {id} not found"));
        let source = self.source(kind).ok_or_else(not_found)?;

        let updated = match source.moderate(id, change).await {
            Ok(updated) => updated,
            Err(ListingSourceError::Missing { .. }) => None,
            Err(error) => return Err(map_source_error(kind, error)),
        };
        let listing = updated.ok_or_else(not_found)?;
        info!(
            %kind,
            %id,
            status = ?change.status,
            featured = ?change.featured,
            "listing moderated"
        );
        Ok(listing)
    }
}

#[cfg(test)]
#[path = "listings_service_tests.rs"]
mod tests;
