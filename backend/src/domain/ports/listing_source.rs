//! Driven port over one listings table.
//!
//! The aggregator talks to one source per table. The services table is
//! optional, so sources report [`ListingSourceError::Missing`] when their
//! relation does not exist and callers decide whether that is fatal.

use std::sync::RwLock;

use async_trait::async_trait;
use pagination::SourceSlice;
use uuid::Uuid;

use crate::domain::{Listing, ListingFilter, ListingKind, ListingSort, ModerationChange};

use super::define_port_error;

define_port_error! {
    /// Errors raised by listing source adapters.
    pub enum ListingSourceError {
        /// Connection could not be established.
        Connection { message: String } => "listing source connection failed: {message}",
        /// Query failed during execution or returned malformed rows.
        Query { message: String } => "listing source query failed: {message}",
        /// The backing table does not exist.
        Missing { relation: String } => "relation {relation} does not exist",
    }
}

/// Port for counting, paging and moderating rows of one table.
///
/// Each source reads one table and ignores `filter.kind`; the caller decides
/// which sources to ask.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ListingSource: Send + Sync {
    /// Number of rows matching `filter`.
    async fn count(&self, filter: &ListingFilter) -> Result<u64, ListingSourceError>;

    /// Rows matching `filter` in `sort` order, restricted to `slice`.
    async fn fetch(
        &self,
        filter: &ListingFilter,
        sort: ListingSort,
        slice: SourceSlice,
    ) -> Result<Vec<Listing>, ListingSourceError>;

    /// Apply a moderation change, returning the updated row or `None`.
    async fn moderate(
        &self,
        id: Uuid,
        change: ModerationChange,
    ) -> Result<Option<Listing>, ListingSourceError>;
}

/// In-memory source used when no database is configured.
#[derive(Debug)]
pub struct FixtureListingSource {
    kind: ListingKind,
    rows: RwLock<Vec<Listing>>,
}

impl FixtureListingSource {
    /// Source over `rows`; rows of another kind are dropped.
    pub fn new(kind: ListingKind, rows: Vec<Listing>) -> Self {
        let rows = rows.into_iter().filter(|row| row.kind == kind).collect();
        Self {
            kind,
            rows: RwLock::new(rows),
        }
    }

    fn matching(
        &self,
        filter: &ListingFilter,
        sort: ListingSort,
    ) -> Result<Vec<Listing>, ListingSourceError> {
        let filter = ListingFilter {
            kind: crate::domain::KindFilter::Only(self.kind),
            ..filter.clone()
        };
        let mut rows: Vec<Listing> = self
            .rows
            .read()
            .map_err(|_| ListingSourceError::query("fixture rows lock poisoned"))?
            .iter()
            .filter(|row| filter.matches(row))
            .cloned()
            .collect();
        rows.sort_by(|a, b| sort.compare(a, b));
        Ok(rows)
    }
}

#[async_trait]
impl ListingSource for FixtureListingSource {
    async fn count(&self, filter: &ListingFilter) -> Result<u64, ListingSourceError> {
        let rows = self.matching(filter, ListingSort::Newest)?;
        Ok(u64::try_from(rows.len()).unwrap_or(u64::MAX))
    }

    async fn fetch(
        &self,
        filter: &ListingFilter,
        sort: ListingSort,
        slice: SourceSlice,
    ) -> Result<Vec<Listing>, ListingSourceError> {
        let skip = usize::try_from(slice.offset).unwrap_or(usize::MAX);
        let take = usize::try_from(slice.limit).unwrap_or(usize::MAX);
        Ok(self
            .matching(filter, sort)?
            .into_iter()
            .skip(skip)
            .take(take)
            .collect())
    }

    async fn moderate(
        &self,
        id: Uuid,
        change: ModerationChange,
    ) -> Result<Option<Listing>, ListingSourceError> {
        let mut rows = self
            .rows
            .write()
            .map_err(|_| ListingSourceError::query("fixture rows lock poisoned"))?;
        let Some(row) = rows.iter_mut().find(|row| row.id == id) else {
            return Ok(None);
        };
        if let Some(status) = change.status {
            row.status = status;
        }
        if let Some(featured) = change.featured {
            row.featured = featured;
        }
        Ok(Some(row.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ListingDetails, ListingStatus};
    use chrono::{TimeDelta, Utc};
    use rstest::{fixture, rstest};

    #[fixture]
    fn source() -> FixtureListingSource {
        let now = Utc::now();
        let rows = (1..=5_u32)
            .map(|n| Listing {
                id: Uuid::from_u128(u128::from(n)),
                kind: if n == 5 {
                    ListingKind::Service
                } else {
                    ListingKind::Product
                },
                name: format!("Row {n}"),
                category: "Phones".to_owned(),
                subcategory: "Android".to_owned(),
                price: Some(i32::try_from(n).expect("small") * 100),
                featured: n == 1,
                status: ListingStatus::Active,
                image: None,
                location: None,
                seller_id: None,
                seller_name: None,
                created_at: now - TimeDelta::minutes(i64::from(n)),
                details: ListingDetails::default(),
            })
            .collect();
        FixtureListingSource::new(ListingKind::Product, rows)
    }

    #[rstest]
    #[tokio::test]
    async fn rows_of_other_kinds_are_dropped(source: FixtureListingSource) {
        let total = source.count(&ListingFilter::default()).await.expect("count");
        assert_eq!(total, 4);
    }

    #[rstest]
    #[tokio::test]
    async fn fetch_honours_sort_and_slice(source: FixtureListingSource) {
        let rows = source
            .fetch(
                &ListingFilter::default(),
                ListingSort::PriceDesc,
                SourceSlice {
                    offset: 1,
                    limit: 2,
                },
            )
            .await
            .expect("fetch");
        let prices: Vec<Option<i32>> = rows.iter().map(|row| row.price).collect();
        assert_eq!(prices, vec![Some(300), Some(200)]);
    }

    #[rstest]
    #[tokio::test]
    async fn brand_filters_apply_to_fixture_rows(source: FixtureListingSource) {
        let mut rows = source
            .matching(&ListingFilter::default(), ListingSort::Newest)
            .expect("rows");
        rows.truncate(1);
        for row in &mut rows {
            row.details.brand = Some("Samsung".to_owned());
        }
        let source = FixtureListingSource::new(ListingKind::Product, rows);
        let by_brand = |brand: &str| ListingFilter {
            brand: Some(brand.to_owned()),
            ..ListingFilter::default()
        };
        assert_eq!(source.count(&by_brand("Toyota")).await.expect("count"), 0);
        assert_eq!(source.count(&by_brand("samsung")).await.expect("count"), 1);
    }

    #[rstest]
    #[tokio::test]
    async fn moderation_hides_rows(source: FixtureListingSource) {
        let change = ModerationChange {
            status: Some(ListingStatus::Hidden),
            featured: None,
        };
        let updated = source
            .moderate(Uuid::from_u128(2), change)
            .await
            .expect("moderate")
            .expect("row exists");
        assert_eq!(updated.status, ListingStatus::Hidden);

        let active = ListingFilter {
            status: Some(ListingStatus::Active),
            ..ListingFilter::default()
        };
        assert_eq!(source.count(&active).await.expect("count"), 3);
        assert!(source
            .moderate(Uuid::from_u128(99), change)
            .await
            .expect("moderate")
            .is_none());
    }
}
