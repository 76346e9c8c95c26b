//! Driving port for listing queries shared by admin and public search.

use async_trait::async_trait;
use pagination::{Envelope, PageRequest};

use crate::domain::{Error, Listing, ListingFilter, ListingSort};

/// Domain use-case port for paging through listings.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ListingsQuery: Send + Sync {
    /// One page of listings across the tables selected by `filter.kind`.
    async fn list_listings(
        &self,
        filter: &ListingFilter,
        sort: ListingSort,
        page: PageRequest,
    ) -> Result<Envelope<Listing>, Error>;
}
