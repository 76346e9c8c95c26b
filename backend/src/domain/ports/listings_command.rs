//! Driving port for listing moderation.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Error, Listing, ListingKind, ModerationChange};

/// Domain use-case port for moderating one listing.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ListingsCommand: Send + Sync {
    /// Apply `change` to the listing and return it.
    ///
    /// Fails with `invalid_request` for an empty change and `not_found` when
    /// the listing, or its table, does not exist.
    async fn moderate_listing(
        &self,
        kind: ListingKind,
        id: Uuid,
        change: ModerationChange,
    ) -> Result<Listing, Error>;
}
