//! Driving port for the admin carriers listing.

use async_trait::async_trait;
use pagination::{Envelope, PageRequest};

use crate::domain::{CarrierFilter, CarrierSummary, Error};

/// Domain use-case port for listing carriers.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CarriersQuery: Send + Sync {
    /// One page of carriers joined with their owners.
    async fn list_carriers(
        &self,
        filter: &CarrierFilter,
        page: PageRequest,
    ) -> Result<Envelope<CarrierSummary>, Error>;
}
