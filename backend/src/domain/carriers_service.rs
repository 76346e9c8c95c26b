//! Carrier listing and enforcement.
//!
//! Admin routes name a carrier by whatever identifier the moderator has at
//! hand. [`CarriersService::resolve`] tries the carrier id, then the owning
//! user id, then the owner's email, and the first match wins.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use pagination::{Envelope, PageRequest, SourceSlice};
use tracing::info;
use uuid::Uuid;

use crate::domain::ports::{
    CarrierRepository, CarrierRepositoryError, CarriersCommand, CarriersQuery, EnforcementOutcome,
};
use crate::domain::{
    CarrierFilter, CarrierProfile, CarrierSummary, Email, EnforcementAction, EnforcementError,
    Error, UserId, apply_enforcement,
};

fn map_repository_error(error: CarrierRepositoryError) -> Error {
    match error {
        CarrierRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("carrier repository unavailable: {message}"))
        }
        CarrierRepositoryError::Query { message } => {
            Error::internal(format!("carrier repository error: {message}"))
        }
    }
}

fn map_enforcement_error(error: EnforcementError) -> Error {
    match error {
        EnforcementError::SuspendWhileBanned => Error::conflict(error.to_string()),
        EnforcementError::AmbiguousSuspension
        | EnforcementError::SuspensionInPast
        | EnforcementError::SuspensionDaysOutOfRange { .. } => {
            Error::invalid_request(error.to_string())
        }
    }
}

/// Service implementing the carrier query and command ports.
#[derive(Clone)]
pub struct CarriersService<R: ?Sized> {
    repository: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R: ?Sized> CarriersService<R> {
    /// Create the service over a carrier repository.
    pub fn new(repository: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }
}

impl<R> CarriersService<R>
where
    R: CarrierRepository + ?Sized,
{
    /// Find the carrier a moderator meant by `target`.
    ///
    /// # Errors
    ///
    /// `not_found` when nothing matches; repository failures otherwise.
    pub async fn resolve(&self, target: &str) -> Result<CarrierProfile, Error> {
        let target = target.trim();
        if let Ok(uuid) = Uuid::parse_str(target) {
            if let Some(carrier) = self
                .repository
                .find_by_id(uuid)
                .await
                .map_err(map_repository_error)?
            {
                return Ok(carrier);
            }
            if let Some(carrier) = self
                .repository
                .find_by_user_id(&UserId::from_uuid(uuid))
                .await
                .map_err(map_repository_error)?
            {
                return Ok(carrier);
            }
        } else if let Ok(email) = Email::new(target) {
            if let Some(carrier) = self
                .repository
                .find_by_user_email(&email)
                .await
                .map_err(map_repository_error)?
            {
                return Ok(carrier);
            }
        }
        Err(Error::not_found(format!("carrier {target} not found")))
    }
}

#[async_trait]
impl<R> CarriersQuery for CarriersService<R>
where
    R: CarrierRepository + ?Sized,
{
    async fn list_carriers(
        &self,
        filter: &CarrierFilter,
        page: PageRequest,
    ) -> Result<Envelope<CarrierSummary>, Error> {
        let now = self.clock.utc();
        let total = self
            .repository
            .count(filter, now)
            .await
            .map_err(map_repository_error)?;
        let slice = SourceSlice {
            offset: page.offset(),
            limit: u64::from(page.page_size()),
        };
        let rows = if total > slice.offset {
            self.repository
                .list(filter, now, slice)
                .await
                .map_err(map_repository_error)?
        } else {
            Vec::new()
        };
        let rows = rows
            .into_iter()
            .map(|row| CarrierSummary {
                carrier: row.carrier.normalised(now),
                ..row
            })
            .collect();
        Ok(Envelope::new(page, total, rows))
    }
}

#[async_trait]
impl<R> CarriersCommand for CarriersService<R>
where
    R: CarrierRepository + ?Sized,
{
    async fn enforce(
        &self,
        target: &str,
        action: EnforcementAction,
    ) -> Result<EnforcementOutcome, Error> {
        let now = self.clock.utc();
        let carrier = self.resolve(target).await?;
        let next = apply_enforcement(&carrier, &action, now).map_err(map_enforcement_error)?;

        let Some(next) = next else {
            info!(carrier_id = %carrier.id, action = action.name(), "carrier already in requested state");
            return Ok(EnforcementOutcome {
                carrier: carrier.normalised(now),
                changed: false,
            });
        };

        let saved = self
            .repository
            .save(&next)
            .await
            .map_err(map_repository_error)?;
        info!(
            carrier_id = %saved.id,
            action = action.name(),
            reason = action.reason().unwrap_or_default(),
            status = %saved.status,
            tier = %saved.tier,
            "carrier enforcement applied"
        );
        Ok(EnforcementOutcome {
            carrier: saved.normalised(now),
            changed: true,
        })
    }
}

#[cfg(test)]
#[path = "carriers_service_tests.rs"]
mod tests;
