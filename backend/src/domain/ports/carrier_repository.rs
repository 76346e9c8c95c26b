//! Driven port for carrier profiles.

use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pagination::SourceSlice;
use uuid::Uuid;

use crate::domain::{CarrierFilter, CarrierProfile, CarrierSummary, Email, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by carrier repository adapters.
    pub enum CarrierRepositoryError {
        /// Connection could not be established.
        Connection { message: String } => "carrier repository connection failed: {message}",
        /// Query failed during execution or returned malformed rows.
        Query { message: String } => "carrier repository query failed: {message}",
    }
}

/// Port for carrier lookups, listings and enforcement writes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CarrierRepository: Send + Sync {
    /// Carrier with the given profile id.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<CarrierProfile>, CarrierRepositoryError>;

    /// Carrier owned by the given user.
    async fn find_by_user_id(
        &self,
        user_id: &UserId,
    ) -> Result<Option<CarrierProfile>, CarrierRepositoryError>;

    /// Carrier owned by the user with this email, compared case-insensitively.
    async fn find_by_user_email(
        &self,
        email: &Email,
    ) -> Result<Option<CarrierProfile>, CarrierRepositoryError>;

    /// Carriers matching `filter`, newest first, restricted to `slice`.
    ///
    /// Status filters compare against the effective status at `now`.
    async fn list(
        &self,
        filter: &CarrierFilter,
        now: DateTime<Utc>,
        slice: SourceSlice,
    ) -> Result<Vec<CarrierSummary>, CarrierRepositoryError>;

    /// Number of carriers matching `filter` at `now`.
    async fn count(
        &self,
        filter: &CarrierFilter,
        now: DateTime<Utc>,
    ) -> Result<u64, CarrierRepositoryError>;

    /// Persist enforcement fields (status, tier, suspension, ban).
    async fn save(&self, carrier: &CarrierProfile) -> Result<CarrierProfile, CarrierRepositoryError>;
}

/// In-memory carriers used when no database is configured.
#[derive(Debug, Default)]
pub struct FixtureCarrierRepository {
    rows: RwLock<Vec<CarrierSummary>>,
}

impl FixtureCarrierRepository {
    /// Repository over the given rows.
    pub fn new(rows: Vec<CarrierSummary>) -> Self {
        Self {
            rows: RwLock::new(rows),
        }
    }

    fn snapshot(&self) -> Result<Vec<CarrierSummary>, CarrierRepositoryError> {
        self.rows
            .read()
            .map(|rows| rows.clone())
            .map_err(|_| CarrierRepositoryError::query("fixture carriers lock poisoned"))
    }

    fn find(
        &self,
        predicate: impl Fn(&CarrierSummary) -> bool,
    ) -> Result<Option<CarrierProfile>, CarrierRepositoryError> {
        Ok(self
            .snapshot()?
            .into_iter()
            .find(|row| predicate(row))
            .map(|row| row.carrier))
    }

    fn matching(
        &self,
        filter: &CarrierFilter,
        now: DateTime<Utc>,
    ) -> Result<Vec<CarrierSummary>, CarrierRepositoryError> {
        let needle = filter.q.as_deref().map(str::to_lowercase);
        let mut rows: Vec<CarrierSummary> = self
            .snapshot()?
            .into_iter()
            .filter(|row| filter.tier.is_none_or(|tier| tier == row.carrier.tier))
            .filter(|row| {
                filter
                    .status
                    .is_none_or(|status| status == row.carrier.effective_status(now))
            })
            .filter(|row| {
                needle.as_deref().is_none_or(|needle| {
                    [
                        Some(row.user_email.as_ref()),
                        row.user_name.as_deref(),
                        row.carrier.phone.as_deref(),
                        row.carrier.station.as_deref(),
                    ]
                    .into_iter()
                    .flatten()
                    .any(|field| field.to_lowercase().contains(needle))
                })
            })
            .collect();
        rows.sort_by(|a, b| {
            b.carrier
                .created_at
                .cmp(&a.carrier.created_at)
                .then_with(|| b.carrier.id.cmp(&a.carrier.id))
        });
        Ok(rows)
    }
}

#[async_trait]
impl CarrierRepository for FixtureCarrierRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<CarrierProfile>, CarrierRepositoryError> {
        self.find(|row| row.carrier.id == id)
    }

    async fn find_by_user_id(
        &self,
        user_id: &UserId,
    ) -> Result<Option<CarrierProfile>, CarrierRepositoryError> {
        self.find(|row| &row.carrier.user_id == user_id)
    }

    async fn find_by_user_email(
        &self,
        email: &Email,
    ) -> Result<Option<CarrierProfile>, CarrierRepositoryError> {
        self.find(|row| &row.user_email == email)
    }

    async fn list(
        &self,
        filter: &CarrierFilter,
        now: DateTime<Utc>,
        slice: SourceSlice,
    ) -> Result<Vec<CarrierSummary>, CarrierRepositoryError> {
        let skip = usize::try_from(slice.offset).unwrap_or(usize::MAX);
        let take = usize::try_from(slice.limit).unwrap_or(usize::MAX);
        Ok(self
            .matching(filter, now)?
            .into_iter()
            .skip(skip)
            .take(take)
            .collect())
    }

    async fn count(
        &self,
        filter: &CarrierFilter,
        now: DateTime<Utc>,
    ) -> Result<u64, CarrierRepositoryError> {
        Ok(u64::try_from(self.matching(filter, now)?.len()).unwrap_or(u64::MAX))
    }

    async fn save(&self, carrier: &CarrierProfile) -> Result<CarrierProfile, CarrierRepositoryError> {
        let mut rows = self
            .rows
            .write()
            .map_err(|_| CarrierRepositoryError::query("fixture carriers lock poisoned"))?;
        let row = rows
            .iter_mut()
            .find(|row| row.carrier.id == carrier.id)
            .ok_or_else(|| CarrierRepositoryError::query(format!("carrier {} vanished", carrier.id)))?;
        row.carrier = carrier.clone();
        Ok(carrier.clone())
    }
}
