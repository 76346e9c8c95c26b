//! PostgreSQL-backed carrier profiles, joined with their owners.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::dsl::{InnerJoin, IntoBoxed};
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use pagination::SourceSlice;
use uuid::Uuid;

use crate::domain::ports::{CarrierRepository, CarrierRepositoryError};
use crate::domain::{
    CarrierFilter, CarrierProfile, CarrierStatus, CarrierSummary, Email, UserId,
};

use super::diesel_helpers::{
    collect_rows, contains_pattern, count_total, map_diesel_error, map_pool_error, offset_limit,
};
use super::models::{CarrierEnforcement, CarrierRow};
use super::pool::DbPool;
use super::schema::{carrier_profiles, users};

pub(super) type CarrierJoin = IntoBoxed<'static, InnerJoin<carrier_profiles::table, users::table>, Pg>;
type JoinedRow = (CarrierRow, String, Option<String>);

/// Diesel implementation of [`CarrierRepository`].
#[derive(Clone)]
pub struct DieselCarrierRepository {
    pool: DbPool,
}

impl DieselCarrierRepository {
    /// Create a repository over the given pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn first_matching(
        &self,
        query: CarrierJoin,
        operation: &'static str,
    ) -> Result<Option<CarrierProfile>, CarrierRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, CarrierRepositoryError::connection))?;
        query
            .select(CarrierRow::as_select())
            .first::<CarrierRow>(&mut conn)
            .await
            .optional()
            .map_err(diesel_error(operation))?
            .map(|row| CarrierProfile::try_from(row).map_err(CarrierRepositoryError::query))
            .transpose()
    }
}

fn diesel_error(
    operation: &'static str,
) -> impl FnOnce(diesel::result::Error) -> CarrierRepositoryError {
    move |error| {
        map_diesel_error(
            error,
            operation,
            CarrierRepositoryError::query,
            CarrierRepositoryError::connection,
        )
    }
}

pub(super) fn joined() -> CarrierJoin {
    carrier_profiles::table.inner_join(users::table).into_boxed()
}

/// Restrict to carriers whose effective status at `now` is `status`.
///
/// Mirrors [`CarrierProfile::effective_status`]: a `banned_at` stamp wins,
/// and a suspension whose end has passed counts as active.
pub(super) fn with_status(query: CarrierJoin, status: CarrierStatus, now: DateTime<Utc>) -> CarrierJoin {
    use carrier_profiles::{banned_at, status as stored, suspended_until};

    let banned = stored.eq(CarrierStatus::Banned.as_str()).or(banned_at.is_not_null());
    let suspension_running = suspended_until
        .is_null()
        .or(suspended_until.assume_not_null().gt(now));
    match status {
        CarrierStatus::Banned => query.filter(banned),
        CarrierStatus::Suspended => query
            .filter(stored.eq(CarrierStatus::Suspended.as_str()))
            .filter(banned_at.is_null())
            .filter(suspension_running),
        CarrierStatus::Active => query.filter(banned_at.is_null()).filter(
            stored.eq(CarrierStatus::Active.as_str()).or(stored
                .eq(CarrierStatus::Suspended.as_str())
                .and(suspended_until.assume_not_null().le(now))),
        ),
    }
}

fn filtered(filter: &CarrierFilter, now: DateTime<Utc>) -> CarrierJoin {
    let mut query = joined();
    if let Some(tier) = filter.tier {
        query = query.filter(carrier_profiles::planned_tier.eq(tier.as_str()));
    }
    if let Some(needle) = filter.q.as_deref() {
        let pattern = contains_pattern(needle);
        query = query.filter(
            users::email
                .ilike(pattern.clone())
                .or(users::name.assume_not_null().ilike(pattern.clone()))
                .or(carrier_profiles::phone.assume_not_null().ilike(pattern.clone()))
                .or(carrier_profiles::station.assume_not_null().ilike(pattern)),
        );
    }
    match filter.status {
        Some(status) => with_status(query, status, now),
        None => query,
    }
}

fn to_summary((row, email, name): JoinedRow) -> Result<CarrierSummary, String> {
    let user_email =
        Email::new(&email).map_err(|err| format!("carrier {} owner email: {err}", row.id))?;
    Ok(CarrierSummary {
        carrier: CarrierProfile::try_from(row)?,
        user_email,
        user_name: name,
    })
}

#[async_trait]
impl CarrierRepository for DieselCarrierRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<CarrierProfile>, CarrierRepositoryError> {
        self.first_matching(
            joined().filter(carrier_profiles::id.eq(id)),
            "find carrier by id",
        )
        .await
    }

    async fn find_by_user_id(
        &self,
        user_id: &UserId,
    ) -> Result<Option<CarrierProfile>, CarrierRepositoryError> {
        self.first_matching(
            joined().filter(carrier_profiles::user_id.eq(*user_id.as_uuid())),
            "find carrier by owner",
        )
        .await
    }

    async fn find_by_user_email(
        &self,
        email: &Email,
    ) -> Result<Option<CarrierProfile>, CarrierRepositoryError> {
        self.first_matching(
            joined().filter(users::email.eq(email.as_ref().to_owned())),
            "find carrier by owner email",
        )
        .await
    }

    async fn list(
        &self,
        filter: &CarrierFilter,
        now: DateTime<Utc>,
        slice: SourceSlice,
    ) -> Result<Vec<CarrierSummary>, CarrierRepositoryError> {
        let (offset, limit) = offset_limit(slice);
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, CarrierRepositoryError::connection))?;
        let rows = filtered(filter, now)
            .order((carrier_profiles::created_at.desc(), carrier_profiles::id.desc()))
            .offset(offset)
            .limit(limit)
            .select((CarrierRow::as_select(), users::email, users::name))
            .load::<JoinedRow>(&mut conn)
            .await
            .map_err(diesel_error("list carriers"))?;
        collect_rows(rows.into_iter().map(to_summary), CarrierRepositoryError::query)
    }

    async fn count(
        &self,
        filter: &CarrierFilter,
        now: DateTime<Utc>,
    ) -> Result<u64, CarrierRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, CarrierRepositoryError::connection))?;
        filtered(filter, now)
            .count()
            .get_result::<i64>(&mut conn)
            .await
            .map(count_total)
            .map_err(diesel_error("count carriers"))
    }

    async fn save(&self, carrier: &CarrierProfile) -> Result<CarrierProfile, CarrierRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, CarrierRepositoryError::connection))?;
        let row = diesel::update(carrier_profiles::table.find(carrier.id))
            .set(&CarrierEnforcement::from(carrier))
            .returning(CarrierRow::as_returning())
            .get_result::<CarrierRow>(&mut conn)
            .await
            .map_err(diesel_error("save carrier enforcement"))?;
        CarrierProfile::try_from(row).map_err(CarrierRepositoryError::query)
    }
}
