//! PostgreSQL-backed dashboard counters.
//!
//! Core tables must exist; a failed count there is an error. Tables added by
//! the `marketplace_extras` migration count as zero when they are missing.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::result::Error as DieselError;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use tracing::warn;

use crate::domain::ports::{MetricsSource, MetricsSourceError};
use crate::domain::{CarrierStatus, MetricCounts};

use super::diesel_carrier_repository::{joined, with_status};
use super::diesel_helpers::{count_total, map_diesel_error, map_pool_error, missing_relation};
use super::pool::DbPool;
use super::schema::{
    carrier_profiles, favorites, payments, products, reports, services, support_tickets, users,
};

const SUCCESSFUL_PAYMENT: &str = "SUCCESS";
const CLOSED_TICKET: &str = "CLOSED";

/// Diesel implementation of [`MetricsSource`].
#[derive(Clone)]
pub struct DieselMetricsSource {
    pool: DbPool,
}

impl DieselMetricsSource {
    /// Create a source over the given pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn required(
    operation: &'static str,
    result: Result<i64, DieselError>,
) -> Result<u64, MetricsSourceError> {
    result.map(count_total).map_err(|error| {
        map_diesel_error(
            error,
            operation,
            MetricsSourceError::query,
            MetricsSourceError::connection,
        )
    })
}

fn optional(
    operation: &'static str,
    result: Result<i64, DieselError>,
) -> Result<u64, MetricsSourceError> {
    match result {
        Err(error) => match missing_relation(&error) {
            Some(relation) => {
                warn!(%relation, operation, "optional table missing; counting zero");
                Ok(0)
            }
            None => required(operation, Err(error)),
        },
        ok => required(operation, ok),
    }
}

async fn carrier_counts(
    conn: &mut AsyncPgConnection,
    now: DateTime<Utc>,
) -> Result<(u64, u64, u64, u64), MetricsSourceError> {
    let total = required(
        "count carriers",
        carrier_profiles::table.count().get_result(conn).await,
    )?;
    let banned = required(
        "count banned carriers",
        with_status(joined(), CarrierStatus::Banned, now)
            .count()
            .get_result(conn)
            .await,
    )?;
    let suspended = required(
        "count suspended carriers",
        with_status(joined(), CarrierStatus::Suspended, now)
            .count()
            .get_result(conn)
            .await,
    )?;
    let active = total.saturating_sub(banned).saturating_sub(suspended);
    Ok((total, active, banned, suspended))
}

#[async_trait]
impl MetricsSource for DieselMetricsSource {
    async fn counts(
        &self,
        since: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<MetricCounts, MetricsSourceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, MetricsSourceError::connection))?;
        let conn = &mut *conn;

        let users_total = required("count users", users::table.count().get_result(conn).await)?;
        let new_users = required(
            "count recent users",
            users::table
                .filter(users::created_at.ge(since))
                .count()
                .get_result(conn)
                .await,
        )?;
        let products_total = required(
            "count products",
            products::table.count().get_result(conn).await,
        )?;
        let new_products = required(
            "count recent products",
            products::table
                .filter(products::created_at.ge(since))
                .count()
                .get_result(conn)
                .await,
        )?;
        let services_total = optional(
            "count services",
            services::table.count().get_result(conn).await,
        )?;
        let new_services = optional(
            "count recent services",
            services::table
                .filter(services::created_at.ge(since))
                .count()
                .get_result(conn)
                .await,
        )?;
        let (carriers, active_carriers, banned_carriers, suspended_carriers) =
            carrier_counts(conn, now).await?;

        Ok(MetricCounts {
            users: users_total,
            products: products_total,
            services: services_total,
            carriers,
            active_carriers,
            banned_carriers,
            suspended_carriers,
            favorites: optional(
                "count favorites",
                favorites::table.count().get_result(conn).await,
            )?,
            open_reports: optional(
                "count open reports",
                reports::table
                    .filter(reports::resolved.eq(false))
                    .count()
                    .get_result(conn)
                    .await,
            )?,
            open_tickets: optional(
                "count open tickets",
                support_tickets::table
                    .filter(support_tickets::status.ne(CLOSED_TICKET))
                    .count()
                    .get_result(conn)
                    .await,
            )?,
            successful_payments: optional(
                "count successful payments",
                payments::table
                    .filter(payments::status.eq(SUCCESSFUL_PAYMENT))
                    .count()
                    .get_result(conn)
                    .await,
            )?,
            new_users_7d: new_users,
            new_listings_7d: new_products.saturating_add(new_services),
        })
    }
}
