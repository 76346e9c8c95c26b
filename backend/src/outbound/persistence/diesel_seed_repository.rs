//! PostgreSQL-backed seeding adapter.
//!
//! Applies a generated dataset inside one transaction. The run record is
//! written first, so a second run with the same key stops before touching
//! any rows. Optional tables are probed with `to_regclass` because a failed
//! statement would abort the surrounding transaction.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use diesel::prelude::*;
use diesel::upsert::excluded;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use mockable::Clock;
use seed_data::{CarrierSeed, ProductSeed, SeedDataset, ServiceSeed, UserSeed};
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::ListingStatus;
use crate::domain::ports::{SeedRepository, SeedRepositoryError, SeedRequest, SeedingResult};

use super::diesel_helpers::{map_diesel_error, map_pool_error, table_exists};
use super::models::{
    NewCarrierRow, NewProductRow, NewSeedRunRow, NewServiceRow, NewUserRow, NewVehicleRow,
};
use super::pool::DbPool;
use super::schema::{
    carrier_profiles, carrier_vehicles, favorites, payments, products, reports, seed_runs,
    services, support_tickets, users,
};

/// Rows per `INSERT`, well below PostgreSQL's bind parameter limit.
const INSERT_CHUNK: usize = 500;

/// Diesel implementation of [`SeedRepository`].
#[derive(Clone)]
pub struct DieselSeedRepository {
    pool: DbPool,
    clock: Arc<dyn Clock>,
}

impl DieselSeedRepository {
    /// Create a repository; `clock` stamps `created_at` on inserted listings.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use std::sync::Arc;
    ///
    /// use mockable::DefaultClock;
    /// use qwiksale::outbound::persistence::{DbPool, DieselSeedRepository, PoolConfig};
    ///
    /// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
    /// let pool = DbPool::new(PoolConfig::new("postgres://localhost")).await?;
    /// let repository = DieselSeedRepository::new(pool, Arc::new(DefaultClock));
    /// # let _ = repository;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(pool: DbPool, clock: Arc<dyn Clock>) -> Self {
        Self { pool, clock }
    }
}

/// Seed user id to the id actually stored for that email.
type IdMap = HashMap<Uuid, Uuid>;

fn created_at(now: DateTime<Utc>, age_minutes: u32) -> DateTime<Utc> {
    now - Duration::minutes(i64::from(age_minutes))
}

fn remap(ids: &IdMap, seed_id: Uuid) -> Uuid {
    ids.get(&seed_id).copied().unwrap_or(seed_id)
}

fn product_row<'a>(seed: &'a ProductSeed, ids: &IdMap, now: DateTime<Utc>) -> NewProductRow<'a> {
    NewProductRow {
        id: seed.id,
        name: &seed.name,
        description: &seed.description,
        category: &seed.category,
        subcategory: &seed.subcategory,
        brand: seed.brand.as_deref(),
        condition: seed.condition.map(|condition| condition.as_str()),
        price: seed.price,
        image: Some(seed.image.as_str()),
        gallery: &seed.gallery,
        location: seed.location.as_deref(),
        negotiable: seed.negotiable,
        featured: seed.featured,
        status: ListingStatus::Active.as_str(),
        seller_id: Some(remap(ids, seed.seller_id)),
        seller_name: seed.seller_name.as_deref(),
        seller_phone: seed.seller_phone.as_deref(),
        created_at: created_at(now, seed.age_minutes),
    }
}

fn service_row<'a>(seed: &'a ServiceSeed, ids: &IdMap, now: DateTime<Utc>) -> NewServiceRow<'a> {
    NewServiceRow {
        id: seed.id,
        name: &seed.name,
        description: &seed.description,
        category: &seed.category,
        subcategory: &seed.subcategory,
        price: seed.price,
        rate_type: seed.rate_type.map(|rate| rate.as_str()),
        service_area: seed.service_area.as_deref(),
        availability: seed.availability.as_deref(),
        image: Some(seed.image.as_str()),
        gallery: &seed.gallery,
        location: seed.location.as_deref(),
        featured: seed.featured,
        status: ListingStatus::Active.as_str(),
        seller_id: Some(remap(ids, seed.seller_id)),
        seller_name: seed.seller_name.as_deref(),
        seller_phone: seed.seller_phone.as_deref(),
        created_at: created_at(now, seed.age_minutes),
    }
}

/// Delete marketplace rows, children first. Users are kept and upserted.
async fn reset(conn: &mut AsyncPgConnection) -> Result<(), diesel::result::Error> {
    diesel::delete(carrier_vehicles::table).execute(conn).await?;
    diesel::delete(carrier_profiles::table).execute(conn).await?;
    if table_exists(conn, "favorites").await? {
        diesel::delete(favorites::table).execute(conn).await?;
    }
    if table_exists(conn, "reports").await? {
        diesel::delete(reports::table).execute(conn).await?;
    }
    if table_exists(conn, "payments").await? {
        diesel::delete(payments::table).execute(conn).await?;
    }
    if table_exists(conn, "support_tickets").await? {
        diesel::delete(support_tickets::table).execute(conn).await?;
    }
    if table_exists(conn, "services").await? {
        diesel::delete(services::table).execute(conn).await?;
    }
    diesel::delete(products::table).execute(conn).await?;
    diesel::delete(seed_runs::table).execute(conn).await?;
    Ok(())
}

async fn upsert_users(
    conn: &mut AsyncPgConnection,
    seeds: &[UserSeed],
) -> Result<IdMap, diesel::result::Error> {
    let mut ids = IdMap::with_capacity(seeds.len());
    for chunk in seeds.chunks(INSERT_CHUNK) {
        let rows: Vec<NewUserRow<'_>> = chunk
            .iter()
            .map(|seed| NewUserRow {
                id: seed.id,
                email: &seed.email,
                name: seed.name.as_deref(),
                username: seed.username.as_deref(),
                role: seed.role.as_str(),
            })
            .collect();
        let stored: Vec<(String, Uuid)> = diesel::insert_into(users::table)
            .values(&rows)
            .on_conflict(users::email)
            .do_update()
            .set(users::name.eq(excluded(users::name)))
            .returning((users::email, users::id))
            .get_results(conn)
            .await?;
        let by_email: HashMap<String, Uuid> = stored.into_iter().collect();
        for seed in chunk {
            if let Some(id) = by_email.get(&seed.email) {
                ids.insert(seed.id, *id);
            }
        }
    }
    Ok(ids)
}

async fn insert_products(
    conn: &mut AsyncPgConnection,
    seeds: &[ProductSeed],
    ids: &IdMap,
    now: DateTime<Utc>,
) -> Result<usize, diesel::result::Error> {
    let mut inserted = 0;
    for chunk in seeds.chunks(INSERT_CHUNK) {
        let rows: Vec<_> = chunk.iter().map(|seed| product_row(seed, ids, now)).collect();
        inserted += diesel::insert_into(products::table)
            .values(&rows)
            .on_conflict_do_nothing()
            .execute(conn)
            .await?;
    }
    Ok(inserted)
}

async fn insert_services(
    conn: &mut AsyncPgConnection,
    seeds: &[ServiceSeed],
    ids: &IdMap,
    now: DateTime<Utc>,
) -> Result<usize, diesel::result::Error> {
    if seeds.is_empty() {
        return Ok(0);
    }
    if !table_exists(conn, "services").await? {
        warn!(rows = seeds.len(), "services table missing; skipping seeded services");
        return Ok(0);
    }
    let mut inserted = 0;
    for chunk in seeds.chunks(INSERT_CHUNK) {
        let rows: Vec<_> = chunk.iter().map(|seed| service_row(seed, ids, now)).collect();
        inserted += diesel::insert_into(services::table)
            .values(&rows)
            .on_conflict_do_nothing()
            .execute(conn)
            .await?;
    }
    Ok(inserted)
}

/// Insert carriers, one per owner. Vehicles are written only for carriers
/// this run created.
async fn insert_carriers(
    conn: &mut AsyncPgConnection,
    seeds: &[CarrierSeed],
    ids: &IdMap,
) -> Result<usize, diesel::result::Error> {
    let mut inserted = 0;
    for seed in seeds {
        let created: Option<Uuid> = diesel::insert_into(carrier_profiles::table)
            .values(&NewCarrierRow {
                id: seed.id,
                user_id: remap(ids, seed.user_id),
                phone: seed.phone.as_deref(),
                station: seed.station.as_deref(),
                planned_tier: seed.tier.as_str(),
            })
            .on_conflict(carrier_profiles::user_id)
            .do_nothing()
            .returning(carrier_profiles::id)
            .get_result(conn)
            .await
            .optional()?;
        let Some(carrier_id) = created else {
            continue;
        };
        inserted += 1;
        if seed.vehicles.is_empty() {
            continue;
        }
        let vehicles: Vec<_> = seed
            .vehicles
            .iter()
            .map(|vehicle| NewVehicleRow {
                id: vehicle.id,
                carrier_id,
                kind: &vehicle.kind,
                plate: vehicle.plate.as_deref(),
            })
            .collect();
        diesel::insert_into(carrier_vehicles::table)
            .values(&vehicles)
            .execute(conn)
            .await?;
    }
    Ok(inserted)
}

async fn apply(
    conn: &mut AsyncPgConnection,
    seed_key: &str,
    reset_first: bool,
    seed: i64,
    dataset: &SeedDataset,
    now: DateTime<Utc>,
) -> Result<SeedingResult, diesel::result::Error> {
    if reset_first {
        reset(conn).await?;
    }

    let recorded = diesel::insert_into(seed_runs::table)
        .values(&NewSeedRunRow { seed_key, seed })
        .on_conflict(seed_runs::seed_key)
        .do_nothing()
        .execute(conn)
        .await?;
    if recorded == 0 {
        return Ok(SeedingResult::AlreadySeeded);
    }

    let ids = upsert_users(conn, &dataset.users).await?;
    let products = insert_products(conn, &dataset.products, &ids, now).await?;
    let services = insert_services(conn, &dataset.services, &ids, now).await?;
    let carriers = insert_carriers(conn, &dataset.carriers, &ids).await?;
    info!(
        seed_key,
        users = ids.len(),
        products,
        services,
        carriers,
        "seed rows written"
    );
    Ok(SeedingResult::Applied)
}

#[async_trait]
impl SeedRepository for DieselSeedRepository {
    async fn apply_seed(&self, request: SeedRequest) -> Result<SeedingResult, SeedRepositoryError> {
        let SeedRequest {
            seed_key,
            reset,
            seed,
            dataset,
        } = request;
        let now = self.clock.utc();
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, SeedRepositoryError::connection))?;

        conn.transaction(|conn| {
            async move { apply(conn, &seed_key, reset, seed, &dataset, now).await }.scope_boxed()
        })
        .await
        .map_err(|error| {
            map_diesel_error(
                error,
                "apply seed",
                SeedRepositoryError::query,
                SeedRepositoryError::connection,
            )
        })
    }
}
