//! Builders wiring driven adapters into the HTTP state.
//!
//! With a database pool every port gets its Diesel adapter. Without one the
//! server runs on fixture adapters seeded from the bundled catalogue, which
//! keeps local UI work possible without PostgreSQL.

use std::ffi::OsString;
use std::sync::Arc;

use mockable::{Clock, DefaultClock};
use ortho_config::OrthoConfig;
use tracing::{info, warn};

use qwiksale::domain::ports::{
    CarrierRepository, FixtureCarrierRepository, FixtureListingSource, FixtureMetricsSource,
    FixtureUserDirectory, ListingSource, MetricsSource, UserDirectory,
};
use qwiksale::domain::{
    AdminAllowlist, AdminService, CarrierStatus, CarriersService, DirectoryLoginService,
    ListingKind, ListingsService, MetricCounts, MetricsService,
};
use qwiksale::inbound::http::state::HttpState;
use qwiksale::outbound::persistence::{
    DbPool, DieselCarrierRepository, DieselMetricsSource, DieselProductSource,
    DieselServiceSource, DieselUserDirectory,
};
use qwiksale::seeding::{FixtureRows, SeedSettings, fixture_rows};

use super::ServerConfig;

/// Driven adapters behind the HTTP state.
struct Adapters {
    users: Arc<dyn UserDirectory>,
    products: Arc<dyn ListingSource>,
    services: Option<Arc<dyn ListingSource>>,
    carriers: Arc<dyn CarrierRepository>,
    metrics: Arc<dyn MetricsSource>,
}

fn database_adapters(pool: &DbPool, services_table: bool) -> Adapters {
    let services = if services_table {
        Some(Arc::new(DieselServiceSource::new(pool.clone())) as Arc<dyn ListingSource>)
    } else {
        warn!("services table missing; listings will include products only");
        None
    };
    Adapters {
        users: Arc::new(DieselUserDirectory::new(pool.clone())),
        products: Arc::new(DieselProductSource::new(pool.clone())),
        services,
        carriers: Arc::new(DieselCarrierRepository::new(pool.clone())),
        metrics: Arc::new(DieselMetricsSource::new(pool.clone())),
    }
}

fn fixture_counts(rows: &FixtureRows) -> MetricCounts {
    let count = |n: usize| u64::try_from(n).unwrap_or(u64::MAX);
    let of_kind = |kind: ListingKind| rows.listings.iter().filter(|row| row.kind == kind).count();
    MetricCounts {
        users: count(rows.users.len()),
        products: count(of_kind(ListingKind::Product)),
        services: count(of_kind(ListingKind::Service)),
        carriers: count(rows.carriers.len()),
        active_carriers: count(
            rows.carriers
                .iter()
                .filter(|row| row.carrier.status == CarrierStatus::Active)
                .count(),
        ),
        new_users_7d: count(rows.users.len()),
        new_listings_7d: count(rows.listings.len()),
        ..MetricCounts::default()
    }
}

fn fixture_adapters(clock: &dyn Clock) -> Adapters {
    let loaded = SeedSettings::load_from_iter([OsString::from("qwiksale")])
        .map_err(|err| err.to_string())
        .and_then(|settings| fixture_rows(&settings, clock).map_err(|err| err.to_string()));
    let mut rows = match loaded {
        Ok(rows) => rows,
        Err(error) => {
            warn!(%error, "fixture catalogue unavailable; starting with an empty catalogue");
            FixtureRows::default()
        }
    };
    match FixtureUserDirectory::fixture_admin() {
        Ok(admin) if !rows.users.iter().any(|user| user.email == admin.email) => {
            rows.users.push(admin);
        }
        Ok(_) => {}
        Err(error) => warn!(%error, "fixture admin unavailable"),
    }
    let counts = fixture_counts(&rows);
    info!(
        users = rows.users.len(),
        listings = rows.listings.len(),
        carriers = rows.carriers.len(),
        "DATABASE_URL not set; serving fixture data"
    );

    Adapters {
        products: Arc::new(FixtureListingSource::new(
            ListingKind::Product,
            rows.listings.clone(),
        )),
        services: Some(Arc::new(FixtureListingSource::new(
            ListingKind::Service,
            rows.listings,
        ))),
        users: Arc::new(FixtureUserDirectory::new(rows.users)),
        carriers: Arc::new(FixtureCarrierRepository::new(rows.carriers)),
        metrics: Arc::new(FixtureMetricsSource(counts)),
    }
}

fn http_state(adapters: Adapters, allowlist: AdminAllowlist, clock: Arc<dyn Clock>) -> HttpState {
    let Adapters {
        users,
        products,
        services,
        carriers,
        metrics,
    } = adapters;
    let admin = Arc::new(AdminService::new(users.clone(), allowlist));
    let listings = Arc::new(ListingsService::new(products, services));
    let carriers = Arc::new(CarriersService::new(carriers, clock.clone()));

    HttpState {
        login: Arc::new(DirectoryLoginService::new(users)),
        admin_access: admin.clone(),
        listings: listings.clone(),
        listings_command: listings,
        carriers: carriers.clone(),
        carriers_command: carriers,
        users: admin.clone(),
        users_command: admin,
        metrics: Arc::new(MetricsService::new(metrics, clock)),
    }
}

/// Build the HTTP state for `config`.
pub(super) fn build_http_state(config: &ServerConfig) -> HttpState {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let adapters = match &config.db_pool {
        Some(pool) => database_adapters(pool, config.services_table),
        None => fixture_adapters(clock.as_ref()),
    };
    http_state(adapters, config.allowlist.clone(), clock)
}
