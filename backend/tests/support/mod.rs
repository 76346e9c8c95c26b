//! Shared harness for the HTTP behaviour suites.
//!
//! Each request runs on a fresh single-threaded Actix system. The fixture
//! state and the session key live in the [`Marketplace`], so moderation
//! writes and signed-in sessions survive from one step to the next.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::http::Method;
use actix_web::{App, test, web};
use chrono::{DateTime, TimeZone, Utc};
use mockable::DefaultClock;
use serde_json::Value;
use uuid::Uuid;

use qwiksale::Trace;
use qwiksale::domain::ports::{
    FixtureCarrierRepository, FixtureListingSource, FixtureMetricsSource, FixtureUserDirectory,
};
use qwiksale::domain::{
    AdminAllowlist, AdminService, CarrierProfile, CarrierStatus, CarrierSummary, CarrierTier,
    CarriersService, DirectoryLoginService, Email, Listing, ListingDetails, ListingKind, ListingStatus,
    ListingsService, MetricCounts, MetricsService, Role, TRACE_ID_HEADER, UserAccount, UserId,
};
use qwiksale::inbound::http::configure_api;
use qwiksale::inbound::http::error::{json_error_handler, query_error_handler};
use qwiksale::inbound::http::state::HttpState;

pub const SHOPPER_ID: &str = "11111111-1111-4111-8111-111111111111";
pub const BANNED_ID: &str = "22222222-2222-4222-8222-222222222222";
pub const MODERATOR_ID: &str = "33333333-3333-4333-8333-333333333333";

/// What the last response looked like.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub status: u16,
    pub trace_id: Option<String>,
    pub total_count: Option<String>,
    pub cache_control: Option<String>,
    pub body: Value,
}

impl Recorded {
    /// Ids of the `items` array of an envelope, or of a flat array body.
    pub fn item_ids(&self) -> Vec<String> {
        let rows = self
            .body
            .get("items")
            .unwrap_or(&self.body)
            .as_array()
            .cloned()
            .unwrap_or_default();
        rows.iter()
            .filter_map(|row| row.get("id").and_then(Value::as_str).map(str::to_owned))
            .collect()
    }
}

fn at(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, day, 8, 30, 0)
        .single()
        .expect("valid fixture date")
}

fn account(id: &str, email: &str, role: Role, banned: bool, day: u32) -> UserAccount {
    UserAccount {
        id: UserId::new(id).expect("fixture id"),
        email: Email::new(email).expect("fixture email"),
        name: Some(email.split('@').next().unwrap_or(email).to_owned()),
        username: None,
        role,
        banned,
        suspended: false,
        created_at: at(day),
    }
}

/// The fixture super admin (`admin`), a moderator, a shopper and a banned
/// former admin.
pub fn accounts() -> Vec<UserAccount> {
    vec![
        FixtureUserDirectory::fixture_admin().expect("fixture admin"),
        account(SHOPPER_ID, "shopper@qwiksale.test", Role::User, false, 3),
        account(BANNED_ID, "former@qwiksale.test", Role::Admin, true, 2),
        account(MODERATOR_ID, "moderator@qwiksale.test", Role::Admin, false, 1),
    ]
}

/// Listing `n` of `kind`, created `n` minutes after a fixed instant.
pub fn listing(kind: ListingKind, n: u128, name: &str, status: ListingStatus) -> Listing {
    Listing {
        id: Uuid::from_u128(n),
        kind,
        name: name.to_owned(),
        category: "Electronics".to_owned(),
        subcategory: "Phones".to_owned(),
        price: (kind == ListingKind::Product).then(|| i32::try_from(n).expect("small id") * 1_000),
        featured: false,
        status,
        image: None,
        location: Some("Nairobi".to_owned()),
        seller_id: None,
        seller_name: None,
        created_at: Utc
            .timestamp_opt(1_717_000_000 + i64::try_from(n).expect("small id") * 60, 0)
            .single()
            .expect("valid timestamp"),
        details: ListingDetails::default(),
    }
}

fn products() -> Vec<Listing> {
    vec![
        listing(ListingKind::Product, 1, "Samsung Galaxy A14", ListingStatus::Active),
        listing(ListingKind::Product, 2, "Tecno Spark 20", ListingStatus::Active),
        listing(ListingKind::Product, 3, "Old Radio", ListingStatus::Hidden),
    ]
}

fn services() -> Vec<Listing> {
    vec![
        listing(ListingKind::Service, 4, "Phone Screen Repair", ListingStatus::Active),
        listing(ListingKind::Service, 5, "Laptop Servicing", ListingStatus::Active),
    ]
}

/// One active carrier owned by the shopper.
pub fn carriers() -> Vec<CarrierSummary> {
    vec![CarrierSummary {
        carrier: CarrierProfile {
            id: Uuid::from_u128(0xca),
            user_id: UserId::new(SHOPPER_ID).expect("fixture owner"),
            phone: Some("0712000003".to_owned()),
            station: Some("Westlands".to_owned()),
            tier: CarrierTier::Basic,
            status: CarrierStatus::Active,
            suspended_until: None,
            banned_at: None,
            ban_reason: None,
            created_at: at(3),
        },
        user_email: Email::new("shopper@qwiksale.test").expect("fixture email"),
        user_name: Some("shopper".to_owned()),
    }]
}

/// HTTP state over in-memory adapters, wired through the domain services.
pub fn fixture_state() -> HttpState {
    let directory = Arc::new(FixtureUserDirectory::new(accounts()));
    let admin = Arc::new(AdminService::new(directory.clone(), AdminAllowlist::default()));
    let listings = Arc::new(ListingsService::new(
        Arc::new(FixtureListingSource::new(ListingKind::Product, products())),
        Some(Arc::new(FixtureListingSource::new(
            ListingKind::Service,
            services(),
        ))),
    ));
    let carriers = Arc::new(CarriersService::new(
        Arc::new(FixtureCarrierRepository::new(carriers())),
        Arc::new(DefaultClock),
    ));
    let metrics = Arc::new(MetricsService::new(
        Arc::new(FixtureMetricsSource(MetricCounts {
            users: 4,
            products: 3,
            services: 2,
            carriers: 1,
            active_carriers: 1,
            ..MetricCounts::default()
        })),
        Arc::new(DefaultClock),
    ));

    HttpState {
        login: Arc::new(DirectoryLoginService::new(directory)),
        admin_access: admin.clone(),
        listings: listings.clone(),
        listings_command: listings,
        carriers: carriers.clone(),
        carriers_command: carriers,
        users: admin.clone(),
        users_command: admin,
        metrics,
    }
}

fn session_middleware(key: Key) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// A running marketplace as seen by one browser.
pub struct Marketplace {
    state: HttpState,
    key: Key,
    cookie: Option<Cookie<'static>>,
}

impl Default for Marketplace {
    fn default() -> Self {
        Self::new(fixture_state())
    }
}

impl Marketplace {
    pub fn new(state: HttpState) -> Self {
        Self {
            state,
            key: Key::generate(),
            cookie: None,
        }
    }

    /// Sign in with the development password, keeping the session cookie.
    pub fn sign_in(&mut self, identifier: &str) -> Recorded {
        let payload = serde_json::json!({ "email": identifier, "password": "password" });
        let (recorded, cookie) = self.send(Method::POST, "/api/auth/login", Some(payload));
        if cookie.is_some() {
            self.cookie = cookie;
        }
        recorded
    }

    /// Forget the session cookie.
    pub fn forget_session(&mut self) {
        self.cookie = None;
    }

    pub fn get(&self, uri: &str) -> Recorded {
        self.send(Method::GET, uri, None).0
    }

    pub fn patch(&self, uri: &str, body: Value) -> Recorded {
        self.send(Method::PATCH, uri, Some(body)).0
    }

    pub fn post(&self, uri: &str, body: Option<Value>) -> Recorded {
        self.send(Method::POST, uri, body).0
    }

    fn send(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (Recorded, Option<Cookie<'static>>) {
        let state = self.state.clone();
        let key = self.key.clone();
        let cookie = self.cookie.clone();
        let uri = uri.to_owned();
        actix_rt::System::new().block_on(async move {
            let app = test::init_service(
                App::new()
                    .app_data(web::Data::new(state))
                    .app_data(web::JsonConfig::default().error_handler(json_error_handler))
                    .app_data(web::QueryConfig::default().error_handler(query_error_handler))
                    .wrap(Trace)
                    .service(
                        web::scope("/api")
                            .wrap(session_middleware(key))
                            .configure(configure_api),
                    ),
            )
            .await;

            let mut req = test::TestRequest::default().method(method).uri(&uri);
            if let Some(cookie) = cookie {
                req = req.cookie(cookie);
            }
            if let Some(body) = body {
                req = req.set_json(body);
            }
            let res = test::call_service(&app, req.to_request()).await;

            let header = |name: &str| {
                res.headers()
                    .get(name)
                    .and_then(|value| value.to_str().ok())
                    .map(str::to_owned)
            };
            let status = res.status().as_u16();
            let trace_id = header(TRACE_ID_HEADER);
            let total_count = header("X-Total-Count");
            let cache_control = header("Cache-Control");
            let session = res
                .response()
                .cookies()
                .find(|cookie| cookie.name() == "session" && !cookie.value().is_empty())
                .map(Cookie::into_owned);

            let bytes = test::read_body(res).await;
            let body = if bytes.is_empty() {
                Value::Null
            } else {
                serde_json::from_slice(&bytes).expect("JSON response body")
            };
            (
                Recorded {
                    status,
                    trace_id,
                    total_count,
                    cache_control,
                    body,
                },
                session,
            )
        })
    }
}
