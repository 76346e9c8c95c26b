//! Test helpers for inbound HTTP components.

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpResponse, test, web};

use crate::domain::{Error, UserId};
use crate::inbound::http::error::{json_error_handler, query_error_handler};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

const SIGN_IN_PATH: &str = "/test/sign-in";

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Session cookie set by a response, if any.
pub fn session_cookie<B>(res: &ServiceResponse<B>) -> Option<Cookie<'static>> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
}

async fn sign_in_handler(
    session: SessionContext,
    id: web::Path<String>,
) -> Result<HttpResponse, Error> {
    let id = UserId::new(id.into_inner()).map_err(|err| Error::invalid_request(err.to_string()))?;
    session.persist_user(&id)?;
    Ok(HttpResponse::NoContent().finish())
}

/// App with session middleware, `state`, the extractor error handlers, and
/// the routes registered by `configure` mounted under `/api`.
///
/// `GET /test/sign-in/{user_id}` stores a user id in the session so tests can
/// act as any account without going through the login flow.
pub fn test_app<F>(
    state: HttpState,
    configure: F,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
>
where
    F: FnOnce(&mut web::ServiceConfig),
{
    App::new()
        .app_data(web::Data::new(state))
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .wrap(test_session_middleware())
        .route(
            &format!("{SIGN_IN_PATH}/{{id}}"),
            web::get().to(sign_in_handler),
        )
        .service(web::scope("/api").configure(configure))
}

/// Session cookie for `user_id` issued by the app's sign-in route.
pub async fn sign_in<S>(app: &S, user_id: &str) -> Cookie<'static>
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let res = test::call_service(
        app,
        test::TestRequest::get()
            .uri(&format!("{SIGN_IN_PATH}/{user_id}"))
            .to_request(),
    )
    .await;
    session_cookie(&res).expect("sign-in sets a session cookie")
}

/// Accounts used by handler tests: the fixture super admin, a plain user,
/// a banned admin, and a second admin.
pub mod accounts {
    use chrono::{DateTime, TimeZone, Utc};

    use crate::domain::ports::FixtureUserDirectory;
    use crate::domain::{Email, Role, UserAccount, UserId};

    pub const PLAIN_USER_ID: &str = "11111111-1111-4111-8111-111111111111";
    pub const BANNED_ADMIN_ID: &str = "22222222-2222-4222-8222-222222222222";
    pub const ADMIN_ID: &str = "33333333-3333-4333-8333-333333333333";

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, day, 9, 0, 0)
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

    pub fn all() -> Vec<UserAccount> {
        vec![
            FixtureUserDirectory::fixture_admin().expect("fixture admin"),
            account(PLAIN_USER_ID, "shopper@qwiksale.test", Role::User, false, 3),
            account(BANNED_ADMIN_ID, "former@qwiksale.test", Role::Admin, true, 2),
            account(ADMIN_ID, "moderator@qwiksale.test", Role::Admin, false, 1),
        ]
    }
}

/// Listings used by handler tests: two active products, one hidden product,
/// and one active service.
pub mod listings {
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    use crate::domain::{Listing, ListingDetails, ListingKind, ListingStatus};

    pub fn row(kind: ListingKind, n: u128, status: ListingStatus, price: Option<i32>) -> Listing {
        Listing {
            id: Uuid::from_u128(n),
            kind,
            name: format!("{kind} {n}"),
            category: "Electronics".to_owned(),
            subcategory: "Phones".to_owned(),
            price,
            featured: n == 2,
            status,
            image: None,
            location: Some("Nairobi".to_owned()),
            seller_id: None,
            seller_name: None,
            created_at: Utc
                .timestamp_opt(1_700_000_000 + i64::try_from(n).expect("small id") * 60, 0)
                .single()
                .expect("valid timestamp"),
            details: ListingDetails::default(),
        }
    }

    pub fn products() -> Vec<Listing> {
        vec![
            row(ListingKind::Product, 1, ListingStatus::Active, Some(1_000)),
            row(ListingKind::Product, 2, ListingStatus::Active, Some(5_000)),
            row(ListingKind::Product, 3, ListingStatus::Hidden, Some(2_000)),
        ]
    }

    pub fn services() -> Vec<Listing> {
        vec![row(ListingKind::Service, 4, ListingStatus::Active, None)]
    }
}

/// Carriers used by handler tests: an active carrier owned by the plain
/// user, a banned one owned by the banned admin, and a suspended one owned
/// by the second admin.
pub mod carriers {
    use chrono::{DateTime, TimeZone, Utc};
    use uuid::Uuid;

    use super::accounts::{ADMIN_ID, BANNED_ADMIN_ID, PLAIN_USER_ID};
    use crate::domain::{CarrierProfile, CarrierStatus, CarrierSummary, CarrierTier, Email, UserId};

    pub const ACTIVE_CARRIER: Uuid = Uuid::from_u128(0xc1);
    pub const SUSPENDED_CARRIER: Uuid = Uuid::from_u128(0xc2);
    pub const BANNED_CARRIER: Uuid = Uuid::from_u128(0xc3);

    fn at(year: i32, day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, 5, day, 9, 0, 0)
            .single()
            .expect("valid fixture date")
    }

    fn summary(
        id: Uuid,
        owner: &str,
        email: &str,
        station: &str,
        tier: CarrierTier,
        status: CarrierStatus,
        day: u32,
    ) -> CarrierSummary {
        CarrierSummary {
            carrier: CarrierProfile {
                id,
                user_id: UserId::new(owner).expect("fixture owner"),
                phone: Some(format!("0712{day:06}")),
                station: Some(station.to_owned()),
                tier,
                status,
                suspended_until: (status == CarrierStatus::Suspended).then(|| at(2099, 1)),
                banned_at: (status == CarrierStatus::Banned).then(|| at(2024, day)),
                ban_reason: (status == CarrierStatus::Banned).then(|| "fraud".to_owned()),
                created_at: at(2024, day),
            },
            user_email: Email::new(email).expect("fixture email"),
            user_name: None,
        }
    }

    pub fn rows() -> Vec<CarrierSummary> {
        vec![
            summary(
                ACTIVE_CARRIER,
                PLAIN_USER_ID,
                "shopper@qwiksale.test",
                "Nairobi",
                CarrierTier::Basic,
                CarrierStatus::Active,
                3,
            ),
            summary(
                BANNED_CARRIER,
                BANNED_ADMIN_ID,
                "former@qwiksale.test",
                "Mombasa",
                CarrierTier::Platinum,
                CarrierStatus::Banned,
                2,
            ),
            summary(
                SUSPENDED_CARRIER,
                ADMIN_ID,
                "moderator@qwiksale.test",
                "Kisumu",
                CarrierTier::Gold,
                CarrierStatus::Suspended,
                1,
            ),
        ]
    }
}

/// HTTP state wired to in-memory fixtures through the real domain services.
///
/// Fields are public so a test can swap one port for a mock.
pub fn fixture_state() -> HttpState {
    use std::sync::Arc;

    use mockable::DefaultClock;

    use crate::domain::ports::{
        FixtureCarrierRepository, FixtureListingSource, FixtureMetricsSource,
        FixtureUserDirectory,
    };
    use crate::domain::{
        AdminAllowlist, AdminService, CarriersService, DirectoryLoginService, ListingKind,
        ListingsService, MetricCounts, MetricsService,
    };

    let directory = Arc::new(FixtureUserDirectory::new(accounts::all()));
    let admin = Arc::new(AdminService::new(directory.clone(), AdminAllowlist::default()));
    let listings = Arc::new(ListingsService::new(
        Arc::new(FixtureListingSource::new(
            ListingKind::Product,
            listings::products(),
        )),
        Some(Arc::new(FixtureListingSource::new(
            ListingKind::Service,
            listings::services(),
        ))),
    ));
    let carriers = Arc::new(CarriersService::new(
        Arc::new(FixtureCarrierRepository::new(carriers::rows())),
        Arc::new(DefaultClock),
    ));
    let metrics = Arc::new(MetricsService::new(
        Arc::new(FixtureMetricsSource(MetricCounts {
            users: 4,
            products: 3,
            services: 1,
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
