//! Server construction and middleware wiring.
//!
//! Request flow: [`Trace`] wraps everything, the cookie session wraps only
//! `/api`, and unmatched paths answer with the JSON error shape so clients
//! never have to parse an HTML 404.

mod config;
mod state_builders;

pub use config::{ServerConfig, ServerSettings};

use state_builders::build_http_state;

use actix_session::config::{CookieContentSecurity, PersistentSession};
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Key, SameSite, time::Duration as CookieDuration};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpRequest, HttpResponse, HttpServer, web};

use qwiksale::Trace;
#[cfg(debug_assertions)]
use qwiksale::doc::ApiDoc;
use qwiksale::domain::{ApiResult, Error};
use qwiksale::inbound::http::configure_api;
use qwiksale::inbound::http::error::{json_error_handler, query_error_handler};
use qwiksale::inbound::http::health::{HealthState, live, ready};
use qwiksale::inbound::http::state::HttpState;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

const SESSION_COOKIE: &str = "session";
const SESSION_TTL_HOURS: i64 = 2;

/// Cookie settings shared by every worker.
#[derive(Clone)]
struct SessionCookie {
    key: Key,
    secure: bool,
    same_site: SameSite,
}

impl SessionCookie {
    fn middleware(self) -> SessionMiddleware<CookieSessionStore> {
        SessionMiddleware::builder(CookieSessionStore::default(), self.key)
            .cookie_name(SESSION_COOKIE.to_owned())
            .cookie_path("/".to_owned())
            .cookie_secure(self.secure)
            .cookie_http_only(true)
            .cookie_content_security(CookieContentSecurity::Private)
            .cookie_same_site(self.same_site)
            .session_lifecycle(
                PersistentSession::default().session_ttl(CookieDuration::hours(SESSION_TTL_HOURS)),
            )
            .build()
    }
}

async fn unmatched(req: HttpRequest) -> ApiResult<HttpResponse> {
    Err(Error::not_found(format!("no route for {} {}", req.method(), req.path())))
}

fn build_app(
    health: web::Data<HealthState>,
    http: web::Data<HttpState>,
    cookie: SessionCookie,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let app = App::new()
        .app_data(health)
        .app_data(http)
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .wrap(Trace)
        .service(
            web::scope("/api")
                .wrap(cookie.middleware())
                .configure(configure_api),
        )
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app.default_service(web::to(unmatched))
}

/// Bind the HTTP server and flip readiness once it is listening.
///
/// The HTTP state is built once and shared by every worker. Adapters are
/// Diesel-backed when the config carries a pool and fixtures otherwise.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let http_state = web::Data::new(build_http_state(&config));
    let cookie = SessionCookie {
        key: config.key,
        secure: config.cookie_secure,
        same_site: config.same_site,
    };
    let workers_health = health_state.clone();

    let server = HttpServer::new(move || {
        build_app(workers_health.clone(), http_state.clone(), cookie.clone())
    })
    .bind(config.bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::test;
    use rstest::rstest;
    use serde_json::Value;

    fn fixture_config() -> ServerConfig {
        ServerConfig::new(
            Key::generate(),
            false,
            SameSite::Lax,
            "127.0.0.1:0".parse().expect("socket address"),
        )
    }

    async fn call(path: &str) -> (StatusCode, Value) {
        let config = fixture_config();
        let http = build_http_state(&config);
        let app = test::init_service(build_app(
            web::Data::new(HealthState::new()),
            web::Data::new(http),
            SessionCookie {
                key: config.key,
                secure: false,
                same_site: SameSite::Lax,
            },
        ))
        .await;
        let res = test::call_service(&app, test::TestRequest::get().uri(path).to_request()).await;
        let status = res.status();
        let body = test::read_body(res).await;
        (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
    }

    #[rstest]
    #[actix_web::test]
    async fn unknown_paths_answer_with_json_errors() {
        let (status, body) = call("/api/nowhere").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.get("code").and_then(Value::as_str), Some("not_found"));
        assert!(body.get("traceId").is_some());
    }

    #[rstest]
    #[actix_web::test]
    async fn public_search_is_served_in_fixture_mode() {
        let (status, body) = call("/api/products?pageSize=1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.get("pageSize").and_then(Value::as_u64), Some(1));
    }
}
