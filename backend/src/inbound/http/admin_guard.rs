//! Admin guard extractor.
//!
//! Handlers that take an [`AdminSession`] only run for signed-in, unbanned
//! users whose role or allowlisted email grants admin access. The check runs
//! through the [`AdminAccess`] port so the guard never touches storage.
//!
//! [`AdminAccess`]: crate::domain::ports::AdminAccess

use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::LocalBoxFuture;
use tracing::debug;

use crate::domain::{AdminPrincipal, Error};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Authorised admin for the current request.
#[derive(Debug, Clone)]
pub struct AdminSession(pub AdminPrincipal);

impl AdminSession {
    /// The authorised principal.
    pub fn principal(&self) -> &AdminPrincipal {
        &self.0
    }
}

impl FromRequest for AdminSession {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let session = SessionContext::from_request(req, payload);
        let state = req.app_data::<web::Data<HttpState>>().cloned();
        let path = req.path().to_owned();
        Box::pin(async move {
            let state = state.ok_or_else(|| Error::internal("HTTP state is not configured"))?;
            let user_id = session.await?.require_user_id()?;
            let principal = state
                .admin_access
                .authorize(&user_id)
                .await
                .inspect_err(|err| debug!(%user_id, %path, error = %err, "admin access denied"))?;
            Ok(Self(principal))
        })
    }
}

#[cfg(test)]
mod tests {
    //! Guard outcomes for each kind of caller.

    use super::*;
    use crate::domain::ports::FIXTURE_ADMIN_ID;
    use crate::inbound::http::test_utils::{accounts, fixture_state, sign_in, test_app};
    use actix_web::http::StatusCode;
    use actix_web::{HttpResponse, test};
    use rstest::rstest;

    async fn guarded(admin: AdminSession) -> HttpResponse {
        HttpResponse::Ok().json(admin.principal().level)
    }

    async fn call_as(user_id: Option<&str>) -> actix_web::dev::ServiceResponse {
        let app = test::init_service(test_app(fixture_state(), |cfg| {
            cfg.route("/guarded", web::get().to(guarded));
        }))
        .await;
        let mut req = test::TestRequest::get().uri("/api/guarded");
        if let Some(id) = user_id {
            req = req.cookie(sign_in(&app, id).await);
        }
        test::call_service(&app, req.to_request()).await
    }

    #[rstest]
    #[case(None, StatusCode::UNAUTHORIZED)]
    #[case(Some("44444444-4444-4444-8444-444444444444"), StatusCode::UNAUTHORIZED)]
    #[case(Some(accounts::PLAIN_USER_ID), StatusCode::FORBIDDEN)]
    #[case(Some(accounts::BANNED_ADMIN_ID), StatusCode::FORBIDDEN)]
    #[case(Some(accounts::ADMIN_ID), StatusCode::OK)]
    #[case(Some(FIXTURE_ADMIN_ID), StatusCode::OK)]
    #[actix_web::test]
    async fn guard_outcomes(#[case] user_id: Option<&str>, #[case] expected: StatusCode) {
        let res = call_as(user_id).await;
        assert_eq!(res.status(), expected);
    }

    #[actix_web::test]
    async fn guard_exposes_the_effective_level() {
        let res = call_as(Some(FIXTURE_ADMIN_ID)).await;
        let level: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(level, serde_json::json!("superAdmin"));
    }
}
