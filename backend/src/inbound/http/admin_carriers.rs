//! Admin carrier listing and enforcement.
//!
//! ```text
//! GET  /api/admin/carriers?q=nairobi&status=SUSPENDED&tier=GOLD
//! POST /api/admin/carriers/{target}/{action} {"days":3,"reason":"late"}
//! ```
//!
//! `target` is a carrier id, the owner's user id, or the owner's email.
//! `action` is one of `ban`, `unban`, `suspend`, `unsuspend` or `tier`. The
//! body is optional for every action except `tier`.

use actix_web::{HttpResponse, get, post, web};
use serde::Deserialize;
use serde_json::json;
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::EnforcementOutcome;
use crate::domain::{
    CarrierFilter, CarrierStatus, CarrierSummary, CarrierTier, EnforcementAction, Error,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::admin_guard::AdminSession;
use crate::inbound::http::cache_control::admin_header;
use crate::inbound::http::paging_headers::flat_page;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    DIRECTORY_PAGE_LIMITS, ErrorCode, field_error, non_blank, parse_choice, parse_optional_timestamp,
    parse_page,
};

/// Query string for the carriers listing.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct CarrierParams {
    /// Case-insensitive match on owner email, owner name, phone or station.
    pub q: Option<String>,
    /// Effective status: `ACTIVE`, `SUSPENDED` or `BANNED`.
    pub status: Option<String>,
    /// `BASIC`, `GOLD` or `PLATINUM`.
    pub tier: Option<String>,
    /// 1-based page number.
    pub page: Option<String>,
    /// Rows per page, default 50.
    pub page_size: Option<String>,
}

/// Optional body for enforcement actions.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnforcementBody {
    /// Recorded on bans; logged for suspensions.
    pub reason: Option<String>,
    /// RFC 3339 end of a suspension.
    pub until: Option<String>,
    /// Suspension length in days.
    pub days: Option<i64>,
    /// Target tier for the `tier` action.
    pub tier: Option<String>,
}

fn parse_body(raw: &[u8]) -> Result<EnforcementBody, Error> {
    if raw.iter().all(u8::is_ascii_whitespace) {
        return Ok(EnforcementBody::default());
    }
    serde_json::from_slice(raw).map_err(|err| {
        Error::invalid_request("request body is not valid JSON")
            .with_details(json!({ "code": "invalid_json", "reason": err.to_string() }))
    })
}

fn to_action(action: &str, body: EnforcementBody) -> Result<EnforcementAction, Error> {
    let reason = non_blank(body.reason);
    match action.trim().to_ascii_lowercase().as_str() {
        "ban" => Ok(EnforcementAction::Ban { reason }),
        "unban" => Ok(EnforcementAction::Unban),
        "suspend" => Ok(EnforcementAction::Suspend {
            until: parse_optional_timestamp("until", body.until)?,
            days: body.days,
            reason,
        }),
        "unsuspend" => Ok(EnforcementAction::Unsuspend),
        "tier" => parse_choice::<CarrierTier>("tier", body.tier)?
            .map(|tier| EnforcementAction::Tier { tier })
            .ok_or_else(|| field_error("tier", ErrorCode::MissingField, "tier is required")),
        _ => Err(Error::invalid_request(format!("unknown action {action}")).with_details(json!({
            "field": "action",
            "value": action,
            "code": "invalid_value",
        }))),
    }
}

/// Newest carriers first, as a flat array with `X-Total-Count`.
#[utoipa::path(
    get,
    path = "/api/admin/carriers",
    params(CarrierParams),
    responses(
        (status = 200, description = "Carriers on this page", body = [CarrierSummary],
            headers(("X-Total-Count" = u64, description = "Matching carriers"))),
        (status = 400, description = "Invalid parameter", body = Error),
        (status = 401, description = "Login required", body = Error),
        (status = 403, description = "Admin access required", body = Error)
    ),
    tags = ["admin"],
    operation_id = "adminListCarriers"
)]
#[get("/admin/carriers")]
pub async fn list_carriers(
    _admin: AdminSession,
    state: web::Data<HttpState>,
    params: web::Query<CarrierParams>,
) -> ApiResult<HttpResponse> {
    let CarrierParams {
        q,
        status,
        tier,
        page,
        page_size,
    } = params.into_inner();
    let page = parse_page(page.as_deref(), page_size.as_deref(), DIRECTORY_PAGE_LIMITS)?;
    let filter = CarrierFilter {
        q: non_blank(q),
        status: parse_choice::<CarrierStatus>("status", status)?,
        tier: parse_choice::<CarrierTier>("tier", tier)?,
    };
    let envelope = state.carriers.list_carriers(&filter, page).await?;
    Ok(flat_page(envelope))
}

/// Apply an enforcement action to a carrier.
///
/// Repeating an action that is already in effect succeeds with
/// `changed: false`.
#[utoipa::path(
    post,
    path = "/api/admin/carriers/{target}/{action}",
    params(
        ("target" = String, Path, description = "Carrier id, owner id or owner email"),
        ("action" = String, Path, description = "ban, unban, suspend, unsuspend or tier")
    ),
    request_body(content = Option<EnforcementBody>, content_type = "application/json"),
    responses(
        (status = 200, description = "Carrier after the action", body = EnforcementOutcome),
        (status = 400, description = "Unknown action or invalid body", body = Error),
        (status = 404, description = "No such carrier", body = Error),
        (status = 409, description = "Action conflicts with a ban", body = Error)
    ),
    tags = ["admin"],
    operation_id = "adminEnforceCarrier"
)]
#[post("/admin/carriers/{target}/{action}")]
pub async fn enforce(
    _admin: AdminSession,
    state: web::Data<HttpState>,
    path: web::Path<(String, String)>,
    body: web::Bytes,
) -> ApiResult<HttpResponse> {
    let (target, action) = path.into_inner();
    let action = to_action(&action, parse_body(&body)?)?;
    let outcome = state.carriers_command.enforce(&target, action).await?;
    Ok(HttpResponse::Ok().insert_header(admin_header()).json(outcome))
}

#[cfg(test)]
#[path = "admin_carriers_tests.rs"]
mod tests;
