//! Admin dashboard counts.
//!
//! ```text
//! GET /api/admin/metrics
//! ```

use actix_web::{HttpResponse, get, web};

use crate::domain::{AdminMetrics, Error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::admin_guard::AdminSession;
use crate::inbound::http::cache_control::admin_header;
use crate::inbound::http::state::HttpState;

/// Counts of users, listings, carriers and support activity.
///
/// Counts over tables the deployment does not have are reported as zero.
#[utoipa::path(
    get,
    path = "/api/admin/metrics",
    responses(
        (status = 200, description = "Dashboard counts", body = AdminMetrics),
        (status = 401, description = "Login required", body = Error),
        (status = 403, description = "Admin access required", body = Error),
        (status = 503, description = "Database unavailable", body = Error)
    ),
    tags = ["admin"],
    operation_id = "adminMetrics"
)]
#[get("/admin/metrics")]
pub async fn metrics(_admin: AdminSession, state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let metrics = state.metrics.dashboard().await?;
    Ok(HttpResponse::Ok().insert_header(admin_header()).json(metrics))
}
