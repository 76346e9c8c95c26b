//! Admin user management.
//!
//! ```text
//! GET   /api/admin/users?q=jane&role=ADMIN&page=1&pageSize=50
//! PATCH /api/admin/users/{id} {"role":"ADMIN","banned":false}
//! ```

use actix_web::{HttpResponse, get, patch, web};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use crate::domain::{Error, Role, UserAccount, UserChange, UserFilter};
use crate::inbound::http::ApiResult;
use crate::inbound::http::admin_guard::AdminSession;
use crate::inbound::http::cache_control::admin_header;
use crate::inbound::http::paging_headers::flat_page;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    DIRECTORY_PAGE_LIMITS, non_blank, parse_choice, parse_page, parse_user_id,
};

/// Query string for the users listing.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct UserParams {
    /// Case-insensitive match on email, name or username.
    pub q: Option<String>,
    /// `USER`, `ADMIN` or `SUPERADMIN`.
    pub role: Option<String>,
    /// 1-based page number.
    pub page: Option<String>,
    /// Rows per page, default 50.
    pub page_size: Option<String>,
}

/// Partial update body for `PATCH /api/admin/users/{id}`.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UserPatch {
    /// New role; super admins only.
    #[schema(example = "ADMIN")]
    pub role: Option<String>,
    /// Ban or unban.
    pub banned: Option<bool>,
    /// Suspend or reinstate.
    pub suspended: Option<bool>,
}

impl UserPatch {
    fn into_change(self) -> Result<UserChange, Error> {
        Ok(UserChange {
            role: parse_choice::<Role>("role", self.role)?,
            banned: self.banned,
            suspended: self.suspended,
        })
    }
}

/// Newest users first, as a flat array with `X-Total-Count`.
#[utoipa::path(
    get,
    path = "/api/admin/users",
    params(UserParams),
    responses(
        (status = 200, description = "Users on this page", body = [UserAccount],
            headers(("X-Total-Count" = u64, description = "Matching users"))),
        (status = 400, description = "Invalid parameter", body = Error),
        (status = 401, description = "Login required", body = Error),
        (status = 403, description = "Admin access required", body = Error)
    ),
    tags = ["admin"],
    operation_id = "adminListUsers"
)]
#[get("/admin/users")]
pub async fn list_users(
    _admin: AdminSession,
    state: web::Data<HttpState>,
    params: web::Query<UserParams>,
) -> ApiResult<HttpResponse> {
    let UserParams {
        q,
        role,
        page,
        page_size,
    } = params.into_inner();
    let page = parse_page(page.as_deref(), page_size.as_deref(), DIRECTORY_PAGE_LIMITS)?;
    let filter = UserFilter {
        q: non_blank(q),
        role: parse_choice::<Role>("role", role)?,
    };
    let envelope = state.users.list_users(&filter, page).await?;
    Ok(flat_page(envelope))
}

/// Change a user's role or restrictions.
#[utoipa::path(
    patch,
    path = "/api/admin/users/{id}",
    params(("id" = String, Path, description = "User id")),
    request_body = UserPatch,
    responses(
        (status = 200, description = "Updated user", body = UserAccount),
        (status = 400, description = "Empty or invalid change", body = Error),
        (status = 403, description = "Super admin required", body = Error),
        (status = 404, description = "No such user", body = Error),
        (status = 409, description = "Change would lock the caller out", body = Error)
    ),
    tags = ["admin"],
    operation_id = "adminUpdateUser"
)]
#[patch("/admin/users/{id}")]
pub async fn update_user(
    admin: AdminSession,
    state: web::Data<HttpState>,
    path: web::Path<String>,
    patch: web::Json<UserPatch>,
) -> ApiResult<HttpResponse> {
    let target = parse_user_id("id", &path.into_inner())?;
    let change = patch.into_inner().into_change()?;
    let account = state
        .users_command
        .update_user(admin.principal(), &target, change)
        .await?;
    Ok(HttpResponse::Ok().insert_header(admin_header()).json(account))
}

#[cfg(test)]
#[path = "admin_users_tests.rs"]
mod tests;
