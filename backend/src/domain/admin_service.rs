//! Admin guard decisions and admin user management.

use std::sync::Arc;

use async_trait::async_trait;
use pagination::{Envelope, PageRequest, SourceSlice};
use tracing::info;

use crate::domain::ports::{
    AdminAccess, AdminUsersCommand, AdminUsersQuery, UserDirectory, UserDirectoryError,
};
use crate::domain::{
    AdminAllowlist, AdminPrincipal, Error, UserAccount, UserChange, UserFilter, UserId,
};

pub(crate) fn map_directory_error(error: UserDirectoryError) -> Error {
    match error {
        UserDirectoryError::Connection { message } => {
            Error::service_unavailable(format!("user directory unavailable: {message}"))
        }
        UserDirectoryError::Query { message } => {
            Error::internal(format!("user directory error: {message}"))
        }
    }
}

/// Service implementing [`AdminAccess`], [`AdminUsersQuery`] and
/// [`AdminUsersCommand`] over a [`UserDirectory`].
#[derive(Clone)]
pub struct AdminService<R: ?Sized> {
    directory: Arc<R>,
    allowlist: AdminAllowlist,
}

impl<R: ?Sized> AdminService<R> {
    /// Create the service with the configured email allowlists.
    pub fn new(directory: Arc<R>, allowlist: AdminAllowlist) -> Self {
        Self {
            directory,
            allowlist,
        }
    }
}

impl<R> AdminService<R>
where
    R: UserDirectory + ?Sized,
{
    async fn load(&self, id: &UserId) -> Result<Option<UserAccount>, Error> {
        self.directory
            .find_by_id(id)
            .await
            .map_err(map_directory_error)
    }
}

#[async_trait]
impl<R> AdminAccess for AdminService<R>
where
    R: UserDirectory + ?Sized,
{
    async fn authorize(&self, user_id: &UserId) -> Result<AdminPrincipal, Error> {
        let user = self
            .load(user_id)
            .await?
            .ok_or_else(|| Error::unauthorized("login required"))?;
        if user.banned {
            return Err(Error::forbidden("account is banned"));
        }
        let level = self
            .allowlist
            .level_for(&user)
            .ok_or_else(|| Error::forbidden("admin access required"))?;
        Ok(AdminPrincipal { user, level })
    }
}

#[async_trait]
impl<R> AdminUsersQuery for AdminService<R>
where
    R: UserDirectory + ?Sized,
{
    async fn list_users(
        &self,
        filter: &UserFilter,
        page: PageRequest,
    ) -> Result<Envelope<UserAccount>, Error> {
        let total = self
            .directory
            .count(filter)
            .await
            .map_err(map_directory_error)?;
        let slice = SourceSlice {
            offset: page.offset(),
            limit: u64::from(page.page_size()),
        };
        let users = if total > slice.offset {
            self.directory
                .list(filter, slice)
                .await
                .map_err(map_directory_error)?
        } else {
            Vec::new()
        };
        Ok(Envelope::new(page, total, users))
    }
}

#[async_trait]
impl<R> AdminUsersCommand for AdminService<R>
where
    R: UserDirectory + ?Sized,
{
    async fn update_user(
        &self,
        actor: &AdminPrincipal,
        target: &UserId,
        change: UserChange,
    ) -> Result<UserAccount, Error> {
        if change.is_empty() {
            return Err(Error::invalid_request(
                "provide at least one of role, banned or suspended",
            ));
        }
        let account = self
            .load(target)
            .await?
            .ok_or_else(|| Error::not_found(format!("user {target} not found")))?;
        let is_self = &actor.user.id == target;

        if change.role.is_some() {
            if !actor.is_super() {
                return Err(Error::forbidden("only a super admin may change roles"));
            }
            if is_self {
                return Err(Error::conflict("you cannot change your own role"));
            }
        }
        if change.restricts() {
            if is_self {
                return Err(Error::conflict("you cannot ban or suspend yourself"));
            }
            if self.allowlist.level_for(&account).is_some() && !actor.is_super() {
                return Err(Error::forbidden(
                    "only a super admin may ban or suspend an admin",
                ));
            }
        }

        let effective = change.without_noops(&account);
        if effective.is_empty() {
            return Ok(account);
        }
        let updated = self
            .directory
            .update(target, effective)
            .await
            .map_err(map_directory_error)?
            .ok_or_else(|| Error::not_found(format!("user {target} not found")))?;
        info!(
            actor = %actor.user.id,
            target = %target,
            role = ?effective.role,
            banned = ?effective.banned,
            suspended = ?effective.suspended,
            "user updated by admin"
        );
        Ok(updated)
    }
}

#[cfg(test)]
#[path = "admin_service_tests.rs"]
mod tests;
