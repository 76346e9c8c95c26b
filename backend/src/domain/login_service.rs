//! Sign-in against the user directory.
//!
//! Credential storage is out of scope: every account signs in with
//! [`DEV_PASSWORD`](crate::domain::DEV_PASSWORD). The service still
//! enforces account existence and bans so the session contract matches
//! production.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::admin_service::map_directory_error;
use crate::domain::ports::{LoginService, UserDirectory};
use crate::domain::{Error, LoginCredentials, UserId};

/// [`LoginService`] backed by a [`UserDirectory`].
#[derive(Clone)]
pub struct DirectoryLoginService<R: ?Sized> {
    directory: Arc<R>,
}

impl<R: ?Sized> DirectoryLoginService<R> {
    /// Create the service over a user directory.
    pub fn new(directory: Arc<R>) -> Self {
        Self { directory }
    }
}

#[async_trait]
impl<R> LoginService for DirectoryLoginService<R>
where
    R: UserDirectory + ?Sized,
{
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error> {
        let account = self
            .directory
            .find_by_login(credentials.identifier())
            .await
            .map_err(map_directory_error)?;
        let Some(account) = account.filter(|_| credentials.has_dev_password()) else {
            debug!(identifier = credentials.identifier_str(), "login rejected");
            return Err(Error::unauthorized("invalid credentials"));
        };
        if account.banned {
            return Err(Error::forbidden("account is banned"));
        }
        Ok(account.id)
    }
}
