//! Driving port behind the admin guard.

use async_trait::async_trait;

use crate::domain::{AdminPrincipal, Error, UserId};

/// Domain use-case port that decides whether a session user is an admin.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AdminAccess: Send + Sync {
    /// Load the user and return their admin level.
    ///
    /// Fails with `unauthorized` when the user no longer exists and with
    /// `forbidden` when they are banned or lack admin rights.
    async fn authorize(&self, user_id: &UserId) -> Result<AdminPrincipal, Error>;
}
