//! Driving port for admin changes to user accounts.

use async_trait::async_trait;

use crate::domain::{AdminPrincipal, Error, UserAccount, UserChange, UserId};

/// Domain use-case port for role, ban and suspension changes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AdminUsersCommand: Send + Sync {
    /// Apply `change` to `target` on behalf of `actor`.
    async fn update_user(
        &self,
        actor: &AdminPrincipal,
        target: &UserId,
        change: UserChange,
    ) -> Result<UserAccount, Error>;
}
