//! Driving port for the admin users listing.

use async_trait::async_trait;
use pagination::{Envelope, PageRequest};

use crate::domain::{Error, UserAccount, UserFilter};

/// Domain use-case port for listing user accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AdminUsersQuery: Send + Sync {
    /// One page of accounts, newest first.
    async fn list_users(
        &self,
        filter: &UserFilter,
        page: PageRequest,
    ) -> Result<Envelope<UserAccount>, Error>;
}
