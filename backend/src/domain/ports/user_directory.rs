//! Driven port for reading and updating user accounts.

use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pagination::SourceSlice;

use crate::domain::{Email, LoginIdentifier, Role, UserAccount, UserChange, UserFilter, UserId};

use super::define_port_error;

/// Identifier of the account the fixture directory always contains.
pub const FIXTURE_ADMIN_ID: &str = "123e4567-e89b-12d3-a456-426614174000";

define_port_error! {
    /// Errors raised by user directory adapters.
    pub enum UserDirectoryError {
        /// Connection could not be established.
        Connection { message: String } => "user directory connection failed: {message}",
        /// Query failed during execution or returned malformed rows.
        Query { message: String } => "user directory query failed: {message}",
    }
}

/// Port for user account lookups and admin updates.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Fetch an account by id.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserAccount>, UserDirectoryError>;

    /// Fetch an account by email (case-insensitive) or username (exact).
    async fn find_by_login(
        &self,
        identifier: &LoginIdentifier,
    ) -> Result<Option<UserAccount>, UserDirectoryError>;

    /// Accounts matching `filter`, newest first, restricted to `slice`.
    async fn list(
        &self,
        filter: &UserFilter,
        slice: SourceSlice,
    ) -> Result<Vec<UserAccount>, UserDirectoryError>;

    /// Number of accounts matching `filter`.
    async fn count(&self, filter: &UserFilter) -> Result<u64, UserDirectoryError>;

    /// Apply `change` and return the updated account, or `None` if absent.
    async fn update(
        &self,
        id: &UserId,
        change: UserChange,
    ) -> Result<Option<UserAccount>, UserDirectoryError>;
}

/// In-memory directory used when no database is configured.
///
/// The default instance holds a single super admin, `admin@qwiksale.test`
/// (username `admin`), with id [`FIXTURE_ADMIN_ID`].
#[derive(Debug)]
pub struct FixtureUserDirectory {
    accounts: RwLock<Vec<UserAccount>>,
}

impl FixtureUserDirectory {
    /// Directory over the given accounts.
    pub fn new(accounts: Vec<UserAccount>) -> Self {
        Self {
            accounts: RwLock::new(accounts),
        }
    }

    /// The account the default directory contains.
    pub fn fixture_admin() -> Result<UserAccount, UserDirectoryError> {
        let id = UserId::new(FIXTURE_ADMIN_ID)
            .map_err(|err| UserDirectoryError::query(format!("invalid fixture user id: {err}")))?;
        let email = Email::new("admin@qwiksale.test")
            .map_err(|err| UserDirectoryError::query(format!("invalid fixture email: {err}")))?;
        Ok(UserAccount {
            id,
            email,
            name: Some("QwikSale Admin".to_owned()),
            username: Some("admin".to_owned()),
            role: Role::SuperAdmin,
            banned: false,
            suspended: false,
            created_at: DateTime::<Utc>::UNIX_EPOCH,
        })
    }

    fn read(&self) -> Result<Vec<UserAccount>, UserDirectoryError> {
        self.accounts
            .read()
            .map(|accounts| accounts.clone())
            .map_err(|_| UserDirectoryError::query("fixture directory lock poisoned"))
    }

    fn matching(&self, filter: &UserFilter) -> Result<Vec<UserAccount>, UserDirectoryError> {
        let needle = filter.q.as_deref().map(str::to_lowercase);
        let mut accounts: Vec<UserAccount> = self
            .read()?
            .into_iter()
            .filter(|account| filter.role.is_none_or(|role| role == account.role))
            .filter(|account| {
                needle.as_deref().is_none_or(|needle| {
                    let haystack = [
                        Some(account.email.as_ref()),
                        account.name.as_deref(),
                        account.username.as_deref(),
                    ];
                    haystack
                        .into_iter()
                        .flatten()
                        .any(|field| field.to_lowercase().contains(needle))
                })
            })
            .collect();
        accounts.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.as_uuid().cmp(a.id.as_uuid()))
        });
        Ok(accounts)
    }
}

impl Default for FixtureUserDirectory {
    fn default() -> Self {
        Self::new(Self::fixture_admin().into_iter().collect())
    }
}

#[async_trait]
impl UserDirectory for FixtureUserDirectory {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserAccount>, UserDirectoryError> {
        Ok(self.read()?.into_iter().find(|account| &account.id == id))
    }

    async fn find_by_login(
        &self,
        identifier: &LoginIdentifier,
    ) -> Result<Option<UserAccount>, UserDirectoryError> {
        Ok(self.read()?.into_iter().find(|account| match identifier {
            LoginIdentifier::Email(email) => &account.email == email,
            LoginIdentifier::Username(name) => account.username.as_deref() == Some(name.as_str()),
        }))
    }

    async fn list(
        &self,
        filter: &UserFilter,
        slice: SourceSlice,
    ) -> Result<Vec<UserAccount>, UserDirectoryError> {
        let skip = usize::try_from(slice.offset).unwrap_or(usize::MAX);
        let take = usize::try_from(slice.limit).unwrap_or(usize::MAX);
        Ok(self
            .matching(filter)?
            .into_iter()
            .skip(skip)
            .take(take)
            .collect())
    }

    async fn count(&self, filter: &UserFilter) -> Result<u64, UserDirectoryError> {
        Ok(u64::try_from(self.matching(filter)?.len()).unwrap_or(u64::MAX))
    }

    async fn update(
        &self,
        id: &UserId,
        change: UserChange,
    ) -> Result<Option<UserAccount>, UserDirectoryError> {
        let mut accounts = self
            .accounts
            .write()
            .map_err(|_| UserDirectoryError::query("fixture directory lock poisoned"))?;
        let Some(account) = accounts.iter_mut().find(|account| &account.id == id) else {
            return Ok(None);
        };
        if let Some(role) = change.role {
            account.role = role;
        }
        if let Some(banned) = change.banned {
            account.banned = banned;
        }
        if let Some(suspended) = change.suspended {
            account.suspended = suspended;
        }
        Ok(Some(account.clone()))
    }
}
