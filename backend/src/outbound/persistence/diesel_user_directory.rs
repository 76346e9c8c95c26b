//! PostgreSQL-backed user directory.

use async_trait::async_trait;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use pagination::SourceSlice;

use crate::domain::ports::{UserDirectory, UserDirectoryError};
use crate::domain::{LoginIdentifier, UserAccount, UserChange, UserFilter, UserId};

use super::diesel_helpers::{
    collect_rows, contains_pattern, count_total, map_diesel_error, map_pool_error, offset_limit,
};
use super::models::{UserChangeset, UserRow};
use super::pool::DbPool;
use super::schema::users;

/// Diesel implementation of [`UserDirectory`].
#[derive(Clone)]
pub struct DieselUserDirectory {
    pool: DbPool,
}

impl DieselUserDirectory {
    /// Create a directory over the given pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn diesel_error(operation: &'static str) -> impl FnOnce(diesel::result::Error) -> UserDirectoryError {
    move |error| {
        map_diesel_error(
            error,
            operation,
            UserDirectoryError::query,
            UserDirectoryError::connection,
        )
    }
}

fn to_account(row: UserRow) -> Result<UserAccount, UserDirectoryError> {
    UserAccount::try_from(row).map_err(UserDirectoryError::query)
}

fn filtered(filter: &UserFilter) -> users::BoxedQuery<'static, Pg> {
    let mut query = users::table.into_boxed();
    if let Some(role) = filter.role {
        query = query.filter(users::role.eq(role.as_str()));
    }
    if let Some(needle) = filter.q.as_deref() {
        let pattern = contains_pattern(needle);
        query = query.filter(
            users::email
                .ilike(pattern.clone())
                .or(users::name.assume_not_null().ilike(pattern.clone()))
                .or(users::username.assume_not_null().ilike(pattern)),
        );
    }
    query
}

#[async_trait]
impl UserDirectory for DieselUserDirectory {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserAccount>, UserDirectoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, UserDirectoryError::connection))?;
        users::table
            .find(*id.as_uuid())
            .select(UserRow::as_select())
            .first::<UserRow>(&mut conn)
            .await
            .optional()
            .map_err(diesel_error("find user by id"))?
            .map(to_account)
            .transpose()
    }

    async fn find_by_login(
        &self,
        identifier: &LoginIdentifier,
    ) -> Result<Option<UserAccount>, UserDirectoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, UserDirectoryError::connection))?;
        let query = match identifier {
            LoginIdentifier::Email(email) => users::table
                .filter(users::email.eq(email.as_ref().to_owned()))
                .into_boxed(),
            LoginIdentifier::Username(username) => users::table
                .filter(users::username.eq(username.clone()))
                .into_boxed(),
        };
        query
            .select(UserRow::as_select())
            .first::<UserRow>(&mut conn)
            .await
            .optional()
            .map_err(diesel_error("find user by login"))?
            .map(to_account)
            .transpose()
    }

    async fn list(
        &self,
        filter: &UserFilter,
        slice: SourceSlice,
    ) -> Result<Vec<UserAccount>, UserDirectoryError> {
        let (offset, limit) = offset_limit(slice);
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, UserDirectoryError::connection))?;
        let rows = filtered(filter)
            .order((users::created_at.desc(), users::id.desc()))
            .offset(offset)
            .limit(limit)
            .select(UserRow::as_select())
            .load::<UserRow>(&mut conn)
            .await
            .map_err(diesel_error("list users"))?;
        collect_rows(
            rows.into_iter().map(UserAccount::try_from),
            UserDirectoryError::query,
        )
    }

    async fn count(&self, filter: &UserFilter) -> Result<u64, UserDirectoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, UserDirectoryError::connection))?;
        filtered(filter)
            .count()
            .get_result::<i64>(&mut conn)
            .await
            .map(count_total)
            .map_err(diesel_error("count users"))
    }

    async fn update(
        &self,
        id: &UserId,
        change: UserChange,
    ) -> Result<Option<UserAccount>, UserDirectoryError> {
        let changeset = UserChangeset {
            role: change.role.map(|role| role.as_str()),
            banned: change.banned,
            suspended: change.suspended,
        };
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, UserDirectoryError::connection))?;
        diesel::update(users::table.find(*id.as_uuid()))
            .set(&changeset)
            .returning(UserRow::as_returning())
            .get_result::<UserRow>(&mut conn)
            .await
            .optional()
            .map_err(diesel_error("update user"))?
            .map(to_account)
            .transpose()
    }
}
