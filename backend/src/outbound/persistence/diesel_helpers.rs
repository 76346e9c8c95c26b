//! Shared helpers for the Diesel adapters.
//!
//! Every adapter maps pool and Diesel failures into its own port error, so
//! the mapping functions take constructors instead of naming an error type.
//! Failures are logged at `debug` here; services decide what reaches the
//! client.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::sql_types::{Bool, Text};
use diesel::QueryableByName;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use pagination::SourceSlice;
use tracing::debug;

use super::pool::{DbPool, PoolError};

/// Map a pool error through the port's connection constructor.
pub(crate) fn map_pool_error<E>(error: PoolError, connection: impl FnOnce(String) -> E) -> E {
    connection(error.into_message())
}

/// Map a Diesel error through the port's query or connection constructor.
pub(crate) fn map_diesel_error<E>(
    error: DieselError,
    operation: &'static str,
    query: impl FnOnce(String) -> E,
    connection: impl FnOnce(String) -> E,
) -> E {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), operation, "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            error = %error,
            operation,
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => query(format!("{operation}: record not found")),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, info) => {
            connection(format!("{operation}: {}", info.message()))
        }
        DieselError::DatabaseError(_, info) => query(format!("{operation}: {}", info.message())),
        other => query(format!("{operation}: {other}")),
    }
}

/// Relation named by a PostgreSQL "relation does not exist" error.
///
/// Diesel reports SQLSTATE `42P01` as an unknown database error, so the
/// message is the only signal.
pub(crate) fn missing_relation(error: &DieselError) -> Option<String> {
    let DieselError::DatabaseError(_, info) = error else {
        return None;
    };
    let message = info.message();
    let rest = message.strip_prefix("relation \"")?;
    let (relation, tail) = rest.split_once('"')?;
    tail.trim_start()
        .starts_with("does not exist")
        .then(|| relation.to_owned())
}

/// Collect row conversion results, mapping the first error through `map_err`.
pub(crate) fn collect_rows<T, E>(
    results: impl Iterator<Item = Result<T, String>>,
    map_err: impl FnOnce(String) -> E,
) -> Result<Vec<T>, E> {
    results.collect::<Result<Vec<_>, _>>().map_err(map_err)
}

fn escape_like(value: &str, pattern: &mut String) {
    for ch in value.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
}

/// `ILIKE` pattern matching `needle` anywhere, with wildcards escaped.
pub(crate) fn contains_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    escape_like(needle, &mut pattern);
    pattern.push('%');
    pattern
}

/// `ILIKE` pattern matching `value` exactly, ignoring case.
pub(crate) fn exact_pattern(value: &str) -> String {
    let mut pattern = String::with_capacity(value.len());
    escape_like(value, &mut pattern);
    pattern
}

/// `OFFSET` and `LIMIT` values for a slice, saturating at `i64::MAX`.
pub(crate) fn offset_limit(slice: SourceSlice) -> (i64, i64) {
    (
        i64::try_from(slice.offset).unwrap_or(i64::MAX),
        i64::try_from(slice.limit).unwrap_or(i64::MAX),
    )
}

/// `COUNT(*)` result as an unsigned total.
pub(crate) fn count_total(count: i64) -> u64 {
    u64::try_from(count).unwrap_or(0)
}

#[derive(QueryableByName)]
struct RelationProbe {
    #[diesel(sql_type = Bool)]
    present: bool,
}

/// Whether `table` exists in the connection's search path.
pub(crate) async fn table_exists(
    conn: &mut AsyncPgConnection,
    table: &str,
) -> Result<bool, DieselError> {
    diesel::sql_query("SELECT to_regclass($1) IS NOT NULL AS present")
        .bind::<Text, _>(table)
        .get_result::<RelationProbe>(conn)
        .await
        .map(|probe| probe.present)
}

/// Whether `table` exists, checked on a pooled connection.
///
/// Used at startup to decide which optional adapters to wire.
///
/// # Errors
///
/// Returns [`PoolError::Checkout`] when no connection is available and
/// [`PoolError::Probe`] when the lookup itself fails.
pub async fn probe_table(pool: &DbPool, table: &str) -> Result<bool, PoolError> {
    let mut conn = pool.get().await?;
    table_exists(&mut conn, table)
        .await
        .map_err(|err| PoolError::Probe {
            message: err.to_string(),
        })
}
