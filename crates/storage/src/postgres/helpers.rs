//! Shared helpers for PostgreSQL queries and row conversion.

use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use todo_core::error::StorageError;
use todo_core::ports::OrderDirection;

/// Map a failed INSERT/UPDATE, keeping constraint violations distinct.
pub fn map_write_error(e: sqlx::Error) -> StorageError {
    if let sqlx::Error::Database(db) = &e
        && (db.is_unique_violation() || db.is_foreign_key_violation() || db.is_check_violation())
    {
        return StorageError::ConstraintViolation(db.message().to_string());
    }
    StorageError::QueryError(e.to_string())
}

/// Append the keyset window to a `SELECT ... WHERE ...` statement.
///
/// Rows are ordered by `(sort_column, id)` in `direction` and must come
/// strictly after the cursor row. The cursor's key is looked up by id in
/// a subquery: if that row is gone the comparison is NULL and nothing is
/// returned.
///
/// SAFETY: `table` and `sort_column` come from closed sort-key enums,
/// never from user input. The cursor id and the limit are bound.
pub fn push_keyset_window(
    qb: &mut QueryBuilder<'_, Postgres>,
    table: &'static str,
    sort_column: &'static str,
    direction: OrderDirection,
    after: Option<Uuid>,
    limit: usize,
) {
    let dir = direction.as_sql();

    if let Some(id) = after {
        let op = if direction.is_descending() { "<" } else { ">" };
        qb.push(format!(
            " AND ({sort_column}, id) {op} (SELECT {sort_column}, id FROM {table} WHERE id = "
        ));
        qb.push_bind(id);
        qb.push(")");
    }

    qb.push(format!(" ORDER BY {sort_column} {dir}, id {dir} LIMIT "));
    qb.push_bind(i64::try_from(limit).unwrap_or(i64::MAX));
}
