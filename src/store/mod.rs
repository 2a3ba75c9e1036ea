//! Typed access to the school record tables.
//!
//! Every mutating function runs in its own transaction: a rejected write or a
//! failed cascade leaves the database untouched.

pub mod classes;
pub mod parents;
pub mod reports;
pub mod results;
pub mod students;
pub mod subjects;
pub mod teachers;
pub mod tutors;
pub mod users;

use rusqlite::{Connection, OptionalExtension, Transaction, TransactionBehavior};
use serde::Serialize;

use crate::error::{DependentRows, StoreError, StoreResult};

/// What a delete removed: the row itself plus rows removed by cascade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteSummary {
    pub table: &'static str,
    pub key: String,
    pub cascaded: Vec<DependentRows>,
}

impl DeleteSummary {
    #[cfg(test)]
    pub fn cascaded_rows(&self, table: &str) -> i64 {
        self.cascaded
            .iter()
            .filter(|d| d.table == table)
            .map(|d| d.rows)
            .sum()
    }
}

/// A dependent edge and the query that counts rows on it for one parent key.
pub(crate) struct DependentEdge {
    pub table: &'static str,
    pub column: &'static str,
    pub count_sql: &'static str,
}

pub(crate) fn require_text(table: &str, column: &str, value: &str) -> StoreResult<()> {
    if value.trim().is_empty() {
        return Err(StoreError::constraint(
            table,
            column,
            format!("{column} is required"),
        ));
    }
    Ok(())
}

/// Text primary keys are stored and looked up verbatim, so padding is refused
/// rather than silently kept.
pub(crate) fn require_key(table: &str, column: &str, value: &str) -> StoreResult<()> {
    require_text(table, column, value)?;
    if value.trim() != value {
        return Err(StoreError::constraint(
            table,
            column,
            format!("{column} must not start or end with whitespace"),
        ));
    }
    Ok(())
}

/// Takes the write lock at BEGIN. A second writer then waits out the busy
/// timeout and re-reads, instead of failing on a stale read snapshot.
pub(crate) fn write_tx(conn: &Connection) -> rusqlite::Result<Transaction<'_>> {
    Transaction::new_unchecked(conn, TransactionBehavior::Immediate)
}

/// Fails with `MissingParent` unless `parent_table` has a row keyed `key`.
pub(crate) fn require_parent(
    conn: &Connection,
    table: &'static str,
    column: &'static str,
    parent_table: &'static str,
    parent_key: &'static str,
    key: &str,
) -> StoreResult<()> {
    let found: Option<i64> = conn
        .query_row(
            &format!("SELECT 1 FROM {parent_table} WHERE {parent_key} = ?"),
            [key],
            |r| r.get(0),
        )
        .optional()?;
    if found.is_none() {
        log::warn!("[require_parent] {table}.{column} -> {parent_table}({key}) does not exist");
        return Err(StoreError::MissingParent {
            table,
            column,
            key: key.to_string(),
        });
    }
    Ok(())
}

pub(crate) fn row_exists(
    conn: &Connection,
    table: &'static str,
    key_column: &'static str,
    key: &str,
) -> StoreResult<bool> {
    Ok(conn
        .prepare(&format!("SELECT 1 FROM {table} WHERE {key_column} = ?"))?
        .exists([key])?)
}

/// Counts rows on each edge for `key`, dropping edges with no rows.
pub(crate) fn count_dependents(
    conn: &Connection,
    key: &str,
    edges: &[DependentEdge],
) -> StoreResult<Vec<DependentRows>> {
    let mut out = Vec::new();
    for edge in edges {
        let rows: i64 = conn.query_row(edge.count_sql, [key], |r| r.get(0))?;
        if rows > 0 {
            out.push(DependentRows {
                table: edge.table,
                column: edge.column,
                rows,
            });
        }
    }
    Ok(out)
}

/// Deletes `key` from `table`, letting the engine cascade along `edges`.
/// The counts are taken in the same transaction as the delete.
pub(crate) fn delete_cascading(
    conn: &Connection,
    table: &'static str,
    key_column: &'static str,
    key: &str,
    edges: &[DependentEdge],
) -> StoreResult<DeleteSummary> {
    let tx = write_tx(conn)?;
    if !row_exists(&tx, table, key_column, key)? {
        return Err(StoreError::not_found(table, key));
    }
    let cascaded = count_dependents(&tx, key, edges)?;
    tx.execute(&format!("DELETE FROM {table} WHERE {key_column} = ?"), [key])?;
    tx.commit()?;

    for d in &cascaded {
        log::info!(
            "[delete] {table}({key}) cascaded to {} {} row(s) via {}",
            d.rows,
            d.table,
            d.column
        );
    }
    log::info!("[delete] {table}({key}) deleted");

    Ok(DeleteSummary {
        table,
        key: key.to_string(),
        cascaded,
    })
}
