use rusqlite::ffi;
use serde::Serialize;
use serde_json::json;

pub type StoreResult<T> = Result<T, StoreError>;

/// Rows in a dependent table that point at a parent key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DependentRows {
    pub table: &'static str,
    pub column: &'static str,
    pub rows: i64,
}

/// Errors raised by the data-access layer. Every variant leaves the database
/// as it was before the write started.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("duplicate value for {table}({})", .columns.join(", "))]
    Uniqueness { table: String, columns: Vec<String> },

    #[error("{table}.{column} references missing key {key:?}")]
    MissingParent {
        table: &'static str,
        column: &'static str,
        key: String,
    },

    #[error("{table} row {key:?} is still referenced by dependent rows")]
    Restricted {
        table: &'static str,
        key: String,
        dependents: Vec<DependentRows>,
    },

    #[error("foreign key constraint failed: {0}")]
    ForeignKey(String),

    #[error("constraint violated on {table}: {message}")]
    Constraint {
        table: String,
        column: Option<String>,
        message: String,
    },

    #[error("{table} row {key:?} not found")]
    NotFound { table: &'static str, key: String },

    #[error("database error: {0}")]
    Sqlite(rusqlite::Error),
}

/// Error taxonomy exposed to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Uniqueness,
    ReferentialIntegrity,
    Constraint,
    NotFound,
    Storage,
}

impl ErrorKind {
    pub fn code(self) -> &'static str {
        match self {
            ErrorKind::Uniqueness => "uniqueness_violation",
            ErrorKind::ReferentialIntegrity => "referential_integrity_violation",
            ErrorKind::Constraint => "constraint_violation",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Storage => "db_error",
        }
    }
}

impl StoreError {
    pub fn constraint(table: &str, column: &str, message: impl Into<String>) -> Self {
        StoreError::Constraint {
            table: table.to_string(),
            column: Some(column.to_string()),
            message: message.into(),
        }
    }

    pub fn not_found(table: &'static str, key: impl ToString) -> Self {
        StoreError::NotFound {
            table,
            key: key.to_string(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            StoreError::Uniqueness { .. } => ErrorKind::Uniqueness,
            StoreError::MissingParent { .. }
            | StoreError::Restricted { .. }
            | StoreError::ForeignKey(_) => ErrorKind::ReferentialIntegrity,
            StoreError::Constraint { .. } => ErrorKind::Constraint,
            StoreError::NotFound { .. } => ErrorKind::NotFound,
            StoreError::Sqlite(_) => ErrorKind::Storage,
        }
    }

    pub fn details(&self) -> Option<serde_json::Value> {
        match self {
            StoreError::Uniqueness { table, columns } => {
                Some(json!({ "table": table, "columns": columns }))
            }
            StoreError::MissingParent { table, column, key } => {
                Some(json!({ "table": table, "column": column, "key": key }))
            }
            StoreError::Restricted {
                table,
                key,
                dependents,
            } => Some(json!({ "table": table, "key": key, "dependents": dependents })),
            StoreError::Constraint { table, column, .. } => {
                Some(json!({ "table": table, "column": column }))
            }
            StoreError::NotFound { table, key } => Some(json!({ "table": table, "key": key })),
            StoreError::ForeignKey(_) | StoreError::Sqlite(_) => None,
        }
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        let rusqlite::Error::SqliteFailure(failure, message) = &e else {
            return StoreError::Sqlite(e);
        };
        if failure.code != rusqlite::ErrorCode::ConstraintViolation {
            return StoreError::Sqlite(e);
        }
        let message = message.clone().unwrap_or_default();
        match failure.extended_code {
            ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY => {
                let (table, columns) = parse_constrained_columns(&message);
                StoreError::Uniqueness { table, columns }
            }
            ffi::SQLITE_CONSTRAINT_FOREIGNKEY => StoreError::ForeignKey(message),
            ffi::SQLITE_CONSTRAINT_NOTNULL => {
                let (table, columns) = parse_constrained_columns(&message);
                StoreError::Constraint {
                    table,
                    column: columns.into_iter().next(),
                    message,
                }
            }
            ffi::SQLITE_CONSTRAINT_CHECK => StoreError::Constraint {
                table: String::new(),
                column: None,
                message,
            },
            _ => StoreError::Sqlite(e),
        }
    }
}

/// Splits "UNIQUE constraint failed: t.a, t.b" into ("t", ["a", "b"]).
fn parse_constrained_columns(message: &str) -> (String, Vec<String>) {
    let Some((_, list)) = message.split_once(": ") else {
        return (String::new(), Vec::new());
    };
    let mut table = String::new();
    let mut columns = Vec::new();
    for item in list.split(", ") {
        match item.trim().split_once('.') {
            Some((t, c)) => {
                if table.is_empty() {
                    table = t.to_string();
                }
                columns.push(c.to_string());
            }
            None => columns.push(item.trim().to_string()),
        }
    }
    (table, columns)
}
