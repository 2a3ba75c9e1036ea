use crate::config::Config;
use crate::schema;
use rusqlite::{Connection, Transaction, TransactionBehavior};
use std::path::Path;

pub fn open_db(workspace: &Path, config: &Config) -> anyhow::Result<Connection> {
    std::fs::create_dir_all(workspace)?;
    let db_path = workspace.join(&config.db_file);
    log::debug!("[open_db] opening {}", db_path.to_string_lossy());
    let conn = Connection::open(db_path)?;
    configure(&conn, config)?;
    init_schema(&conn)?;
    Ok(conn)
}

pub fn configure(conn: &Connection, config: &Config) -> rusqlite::Result<()> {
    conn.pragma_update(None, "foreign_keys", "ON")?;
    conn.busy_timeout(config.busy_timeout)?;
    if config.wal {
        let mode: String =
            conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
        log::trace!("[configure] journal_mode = {mode}");
    }
    Ok(())
}

/// Creates every table, index and the reporting view. Safe to run against a
/// database that already has them.
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?;
    create_all(&tx)?;
    tx.commit()
}

/// Drops the view and every table, dependents first. Safe to run against an
/// empty database.
pub fn drop_schema(conn: &Connection) -> rusqlite::Result<()> {
    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?;
    drop_all(&tx)?;
    tx.commit()
}

/// Drops and recreates the schema in one transaction, leaving empty tables.
pub fn reset_schema(conn: &Connection) -> rusqlite::Result<()> {
    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?;
    drop_all(&tx)?;
    create_all(&tx)?;
    tx.commit()
}

fn create_all(conn: &Connection) -> rusqlite::Result<()> {
    for (table, ddl) in schema::TABLES.iter().zip(schema::table_statements()) {
        log::debug!("[init_schema] creating {table} table...");
        conn.execute(&ddl, [])?;
    }
    for ddl in schema::INDEXES {
        conn.execute(ddl, [])?;
    }
    log::debug!("[init_schema] creating {} view...", schema::VIEW);
    conn.execute(schema::STUDENT_GRADES_VIEW, [])?;
    Ok(())
}

fn drop_all(conn: &Connection) -> rusqlite::Result<()> {
    log::debug!("[drop_schema] dropping {} view...", schema::VIEW);
    conn.execute(&format!("DROP VIEW IF EXISTS {}", schema::VIEW), [])?;
    for table in schema::TABLES.iter().rev() {
        log::debug!("[drop_schema] dropping {table} table...");
        conn.execute(&format!("DROP TABLE IF EXISTS {table}"), [])?;
    }
    Ok(())
}

/// Row count per base table, in dependency order.
pub fn table_counts(conn: &Connection) -> rusqlite::Result<Vec<(&'static str, i64)>> {
    schema::TABLES
        .iter()
        .map(|table| {
            let n: i64 =
                conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |r| r.get(0))?;
            Ok((*table, n))
        })
        .collect()
}

#[cfg(test)]
pub fn open_in_memory() -> Connection {
    let conn = Connection::open_in_memory().expect("open in-memory db");
    let cfg = Config {
        wal: false,
        ..Config::default()
    };
    configure(&conn, &cfg).expect("configure db");
    init_schema(&conn).expect("init schema");
    conn
}
