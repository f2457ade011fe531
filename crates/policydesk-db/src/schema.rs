//! Startup schema initializer.
//!
//! Each table is created with `CREATE TABLE IF NOT EXISTS`, so running the
//! initializer on every start is safe. Tables are attempted independently:
//! one failing statement does not stop the others.

use rusqlite::Connection;
use thiserror::Error;

/// A single table definition.
pub struct Table {
    /// Table name, used in logs and error reports.
    pub name: &'static str,
    /// DDL executed at startup.
    pub sql: &'static str,
}

/// All tables in creation order.
pub const TABLES: &[Table] = &[
    Table {
        name: "users",
        sql: "CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            email TEXT UNIQUE NOT NULL,
            password TEXT NOT NULL
        )",
    },
    Table {
        name: "members",
        sql: "CREATE TABLE IF NOT EXISTS members (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            idNumber TEXT UNIQUE NOT NULL,
            address TEXT
        )",
    },
    Table {
        name: "policies",
        sql: "CREATE TABLE IF NOT EXISTS policies (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            memberId INTEGER NOT NULL,
            planType TEXT,
            coverLevel REAL,
            premium REAL,
            startDate TEXT,
            status TEXT,
            FOREIGN KEY(memberId) REFERENCES members(id)
        )",
    },
];

/// A table whose DDL failed to execute.
#[derive(Debug, Error)]
#[error("failed to create table '{table}': {source}")]
pub struct SchemaError {
    /// The table that could not be created.
    pub table: &'static str,
    /// The underlying SQLite error.
    pub source: rusqlite::Error,
}

/// Ensures every table in [`TABLES`] exists.
///
/// Returns one [`SchemaError`] per table that could not be created. An empty
/// vector means the schema is complete. Callers decide whether a partial
/// schema is fatal; the server logs and keeps running.
pub fn init_schema(conn: &Connection) -> Vec<SchemaError> {
    init_tables(conn, TABLES)
}

fn init_tables(conn: &Connection, tables: &[Table]) -> Vec<SchemaError> {
    let mut failures = Vec::new();

    for table in tables {
        match conn.execute_batch(table.sql) {
            Ok(()) => tracing::debug!(table = table.name, "table ready"),
            Err(source) => {
                tracing::error!(table = table.name, error = %source, "table creation failed");
                failures.push(SchemaError {
                    table: table.name,
                    source,
                });
            }
        }
    }

    failures
}
