//! Database layer for Policydesk.
//!
//! Provides the SQLite connection pool (via `r2d2`) and the startup schema
//! initializer. All three tables (`users`, `members`, `policies`) live in a
//! single database file on local disk.
//!
//! # Design decisions
//!
//! - **SQLite with WAL mode**: one embedded file, no external database
//!   process. WAL allows concurrent readers with a single writer.
//! - **`r2d2` connection pool**: handlers take a pooled connection per
//!   request instead of sharing a process-wide handle.
//! - **Foreign keys off by default**: the `policies.memberId` reference is
//!   declared but only enforced when [`DbRuntimeSettings::enforce_foreign_keys`]
//!   is set.

mod pool;
mod schema;

pub use pool::{create_pool, DbPool, DbRuntimeSettings, PoolError};
pub use schema::{init_schema, SchemaError, Table, TABLES};

/// Returns `true` if `err` is a SQLite constraint violation
/// (NOT NULL, UNIQUE, or an enforced foreign key).
pub fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.code == rusqlite::ffi::ErrorCode::ConstraintViolation
    )
}
