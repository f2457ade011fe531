//! Member and policy records for Policydesk.
//!
//! Each operation is a single parameterized statement against the
//! `members` or `policies` table. Updates and deletes are unconditional:
//! they report the number of affected rows and never fail because the id
//! does not exist. Lookups by id return [`RecordError::NotFound`] when the
//! row is absent.

pub mod members;
pub mod policies;

pub use members::{
    create_member, delete_member, get_member, list_members, update_member, Member, MemberFields,
};
pub use policies::{
    create_policy, delete_policy, get_policy, list_policies, update_policy, NewPolicy, Policy,
    PolicyTerms, Stored,
};

use thiserror::Error;

/// Errors that can occur during record operations.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("{kind} not found: {id}")]
    NotFound {
        /// Which kind of record was requested ("member", "policy").
        kind: &'static str,
        id: i64,
    },
}

impl RecordError {
    /// Returns `true` if the error is a SQLite constraint violation
    /// (NOT NULL, UNIQUE, or an enforced foreign key).
    pub fn is_constraint_violation(&self) -> bool {
        match self {
            RecordError::Database(err) => policydesk_db::is_constraint_violation(err),
            RecordError::NotFound { .. } => false,
        }
    }
}
