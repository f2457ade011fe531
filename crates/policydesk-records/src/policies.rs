//! Policies: insurance plans attached to a member.
//!
//! `memberId` is carried through as given. Whether it must name an existing
//! member depends on the connection's `foreign_keys` pragma, which the pool
//! switches off unless [`policydesk_db::DbRuntimeSettings::enforce_foreign_keys`]
//! is set.
//!
//! Reads are lenient about the numeric columns. SQLite keeps text that does
//! not look like a number even in an INTEGER or REAL column, and databases
//! written by earlier clients contain such rows.

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ValueRef};
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

use crate::RecordError;

/// A numeric column as found on disk: the expected type, or the raw text
/// when the stored value could not be read as one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Stored<T> {
    Value(T),
    Text(String),
}

impl<T> From<T> for Stored<T> {
    fn from(value: T) -> Self {
        Stored::Value(value)
    }
}

impl<T: FromSql> FromSql for Stored<T> {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match T::column_result(value) {
            Ok(v) => Ok(Stored::Value(v)),
            Err(FromSqlError::InvalidType) => match value {
                ValueRef::Text(text) => {
                    Ok(Stored::Text(String::from_utf8_lossy(text).into_owned()))
                }
                _ => Err(FromSqlError::InvalidType),
            },
            Err(e) => Err(e),
        }
    }
}

/// A stored policy row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Policy {
    pub id: i64,
    pub member_id: Stored<i64>,
    pub plan_type: Option<String>,
    pub cover_level: Option<Stored<f64>>,
    pub premium: Option<Stored<f64>>,
    pub start_date: Option<String>,
    pub status: Option<String>,
}

/// The columns a policy update overwrites.
///
/// `status` is free text supplied by the caller; there is no lifecycle.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PolicyTerms {
    pub plan_type: Option<String>,
    pub cover_level: Option<f64>,
    pub premium: Option<f64>,
    pub start_date: Option<String>,
    pub status: Option<String>,
}

/// Body of a policy create request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPolicy {
    pub member_id: Option<i64>,
    #[serde(flatten)]
    pub terms: PolicyTerms,
}

const SELECT_POLICY: &str =
    "SELECT id, memberId, planType, coverLevel, premium, startDate, status FROM policies";

/// Lists all policies in storage order.
pub fn list_policies(conn: &Connection) -> Result<Vec<Policy>, RecordError> {
    let mut stmt = conn.prepare(SELECT_POLICY)?;
    let rows = stmt.query_map([], map_row_to_policy)?;
    let mut policies = Vec::new();
    for row in rows {
        policies.push(row?);
    }
    Ok(policies)
}

/// Retrieves a policy by id.
pub fn get_policy(conn: &Connection, id: i64) -> Result<Policy, RecordError> {
    conn.query_row(
        &format!("{SELECT_POLICY} WHERE id = ?1"),
        [id],
        map_row_to_policy,
    )
    .optional()?
    .ok_or(RecordError::NotFound { kind: "policy", id })
}

/// Inserts a policy and returns the generated id.
pub fn create_policy(conn: &Connection, policy: &NewPolicy) -> Result<i64, RecordError> {
    let terms = &policy.terms;
    conn.execute(
        "INSERT INTO policies (memberId, planType, coverLevel, premium, startDate, status)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            policy.member_id,
            terms.plan_type,
            terms.cover_level,
            terms.premium,
            terms.start_date,
            terms.status,
        ],
    )?;
    let id = conn.last_insert_rowid();
    tracing::debug!(policy_id = id, member_id = ?policy.member_id, "created policy");
    Ok(id)
}

/// Overwrites the terms of the policy with `id`. `memberId` is never changed.
///
/// Returns the number of rows changed; `0` means no policy had that id.
pub fn update_policy(
    conn: &Connection,
    id: i64,
    terms: &PolicyTerms,
) -> Result<usize, RecordError> {
    let count = conn.execute(
        "UPDATE policies
         SET planType = ?1, coverLevel = ?2, premium = ?3, startDate = ?4, status = ?5
         WHERE id = ?6",
        params![
            terms.plan_type,
            terms.cover_level,
            terms.premium,
            terms.start_date,
            terms.status,
            id,
        ],
    )?;
    Ok(count)
}

/// Deletes the policy with `id`. Returns the number of rows removed.
pub fn delete_policy(conn: &Connection, id: i64) -> Result<usize, RecordError> {
    let count = conn.execute("DELETE FROM policies WHERE id = ?1", [id])?;
    Ok(count)
}

fn map_row_to_policy(row: &Row) -> rusqlite::Result<Policy> {
    Ok(Policy {
        id: row.get(0)?,
        member_id: row.get(1)?,
        plan_type: row.get(2)?,
        cover_level: row.get(3)?,
        premium: row.get(4)?,
        start_date: row.get(5)?,
        status: row.get(6)?,
    })
}
