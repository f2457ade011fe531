//! Members: people enrolled in the scheme, keyed by a unique ID number.

use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

use crate::RecordError;

/// A stored member row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: i64,
    pub name: String,
    /// External identification number, unique across members.
    pub id_number: String,
    pub address: Option<String>,
}

/// Writable member fields, used for both create and full-row update.
///
/// Every field is optional here; the table's NOT NULL and UNIQUE
/// constraints are the only validation applied.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberFields {
    pub name: Option<String>,
    pub id_number: Option<String>,
    pub address: Option<String>,
}

/// Lists all members in storage order.
pub fn list_members(conn: &Connection) -> Result<Vec<Member>, RecordError> {
    let mut stmt = conn.prepare("SELECT id, name, idNumber, address FROM members")?;
    let rows = stmt.query_map([], map_row_to_member)?;
    let mut members = Vec::new();
    for row in rows {
        members.push(row?);
    }
    Ok(members)
}

/// Retrieves a member by id.
pub fn get_member(conn: &Connection, id: i64) -> Result<Member, RecordError> {
    conn.query_row(
        "SELECT id, name, idNumber, address FROM members WHERE id = ?1",
        [id],
        map_row_to_member,
    )
    .optional()?
    .ok_or(RecordError::NotFound { kind: "member", id })
}

/// Inserts a member and returns the generated id.
pub fn create_member(conn: &Connection, fields: &MemberFields) -> Result<i64, RecordError> {
    conn.execute(
        "INSERT INTO members (name, idNumber, address) VALUES (?1, ?2, ?3)",
        params![fields.name, fields.id_number, fields.address],
    )?;
    let id = conn.last_insert_rowid();
    tracing::debug!(member_id = id, "created member");
    Ok(id)
}

/// Overwrites every writable column of the member with `id`.
///
/// Returns the number of rows changed; `0` means no member had that id.
pub fn update_member(
    conn: &Connection,
    id: i64,
    fields: &MemberFields,
) -> Result<usize, RecordError> {
    let count = conn.execute(
        "UPDATE members SET name = ?1, idNumber = ?2, address = ?3 WHERE id = ?4",
        params![fields.name, fields.id_number, fields.address, id],
    )?;
    Ok(count)
}

/// Deletes the member with `id`. Returns the number of rows removed.
///
/// Policies referencing the member are left in place.
pub fn delete_member(conn: &Connection, id: i64) -> Result<usize, RecordError> {
    let count = conn.execute("DELETE FROM members WHERE id = ?1", [id])?;
    Ok(count)
}

fn map_row_to_member(row: &Row) -> rusqlite::Result<Member> {
    Ok(Member {
        id: row.get(0)?,
        name: row.get(1)?,
        id_number: row.get(2)?,
        address: row.get(3)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::setup;

    fn fields(name: &str, id_number: &str, address: Option<&str>) -> MemberFields {
        MemberFields {
            name: Some(name.to_string()),
            id_number: Some(id_number.to_string()),
            address: address.map(str::to_string),
        }
    }

    #[test]
    fn create_then_get_returns_submitted_fields() {
        let conn = setup();
        let id = create_member(&conn, &fields("Jane Doe", "ID-001", Some("12 Main St"))).unwrap();

        let member = get_member(&conn, id).unwrap();
        assert_eq!(
            member,
            Member {
                id,
                name: "Jane Doe".into(),
                id_number: "ID-001".into(),
                address: Some("12 Main St".into()),
            }
        );
    }

    #[test]
    fn duplicate_id_number_violates_constraint() {
        let conn = setup();
        create_member(&conn, &fields("A", "A123", None)).unwrap();

        let err = create_member(&conn, &fields("B", "A123", None)).unwrap_err();
        assert!(err.is_constraint_violation(), "got {err:?}");
        assert_eq!(list_members(&conn).unwrap().len(), 1);
    }

    #[test]
    fn missing_name_violates_not_null() {
        let conn = setup();
        let err = create_member(
            &conn,
            &MemberFields {
                name: None,
                id_number: Some("X".into()),
                address: None,
            },
        )
        .unwrap_err();
        assert!(err.is_constraint_violation());
    }

    #[test]
    fn list_returns_storage_order() {
        let conn = setup();
        let a = create_member(&conn, &fields("Zed", "Z-1", None)).unwrap();
        let b = create_member(&conn, &fields("Amy", "A-1", None)).unwrap();

        let ids: Vec<i64> = list_members(&conn).unwrap().iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![a, b]);
    }

    #[test]
    fn get_missing_member_is_not_found() {
        let conn = setup();
        let err = get_member(&conn, 42).unwrap_err();
        assert!(matches!(err, RecordError::NotFound { kind: "member", id: 42 }));
    }

    #[test]
    fn update_overwrites_every_column() {
        let conn = setup();
        let id = create_member(&conn, &fields("Old", "OLD-1", Some("Somewhere"))).unwrap();

        let changed = update_member(&conn, id, &fields("New", "NEW-1", None)).unwrap();
        assert_eq!(changed, 1);

        let member = get_member(&conn, id).unwrap();
        assert_eq!(member.name, "New");
        assert_eq!(member.id_number, "NEW-1");
        assert_eq!(member.address, None);
    }

    #[test]
    fn update_missing_member_changes_nothing() {
        let conn = setup();
        let changed = update_member(&conn, 7, &fields("Ghost", "G-1", None)).unwrap();
        assert_eq!(changed, 0);
        assert!(list_members(&conn).unwrap().is_empty());
    }

    #[test]
    fn delete_is_repeatable() {
        let conn = setup();
        let id = create_member(&conn, &fields("Gone", "G-2", None)).unwrap();

        assert_eq!(delete_member(&conn, id).unwrap(), 1);
        assert_eq!(delete_member(&conn, id).unwrap(), 0);
        assert!(matches!(
            get_member(&conn, id),
            Err(RecordError::NotFound { .. })
        ));
    }
}
