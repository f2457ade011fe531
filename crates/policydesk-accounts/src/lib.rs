//! User accounts for Policydesk.
//!
//! Registration stores a salted Argon2 hash of the password; login looks the
//! user up by email and verifies the supplied password against that hash.
//! Login issues no token or session: a successful call only reports that
//! the credentials matched.

mod password;

pub use password::{hash_password, verify_password};

use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur during account operations.
#[derive(Debug, Error)]
pub enum AccountError {
    /// A required field was absent or empty.
    #[error("all fields required")]
    MissingFields,
    /// The email is already registered.
    #[error("email in use")]
    EmailInUse,
    /// Unknown email or wrong password. The two cases are not distinguished.
    #[error("invalid credentials")]
    InvalidCredentials,
    /// The password could not be hashed.
    #[error("password hashing failed: {0}")]
    Hashing(String),
    /// Any other storage failure.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
}

/// A stored user row.
///
/// Deliberately not `Serialize`: the password hash never leaves the server.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    /// Argon2 PHC string.
    pub password_hash: String,
}

/// Request body for registration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Registration {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Request body for login.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Credentials {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Returns the field's value if it is present and non-empty.
fn required(field: &Option<String>) -> Result<&str, AccountError> {
    match field.as_deref() {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(AccountError::MissingFields),
    }
}

/// Registers a new user and returns its id.
///
/// # Errors
///
/// - [`AccountError::MissingFields`] if any field is absent or empty.
/// - [`AccountError::EmailInUse`] if the insert hits a constraint violation.
/// - [`AccountError::Hashing`] if the password cannot be hashed.
/// - [`AccountError::Database`] for any other storage failure.
pub fn register(conn: &Connection, registration: &Registration) -> Result<i64, AccountError> {
    let name = required(&registration.name)?;
    let email = required(&registration.email)?;
    let password = required(&registration.password)?;

    let password_hash = hash_password(password)?;

    conn.execute(
        "INSERT INTO users (name, email, password) VALUES (?1, ?2, ?3)",
        params![name, email, password_hash],
    )
    .map_err(|e| {
        if policydesk_db::is_constraint_violation(&e) {
            AccountError::EmailInUse
        } else {
            AccountError::Database(e)
        }
    })?;

    let id = conn.last_insert_rowid();
    tracing::info!(user_id = id, "registered user");
    Ok(id)
}

/// Checks credentials against the stored hash and returns the matching user.
///
/// # Errors
///
/// - [`AccountError::MissingFields`] if email or password is absent or empty.
/// - [`AccountError::InvalidCredentials`] if the email is unknown or the
///   password does not match.
/// - [`AccountError::Database`] if the lookup fails.
pub fn login(conn: &Connection, credentials: &Credentials) -> Result<User, AccountError> {
    let email = required(&credentials.email)?;
    let password = required(&credentials.password)?;

    let user = find_user_by_email(conn, email)?.ok_or(AccountError::InvalidCredentials)?;

    if !verify_password(&user.password_hash, password) {
        tracing::debug!(user_id = user.id, "password mismatch");
        return Err(AccountError::InvalidCredentials);
    }

    Ok(user)
}

/// Looks up a user by email.
pub fn find_user_by_email(conn: &Connection, email: &str) -> Result<Option<User>, AccountError> {
    let user = conn
        .query_row(
            "SELECT id, name, email, password FROM users WHERE email = ?1",
            [email],
            map_row_to_user,
        )
        .optional()?;
    Ok(user)
}

fn map_row_to_user(row: &Row) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        password_hash: row.get(3)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> Connection {
        let conn = Connection::open_in_memory().expect("should open in-memory db");
        assert!(policydesk_db::init_schema(&conn).is_empty());
        conn
    }

    fn registration(name: &str, email: &str, password: &str) -> Registration {
        Registration {
            name: Some(name.to_string()),
            email: Some(email.to_string()),
            password: Some(password.to_string()),
        }
    }

    fn credentials(email: &str, password: &str) -> Credentials {
        Credentials {
            email: Some(email.to_string()),
            password: Some(password.to_string()),
        }
    }

    #[test]
    fn register_then_login() {
        let conn = setup();
        let id = register(&conn, &registration("Ann", "ann@example.com", "s3cret")).unwrap();

        let user = login(&conn, &credentials("ann@example.com", "s3cret")).unwrap();
        assert_eq!(user.id, id);
        assert_eq!(user.name, "Ann");
    }

    #[test]
    fn password_is_stored_hashed() {
        let conn = setup();
        register(&conn, &registration("Ann", "ann@example.com", "s3cret")).unwrap();

        let stored: String = conn
            .query_row("SELECT password FROM users WHERE email = 'ann@example.com'", [], |row| {
                row.get(0)
            })
            .unwrap();
        assert_ne!(stored, "s3cret");
        assert!(stored.starts_with("$argon2"), "unexpected hash format: {stored}");
    }

    #[test]
    fn duplicate_email_is_rejected() {
        let conn = setup();
        register(&conn, &registration("Ann", "ann@example.com", "one")).unwrap();

        let err = register(&conn, &registration("Other", "ann@example.com", "two")).unwrap_err();
        assert!(matches!(err, AccountError::EmailInUse), "got {err:?}");
    }

    #[test]
    fn missing_or_empty_fields_are_rejected() {
        let conn = setup();

        let missing = Registration {
            name: Some("Ann".into()),
            email: None,
            password: Some("pw".into()),
        };
        assert!(matches!(
            register(&conn, &missing),
            Err(AccountError::MissingFields)
        ));
        assert!(matches!(
            register(&conn, &registration("", "ann@example.com", "pw")),
            Err(AccountError::MissingFields)
        ));
        assert!(matches!(
            login(&conn, &Credentials::default()),
            Err(AccountError::MissingFields)
        ));
    }

    #[test]
    fn wrong_password_and_unknown_email_look_the_same() {
        let conn = setup();
        register(&conn, &registration("Ann", "ann@example.com", "right")).unwrap();

        let wrong = login(&conn, &credentials("ann@example.com", "wrong")).unwrap_err();
        let unknown = login(&conn, &credentials("nobody@example.com", "right")).unwrap_err();

        assert!(matches!(wrong, AccountError::InvalidCredentials));
        assert!(matches!(unknown, AccountError::InvalidCredentials));
        assert_eq!(wrong.to_string(), unknown.to_string());
    }

    #[test]
    fn malformed_stored_hash_is_a_mismatch() {
        let conn = setup();
        conn.execute(
            "INSERT INTO users (name, email, password) VALUES ('Old', 'old@example.com', 'plaintext')",
            [],
        )
        .unwrap();

        let err = login(&conn, &credentials("old@example.com", "plaintext")).unwrap_err();
        assert!(matches!(err, AccountError::InvalidCredentials));
    }
}
