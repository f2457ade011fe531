//! Argon2 password hashing.
//!
//! Hashes use `Argon2::default()` (Argon2id, fixed cost parameters) and a
//! 16-byte random salt, encoded as a PHC string.

use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use password_hash::{PasswordHash, SaltString};

use crate::AccountError;

/// Hashes a password into a PHC string.
///
/// # Errors
///
/// Returns [`AccountError::Hashing`] if the salt cannot be generated or the
/// hasher rejects the input.
pub fn hash_password(password: &str) -> Result<String, AccountError> {
    let mut salt_bytes = [0u8; 16];
    getrandom::getrandom(&mut salt_bytes).map_err(|e| AccountError::Hashing(e.to_string()))?;
    let salt =
        SaltString::encode_b64(&salt_bytes).map_err(|e| AccountError::Hashing(e.to_string()))?;

    let phc = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AccountError::Hashing(e.to_string()))?
        .to_string();
    Ok(phc)
}

/// Verifies a password against a PHC string.
///
/// A hash that does not parse counts as a mismatch.
pub fn verify_password(hash: &str, password: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            tracing::warn!(error = %e, "stored password hash is not a valid PHC string");
            false
        }
    }
}
