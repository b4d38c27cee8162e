use argon2::password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use std::sync::OnceLock;

use crate::errors::AppError;

pub const MIN_PASSWORD_LEN: usize = 8;

/// Argon2id PHC string. CPU-heavy; call from `spawn_blocking`.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(anyhow::anyhow!("password hashing failed: {e}")))
}

/// False for a wrong password or an unparseable stored hash.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    match PasswordHash::new(stored_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            tracing::warn!("Stored password hash is malformed: {e}");
            false
        }
    }
}

/// Hash checked when the account does not exist, so an unknown email costs
/// the same argon2 work as a wrong password.
fn dummy_hash() -> &'static str {
    static DUMMY: OnceLock<String> = OnceLock::new();
    DUMMY.get_or_init(|| hash_password("not-a-real-account").unwrap_or_default())
}

/// Runs one argon2 verification whether or not a stored hash exists.
/// CPU-heavy; call from `spawn_blocking`.
pub fn credentials_match(password: &str, stored_hash: Option<&str>) -> bool {
    let matched = verify_password(password, stored_hash.unwrap_or_else(|| dummy_hash()));
    matched && stored_hash.is_some()
}
