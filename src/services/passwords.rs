//! Argon2 password hashing.
//!
//! Hashing is CPU-bound, so the async wrappers run it on actix's blocking pool.

use crate::error::ApiError;
use actix_web::web;
use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use rand_core::OsRng;
use std::sync::OnceLock;

/// Hash a password into a PHC string with a fresh random salt
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Check a password against a stored PHC string. Unparsable hashes never match.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    match PasswordHash::new(stored_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(err) => {
            tracing::warn!(error = %err, "Stored password hash could not be parsed");
            false
        }
    }
}

/// Hash used when the account does not exist, so both failure paths cost one verification
fn decoy_hash() -> Option<&'static str> {
    static DECOY: OnceLock<Option<String>> = OnceLock::new();
    DECOY
        .get_or_init(|| hash_password("decoy-password-for-unknown-accounts").ok())
        .as_deref()
}

pub async fn hash_password_blocking(password: String) -> Result<String, ApiError> {
    web::block(move || hash_password(&password))
        .await?
        .map_err(ApiError::from)
}

/// Verify `password` against `stored_hash`, or against a decoy when there is no account
pub async fn verify_password_blocking(
    password: String,
    stored_hash: Option<String>,
) -> Result<bool, ApiError> {
    let matched = web::block(move || match stored_hash {
        Some(hash) => verify_password(&password, &hash),
        None => {
            if let Some(decoy) = decoy_hash() {
                let _ = verify_password(&password, decoy);
            }
            false
        }
    })
    .await?;
    Ok(matched)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("Test123456").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("Test123456", &hash));
        assert!(!verify_password("test123456", &hash));
    }

    #[test]
    fn test_same_password_gets_distinct_salts() {
        let first = hash_password("secret").unwrap();
        let second = hash_password("secret").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_garbage_hash_never_matches() {
        assert!(!verify_password("secret", "not-a-phc-string"));
    }

    #[actix_web::test]
    async fn test_unknown_account_never_verifies() {
        let matched = verify_password_blocking("anything".to_string(), None)
            .await
            .unwrap();
        assert!(!matched);
    }
}
