//! Password hashing and verification using argon2id.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use tracing::error;

use crate::error::ApiError;

/// Hash a password using argon2id with a random salt.
pub fn hash_password(plaintext: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(plaintext.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// True iff `plaintext` matches the stored hash. A malformed hash is a
/// mismatch, not an error.
pub fn verify_password(hash: &str, plaintext: &str) -> bool {
    let Ok(parsed_hash) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(plaintext.as_bytes(), &parsed_hash)
        .is_ok()
}

/// `hash_password` on the blocking pool, since argon2 is deliberately slow.
pub async fn hash_off_thread(plaintext: String) -> Result<String, ApiError> {
    tokio::task::spawn_blocking(move || hash_password(&plaintext))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?
        .map_err(|e| {
            error!("Password hashing failed: {}", e);
            ApiError::Internal(e.to_string())
        })
}

/// `verify_password` on the blocking pool.
pub async fn verify_off_thread(hash: String, plaintext: String) -> Result<bool, ApiError> {
    tokio::task::spawn_blocking(move || verify_password(&hash, &plaintext))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify() {
        let hash = hash_password("secret").unwrap();
        assert_ne!(hash, "secret");
        assert!(verify_password(&hash, "secret"));
        assert!(!verify_password(&hash, "wrongpassword"));
    }

    #[test]
    fn same_password_different_salts() {
        let h1 = hash_password("secret").unwrap();
        let h2 = hash_password("secret").unwrap();
        assert_ne!(h1, h2);
        assert!(verify_password(&h2, "secret"));
    }

    #[test]
    fn malformed_hash_never_verifies() {
        assert!(!verify_password("not-a-hash", "secret"));
        assert!(!verify_password("", ""));
        assert!(!verify_password("secret", "secret"));
    }

    #[tokio::test]
    async fn off_thread_helpers_agree() {
        let hash = hash_off_thread("secret".into()).await.unwrap();
        assert!(verify_off_thread(hash.clone(), "secret".into()).await.unwrap());
        assert!(!verify_off_thread(hash, "guess".into()).await.unwrap());
    }
}
