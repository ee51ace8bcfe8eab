//! Password hashing
//!
//! bcrypt is CPU-bound by design, so hashing and verification run on the
//! blocking thread pool instead of stalling the async workers.

use common::error::{Error, IntoError, Result};

/// Lowest and highest work factors bcrypt accepts
pub const MIN_COST: u32 = 4;
pub const MAX_COST: u32 = 31;

/// Hash a plaintext password with a fresh random salt
pub async fn hash_password(plaintext: &str, cost: u32) -> Result<String> {
    if !(MIN_COST..=MAX_COST).contains(&cost) {
        return Err(Error::ConfigurationError(format!(
            "bcrypt cost must be between {} and {}, got {}",
            MIN_COST, MAX_COST, cost
        )));
    }

    let plaintext = plaintext.to_owned();
    tokio::task::spawn_blocking(move || bcrypt::hash(plaintext, cost))
        .await
        .map_err(|e| e.into_error("password hashing task failed"))?
        .map_err(|e| e.into_error("password hashing failed"))
}

/// Check a plaintext password against a stored hash
pub async fn verify_password(plaintext: &str, hash: &str) -> Result<bool> {
    let plaintext = plaintext.to_owned();
    let hash = hash.to_owned();
    tokio::task::spawn_blocking(move || bcrypt::verify(plaintext, &hash))
        .await
        .map_err(|e| e.into_error("password verification task failed"))?
        .map_err(|e| e.into_error("stored password hash is malformed"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_hash_and_verify() {
        let hash = hash_password("s3cret", MIN_COST).await.unwrap();
        assert_ne!(hash, "s3cret");
        assert!(verify_password("s3cret", &hash).await.unwrap());
        assert!(!verify_password("wrong", &hash).await.unwrap());
    }

    #[tokio::test]
    async fn test_same_password_gets_distinct_salts() {
        let a = hash_password("same", MIN_COST).await.unwrap();
        let b = hash_password("same", MIN_COST).await.unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_cost_out_of_range() {
        let result = hash_password("pw", 2).await;
        assert!(matches!(result, Err(Error::ConfigurationError(_))));
    }

    #[tokio::test]
    async fn test_malformed_hash_is_internal() {
        let result = verify_password("pw", "not-a-bcrypt-hash").await;
        assert!(matches!(result, Err(Error::Internal(_))));
    }
}
