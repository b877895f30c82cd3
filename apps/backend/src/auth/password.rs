//! Password hashing (argon2id, PHC string format).
//!
//! Hashing is CPU bound, so both operations run on the blocking pool.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

use crate::errors::domain::{DomainError, InfraErrorKind};

fn hashing_failed(e: impl std::fmt::Display) -> DomainError {
    DomainError::infra(
        InfraErrorKind::Other("PasswordHash".into()),
        format!("password hashing failed: {e}"),
    )
}

pub async fn hash_password(password: String) -> Result<String, DomainError> {
    tokio::task::spawn_blocking(move || {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(hashing_failed)
    })
    .await
    .map_err(hashing_failed)?
}

/// Returns `Ok(false)` for a wrong password; `Err` only when the stored hash is unreadable.
pub async fn verify_password(password: String, stored_hash: String) -> Result<bool, DomainError> {
    tokio::task::spawn_blocking(move || {
        let parsed = PasswordHash::new(&stored_hash).map_err(hashing_failed)?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    })
    .await
    .map_err(hashing_failed)?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn hash_then_verify() {
        let hash = hash_password("correct horse".into()).await.unwrap();
        assert!(hash.starts_with("$argon2id$"));

        assert!(verify_password("correct horse".into(), hash.clone())
            .await
            .unwrap());
        assert!(!verify_password("battery staple".into(), hash).await.unwrap());
    }

    #[tokio::test]
    async fn same_password_hashes_differently() {
        let a = hash_password("pw".into()).await.unwrap();
        let b = hash_password("pw".into()).await.unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn unreadable_hash_is_an_error() {
        let err = verify_password("pw".into(), "plaintext".into())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Infra(InfraErrorKind::Other(_), _)));
    }
}
