//! Registration and login on top of the credential store.

use std::time::SystemTime;

use tracing::info;

use crate::auth::jwt::mint_access_token;
use crate::auth::password::{hash_password, verify_password};
use crate::error::AppError;
use crate::errors::domain::{AuthErrorKind, DomainError};
use crate::logging::pii::Redacted;
use crate::logging::security;
use crate::repos::{NewUser, UserStore};
use crate::state::security_config::SecurityConfig;

/// Outcome of a successful register or login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: String,
    pub token: String,
}

fn require(field: &str, value: &str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::validation(format!("{field} must not be empty")));
    }
    Ok(())
}

fn require_email(email: &str) -> Result<(), DomainError> {
    require("email", email)?;
    if !email.contains('@') {
        return Err(DomainError::validation("email is not a valid address"));
    }
    Ok(())
}

/// Hash the password, store the user and mint a token for the new id.
pub async fn register<S: UserStore + ?Sized>(
    store: &S,
    security: &SecurityConfig,
    name: String,
    email: String,
    password: String,
) -> Result<Session, AppError> {
    require("name", &name)?;
    require_email(&email)?;
    require("password", &password)?;

    let password_hash = hash_password(password).await?;
    let user_id = store
        .save_user(NewUser {
            name,
            email: email.clone(),
            password_hash,
        })
        .await?;

    info!(user_id = %user_id, email = %Redacted(&email), "user registered");
    let token = mint_access_token(&user_id, SystemTime::now(), security)?;
    Ok(Session { user_id, token })
}

/// Check credentials and mint a token.
///
/// Unknown email and wrong password both fail with `InvalidCredentials`.
pub async fn authenticate<S: UserStore + ?Sized>(
    store: &S,
    security: &SecurityConfig,
    email: String,
    password: String,
) -> Result<Session, AppError> {
    require_email(&email)?;
    require("password", &password)?;

    let stored = match store.validate_user(&email).await {
        Ok(stored) => stored,
        Err(DomainError::NotFound(..)) => {
            security::login_failed("unknown_email", Some(&email));
            return Err(invalid_credentials().into());
        }
        Err(e) => return Err(e.into()),
    };

    if !verify_password(password, stored.password_hash).await? {
        security::login_failed("wrong_password", Some(&email));
        return Err(invalid_credentials().into());
    }

    info!(user_id = %stored.user_id, "user authenticated");
    let token = mint_access_token(&stored.user_id, SystemTime::now(), security)?;
    Ok(Session {
        user_id: stored.user_id,
        token,
    })
}

fn invalid_credentials() -> DomainError {
    DomainError::unauthorized(AuthErrorKind::InvalidCredentials, "invalid email or password")
}
