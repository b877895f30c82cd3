//! Credential store contract.

use async_trait::async_trait;

use crate::errors::domain::DomainError;

/// Registration payload after the password has been hashed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

/// What the store hands back for a credential check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCredentials {
    pub user_id: String,
    pub password_hash: String,
}

#[async_trait]
pub trait UserStore: Send + Sync + 'static {
    /// Persist a new user and return the generated id.
    ///
    /// Fails with `Conflict(UniqueEmail)` when the email is taken.
    async fn save_user(&self, user: NewUser) -> Result<String, DomainError>;

    /// Look up the id and stored hash for `email`.
    ///
    /// Fails with `NotFound(User)` when no user has that email. The password
    /// itself is compared by the caller.
    async fn validate_user(&self, email: &str) -> Result<StoredCredentials, DomainError>;
}
