//! Domain-level error type used across services, stores and the delete batcher.
//!
//! This error type is HTTP- and DB-agnostic. Handlers return
//! `Result<T, crate::error::AppError>` and convert from `DomainError`
//! using the provided `From<DomainError> for AppError` implementation.

use thiserror::Error;

/// Infra error kinds to distinguish operational failures
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum InfraErrorKind {
    Timeout,
    DbUnavailable,
    Other(String),
}

/// Domain-level not found entities
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum NotFoundKind {
    User,
    Book,
    Other(String),
}

/// Domain-level conflict kinds
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConflictKind {
    UniqueEmail,
    Other(String),
}

/// Authentication failure kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthErrorKind {
    /// Unknown email or wrong password. Deliberately not distinguished.
    InvalidCredentials,
    /// Signature mismatch or malformed token
    InvalidToken,
    ExpiredToken,
    MissingToken,
}

/// Central domain error type
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DomainError {
    /// Input validation failure
    #[error("validation error: {0}")]
    Validation(String),
    /// Semantic conflict (duplicate registration)
    #[error("conflict {0:?}: {1}")]
    Conflict(ConflictKind, String),
    /// Entity absent
    #[error("not found {0:?}: {1}")]
    NotFound(NotFoundKind, String),
    /// Collection query matched nothing
    #[error("empty: {0}")]
    Empty(String),
    /// Entity exists but has been logically deleted
    #[error("deleted: {0}")]
    Deleted(String),
    /// Authentication failure
    #[error("unauthorized {0:?}: {1}")]
    Unauthorized(AuthErrorKind, String),
    /// Infrastructure/operational failures
    #[error("infra {0:?}: {1}")]
    Infra(InfraErrorKind, String),
}

impl DomainError {
    pub fn validation(detail: impl Into<String>) -> Self {
        Self::Validation(detail.into())
    }
    pub fn conflict(kind: ConflictKind, detail: impl Into<String>) -> Self {
        Self::Conflict(kind, detail.into())
    }
    pub fn not_found(kind: NotFoundKind, detail: impl Into<String>) -> Self {
        Self::NotFound(kind, detail.into())
    }
    pub fn empty(detail: impl Into<String>) -> Self {
        Self::Empty(detail.into())
    }
    pub fn deleted(detail: impl Into<String>) -> Self {
        Self::Deleted(detail.into())
    }
    pub fn unauthorized(kind: AuthErrorKind, detail: impl Into<String>) -> Self {
        Self::Unauthorized(kind, detail.into())
    }
    pub fn infra(kind: InfraErrorKind, detail: impl Into<String>) -> Self {
        Self::Infra(kind, detail.into())
    }

    /// True for the "nothing to show" family: absent, empty, or logically deleted.
    pub fn is_absent(&self) -> bool {
        matches!(
            self,
            DomainError::NotFound(..) | DomainError::Empty(_) | DomainError::Deleted(_)
        )
    }
}
