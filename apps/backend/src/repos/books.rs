//! Book store contract.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::Serialize;

use crate::errors::domain::DomainError;

/// Book domain model
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Book {
    pub id: String,
    pub title: String,
    pub author: String,
    pub owner_id: String,
    #[serde(skip)]
    pub deleted: bool,
}

/// Book to be created; `owner_id` always comes from the authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub owner_id: String,
}

/// How `delete_book` answers for a row that is already logically deleted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RepeatDeletePolicy {
    /// Treat it like an unknown id (`NotFound`).
    #[default]
    NotFound,
    /// Report `Deleted` so callers can distinguish it.
    AlreadyDeleted,
}

impl RepeatDeletePolicy {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NotFound => "not-found",
            Self::AlreadyDeleted => "already-deleted",
        }
    }
}

impl fmt::Display for RepeatDeletePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RepeatDeletePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "not-found" | "not_found" => Ok(Self::NotFound),
            "already-deleted" | "already_deleted" => Ok(Self::AlreadyDeleted),
            other => Err(format!(
                "unknown repeat-delete policy '{other}' (expected not-found or already-deleted)"
            )),
        }
    }
}

#[async_trait]
pub trait BookStore: Send + Sync + 'static {
    /// Every live book. `Empty` when there are none.
    async fn get_books(&self) -> Result<Vec<Book>, DomainError>;

    /// Live books owned by `owner_id`. `Empty` when there are none.
    async fn get_books_by_owner(&self, owner_id: &str) -> Result<Vec<Book>, DomainError>;

    /// `NotFound(Book)` for an unknown id, `Deleted` for a logically deleted row.
    async fn get_book_by_id(&self, id: &str) -> Result<Book, DomainError>;

    async fn save_book(&self, book: NewBook) -> Result<Book, DomainError>;

    /// Mark a live book as deleted. The row stays until the next purge.
    async fn delete_book(&self, id: &str) -> Result<(), DomainError>;

    /// Physically remove every logically deleted row.
    async fn purge_deleted(&self) -> Result<(), DomainError>;
}
