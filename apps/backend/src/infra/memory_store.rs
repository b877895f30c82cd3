//! In-memory storage for tests and database-less local runs.
//!
//! Same observable semantics as `SeaStore`: unique emails, books must
//! reference a stored user, soft delete, and a purge that drops every
//! logically deleted row at once.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use uuid::Uuid;

use crate::errors::domain::{ConflictKind, DomainError, NotFoundKind};
use crate::repos::{
    Book, BookStore, NewBook, NewUser, RepeatDeletePolicy, StoredCredentials, UserStore,
};

#[derive(Debug, Clone)]
struct UserRecord {
    id: String,
    password_hash: String,
}

#[derive(Debug, Default)]
struct Inner {
    /// Users keyed by email
    users: HashMap<String, UserRecord>,
    /// Books keyed by id, including logically deleted rows
    books: HashMap<String, Book>,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
    repeat_delete: RepeatDeletePolicy,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    pub fn with_repeat_delete(mut self, policy: RepeatDeletePolicy) -> Self {
        self.repeat_delete = policy;
        self
    }

    /// Number of rows held, logically deleted ones included.
    pub fn stored_book_count(&self) -> usize {
        self.inner.read().books.len()
    }
}

fn non_empty(books: Vec<Book>) -> Result<Vec<Book>, DomainError> {
    if books.is_empty() {
        return Err(DomainError::empty("book database is empty"));
    }
    Ok(books)
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn save_user(&self, user: NewUser) -> Result<String, DomainError> {
        let mut inner = self.inner.write();
        if inner.users.contains_key(&user.email) {
            return Err(DomainError::conflict(
                ConflictKind::UniqueEmail,
                "Email already registered",
            ));
        }

        let id = Uuid::new_v4().to_string();
        inner.users.insert(
            user.email,
            UserRecord {
                id: id.clone(),
                password_hash: user.password_hash,
            },
        );
        Ok(id)
    }

    async fn validate_user(&self, email: &str) -> Result<StoredCredentials, DomainError> {
        self.inner
            .read()
            .users
            .get(email)
            .map(|u| StoredCredentials {
                user_id: u.id.clone(),
                password_hash: u.password_hash.clone(),
            })
            .ok_or_else(|| DomainError::not_found(NotFoundKind::User, "user not found"))
    }
}

#[async_trait]
impl BookStore for MemoryStore {
    async fn get_books(&self) -> Result<Vec<Book>, DomainError> {
        let live = self
            .inner
            .read()
            .books
            .values()
            .filter(|b| !b.deleted)
            .cloned()
            .collect();
        non_empty(live)
    }

    async fn get_books_by_owner(&self, owner_id: &str) -> Result<Vec<Book>, DomainError> {
        let live = self
            .inner
            .read()
            .books
            .values()
            .filter(|b| !b.deleted && b.owner_id == owner_id)
            .cloned()
            .collect();
        non_empty(live)
    }

    async fn get_book_by_id(&self, id: &str) -> Result<Book, DomainError> {
        match self.inner.read().books.get(id) {
            None => Err(DomainError::not_found(NotFoundKind::Book, "book not found")),
            Some(b) if b.deleted => Err(DomainError::deleted("the book has been deleted")),
            Some(b) => Ok(b.clone()),
        }
    }

    async fn save_book(&self, book: NewBook) -> Result<Book, DomainError> {
        let mut inner = self.inner.write();
        if !inner.users.values().any(|u| u.id == book.owner_id) {
            return Err(DomainError::validation("Referenced user does not exist"));
        }

        let stored = Book {
            id: Uuid::new_v4().to_string(),
            title: book.title,
            author: book.author,
            owner_id: book.owner_id,
            deleted: false,
        };
        inner.books.insert(stored.id.clone(), stored.clone());
        Ok(stored)
    }

    async fn delete_book(&self, id: &str) -> Result<(), DomainError> {
        let mut inner = self.inner.write();
        match inner.books.get_mut(id) {
            Some(b) if !b.deleted => {
                b.deleted = true;
                Ok(())
            }
            Some(_) if self.repeat_delete == RepeatDeletePolicy::AlreadyDeleted => {
                Err(DomainError::deleted("the book has been deleted"))
            }
            _ => Err(DomainError::not_found(NotFoundKind::Book, "book not found")),
        }
    }

    async fn purge_deleted(&self) -> Result<(), DomainError> {
        self.inner.write().books.retain(|_, b| !b.deleted);
        Ok(())
    }
}
