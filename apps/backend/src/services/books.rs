//! Book operations used by the HTTP handlers.

use tracing::debug;

use crate::errors::domain::DomainError;
use crate::repos::{Book, BookStore, NewBook};
use crate::services::delete_batcher::DeleteSignaller;

pub async fn list_all<S: BookStore + ?Sized>(store: &S) -> Result<Vec<Book>, DomainError> {
    store.get_books().await
}

pub async fn list_owned<S: BookStore + ?Sized>(
    store: &S,
    owner_id: &str,
) -> Result<Vec<Book>, DomainError> {
    store.get_books_by_owner(owner_id).await
}

pub async fn get<S: BookStore + ?Sized>(store: &S, id: &str) -> Result<Book, DomainError> {
    store.get_book_by_id(id).await
}

/// Create a book owned by `owner_id` (the authenticated caller).
pub async fn add<S: BookStore + ?Sized>(
    store: &S,
    owner_id: &str,
    title: String,
    author: String,
) -> Result<Book, DomainError> {
    if title.trim().is_empty() {
        return Err(DomainError::validation("title must not be empty"));
    }
    if author.trim().is_empty() {
        return Err(DomainError::validation("author must not be empty"));
    }

    store
        .save_book(NewBook {
            title,
            author,
            owner_id: owner_id.to_string(),
        })
        .await
}

/// Logically delete a book and notify the batcher.
///
/// The batcher is signalled only when the store reports success.
pub async fn delete<S: BookStore + ?Sized>(
    store: &S,
    deletes: &DeleteSignaller,
    id: &str,
) -> Result<(), DomainError> {
    store.delete_book(id).await?;
    deletes.signal();
    debug!(book_id = %id, "delete signalled");
    Ok(())
}
