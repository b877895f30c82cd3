//! SeaORM-backed implementation of the storage traits.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use sea_orm::{DatabaseConnection, TransactionTrait};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::adapters::{books_sea, users_sea};
use crate::entities::books;
use crate::errors::domain::{DomainError, InfraErrorKind, NotFoundKind};
use crate::logging::pii::Redacted;
use crate::repos::{
    Book, BookStore, NewBook, NewUser, RepeatDeletePolicy, StoredCredentials, UserStore,
};

/// Deadline applied to every storage call.
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Debug, Clone)]
pub struct SeaStore {
    conn: DatabaseConnection,
    query_timeout: Duration,
    repeat_delete: RepeatDeletePolicy,
}

impl SeaStore {
    pub fn new(conn: DatabaseConnection) -> Self {
        Self {
            conn,
            query_timeout: DEFAULT_QUERY_TIMEOUT,
            repeat_delete: RepeatDeletePolicy::default(),
        }
    }

    pub fn with_query_timeout(mut self, query_timeout: Duration) -> Self {
        self.query_timeout = query_timeout;
        self
    }

    pub fn with_repeat_delete(mut self, policy: RepeatDeletePolicy) -> Self {
        self.repeat_delete = policy;
        self
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.conn
    }

    async fn with_deadline<T, F>(
        &self,
        operation: &'static str,
        future: F,
    ) -> Result<T, DomainError>
    where
        F: Future<Output = Result<T, DomainError>>,
    {
        match tokio::time::timeout(self.query_timeout, future).await {
            Ok(result) => result,
            Err(_elapsed) => {
                warn!(
                    operation,
                    timeout_ms = self.query_timeout.as_millis() as u64,
                    "storage deadline exceeded"
                );
                Err(DomainError::infra(
                    InfraErrorKind::Timeout,
                    format!("{operation} timed out"),
                ))
            }
        }
    }

    async fn delete_in_txn(&self, id: &str) -> Result<(), DomainError> {
        let txn = self.conn.begin().await?;

        let touched = match books_sea::mark_deleted(&txn, id).await {
            Ok(n) => n,
            Err(e) => {
                if let Err(rollback) = txn.rollback().await {
                    warn!(book_id = %id, error = %rollback, "rollback failed");
                }
                return Err(e.into());
            }
        };

        if touched == 0 {
            let existing = books_sea::find_by_id(&txn, id).await;
            txn.rollback().await?;
            return match existing? {
                Some(row)
                    if row.deleted && self.repeat_delete == RepeatDeletePolicy::AlreadyDeleted =>
                {
                    Err(DomainError::deleted("the book has been deleted"))
                }
                _ => Err(DomainError::not_found(NotFoundKind::Book, "book not found")),
            };
        }

        txn.commit().await?;
        Ok(())
    }
}

impl From<books::Model> for Book {
    fn from(model: books::Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            author: model.author,
            owner_id: model.owner_id,
            deleted: model.deleted,
        }
    }
}

fn non_empty(rows: Vec<books::Model>) -> Result<Vec<Book>, DomainError> {
    if rows.is_empty() {
        return Err(DomainError::empty("book database is empty"));
    }
    Ok(rows.into_iter().map(Book::from).collect())
}

#[async_trait]
impl UserStore for SeaStore {
    async fn save_user(&self, user: NewUser) -> Result<String, DomainError> {
        let id = Uuid::new_v4().to_string();
        let dto = users_sea::UserCreate::new(&id, user.name, user.email, user.password_hash);

        self.with_deadline("save_user", async {
            users_sea::create_user(&self.conn, dto)
                .await
                .map(|_| ())
                .map_err(DomainError::from)
        })
        .await?;

        info!(user_id = %id, "user saved");
        Ok(id)
    }

    async fn validate_user(&self, email: &str) -> Result<StoredCredentials, DomainError> {
        let row = self
            .with_deadline("validate_user", async {
                users_sea::find_user_by_email(&self.conn, email)
                    .await
                    .map_err(DomainError::from)
            })
            .await?;

        match row {
            Some(user) => Ok(StoredCredentials {
                user_id: user.id,
                password_hash: user.password_hash,
            }),
            None => {
                debug!(email = %Redacted(email), "no user for email");
                Err(DomainError::not_found(NotFoundKind::User, "user not found"))
            }
        }
    }
}

#[async_trait]
impl BookStore for SeaStore {
    async fn get_books(&self) -> Result<Vec<Book>, DomainError> {
        let rows = self
            .with_deadline("get_books", async {
                books_sea::find_live(&self.conn).await.map_err(DomainError::from)
            })
            .await?;
        non_empty(rows)
    }

    async fn get_books_by_owner(&self, owner_id: &str) -> Result<Vec<Book>, DomainError> {
        let rows = self
            .with_deadline("get_books_by_owner", async {
                books_sea::find_live_by_owner(&self.conn, owner_id)
                    .await
                    .map_err(DomainError::from)
            })
            .await?;
        non_empty(rows)
    }

    async fn get_book_by_id(&self, id: &str) -> Result<Book, DomainError> {
        let row = self
            .with_deadline("get_book_by_id", async {
                books_sea::find_by_id(&self.conn, id).await.map_err(DomainError::from)
            })
            .await?;

        match row {
            None => Err(DomainError::not_found(NotFoundKind::Book, "book not found")),
            Some(row) if row.deleted => Err(DomainError::deleted("the book has been deleted")),
            Some(row) => Ok(Book::from(row)),
        }
    }

    async fn save_book(&self, book: NewBook) -> Result<Book, DomainError> {
        let dto = books_sea::BookCreate {
            id: Uuid::new_v4().to_string(),
            title: book.title,
            author: book.author,
            owner_id: book.owner_id,
        };

        let row = self
            .with_deadline("save_book", async {
                books_sea::create_book(&self.conn, dto).await.map_err(DomainError::from)
            })
            .await?;

        info!(book_id = %row.id, owner_id = %row.owner_id, "book saved");
        Ok(Book::from(row))
    }

    async fn delete_book(&self, id: &str) -> Result<(), DomainError> {
        self.with_deadline("delete_book", self.delete_in_txn(id)).await?;
        info!(book_id = %id, "book marked deleted");
        Ok(())
    }

    async fn purge_deleted(&self) -> Result<(), DomainError> {
        let removed = self
            .with_deadline("purge_deleted", async {
                books_sea::purge_deleted(&self.conn).await.map_err(DomainError::from)
            })
            .await?;
        info!(removed, "purged deleted books");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::{ConnectOptions, Database, EntityTrait};

    use super::*;
    use crate::errors::domain::ConflictKind;

    async fn sqlite_store() -> SeaStore {
        let mut opt = ConnectOptions::new("sqlite::memory:");
        opt.min_connections(1).max_connections(1).sqlx_logging(false);
        let conn = Database::connect(opt).await.unwrap();
        migration::migrate(&conn, migration::MigrationCommand::Up)
            .await
            .unwrap();
        SeaStore::new(conn)
    }

    async fn seed_user(store: &SeaStore, email: &str) -> String {
        store
            .save_user(NewUser {
                name: "Ada".into(),
                email: email.into(),
                password_hash: "$argon2id$stub".into(),
            })
            .await
            .unwrap()
    }

    fn new_book(owner: &str, title: &str) -> NewBook {
        NewBook {
            title: title.into(),
            author: "Someone".into(),
            owner_id: owner.into(),
        }
    }

    #[tokio::test]
    async fn save_then_validate_user() {
        let store = sqlite_store().await;
        let id = seed_user(&store, "ada@example.com").await;

        let creds = store.validate_user("ada@example.com").await.unwrap();
        assert_eq!(creds.user_id, id);
        assert_eq!(creds.password_hash, "$argon2id$stub");
    }

    #[tokio::test]
    async fn duplicate_email_is_conflict() {
        let store = sqlite_store().await;
        seed_user(&store, "dup@example.com").await;

        let err = store
            .save_user(NewUser {
                name: "Other".into(),
                email: "dup@example.com".into(),
                password_hash: "h".into(),
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DomainError::Conflict(ConflictKind::UniqueEmail, _)
        ));
    }

    #[tokio::test]
    async fn unknown_email_is_user_not_found() {
        let store = sqlite_store().await;
        let err = store.validate_user("ghost@example.com").await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound(NotFoundKind::User, _)));
    }

    #[tokio::test]
    async fn empty_catalog_is_empty_error() {
        let store = sqlite_store().await;
        assert!(matches!(
            store.get_books().await.unwrap_err(),
            DomainError::Empty(_)
        ));
        assert!(matches!(
            store.get_books_by_owner("nobody").await.unwrap_err(),
            DomainError::Empty(_)
        ));
    }

    #[tokio::test]
    async fn soft_delete_hides_row_until_purge() {
        let store = sqlite_store().await;
        let owner = seed_user(&store, "owner@example.com").await;
        let kept = store.save_book(new_book(&owner, "Kept")).await.unwrap();
        let gone = store.save_book(new_book(&owner, "Gone")).await.unwrap();

        store.delete_book(&gone.id).await.unwrap();

        assert!(matches!(
            store.get_book_by_id(&gone.id).await.unwrap_err(),
            DomainError::Deleted(_)
        ));
        let live = store.get_books().await.unwrap();
        assert_eq!(live, vec![kept.clone()]);

        // Row is still physically present.
        let raw = books::Entity::find_by_id(gone.id.clone())
            .one(store.connection())
            .await
            .unwrap();
        assert!(raw.is_some_and(|r| r.deleted));

        store.purge_deleted().await.unwrap();
        let raw = books::Entity::find_by_id(gone.id.clone())
            .one(store.connection())
            .await
            .unwrap();
        assert!(raw.is_none());
        assert_eq!(store.get_book_by_id(&kept.id).await.unwrap(), kept);
    }

    #[tokio::test]
    async fn repeat_delete_follows_policy() {
        let store = sqlite_store().await;
        let owner = seed_user(&store, "repeat@example.com").await;
        let book = store.save_book(new_book(&owner, "Twice")).await.unwrap();
        store.delete_book(&book.id).await.unwrap();

        let err = store.delete_book(&book.id).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound(NotFoundKind::Book, _)));

        let strict = store.clone().with_repeat_delete(RepeatDeletePolicy::AlreadyDeleted);
        let err = strict.delete_book(&book.id).await.unwrap_err();
        assert!(matches!(err, DomainError::Deleted(_)));

        let err = strict.delete_book("no-such-id").await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound(NotFoundKind::Book, _)));
    }

    #[tokio::test]
    async fn owner_listing_is_scoped() {
        let store = sqlite_store().await;
        let a = seed_user(&store, "a@example.com").await;
        let b = seed_user(&store, "b@example.com").await;
        store.save_book(new_book(&a, "A1")).await.unwrap();
        store.save_book(new_book(&a, "A2")).await.unwrap();
        store.save_book(new_book(&b, "B1")).await.unwrap();

        let mine = store.get_books_by_owner(&a).await.unwrap();
        assert_eq!(mine.len(), 2);
        assert!(mine.iter().all(|book| book.owner_id == a));
    }

    #[tokio::test]
    async fn stalled_query_fails_with_timeout() {
        let store = sqlite_store()
            .await
            .with_query_timeout(Duration::from_millis(50));

        // Pin the pool's only connection so the next query cannot acquire one.
        let held = store.connection().begin().await.unwrap();

        let err = store.get_books().await.unwrap_err();
        assert!(matches!(err, DomainError::Infra(InfraErrorKind::Timeout, _)));

        held.rollback().await.unwrap();
        assert!(matches!(
            store.get_books().await.unwrap_err(),
            DomainError::Empty(_)
        ));
    }

    #[tokio::test]
    async fn book_for_unknown_owner_is_rejected() {
        let store = sqlite_store().await;
        let err = store
            .save_book(new_book("no-such-user", "Orphan"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }
}
