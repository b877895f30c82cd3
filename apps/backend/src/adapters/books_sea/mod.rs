//! SeaORM adapter for the book store.

use sea_orm::sea_query::Expr;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set};

use crate::entities::books;

pub mod dto;

pub use dto::BookCreate;

pub async fn find_live<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<Vec<books::Model>, sea_orm::DbErr> {
    books::Entity::find()
        .filter(books::Column::Deleted.eq(false))
        .all(conn)
        .await
}

pub async fn find_live_by_owner<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    owner_id: &str,
) -> Result<Vec<books::Model>, sea_orm::DbErr> {
    books::Entity::find()
        .filter(books::Column::OwnerId.eq(owner_id))
        .filter(books::Column::Deleted.eq(false))
        .all(conn)
        .await
}

/// Fetch a row regardless of its delete flag.
pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: &str,
) -> Result<Option<books::Model>, sea_orm::DbErr> {
    books::Entity::find_by_id(id.to_owned()).one(conn).await
}

pub async fn create_book<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: BookCreate,
) -> Result<books::Model, sea_orm::DbErr> {
    let active = books::ActiveModel {
        id: Set(dto.id),
        title: Set(dto.title),
        author: Set(dto.author),
        deleted: Set(false),
        owner_id: Set(dto.owner_id),
    };

    active.insert(conn).await
}

/// Flip the delete flag on a live row. Returns the number of rows touched (0 or 1).
pub async fn mark_deleted<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: &str,
) -> Result<u64, sea_orm::DbErr> {
    let result = books::Entity::update_many()
        .col_expr(books::Column::Deleted, Expr::value(true))
        .filter(books::Column::Id.eq(id))
        .filter(books::Column::Deleted.eq(false))
        .exec(conn)
        .await?;
    Ok(result.rows_affected)
}

/// Physically remove every logically deleted row.
pub async fn purge_deleted<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<u64, sea_orm::DbErr> {
    let result = books::Entity::delete_many()
        .filter(books::Column::Deleted.eq(true))
        .exec(conn)
        .await?;
    Ok(result.rows_affected)
}
