use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::AppError;
use crate::errors::domain::DomainError;
use crate::extractors::{CurrentUser, ValidatedJson};
use crate::services::books;
use crate::state::app_state::AppState;

#[derive(Debug, Deserialize)]
pub struct AddBookRequest {
    pub title: String,
    pub author: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub id: String,
    pub deleted: bool,
}

/// Catalog reads answer 204 with no body when there is nothing to show.
fn or_no_content<T: Serialize>(
    result: Result<T, DomainError>,
) -> Result<HttpResponse, AppError> {
    match result {
        Ok(value) => Ok(HttpResponse::Ok().json(value)),
        Err(e) if e.is_absent() => {
            debug!(reason = %e, "nothing to return");
            Ok(HttpResponse::NoContent().finish())
        }
        Err(e) => Err(e.into()),
    }
}

async fn all_books(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    or_no_content(books::list_all(app_state.store.as_ref()).await)
}

async fn my_books(
    user: CurrentUser,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    or_no_content(books::list_owned(app_state.store.as_ref(), &user.id).await)
}

async fn book_by_id(
    path: web::Path<String>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    or_no_content(books::get(app_state.store.as_ref(), &path).await)
}

async fn add_book(
    user: CurrentUser,
    body: ValidatedJson<AddBookRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let AddBookRequest { title, author } = body.into_inner();
    let book = books::add(app_state.store.as_ref(), &user.id, title, author).await?;
    Ok(HttpResponse::Created().json(book))
}

async fn delete_book(
    path: web::Path<String>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    match books::delete(app_state.store.as_ref(), &app_state.deletes, &id).await {
        Ok(()) => Ok(HttpResponse::Ok().json(DeleteResponse { id, deleted: true })),
        Err(DomainError::NotFound(..)) => Ok(HttpResponse::NoContent().finish()),
        // Only reachable under RepeatDeletePolicy::AlreadyDeleted; renders as 410.
        Err(e) => Err(e.into()),
    }
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    // Fixed paths first so "/{id}" does not shadow them.
    cfg.route("/all-books", web::get().to(all_books))
        .route("/my-books", web::get().to(my_books))
        .route("/add-book", web::post().to(add_book))
        .route("/delete/{id}", web::delete().to(delete_book))
        .route("/{id}", web::get().to(book_by_id));
}
