//! DTOs for books_sea adapter.

/// DTO for inserting a book row.
#[derive(Debug, Clone)]
pub struct BookCreate {
    pub id: String,
    pub title: String,
    pub author: String,
    pub owner_id: String,
}
