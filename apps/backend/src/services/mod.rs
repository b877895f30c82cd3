pub mod books;
pub mod delete_batcher;
pub mod users;
