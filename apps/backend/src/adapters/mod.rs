//! Adapters for external dependencies.

pub mod books_sea;
pub mod users_sea;
