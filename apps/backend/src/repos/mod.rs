//! Storage capability traits and the domain models they trade in.
//!
//! Handlers and services depend on these traits only; `infra::sea_store`
//! and `infra::memory_store` provide the implementations.

pub mod books;
pub mod users;

pub use books::{Book, BookStore, NewBook, RepeatDeletePolicy};
pub use users::{NewUser, StoredCredentials, UserStore};

/// Combined storage capability held by the application state.
pub trait Storage: UserStore + BookStore {}

impl<T: UserStore + BookStore + ?Sized> Storage for T {}
