pub mod books;
pub mod users;

pub use books::Entity as Books;
pub use books::Model as BookRow;
pub use users::Entity as Users;
pub use users::Model as UserRow;
