//! DTOs for users_sea adapter.

/// DTO for inserting a user row.
#[derive(Debug, Clone)]
pub struct UserCreate {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

impl UserCreate {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            password_hash: password_hash.into(),
        }
    }
}
