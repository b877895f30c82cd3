use std::sync::Arc;

use sea_orm::DatabaseConnection;

use super::security_config::SecurityConfig;
use crate::repos::Storage;
use crate::services::delete_batcher::DeleteSignaller;

/// Application state containing shared resources
#[derive(Clone)]
pub struct AppState {
    /// Credential and book storage shared by handlers and the delete batcher
    pub store: Arc<dyn Storage>,
    /// Security configuration including JWT settings
    pub security: SecurityConfig,
    /// Handle used to notify the delete batcher after each logical delete
    pub deletes: DeleteSignaller,
    /// Database connection, when the store is database backed (health checks)
    pub db: Option<DatabaseConnection>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn Storage>,
        security: SecurityConfig,
        deletes: DeleteSignaller,
    ) -> Self {
        Self {
            store,
            security,
            deletes,
            db: None,
        }
    }

    pub fn with_db(mut self, db: DatabaseConnection) -> Self {
        self.db = Some(db);
        self
    }

    pub fn db(&self) -> Option<&DatabaseConnection> {
        self.db.as_ref()
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("token_ttl", &self.security.token_ttl)
            .field("deletes", &self.deletes)
            .field("db", &self.db.is_some())
            .finish_non_exhaustive()
    }
}
