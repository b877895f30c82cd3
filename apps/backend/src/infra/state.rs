use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::config::{AppConfig, MigrateMode};
use crate::error::AppError;
use crate::infra::db::bootstrap_db;
use crate::infra::memory_store::MemoryStore;
use crate::infra::sea_store::{SeaStore, DEFAULT_QUERY_TIMEOUT};
use crate::repos::{RepeatDeletePolicy, Storage};
use crate::services::delete_batcher::{BatcherConfig, DeleteBatcher};
use crate::state::app_state::AppState;
use crate::state::security_config::SecurityConfig;

/// Where the catalog lives.
enum Backend {
    Memory,
    Database { dsn: String, migrate: MigrateMode },
    Custom(Arc<dyn Storage>),
}

/// Everything `main` needs to run: shared state plus the background batcher.
pub struct AppRuntime {
    pub state: AppState,
    pub batcher: DeleteBatcher,
    pub cancel: CancellationToken,
}

/// Builder for creating AppState instances (used in both tests and main)
pub struct StateBuilder {
    security_config: SecurityConfig,
    batcher: BatcherConfig,
    repeat_delete: RepeatDeletePolicy,
    query_timeout: Duration,
    backend: Backend,
    cancel: CancellationToken,
}

impl StateBuilder {
    pub fn new() -> Self {
        Self {
            security_config: SecurityConfig::default(),
            batcher: BatcherConfig::default(),
            repeat_delete: RepeatDeletePolicy::default(),
            query_timeout: DEFAULT_QUERY_TIMEOUT,
            backend: Backend::Memory,
            cancel: CancellationToken::new(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new()
            .with_security(config.security())
            .with_batcher(config.batcher())
            .with_repeat_delete(config.repeat_delete)
            .with_db(config.db_dsn.clone(), config.migrate)
    }

    pub fn with_db(mut self, dsn: impl Into<String>, migrate: MigrateMode) -> Self {
        self.backend = Backend::Database {
            dsn: dsn.into(),
            migrate,
        };
        self
    }

    /// Use an already built store, e.g. a test double.
    pub fn with_store(mut self, store: Arc<dyn Storage>) -> Self {
        self.backend = Backend::Custom(store);
        self
    }

    pub fn with_security(mut self, security_config: SecurityConfig) -> Self {
        self.security_config = security_config;
        self
    }

    pub fn with_batcher(mut self, batcher: BatcherConfig) -> Self {
        self.batcher = batcher;
        self
    }

    pub fn with_repeat_delete(mut self, policy: RepeatDeletePolicy) -> Self {
        self.repeat_delete = policy;
        self
    }

    pub fn with_query_timeout(mut self, query_timeout: Duration) -> Self {
        self.query_timeout = query_timeout;
        self
    }

    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Connect storage, spawn the delete batcher, and assemble the state.
    /// Must run inside a tokio runtime.
    pub async fn build(self) -> Result<AppRuntime, AppError> {
        self.batcher.validate().map_err(AppError::config)?;

        let (store, db) = match self.backend {
            Backend::Memory => {
                let store: Arc<dyn Storage> =
                    Arc::new(MemoryStore::new().with_repeat_delete(self.repeat_delete));
                (store, None)
            }
            Backend::Database { dsn, migrate } => {
                let conn = bootstrap_db(&dsn, migrate).await?;
                let store: Arc<dyn Storage> = Arc::new(
                    SeaStore::new(conn.clone())
                        .with_query_timeout(self.query_timeout)
                        .with_repeat_delete(self.repeat_delete),
                );
                (store, Some(conn))
            }
            Backend::Custom(store) => (store, None),
        };

        let batcher =
            DeleteBatcher::spawn(store.clone(), self.batcher.clone(), self.cancel.clone());
        info!(
            threshold = self.batcher.threshold,
            flush_interval_ms = self.batcher.flush_interval.map(|d| d.as_millis() as u64),
            repeat_delete = %self.repeat_delete,
            "application state built"
        );

        let mut state = AppState::new(store, self.security_config, batcher.signaller());
        if let Some(conn) = db {
            state = state.with_db(conn);
        }

        Ok(AppRuntime {
            state,
            batcher,
            cancel: self.cancel,
        })
    }
}

impl Default for StateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn build_state() -> StateBuilder {
    StateBuilder::new()
}
