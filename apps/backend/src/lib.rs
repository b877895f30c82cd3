#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod adapters;
pub mod auth;
pub mod config;
pub mod entities;
pub mod error;
pub mod errors;
pub mod extractors;
pub mod infra;
pub mod logging;
pub mod middleware;
pub mod repos;
pub mod routes;
pub mod services;
pub mod state;
pub mod telemetry;
pub mod trace_ctx;

#[cfg(test)]
pub mod test_bootstrap;

// Re-exports for public API
pub use auth::jwt::{mint_access_token, verify_access_token, Claims};
pub use config::{AppConfig, MigrateMode};
pub use error::AppError;
pub use errors::{DomainError, ErrorCode};
pub use extractors::{CurrentUser, ValidatedJson};
pub use infra::db::{bootstrap_db, connect_db};
pub use infra::state::{build_state, AppRuntime, StateBuilder};
pub use infra::{MemoryStore, SeaStore};
pub use middleware::{RequestTrace, StructuredLogger};
pub use repos::{Book, BookStore, RepeatDeletePolicy, Storage, UserStore};
pub use services::delete_batcher::{BatcherConfig, BatcherError, DeleteBatcher, DeleteSignaller};
pub use state::app_state::AppState;
pub use state::security_config::SecurityConfig;

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    test_bootstrap::logging::init();
}
