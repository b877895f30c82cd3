//! Database connection and boot-time migration.

use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::info;

use crate::config::MigrateMode;
use crate::error::AppError;

/// How long a caller may wait for a pooled connection.
pub const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(2);

const MAX_CONNECTIONS: u32 = 10;

fn is_sqlite(dsn: &str) -> bool {
    dsn.starts_with("sqlite:")
}

/// Mask the password component of a DSN for logging.
pub fn sanitize_dsn(dsn: &str) -> String {
    let Some((scheme, rest)) = dsn.split_once("://") else {
        return dsn.to_string();
    };
    match rest.rsplit_once('@') {
        Some((userinfo, host)) => {
            let user = userinfo.split(':').next().unwrap_or_default();
            format!("{scheme}://{user}:***@{host}")
        }
        None => dsn.to_string(),
    }
}

/// Open a pool for `dsn`. Does not touch the schema.
pub async fn connect_db(dsn: &str) -> Result<DatabaseConnection, AppError> {
    let mut opt = ConnectOptions::new(dsn.to_owned());
    opt.acquire_timeout(ACQUIRE_TIMEOUT).sqlx_logging(false);

    // Every sqlite::memory: connection is its own database.
    if is_sqlite(dsn) {
        opt.min_connections(1).max_connections(1);
    } else {
        opt.max_connections(MAX_CONNECTIONS);
    }

    let conn = Database::connect(opt).await?;
    info!(dsn = %sanitize_dsn(dsn), "database connected");
    Ok(conn)
}

/// Connect and run the configured migration step.
pub async fn bootstrap_db(dsn: &str, mode: MigrateMode) -> Result<DatabaseConnection, AppError> {
    let conn = connect_db(dsn).await?;

    let Some(command) = mode.command() else {
        info!("migrations skipped");
        return Ok(conn);
    };

    migration::migrate(&conn, command)
        .await
        .map_err(|e| AppError::config(format!("migration failed: {e}")))?;

    let applied = migration::count_applied_migrations(&conn).await?;
    info!(?mode, applied, "migrations complete");
    Ok(conn)
}

#[cfg(test)]
mod tests {
    use migration::get_latest_migration_version;

    use super::*;

    #[test]
    fn sanitize_masks_password() {
        assert_eq!(
            sanitize_dsn("postgres://app:hunter2@db:5432/books"),
            "postgres://app:***@db:5432/books"
        );
        assert_eq!(sanitize_dsn("sqlite::memory:"), "sqlite::memory:");
        assert_eq!(
            sanitize_dsn("postgres://db:5432/books"),
            "postgres://db:5432/books"
        );
    }

    #[tokio::test]
    async fn bootstrap_applies_migrations() {
        let conn = bootstrap_db("sqlite::memory:", MigrateMode::Up).await.unwrap();
        let version = get_latest_migration_version(&conn).await.unwrap();
        assert!(version.is_some());
    }

    #[tokio::test]
    async fn skip_leaves_schema_untouched() {
        let conn = bootstrap_db("sqlite::memory:", MigrateMode::Skip)
            .await
            .unwrap();
        let version = get_latest_migration_version(&conn).await.unwrap_or(None);
        assert!(version.is_none());
    }
}
