//! Database primitives: connection settings, the shared pool, employee
//! storage queries and schema diagnostics.

pub mod diagnostics;
pub mod employees;

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use thiserror::Error;
use tracing::debug;

pub use diagnostics::{ColumnInfo, DbReport, inspect};
pub use employees::NewEmployee;

/// Shared connection pool. Each query borrows a connection and hands it
/// back once the future completes or is dropped.
pub type DbPool = DatabaseConnection;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("database url missing")]
    MissingUrl,
    #[error("failed to connect to database: {0}")]
    Connect(#[source] DbErr),
    #[error(transparent)]
    Query(#[from] DbErr),
}

pub type DbResult<T> = Result<T, DbError>;

const DEFAULT_URL: &str = "sqlite://employees.db?mode=rwc";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Environment-driven connection settings.
#[derive(Clone, Debug)]
pub struct DatabaseSettings {
    url: String,
    max_connections: u32,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self::new(DEFAULT_URL)
    }
}

impl DatabaseSettings {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }

    /// Reads `DATABASE_URL` and `DATABASE_MAX_CONNECTIONS`, falling back to
    /// a local `employees.db` file.
    pub fn from_env() -> Self {
        let url = std::env::var("DATABASE_URL")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_URL.to_string());
        let max_connections = std::env::var("DATABASE_MAX_CONNECTIONS")
            .ok()
            .and_then(|value| value.parse::<u32>().ok())
            .filter(|value| *value > 0)
            .unwrap_or(DEFAULT_MAX_CONNECTIONS);
        Self {
            url,
            max_connections,
        }
    }

    pub fn with_max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections.max(1);
        self
    }

    pub fn database_url(&self) -> DbResult<&str> {
        let url = self.url.trim();
        if url.is_empty() {
            Err(DbError::MissingUrl)
        } else {
            Ok(url)
        }
    }

    // An in-memory SQLite database lives and dies with its connection.
    fn effective_max_connections(&self) -> u32 {
        if self.url.contains(":memory:") {
            1
        } else {
            self.max_connections
        }
    }
}

pub async fn connect(settings: &DatabaseSettings) -> DbResult<DbPool> {
    let url = settings.database_url()?;
    let mut options = ConnectOptions::new(url.to_string());
    options
        .max_connections(settings.effective_max_connections())
        .sqlx_logging(false);
    debug!(url, "opening database pool");
    Database::connect(options).await.map_err(DbError::Connect)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_url_is_rejected() {
        let settings = DatabaseSettings::new("   ");
        assert!(matches!(settings.database_url(), Err(DbError::MissingUrl)));
    }

    #[test]
    fn default_points_at_local_file() {
        let settings = DatabaseSettings::default();
        assert_eq!(settings.database_url().unwrap(), DEFAULT_URL);
        assert_eq!(settings.effective_max_connections(), DEFAULT_MAX_CONNECTIONS);
    }

    #[test]
    fn in_memory_databases_use_a_single_connection() {
        let settings = DatabaseSettings::new("sqlite::memory:").with_max_connections(8);
        assert_eq!(settings.effective_max_connections(), 1);
    }

    #[tokio::test]
    async fn connects_to_in_memory_sqlite() {
        let pool = connect(&DatabaseSettings::new("sqlite::memory:"))
            .await
            .unwrap();
        let report = inspect(&pool).await.unwrap();
        assert!(report.connected);
        assert!(!report.has_employees_table());
    }
}
