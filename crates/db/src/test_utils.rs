//! Throwaway databases for the live-`PostgreSQL` integration tests.
//!
//! Connection details come from `TEST_DB_*` variables. Each test gets its
//! own migrated database so tests can run in parallel.

use std::sync::Arc;

use sea_orm::{ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, DbErr, Statement};
use sea_orm_migration::MigratorTrait;
use tracing::{info, warn};

use crate::migrations::Migrator;

/// Where the test server lives.
#[derive(Debug, Clone)]
pub struct TestDbConfig {
    /// Server host.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Role used for every connection.
    pub username: String,
    /// Password for `username`.
    pub password: String,
    /// Database the tests connect to.
    pub database: String,
}

fn env_or(key: &str, fallback: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| fallback.to_string())
}

impl Default for TestDbConfig {
    fn default() -> Self {
        Self {
            host: env_or("TEST_DB_HOST", "localhost"),
            port: std::env::var("TEST_DB_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5433),
            username: env_or("TEST_DB_USER", "pole_test"),
            password: env_or("TEST_DB_PASSWORD", "pole_test"),
            database: env_or("TEST_DB_NAME", "pole_test"),
        }
    }
}

impl TestDbConfig {
    fn url_for(&self, database: &str) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{database}",
            self.username, self.password, self.host, self.port
        )
    }

    /// URL of the configured database.
    #[must_use]
    pub fn database_url(&self) -> String {
        self.url_for(&self.database)
    }

    /// URL of the maintenance database used to create and drop test databases.
    #[must_use]
    pub fn postgres_url(&self) -> String {
        self.url_for("postgres")
    }

    /// Run one statement against the maintenance database.
    async fn admin(&self, sql: String) -> Result<(), DbErr> {
        let conn = Database::connect(&self.postgres_url()).await?;
        let result = conn
            .execute(Statement::from_string(DatabaseBackend::Postgres, sql))
            .await;
        conn.close().await?;
        result.map(|_| ())
    }
}

/// A connected test database.
pub struct TestDatabase {
    conn: Arc<DatabaseConnection>,
    /// Settings it was opened with.
    pub config: TestDbConfig,
}

impl TestDatabase {
    /// Connect to the configured test database as is.
    pub async fn new() -> Result<Self, DbErr> {
        Self::with_config(TestDbConfig::default()).await
    }

    /// Connect with explicit settings.
    pub async fn with_config(config: TestDbConfig) -> Result<Self, DbErr> {
        let conn = Database::connect(&config.database_url()).await?;
        info!(database = %config.database, "Connected to test database");
        Ok(Self {
            conn: Arc::new(conn),
            config,
        })
    }

    /// Create a fresh, fully migrated database with a random name.
    pub async fn create_unique() -> Result<Self, DbErr> {
        let mut config = TestDbConfig::default();
        let suffix = uuid::Uuid::new_v4().simple().to_string();
        config.database = format!("pole_test_{}", &suffix[..8]);

        config
            .admin(format!("CREATE DATABASE \"{}\"", config.database))
            .await?;

        let db = Self::with_config(config).await?;
        Migrator::up(db.conn.as_ref(), None).await?;
        Ok(db)
    }

    /// Borrow the connection.
    #[must_use]
    pub fn connection(&self) -> &DatabaseConnection {
        self.conn.as_ref()
    }

    /// Shared handle for constructing repositories.
    #[must_use]
    pub fn shared(&self) -> Arc<DatabaseConnection> {
        Arc::clone(&self.conn)
    }

    /// Drop a database made by [`Self::create_unique`].
    ///
    /// Repositories still holding a [`Self::shared`] handle keep the pool
    /// open; their sessions are terminated before the drop.
    pub async fn drop_database(self) -> Result<(), DbErr> {
        match Arc::into_inner(self.conn) {
            Some(conn) => conn.close().await?,
            None => warn!(database = %self.config.database, "Connection still shared at drop"),
        }

        let name = &self.config.database;
        if let Err(e) = self
            .config
            .admin(format!(
                "SELECT pg_terminate_backend(pid) FROM pg_stat_activity WHERE datname = '{name}'"
            ))
            .await
        {
            warn!(database = %name, error = %e, "Could not terminate sessions");
        }
        self.config
            .admin(format!("DROP DATABASE IF EXISTS \"{name}\""))
            .await?;

        info!(database = %name, "Dropped test database");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls_share_credentials() {
        let config = TestDbConfig {
            host: "db".to_string(),
            port: 5433,
            username: "user".to_string(),
            password: "pass".to_string(),
            database: "pole_test_ab12cd34".to_string(),
        };
        assert_eq!(
            config.database_url(),
            "postgres://user:pass@db:5433/pole_test_ab12cd34"
        );
        assert_eq!(config.postgres_url(), "postgres://user:pass@db:5433/postgres");
    }
}
