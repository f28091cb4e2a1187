//! Application configuration.

use serde::Deserialize;
use std::path::Path;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Feed composition limits.
    #[serde(default)]
    pub feed: FeedConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to bind to.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Database connection configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    /// Run pending migrations on startup.
    #[serde(default = "default_true")]
    pub run_migrations: bool,
}

/// How many rows each feed section pulls.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedConfig {
    /// Posts shown in the feed.
    #[serde(default = "default_post_limit")]
    pub post_limit: u64,
    /// Grids shown in the feed.
    #[serde(default = "default_grid_limit")]
    pub grid_limit: u64,
    /// Active polls shown in the feed.
    #[serde(default = "default_poll_limit")]
    pub poll_limit: u64,
    /// News stories shown in the feed.
    #[serde(default = "default_news_limit")]
    pub news_limit: u64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            post_limit: default_post_limit(),
            grid_limit: default_grid_limit(),
            poll_limit: default_poll_limit(),
            news_limit: default_news_limit(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    3000
}

const fn default_max_connections() -> u32 {
    20
}

const fn default_min_connections() -> u32 {
    2
}

const fn default_true() -> bool {
    true
}

const fn default_post_limit() -> u64 {
    20
}

const fn default_grid_limit() -> u64 {
    10
}

const fn default_poll_limit() -> u64 {
    5
}

const fn default_news_limit() -> u64 {
    5
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Configuration is loaded in the following order:
    /// 1. `.env` (if present, into the process environment)
    /// 2. `config/default.toml`
    /// 3. `config/{environment}.toml` (based on `POLE_ENV`)
    /// 4. Environment variables with `POLE_` prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        let _ = dotenvy::dotenv();
        let env = std::env::var("POLE_ENV").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("POLE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Load configuration from a specific file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(
                config::Environment::with_prefix("POLE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn from_toml(source: &str) -> Result<Config, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::from_str(source, config::FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    #[test]
    fn test_defaults_fill_missing_sections() {
        let config = from_toml(
            r#"
            [database]
            url = "postgres://localhost/pole"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.database.max_connections, 20);
        assert!(config.database.run_migrations);
        assert_eq!(config.feed.post_limit, 20);
        assert_eq!(config.feed.poll_limit, 5);
    }

    #[test]
    fn test_feed_limits_override() {
        let config = from_toml(
            r#"
            [database]
            url = "postgres://localhost/pole"

            [feed]
            post_limit = 50
            news_limit = 2
            "#,
        )
        .unwrap();

        assert_eq!(config.feed.post_limit, 50);
        assert_eq!(config.feed.news_limit, 2);
        assert_eq!(config.feed.grid_limit, 10);
    }

    #[test]
    fn test_missing_database_is_error() {
        assert!(from_toml("[server]\nport = 8080\n").is_err());
    }
}
