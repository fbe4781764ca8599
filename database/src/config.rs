use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

use crate::error::DatabaseError;
use crate::retry::retry_with_backoff;

pub const DATABASE_URL_ENV: &str = "STATSDB_URL";

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub pool_size: u32,
    pub connect_retries: usize,
    pub connect_backoff: Duration,
}

impl DatabaseConfig {
    pub fn from_cli_or_env_or_yaml(cli_arg: Option<String>, yaml_config: Option<String>) -> Self {
        let url = if let Some(arg) = cli_arg {
            arg
        } else if let Ok(env) = std::env::var(DATABASE_URL_ENV) {
            env
        } else if let Some(yaml) = yaml_config {
            yaml
        } else {
            "sqlite::memory:".to_string()
        };

        Self {
            url,
            pool_size: 20,
            connect_retries: 3,
            connect_backoff: Duration::from_millis(250),
        }
    }

    /// Accepts both `sqlite:` URLs and bare file paths.
    pub fn connect_options(&self) -> Result<SqliteConnectOptions, DatabaseError> {
        let options = if self.url.starts_with("sqlite:") {
            SqliteConnectOptions::from_str(&self.url)
                .map_err(|e| DatabaseError::Connection(e.to_string()))?
        } else {
            SqliteConnectOptions::new().filename(&self.url)
        };
        Ok(options.create_if_missing(true))
    }

    pub async fn create_pool(&self) -> Result<SqlitePool, DatabaseError> {
        let options = self.connect_options()?;
        let pool = retry_with_backoff(
            || {
                SqlitePoolOptions::new()
                    .max_connections(self.pool_size)
                    .connect_with(options.clone())
            },
            self.connect_retries,
            self.connect_backoff,
        )
        .await
        .map_err(|e| DatabaseError::RetryExhausted(format!("connecting to {}: {e}", self.url)))?;

        tracing::info!("Opened stats database at {}", self.url);
        Ok(pool)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_argument_wins() {
        let config = DatabaseConfig::from_cli_or_env_or_yaml(
            Some("stats.db".to_string()),
            Some("other.db".to_string()),
        );
        assert_eq!(config.url, "stats.db");
    }

    #[tokio::test]
    async fn test_create_pool_in_memory() {
        let mut config = DatabaseConfig::from_cli_or_env_or_yaml(
            Some("sqlite::memory:".to_string()),
            None,
        );
        config.pool_size = 1;
        let pool = config.create_pool().await.expect("Failed to open pool");
        let one: i64 = sqlx::query_scalar("SELECT 1")
            .fetch_one(&pool)
            .await
            .expect("Failed to query");
        assert_eq!(one, 1);
    }
}
