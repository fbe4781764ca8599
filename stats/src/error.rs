use std::time::Duration;

use database::DatabaseError;
use thiserror::Error;
use types::EntityKind;

#[derive(Error, Debug)]
pub enum StatsError {
    #[error("No {kind} named {key:?}")]
    NotFound { kind: EntityKind, key: String },

    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error("Request exceeded its {0:?} deadline")]
    Timeout(Duration),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Configuration parse error: {0}")]
    ConfigParse(#[from] serde_yaml::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StatsError {
    pub fn not_found(kind: EntityKind, key: &str) -> Self {
        StatsError::NotFound {
            kind,
            key: key.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StatsError::NotFound { .. })
    }
}

impl From<sqlx::Error> for StatsError {
    fn from(e: sqlx::Error) -> Self {
        StatsError::Database(DatabaseError::Query(e))
    }
}
