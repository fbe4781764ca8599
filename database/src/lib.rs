pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod retry;

#[cfg(test)]
mod tests;

pub use config::DatabaseConfig;
pub use error::DatabaseError;
pub use models::{MatchRecord, RaceTime, WeaponTotals};
pub use repository::{ParticipationTable, RuleFilter, StatsDatabase, WeaponScope};
pub use retry::retry_with_backoff;
