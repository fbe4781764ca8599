use async_trait::async_trait;
use database::repository::{self, RuleFilter};
use database::RaceTime;
use serde::Serialize;
use sqlx::SqliteConnection;
use types::{EntityKind, GameVersion};

use crate::catalog::Catalog;
use crate::error::StatsError;

pub const RACE_MODE: &str = "race";
pub const TIMED_MUTATOR: &str = "timed";

/// A map name and every match played on it. Unlike handle entities, the ids
/// come straight from `games`, so no liveness filter applies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Map {
    pub name: String,
    pub game_ids: Vec<i64>,
}

impl Map {
    pub async fn map_list(conn: &mut SqliteConnection) -> Result<Vec<String>, StatsError> {
        Self::keys(conn).await
    }

    /// Best completed timed-race score per registered handle on this map,
    /// fastest first, at most `limit` rows. A handle's tie goes to its
    /// earliest match. Unregistered players (empty handle) never appear.
    pub async fn top_races(
        &self,
        conn: &mut SqliteConnection,
        version: &GameVersion,
        limit: usize,
    ) -> Result<Vec<RaceTime>, StatsError> {
        let Some(rules) = timed_race_rules(version) else {
            tracing::debug!("{} has no {RACE_MODE}/{TIMED_MUTATOR} rules", version.name);
            return Ok(Vec::new());
        };
        if self.game_ids.is_empty() || limit == 0 {
            return Ok(Vec::new());
        }
        Ok(repository::best_race_times(conn, &self.name, rules, limit).await?)
    }
}

fn timed_race_rules(version: &GameVersion) -> Option<RuleFilter> {
    let mode = version.mode_id(RACE_MODE)?;
    let mutator = version.mutator(RACE_MODE, TIMED_MUTATOR)?;
    Some(RuleFilter {
        mode,
        mutators: mutator.mask(),
    })
}

#[async_trait]
impl Catalog for Map {
    const KIND: EntityKind = EntityKind::Map;

    async fn keys(conn: &mut SqliteConnection) -> Result<Vec<String>, StatsError> {
        Ok(repository::distinct_maps(conn).await?)
    }

    async fn count(conn: &mut SqliteConnection) -> Result<usize, StatsError> {
        Ok(repository::count_maps(conn).await?)
    }

    async fn contains(conn: &mut SqliteConnection, key: &str) -> Result<bool, StatsError> {
        Ok(repository::map_exists(conn, key).await?)
    }

    async fn load(conn: &mut SqliteConnection, key: &str) -> Result<Self, StatsError> {
        let game_ids = repository::map_game_ids(conn, key).await?;
        Ok(Self {
            name: key.to_string(),
            game_ids,
        })
    }

    fn key(&self) -> &str {
        &self.name
    }

    fn game_ids(&self) -> &[i64] {
        &self.game_ids
    }
}
