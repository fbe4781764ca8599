use std::collections::HashMap;

use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};

use super::error::DatabaseError;
use super::models::*;

/// Upper bound on bound parameters per `IN (...)` lookup.
pub const GAME_ID_BATCH: usize = 500;

pub struct StatsDatabase {
    pool: SqlitePool,
}

impl StatsDatabase {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn run_migrations(&self) -> Result<(), DatabaseError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        tracing::info!("Stats database migrations applied");
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

/// Tables linking a match to a registered identity.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ParticipationTable {
    Players,
    Servers,
}

impl ParticipationTable {
    pub fn name(self) -> &'static str {
        match self {
            ParticipationTable::Players => "game_players",
            ParticipationTable::Servers => "game_servers",
        }
    }
}

pub async fn distinct_handles(
    conn: &mut SqliteConnection,
    table: ParticipationTable,
) -> Result<Vec<String>, DatabaseError> {
    let sql = format!(
        "SELECT handle FROM {} WHERE handle != '' GROUP BY handle ORDER BY handle",
        table.name()
    );
    let handles: Vec<String> = sqlx::query_scalar(&sql).fetch_all(&mut *conn).await?;
    tracing::debug!("{}: {} distinct handles", table.name(), handles.len());
    Ok(handles)
}

pub async fn count_handles(
    conn: &mut SqliteConnection,
    table: ParticipationTable,
) -> Result<usize, DatabaseError> {
    let sql = format!(
        "SELECT COUNT(DISTINCT handle) FROM {} WHERE handle != ''",
        table.name()
    );
    let count: i64 = sqlx::query_scalar(&sql).fetch_one(&mut *conn).await?;
    Ok(count as usize)
}

pub async fn handle_exists(
    conn: &mut SqliteConnection,
    table: ParticipationTable,
    handle: &str,
) -> Result<bool, DatabaseError> {
    if handle.is_empty() {
        return Ok(false);
    }
    let sql = format!(
        "SELECT EXISTS (SELECT 1 FROM {} WHERE handle = ?)",
        table.name()
    );
    let exists: i64 = sqlx::query_scalar(&sql)
        .bind(handle)
        .fetch_one(&mut *conn)
        .await?;
    Ok(exists != 0)
}

/// Match ids referenced by `handle`, restricted to matches still present in
/// `games`.
pub async fn live_game_ids(
    conn: &mut SqliteConnection,
    table: ParticipationTable,
    handle: &str,
) -> Result<Vec<i64>, DatabaseError> {
    let sql = format!(
        "SELECT DISTINCT p.game_id FROM {} p
         INNER JOIN games g ON g.id = p.game_id
         WHERE p.handle = ?
         ORDER BY p.game_id",
        table.name()
    );
    let ids: Vec<i64> = sqlx::query_scalar(&sql)
        .bind(handle)
        .fetch_all(&mut *conn)
        .await?;
    tracing::debug!("{} {:?}: {} live games", table.name(), handle, ids.len());
    Ok(ids)
}

pub async fn distinct_maps(conn: &mut SqliteConnection) -> Result<Vec<String>, DatabaseError> {
    let maps: Vec<String> = sqlx::query_scalar("SELECT map FROM games GROUP BY map ORDER BY map")
        .fetch_all(&mut *conn)
        .await?;
    tracing::debug!("games: {} distinct maps", maps.len());
    Ok(maps)
}

pub async fn count_maps(conn: &mut SqliteConnection) -> Result<usize, DatabaseError> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(DISTINCT map) FROM games")
        .fetch_one(&mut *conn)
        .await?;
    Ok(count as usize)
}

pub async fn map_exists(conn: &mut SqliteConnection, name: &str) -> Result<bool, DatabaseError> {
    let exists: i64 = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM games WHERE map = ?)")
        .bind(name)
        .fetch_one(&mut *conn)
        .await?;
    Ok(exists != 0)
}

pub async fn map_game_ids(
    conn: &mut SqliteConnection,
    name: &str,
) -> Result<Vec<i64>, DatabaseError> {
    let ids: Vec<i64> = sqlx::query_scalar("SELECT id FROM games WHERE map = ? ORDER BY id")
        .bind(name)
        .fetch_all(&mut *conn)
        .await?;
    Ok(ids)
}

/// Full match rows for `ids`, ordered by id. Ids without a match are skipped.
pub async fn games_by_ids(
    conn: &mut SqliteConnection,
    ids: &[i64],
) -> Result<Vec<MatchRecord>, DatabaseError> {
    let mut games = Vec::with_capacity(ids.len());
    for chunk in ids.chunks(GAME_ID_BATCH) {
        let mut query: QueryBuilder<Sqlite> = QueryBuilder::new(
            "SELECT id, time, map, mode, mutators, timeplayed, uniqueplayers FROM games WHERE id IN (",
        );
        let mut separated = query.separated(", ");
        for id in chunk {
            separated.push_bind(*id);
        }
        separated.push_unseparated(")");

        let rows = query
            .build_query_as::<MatchRecord>()
            .fetch_all(&mut *conn)
            .await?;
        games.extend(rows);
    }
    games.sort_by_key(|g| g.id);
    tracing::debug!("games: fetched {} of {} requested", games.len(), ids.len());
    Ok(games)
}

/// Subset of `game_weapons` a weapon aggregate is summed over.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WeaponScope {
    All,
    Player(String),
    Game(i64),
    GamePlayer(i64, String),
}

impl WeaponScope {
    fn push_filter(&self, query: &mut QueryBuilder<'_, Sqlite>) {
        match self {
            WeaponScope::All => {}
            WeaponScope::Player(handle) => {
                query.push(" AND playerhandle = ").push_bind(handle.clone());
            }
            WeaponScope::Game(game_id) => {
                query.push(" AND game_id = ").push_bind(*game_id);
            }
            WeaponScope::GamePlayer(game_id, handle) => {
                query.push(" AND game_id = ").push_bind(*game_id);
                query.push(" AND playerhandle = ").push_bind(handle.clone());
            }
        }
    }
}

fn sum_columns() -> String {
    WeaponTotals::COLUMNS
        .iter()
        .map(|c| format!("COALESCE(SUM({c}), 0) AS {c}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Sums every counter of `weapon` within `scope`. No matching rows yields
/// all zeros.
pub async fn weapon_totals(
    conn: &mut SqliteConnection,
    weapon: &str,
    scope: &WeaponScope,
) -> Result<WeaponTotals, DatabaseError> {
    let mut query: QueryBuilder<Sqlite> = QueryBuilder::new("SELECT ");
    query.push(sum_columns());
    query
        .push(" FROM game_weapons WHERE weapon = ")
        .push_bind(weapon.to_string());
    scope.push_filter(&mut query);

    let totals = query
        .build_query_as::<WeaponTotals>()
        .fetch_one(&mut *conn)
        .await?;
    Ok(totals)
}

/// Same sums as [`weapon_totals`] for every weapon with rows in `scope`, in
/// one grouped query. Weapons without rows are absent from the map.
pub async fn weapon_totals_by_weapon(
    conn: &mut SqliteConnection,
    scope: &WeaponScope,
) -> Result<HashMap<String, WeaponTotals>, DatabaseError> {
    let mut query: QueryBuilder<Sqlite> = QueryBuilder::new("SELECT weapon, ");
    query.push(sum_columns());
    query.push(" FROM game_weapons WHERE 1 = 1");
    scope.push_filter(&mut query);
    query.push(" GROUP BY weapon");

    let rows = query
        .build_query_as::<WeaponTotalsRow>()
        .fetch_all(&mut *conn)
        .await?;
    tracing::debug!("game_weapons {:?}: {} weapons", scope, rows.len());
    Ok(rows.into_iter().map(|r| (r.weapon, r.totals)).collect())
}

/// Mode and mutator predicates evaluated against the owning match. A match
/// passes when its mode equals `mode` and every bit of `mutators` is set.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RuleFilter {
    pub mode: i64,
    pub mutators: i64,
}

impl RuleFilter {
    fn push_filter(&self, query: &mut QueryBuilder<'_, Sqlite>) {
        query.push(" AND g.mode = ").push_bind(self.mode);
        query
            .push(" AND (g.mutators & ")
            .push_bind(self.mutators)
            .push(") = ")
            .push_bind(self.mutators);
    }
}

/// Best (lowest) positive score per registered handle over the matches
/// played on `map` that pass `rules`. Ties within a handle go to the lowest
/// match id.
pub async fn best_race_times(
    conn: &mut SqliteConnection,
    map: &str,
    rules: RuleFilter,
    limit: usize,
) -> Result<Vec<RaceTime>, DatabaseError> {
    let mut query: QueryBuilder<Sqlite> = QueryBuilder::new(
        "SELECT game_id, handle, name, score FROM (
            SELECT p.game_id, p.handle, p.name, p.score,
                ROW_NUMBER() OVER (
                    PARTITION BY p.handle ORDER BY p.score ASC, p.game_id ASC
                ) AS position
            FROM game_players p
            INNER JOIN games g ON g.id = p.game_id
            WHERE g.map = ",
    );
    query.push_bind(map.to_string());
    query.push(" AND p.handle != '' AND p.score > 0");
    rules.push_filter(&mut query);
    query.push(") WHERE position = 1 ORDER BY score ASC, game_id ASC LIMIT ");
    query.push_bind(limit as i64);

    let times = query
        .build_query_as::<RaceTime>()
        .fetch_all(&mut *conn)
        .await?;
    tracing::debug!("map {:?}: {} race times", map, times.len());
    Ok(times)
}
