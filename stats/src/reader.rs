use std::future::Future;

use database::{MatchRecord, RaceTime};
use sqlx::{Sqlite, SqlitePool, Transaction};
use types::GameVersion;

use crate::catalog::Catalog;
use crate::config::StatsConfig;
use crate::error::StatsError;
use crate::handle::Player;
use crate::map::Map;
use crate::pagination::Page;
use crate::weapon::Weapon;

#[derive(Debug, Clone)]
pub struct MapDetail {
    pub map: Map,
    pub topraces: Vec<RaceTime>,
    pub games: Page<MatchRecord>,
}

#[derive(Debug, Clone)]
pub struct PlayerDetail {
    pub player: Player,
    pub games: Page<MatchRecord>,
    pub weapons: Option<Vec<Weapon>>,
}

/// Entry point for callers serving one request at a time. Every method reads
/// through its own transaction, so all queries of a request see the same
/// snapshot, and honours the configured request deadline.
pub struct StatsReader {
    pool: SqlitePool,
    config: StatsConfig,
    version: &'static GameVersion,
}

impl StatsReader {
    pub fn new(pool: SqlitePool, config: StatsConfig) -> Result<Self, StatsError> {
        let version = config.game_version()?;
        Ok(Self {
            pool,
            config,
            version,
        })
    }

    pub fn version(&self) -> &'static GameVersion {
        self.version
    }

    pub fn config(&self) -> &StatsConfig {
        &self.config
    }

    async fn snapshot(&self) -> Result<Transaction<'static, Sqlite>, StatsError> {
        Ok(self.pool.begin().await?)
    }

    async fn with_deadline<T, F>(&self, request: F) -> Result<T, StatsError>
    where
        F: Future<Output = Result<T, StatsError>>,
    {
        match self.config.request_timeout() {
            Some(limit) => tokio::time::timeout(limit, request)
                .await
                .map_err(|_| StatsError::Timeout(limit))?,
            None => request.await,
        }
    }

    pub async fn list<C: Catalog>(&self, page: usize, per_page: usize) -> Result<Page<C>, StatsError> {
        self.with_deadline(async {
            let mut tx = self.snapshot().await?;
            C::paginate(&mut *tx, page, per_page).await
        })
        .await
    }

    pub async fn get<C: Catalog>(&self, key: &str) -> Result<C, StatsError> {
        self.with_deadline(async {
            let mut tx = self.snapshot().await?;
            let entity = C::get_or_404(&mut *tx, key).await?;
            tracing::debug!("{} {:?}: {} games", C::KIND, entity.key(), entity.game_ids().len());
            Ok(entity)
        })
        .await
    }

    /// The entity for `key` along with one page of its matches.
    pub async fn get_with_games<C: Catalog>(
        &self,
        key: &str,
        page: usize,
        per_page: usize,
    ) -> Result<(C, Page<MatchRecord>), StatsError> {
        self.with_deadline(async {
            let mut tx = self.snapshot().await?;
            let entity = C::get_or_404(&mut *tx, key).await?;
            let games = entity.games_paginate(&mut *tx, page, per_page).await?;
            Ok((entity, games))
        })
        .await
    }

    pub async fn player_weapons(&self, handle: &str) -> Result<(Player, Vec<Weapon>), StatsError> {
        self.with_deadline(async {
            let mut tx = self.snapshot().await?;
            let player = Player::get_or_404(&mut *tx, handle).await?;
            let weapons = player.weapons(&mut *tx, self.version).await?;
            Ok((player, weapons))
        })
        .await
    }

    /// A player, one page of their matches and, when asked for, their weapon
    /// totals, all read from one snapshot.
    pub async fn player_detail(
        &self,
        handle: &str,
        page: usize,
        per_page: usize,
        with_weapons: bool,
    ) -> Result<PlayerDetail, StatsError> {
        self.with_deadline(async {
            let mut tx = self.snapshot().await?;
            let player = Player::get_or_404(&mut *tx, handle).await?;
            let games = player.games_paginate(&mut *tx, page, per_page).await?;
            let weapons = if with_weapons {
                Some(player.weapons(&mut *tx, self.version).await?)
            } else {
                None
            };
            Ok(PlayerDetail {
                player,
                games,
                weapons,
            })
        })
        .await
    }

    pub async fn map_detail(
        &self,
        name: &str,
        page: usize,
        per_page: usize,
    ) -> Result<MapDetail, StatsError> {
        self.with_deadline(async {
            let mut tx = self.snapshot().await?;
            let map = Map::get_or_404(&mut *tx, name).await?;
            let topraces = map
                .top_races(&mut *tx, self.version, self.config.highscore_results)
                .await?;
            let games = map.games_paginate(&mut *tx, page, per_page).await?;
            Ok(MapDetail {
                map,
                topraces,
                games,
            })
        })
        .await
    }

    pub async fn weapons(&self) -> Result<Vec<Weapon>, StatsError> {
        self.with_deadline(async {
            let mut tx = self.snapshot().await?;
            Weapon::all(&mut *tx, self.version).await
        })
        .await
    }

    pub async fn weapon(&self, name: &str) -> Result<Weapon, StatsError> {
        self.with_deadline(async {
            let mut tx = self.snapshot().await?;
            Weapon::get_or_404(&mut *tx, self.version, name).await
        })
        .await
    }
}
