use std::marker::PhantomData;

use async_trait::async_trait;
use database::repository::{self, ParticipationTable, WeaponScope};
use serde::Serialize;
use sqlx::SqliteConnection;
use types::{EntityKind, GameVersion};

use crate::catalog::Catalog;
use crate::error::StatsError;
use crate::weapon::Weapon;

/// Which participation table a handle entity is derived from.
pub trait HandleKind: Send + Sync + 'static {
    const TABLE: ParticipationTable;
    const KIND: EntityKind;
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PlayerHandles;

impl HandleKind for PlayerHandles {
    const TABLE: ParticipationTable = ParticipationTable::Players;
    const KIND: EntityKind = EntityKind::Player;
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ServerHandles;

impl HandleKind for ServerHandles {
    const TABLE: ParticipationTable = ParticipationTable::Servers;
    const KIND: EntityKind = EntityKind::Server;
}

/// A registered identity and the live matches it took part in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HandleEntity<K> {
    pub handle: String,
    pub game_ids: Vec<i64>,
    #[serde(skip)]
    kind: PhantomData<K>,
}

pub type Player = HandleEntity<PlayerHandles>;
pub type Server = HandleEntity<ServerHandles>;

impl<K: HandleKind> HandleEntity<K> {
    pub async fn handle_list(conn: &mut SqliteConnection) -> Result<Vec<String>, StatsError> {
        Self::keys(conn).await
    }
}

#[async_trait]
impl<K: HandleKind> Catalog for HandleEntity<K> {
    const KIND: EntityKind = K::KIND;

    async fn keys(conn: &mut SqliteConnection) -> Result<Vec<String>, StatsError> {
        Ok(repository::distinct_handles(conn, K::TABLE).await?)
    }

    async fn count(conn: &mut SqliteConnection) -> Result<usize, StatsError> {
        Ok(repository::count_handles(conn, K::TABLE).await?)
    }

    async fn contains(conn: &mut SqliteConnection, key: &str) -> Result<bool, StatsError> {
        Ok(repository::handle_exists(conn, K::TABLE, key).await?)
    }

    async fn load(conn: &mut SqliteConnection, key: &str) -> Result<Self, StatsError> {
        let game_ids = repository::live_game_ids(conn, K::TABLE, key).await?;
        Ok(Self {
            handle: key.to_string(),
            game_ids,
            kind: PhantomData,
        })
    }

    fn key(&self) -> &str {
        &self.handle
    }

    fn game_ids(&self) -> &[i64] {
        &self.game_ids
    }
}

impl Player {
    /// This player's totals for every weapon of `version`, in registry order.
    pub async fn weapons(
        &self,
        conn: &mut SqliteConnection,
        version: &GameVersion,
    ) -> Result<Vec<Weapon>, StatsError> {
        Weapon::for_scope(conn, version, &WeaponScope::Player(self.handle.clone())).await
    }
}
