use database::repository::{self, WeaponScope};
use database::WeaponTotals;
use serde::Serialize;
use sqlx::SqliteConnection;
use types::{EntityKind, GameVersion};

use crate::error::StatsError;

/// Summed usage counters for one weapon over some subset of matches and
/// players. Never stored; every constructor queries the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Weapon {
    pub name: String,
    #[serde(flatten)]
    pub totals: WeaponTotals,
}

impl Weapon {
    pub fn weapon_list(version: &GameVersion) -> &'static [&'static str] {
        version.weapon_list()
    }

    pub fn count(version: &GameVersion) -> usize {
        Self::weapon_list(version).len()
    }

    pub async fn finish_query(
        conn: &mut SqliteConnection,
        name: &str,
        scope: &WeaponScope,
    ) -> Result<Self, StatsError> {
        let totals = repository::weapon_totals(conn, name, scope).await?;
        Ok(Self {
            name: name.to_string(),
            totals,
        })
    }

    pub async fn from_player(
        conn: &mut SqliteConnection,
        weapon: &str,
        handle: &str,
    ) -> Result<Self, StatsError> {
        Self::finish_query(conn, weapon, &WeaponScope::Player(handle.to_string())).await
    }

    pub async fn from_game(
        conn: &mut SqliteConnection,
        weapon: &str,
        game_id: i64,
    ) -> Result<Self, StatsError> {
        Self::finish_query(conn, weapon, &WeaponScope::Game(game_id)).await
    }

    pub async fn from_game_player(
        conn: &mut SqliteConnection,
        weapon: &str,
        game_id: i64,
        handle: &str,
    ) -> Result<Self, StatsError> {
        Self::finish_query(
            conn,
            weapon,
            &WeaponScope::GamePlayer(game_id, handle.to_string()),
        )
        .await
    }

    pub async fn from_weapon(conn: &mut SqliteConnection, weapon: &str) -> Result<Self, StatsError> {
        Self::finish_query(conn, weapon, &WeaponScope::All).await
    }

    pub async fn get_or_404(
        conn: &mut SqliteConnection,
        version: &GameVersion,
        name: &str,
    ) -> Result<Self, StatsError> {
        if version.has_weapon(name) {
            Self::from_weapon(conn, name).await
        } else {
            Err(StatsError::not_found(EntityKind::Weapon, name))
        }
    }

    pub async fn all(
        conn: &mut SqliteConnection,
        version: &GameVersion,
    ) -> Result<Vec<Self>, StatsError> {
        Self::for_scope(conn, version, &WeaponScope::All).await
    }

    /// One aggregate per registry weapon within `scope`, from a single
    /// grouped query. Weapons nobody used come back zeroed; weapons outside
    /// the registry are ignored.
    pub async fn for_scope(
        conn: &mut SqliteConnection,
        version: &GameVersion,
        scope: &WeaponScope,
    ) -> Result<Vec<Self>, StatsError> {
        let mut totals = repository::weapon_totals_by_weapon(conn, scope).await?;
        Ok(Self::weapon_list(version)
            .iter()
            .map(|&name| Self {
                name: name.to_string(),
                totals: totals.remove(name).unwrap_or_default(),
            })
            .collect())
    }
}
