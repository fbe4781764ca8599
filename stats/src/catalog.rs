use std::marker::PhantomData;

use async_trait::async_trait;
use database::repository::games_by_ids;
use database::MatchRecord;
use sqlx::SqliteConnection;
use types::EntityKind;

use crate::error::StatsError;
use crate::pagination::{page_slice, paginate, Page, PageSource};

/// A listable kind of entity: a set of keys derived from the match store,
/// each of which expands into an entity carrying the ids of its matches.
///
/// Entities are plain values rebuilt from the connection on every call.
#[async_trait]
pub trait Catalog: Sized + Send + Sync {
    const KIND: EntityKind;

    /// Every key the store knows, in a stable order.
    async fn keys(conn: &mut SqliteConnection) -> Result<Vec<String>, StatsError>;

    /// Always equal to `keys(conn).len()`.
    async fn count(conn: &mut SqliteConnection) -> Result<usize, StatsError>;

    async fn contains(conn: &mut SqliteConnection, key: &str) -> Result<bool, StatsError>;

    /// Builds the entity for `key` without checking that the key is listed.
    async fn load(conn: &mut SqliteConnection, key: &str) -> Result<Self, StatsError>;

    fn key(&self) -> &str;

    fn game_ids(&self) -> &[i64];

    async fn get_or_404(conn: &mut SqliteConnection, key: &str) -> Result<Self, StatsError> {
        if Self::contains(conn, key).await? {
            Self::load(conn, key).await
        } else {
            Err(StatsError::not_found(Self::KIND, key))
        }
    }

    async fn all(
        conn: &mut SqliteConnection,
        page: usize,
        pagesize: Option<usize>,
    ) -> Result<Vec<Self>, StatsError> {
        let keys = Self::keys(conn).await?;
        let mut entities = Vec::new();
        for key in page_slice(&keys, page, pagesize) {
            entities.push(Self::load(conn, key).await?);
        }
        Ok(entities)
    }

    async fn paginate(
        conn: &mut SqliteConnection,
        page: usize,
        per_page: usize,
    ) -> Result<Page<Self>, StatsError> {
        paginate(conn, &Listing::<Self>::new(), page, per_page).await
    }

    async fn games(
        &self,
        conn: &mut SqliteConnection,
        page: usize,
        pagesize: Option<usize>,
    ) -> Result<Vec<MatchRecord>, StatsError> {
        fetch_games(conn, self.game_ids(), page, pagesize).await
    }

    async fn games_paginate(
        &self,
        conn: &mut SqliteConnection,
        page: usize,
        per_page: usize,
    ) -> Result<Page<MatchRecord>, StatsError> {
        paginate(conn, &GameListing::new(self.game_ids()), page, per_page).await
    }
}

/// Fetches the matches for one page of `game_ids`. An empty page never
/// reaches the store.
pub async fn fetch_games(
    conn: &mut SqliteConnection,
    game_ids: &[i64],
    page: usize,
    pagesize: Option<usize>,
) -> Result<Vec<MatchRecord>, StatsError> {
    let ids = page_slice(game_ids, page, pagesize);
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    Ok(games_by_ids(conn, ids).await?)
}

/// Pages over every entity of a catalog.
pub struct Listing<C> {
    catalog: PhantomData<fn() -> C>,
}

impl<C> Listing<C> {
    pub fn new() -> Self {
        Self {
            catalog: PhantomData,
        }
    }
}

impl<C> Default for Listing<C> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<C: Catalog> PageSource for Listing<C> {
    type Item = C;

    async fn fetch(
        &self,
        conn: &mut SqliteConnection,
        page: usize,
        pagesize: usize,
    ) -> Result<Vec<C>, StatsError> {
        C::all(conn, page, Some(pagesize)).await
    }

    async fn count(&self, conn: &mut SqliteConnection) -> Result<usize, StatsError> {
        C::count(conn).await
    }
}

/// Pages over the matches behind one entity.
pub struct GameListing<'a> {
    game_ids: &'a [i64],
}

impl<'a> GameListing<'a> {
    pub fn new(game_ids: &'a [i64]) -> Self {
        Self { game_ids }
    }
}

#[async_trait]
impl<'a> PageSource for GameListing<'a> {
    type Item = MatchRecord;

    async fn fetch(
        &self,
        conn: &mut SqliteConnection,
        page: usize,
        pagesize: usize,
    ) -> Result<Vec<MatchRecord>, StatsError> {
        fetch_games(conn, self.game_ids, page, Some(pagesize)).await
    }

    async fn count(&self, _conn: &mut SqliteConnection) -> Result<usize, StatsError> {
        Ok(self.game_ids.len())
    }
}
