use std::ops::AddAssign;

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct MatchRecord {
    pub id: i64,
    pub time: chrono::DateTime<chrono::Utc>,
    pub map: String,
    pub mode: i64,
    pub mutators: i64,
    pub timeplayed: i64,
    pub uniqueplayers: i64,
}

/// Column-wise sums over `game_weapons`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct WeaponTotals {
    pub timewielded: i64,
    pub timeloadout: i64,
    pub damage1: i64,
    pub frags1: i64,
    pub hits1: i64,
    pub flakhits1: i64,
    pub shots1: i64,
    pub flakshots1: i64,
    pub damage2: i64,
    pub frags2: i64,
    pub hits2: i64,
    pub flakhits2: i64,
    pub shots2: i64,
    pub flakshots2: i64,
}

impl WeaponTotals {
    pub const COLUMNS: [&'static str; 14] = [
        "timewielded",
        "timeloadout",
        "damage1",
        "frags1",
        "hits1",
        "flakhits1",
        "shots1",
        "flakshots1",
        "damage2",
        "frags2",
        "hits2",
        "flakhits2",
        "shots2",
        "flakshots2",
    ];

    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }
}

impl AddAssign for WeaponTotals {
    fn add_assign(&mut self, other: Self) {
        self.timewielded += other.timewielded;
        self.timeloadout += other.timeloadout;
        self.damage1 += other.damage1;
        self.frags1 += other.frags1;
        self.hits1 += other.hits1;
        self.flakhits1 += other.flakhits1;
        self.shots1 += other.shots1;
        self.flakshots1 += other.flakshots1;
        self.damage2 += other.damage2;
        self.frags2 += other.frags2;
        self.hits2 += other.hits2;
        self.flakhits2 += other.flakhits2;
        self.shots2 += other.shots2;
        self.flakshots2 += other.flakshots2;
    }
}

impl std::iter::Sum for WeaponTotals {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), |mut acc, totals| {
            acc += totals;
            acc
        })
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub(crate) struct WeaponTotalsRow {
    pub weapon: String,
    #[sqlx(flatten)]
    pub totals: WeaponTotals,
}

/// A player's best completed time on one map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct RaceTime {
    pub game_id: i64,
    pub handle: String,
    pub name: String,
    pub score: i64,
}
