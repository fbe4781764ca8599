use std::fmt::Display;

use serde::Serialize;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Player,
    Server,
    Map,
    Weapon,
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityKind::Player => write!(f, "player"),
            EntityKind::Server => write!(f, "server"),
            EntityKind::Map => write!(f, "map"),
            EntityKind::Weapon => write!(f, "weapon"),
        }
    }
}
