pub mod catalog;
pub mod config;
pub mod error;
pub mod handle;
pub mod map;
pub mod pagination;
pub mod reader;
pub mod weapon;

pub use catalog::Catalog;
pub use config::StatsConfig;
pub use error::StatsError;
pub use handle::{HandleEntity, Player, Server};
pub use map::Map;
pub use pagination::{paginate, Page, PageSource};
pub use reader::{MapDetail, PlayerDetail, StatsReader};
pub use weapon::Weapon;
