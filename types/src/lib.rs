pub mod entity;
pub mod version;

pub use entity::EntityKind;
pub use version::{default_version, GameVersion, Mutator};
