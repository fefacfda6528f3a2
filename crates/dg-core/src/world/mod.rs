//! Dungeon-wide generation
//!
//! Loads dungeon spec files and stacks generated floors into levels and levels
//! into a dungeon.

mod builder;
mod dunspec;

pub use builder::{Dungeon, Floor, FloorEntry, LevelEntry, LevelGroup, Manifest, RoomEntry};
pub use dunspec::{DunSpec, FloorType};
