//! Dungeon generation
//!
//! Contains room/stair types, floor specs, room factories, hallway pruning and
//! the per-floor level.

mod corridor;
mod generation;
mod geometry;
mod level;
mod room;
mod spec;

pub use corridor::{Connections, Hallway};
pub use generation::{
    BlockStats, ClusteredRooms, LinearRooms, RoomFactory, UniformRooms, DEFAULT_BLOCK_SIZE,
    DEFAULT_CLUSTER_STARTS, DEFAULT_CLUSTER_STD, DEFAULT_EMPTY_BLOCK_CHANCE,
};
pub use geometry::{Bound, Point};
pub use level::Level;
pub use room::{Room, Stairs};
pub use spec::{LevelSpec, RoomAlgorithm, RoomShape};
