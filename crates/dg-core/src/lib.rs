//! dg-core: Procedural dungeon generation and rendering
//!
//! Generates multi-level, multi-floor dungeon maps from a declarative spec and
//! renders every floor as a self-describing SVG document. Rooms and hallways
//! carry stable ids and classes so downstream tools can find them again.
//!
//! All randomness flows through explicitly seeded [`DungeonRng`] instances, so
//! a dungeon seed reproduces the same rooms, ids and documents.

pub mod draw;
pub mod dungeon;
pub mod world;

mod error;
mod rng;

pub use error::{DungenError, Result};
pub use rng::DungeonRng;
