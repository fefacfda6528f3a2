//! Floor archetype configuration

use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum::{Display, EnumIter, EnumString};

use super::Bound;
use crate::error::{DungenError, Result};

/// Room placement algorithms
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(try_from = "String", into = "String")]
pub enum RoomAlgorithm {
    Uniform,
    Clustered,
    Linear,
}

impl TryFrom<String> for RoomAlgorithm {
    type Error = DungenError;

    fn try_from(name: String) -> Result<Self> {
        RoomAlgorithm::from_str(&name).map_err(|_| DungenError::UnknownRoomAlgorithm(name))
    }
}

impl From<RoomAlgorithm> for String {
    fn from(alg: RoomAlgorithm) -> Self {
        alg.to_string()
    }
}

/// Room and hallway drawing styles
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(try_from = "String", into = "String")]
pub enum RoomShape {
    Rect,
    Organic,
    Mixed,
}

impl TryFrom<String> for RoomShape {
    type Error = DungenError;

    fn try_from(name: String) -> Result<Self> {
        RoomShape::from_str(&name).map_err(|_| DungenError::UnknownRoomShape(name))
    }
}

impl From<RoomShape> for String {
    fn from(shape: RoomShape) -> Self {
        shape.to_string()
    }
}

/// Generation parameters for one floor archetype
///
/// `extra` carries free-form options and takes no part in equality or hashing.
/// Missing fields take their [`Default`] values when deserialised.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelSpec {
    pub name: String,
    pub width: i32,
    pub height: i32,
    pub floors: Bound,
    pub rooms: Bound,
    pub room_width: Bound,
    pub room_height: Bound,
    pub room_alg: RoomAlgorithm,
    pub room_shape: RoomShape,
    pub hall_density: f64,
    pub hall_width: i32,
    pub trap_chance: f64,
    pub monster_chance: f64,
    pub shop_chance: f64,
    pub treasure_chance: f64,
    /// Only used when a floor inherits no anchors
    pub stairs_up: Bound,
    pub stairs_down: Bound,
    /// Weight among the floor types of a dungeon
    pub probability: f64,
    pub towers: bool,
    pub extra: Map<String, Value>,
}

impl LevelSpec {
    /// Check every bound, probability and dimension
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [("width", self.width), ("height", self.height)] {
            if value <= 0 {
                return Err(DungenError::InvalidDimension { field, value });
            }
        }
        if self.hall_width < 0 {
            return Err(DungenError::InvalidDimension {
                field: "hall_width",
                value: self.hall_width,
            });
        }

        self.floors.validate("floors")?;
        self.rooms.validate("rooms")?;
        self.room_width.validate("room_width")?;
        self.room_height.validate("room_height")?;
        self.stairs_up.validate("stairs_up")?;
        self.stairs_down.validate("stairs_down")?;

        for (field, value) in [
            ("hall_density", self.hall_density),
            ("trap_chance", self.trap_chance),
            ("monster_chance", self.monster_chance),
            ("shop_chance", self.shop_chance),
            ("treasure_chance", self.treasure_chance),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(DungenError::InvalidProbability { field, value });
            }
        }
        if !(self.probability >= 0.0 && self.probability.is_finite()) {
            return Err(DungenError::InvalidProbability {
                field: "probability",
                value: self.probability,
            });
        }
        Ok(())
    }

    /// Copy of this spec with a different room count bound
    pub fn with_rooms(&self, rooms: Bound) -> Self {
        Self {
            rooms,
            ..self.clone()
        }
    }

    /// Copy of this spec with a different stairs-down bound
    pub fn with_stairs_down(&self, stairs_down: Bound) -> Self {
        Self {
            stairs_down,
            ..self.clone()
        }
    }

    /// Read a typed extra option, falling back to `default` when absent
    pub fn extra_or<T: DeserializeOwned>(&self, key: &str, default: T) -> Result<T> {
        match self.extra.get(key) {
            Some(value) => serde_json::from_value(value.clone()).map_err(|source| {
                DungenError::InvalidExtra {
                    key: key.to_string(),
                    source,
                }
            }),
            None => Ok(default),
        }
    }

    /// Read a typed extra option that may be absent
    pub fn extra_opt<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        self.extra
            .get(key)
            .map(|value| {
                serde_json::from_value(value.clone()).map_err(|source| {
                    DungenError::InvalidExtra {
                        key: key.to_string(),
                        source,
                    }
                })
            })
            .transpose()
    }
}

impl Default for LevelSpec {
    fn default() -> Self {
        Self {
            name: String::from("default"),
            width: 100,
            height: 100,
            floors: Bound::exactly(1),
            rooms: Bound::new(5, 10),
            room_width: Bound::new(5, 15),
            room_height: Bound::new(5, 15),
            room_alg: RoomAlgorithm::Uniform,
            room_shape: RoomShape::Rect,
            hall_density: 0.2,
            hall_width: 1,
            trap_chance: 0.0,
            monster_chance: 0.0,
            shop_chance: 0.0,
            treasure_chance: 0.0,
            stairs_up: Bound::exactly(1),
            stairs_down: Bound::exactly(1),
            probability: 1.0,
            towers: false,
            extra: Map::new(),
        }
    }
}

impl PartialEq for LevelSpec {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.width == other.width
            && self.height == other.height
            && self.floors == other.floors
            && self.rooms == other.rooms
            && self.room_width == other.room_width
            && self.room_height == other.room_height
            && self.room_alg == other.room_alg
            && self.room_shape == other.room_shape
            && self.hall_density.to_bits() == other.hall_density.to_bits()
            && self.hall_width == other.hall_width
            && self.trap_chance.to_bits() == other.trap_chance.to_bits()
            && self.monster_chance.to_bits() == other.monster_chance.to_bits()
            && self.shop_chance.to_bits() == other.shop_chance.to_bits()
            && self.treasure_chance.to_bits() == other.treasure_chance.to_bits()
            && self.stairs_up == other.stairs_up
            && self.stairs_down == other.stairs_down
            && self.probability.to_bits() == other.probability.to_bits()
            && self.towers == other.towers
    }
}

impl Eq for LevelSpec {}

impl Hash for LevelSpec {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.width.hash(state);
        self.height.hash(state);
        self.floors.hash(state);
        self.rooms.hash(state);
        self.room_width.hash(state);
        self.room_height.hash(state);
        self.room_alg.hash(state);
        self.room_shape.hash(state);
        self.hall_density.to_bits().hash(state);
        self.hall_width.hash(state);
        self.trap_chance.to_bits().hash(state);
        self.monster_chance.to_bits().hash(state);
        self.shop_chance.to_bits().hash(state);
        self.treasure_chance.to_bits().hash(state);
        self.stairs_up.hash(state);
        self.stairs_down.hash(state);
        self.probability.to_bits().hash(state);
        self.towers.hash(state);
    }
}
