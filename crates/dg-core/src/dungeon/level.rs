//! A single generated floor

use std::fmt;

use crate::error::Result;
use crate::rng::DungeonRng;

use super::{Connections, LevelSpec, Point, Room, RoomFactory, Stairs};

/// Rooms and pruned hallways of one floor
///
/// Built once and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct Level {
    pub width: i32,
    pub height: i32,
    rooms: Vec<Room>,
    hallways: Connections,
}

impl Level {
    /// Generate a floor from `spec`
    ///
    /// `up` holds the stairs-up anchors inherited from the floor above; `None`
    /// lets the spec pick the stairs-up count. `towers` marks every room as
    /// leading down.
    pub fn new(
        spec: &LevelSpec,
        up: Option<&[Point]>,
        towers: bool,
        rng: &mut DungeonRng,
    ) -> Result<Self> {
        let rooms: Vec<Room> = RoomFactory::new(spec, up, towers, rng)?.collect();
        let mut hallways = Connections::new(&rooms);
        hallways.prune(spec.hall_density, rng);

        log::debug!(
            "generated {} floor: {} rooms, {} hallways ({} algorithm)",
            spec.name,
            rooms.len(),
            hallways.len(),
            spec.room_alg
        );

        Ok(Self {
            width: spec.width,
            height: spec.height,
            rooms,
            hallways,
        })
    }

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn hallways(&self) -> &Connections {
        &self.hallways
    }

    /// Locations of the rooms leading down, used as the next floor's anchors
    pub fn stairs_down(&self) -> Vec<Point> {
        self.rooms
            .iter()
            .filter(|r| r.stairs.contains(Stairs::DOWN))
            .map(|r| r.location)
            .collect()
    }

    /// Count of rooms carrying each stair flag, as `(up, down)`
    pub fn stair_counts(&self) -> (usize, usize) {
        self.rooms.iter().fold((0, 0), |(up, down), r| {
            (
                up + r.stairs.contains(Stairs::UP) as usize,
                down + r.stairs.contains(Stairs::DOWN) as usize,
            )
        })
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Level: {}x{} ({} rooms)",
            self.width,
            self.height,
            self.rooms.len()
        )?;
        for (i, room) in self.rooms.iter().enumerate() {
            let doors = self.hallways.room_hallways(room).len();
            writeln!(
                f,
                "  Room {:3} [{}] {} {}",
                i + 1,
                room.status(),
                doors,
                room.id
            )?;
        }
        let index_of = |room: &Room| {
            self.rooms
                .iter()
                .position(|r| r.id == room.id)
                .map_or(0, |i| i + 1)
        };
        for hallway in &self.hallways {
            writeln!(
                f,
                "    Room {:3} -- Room {:3}",
                index_of(&hallway.room1),
                index_of(&hallway.room2)
            )?;
        }
        Ok(())
    }
}
