//! Room factories
//!
//! Each factory is a single-pass iterator over the rooms of one floor. The
//! clustered and linear factories start by replaying the uniform factory to pick
//! up the stair rooms, so the points where they stop pulling from it matter:
//! - clustered stops at the first non-stair room once enough non-stair seeds exist
//! - linear stops at the first non-stair room
//!
//! Factories never check for overlapping rooms.

use std::mem;

use crate::error::Result;
use crate::rng::DungeonRng;

use super::{Bound, LevelSpec, Point, Room, RoomAlgorithm, Stairs};

/// Default multiplier applied to the room size upper bound for cluster spread
pub const DEFAULT_CLUSTER_STD: f64 = 2.0;
/// Default number of cluster seed rooms
pub const DEFAULT_CLUSTER_STARTS: usize = 5;
/// Default linear block size
pub const DEFAULT_BLOCK_SIZE: i32 = 120;
/// Default chance that a linear block is left empty
pub const DEFAULT_EMPTY_BLOCK_CHANCE: f64 = 0.2;

/// Per-room random rolls shared by every factory
#[derive(Debug, Clone, Copy)]
struct RoomRolls {
    room_width: Bound,
    room_height: Bound,
    trap_chance: f64,
    monster_chance: f64,
    shop_chance: f64,
    treasure_chance: f64,
}

impl RoomRolls {
    fn from_spec(spec: &LevelSpec) -> Self {
        Self {
            room_width: spec.room_width,
            room_height: spec.room_height,
            trap_chance: spec.trap_chance,
            monster_chance: spec.monster_chance,
            shop_chance: spec.shop_chance,
            treasure_chance: spec.treasure_chance,
        }
    }

    /// Roll shop status and size
    fn roll_shape(&self, rng: &mut DungeonRng) -> (bool, i32, i32) {
        let shop = rng.chance(self.shop_chance);
        let width = rng.between(self.room_width);
        let height = rng.between(self.room_height);
        (shop, width, height)
    }

    /// Finish a room; shops never carry monsters, treasure or traps
    fn build(
        &self,
        rng: &mut DungeonRng,
        location: Point,
        (width, height): (i32, i32),
        shop: bool,
        stairs: Stairs,
    ) -> Room {
        let (monsters, treasure, trap) = if shop {
            (false, false, false)
        } else {
            (
                rng.chance(self.monster_chance),
                rng.chance(self.treasure_chance),
                rng.chance(self.trap_chance),
            )
        };
        Room {
            id: rng.uuid(),
            location,
            width,
            height,
            monsters,
            treasure,
            trap,
            shop,
            stairs,
        }
    }
}

/// Stairs carried by rooms that are not stair seeds
fn body_stairs(towers: bool) -> Stairs {
    if towers { Stairs::DOWN } else { Stairs::NONE }
}

/// Rooms placed uniformly at random over an area
///
/// The first rooms take the stairs-up anchors, the following ones the
/// stairs-down count.
pub struct UniformRooms<'a> {
    rolls: RoomRolls,
    width: i32,
    height: i32,
    up: &'a [Point],
    towers: bool,
    remaining: i32,
    up_placed: usize,
    stairs_up: i32,
    stairs_down: i32,
    rng: &'a mut DungeonRng,
}

impl<'a> UniformRooms<'a> {
    /// Uniform rooms over a whole floor
    ///
    /// With no anchors the stairs-up count is drawn from `spec.stairs_up` and
    /// those rooms are placed freely.
    pub fn new(
        spec: &LevelSpec,
        up: Option<&'a [Point]>,
        towers: bool,
        rng: &'a mut DungeonRng,
    ) -> Self {
        let stairs_up = match up {
            Some(anchors) => anchors.len() as i32,
            None => rng.between(spec.stairs_up),
        };
        let mut stairs_down = rng.between(spec.stairs_down);
        if towers {
            stairs_down = (stairs_down - stairs_up).max(0);
        }
        let remaining = rng.between(spec.rooms).max(stairs_up);

        Self {
            rolls: RoomRolls::from_spec(spec),
            width: spec.width,
            height: spec.height,
            up: up.unwrap_or(&[]),
            towers,
            remaining,
            up_placed: 0,
            stairs_up,
            stairs_down,
            rng,
        }
    }

    /// Stair-less uniform rooms inside a local `width` x `height` area
    fn scoped(
        rolls: RoomRolls,
        width: i32,
        height: i32,
        rooms: Bound,
        rng: &'a mut DungeonRng,
    ) -> Self {
        let remaining = rng.between(rooms);
        Self {
            rolls,
            width,
            height,
            up: &[],
            towers: false,
            remaining,
            up_placed: 0,
            stairs_up: 0,
            stairs_down: 0,
            rng,
        }
    }

    /// Hand the RNG back once this factory is no longer needed
    fn into_rng(self) -> &'a mut DungeonRng {
        self.rng
    }
}

impl Iterator for UniformRooms<'_> {
    type Item = Room;

    fn next(&mut self) -> Option<Room> {
        if self.remaining <= 0 {
            return None;
        }
        self.remaining -= 1;

        let (mut shop, w, h) = self.rolls.roll_shape(self.rng);
        let mut location = Point::new(
            self.rng.range_inclusive(0, self.width - w) as f64,
            self.rng.range_inclusive(0, self.height - h) as f64,
        );

        let mut stairs = Stairs::NONE;
        if self.stairs_up > 0 {
            self.stairs_up -= 1;
            stairs = Stairs::UP;
            shop = false;
            if let Some(anchor) = self.up.get(self.up_placed) {
                location = *anchor;
            }
            self.up_placed += 1;
        } else if self.stairs_down > 0 {
            self.stairs_down -= 1;
            stairs = Stairs::DOWN;
            shop = false;
        }
        if self.towers {
            stairs |= Stairs::DOWN;
        }

        Some(self.rolls.build(self.rng, location, (w, h), shop, stairs))
    }
}

enum ClusterPhase<'a> {
    Seeds(UniformRooms<'a>),
    Growing(&'a mut DungeonRng),
    Done,
}

/// Seed rooms from the uniform factory, each grown into a chain of nearby rooms
pub struct ClusteredRooms<'a> {
    rolls: RoomRolls,
    width: i32,
    height: i32,
    rooms: Bound,
    std_mult: f64,
    start_count: usize,
    body_stairs: Stairs,
    phase: ClusterPhase<'a>,
    seeds: Vec<Room>,
    open_seeds: usize,
    next_seed: usize,
    chain_left: i32,
    previous: Option<Room>,
}

impl<'a> ClusteredRooms<'a> {
    pub fn new(
        spec: &LevelSpec,
        up: Option<&'a [Point]>,
        towers: bool,
        rng: &'a mut DungeonRng,
    ) -> Result<Self> {
        let std_mult = spec.extra_or("cluster_std", DEFAULT_CLUSTER_STD)?;
        let start_count = spec.extra_or("cluster_starts", DEFAULT_CLUSTER_STARTS)?;
        Ok(Self {
            rolls: RoomRolls::from_spec(spec),
            width: spec.width,
            height: spec.height,
            rooms: spec.rooms,
            std_mult,
            start_count,
            body_stairs: body_stairs(towers),
            phase: ClusterPhase::Seeds(UniformRooms::new(spec, up, towers, rng)),
            seeds: Vec::new(),
            open_seeds: 0,
            next_seed: 0,
            chain_left: 0,
            previous: None,
        })
    }

    fn start_growing(&mut self) {
        if let ClusterPhase::Seeds(uniform) = mem::replace(&mut self.phase, ClusterPhase::Done) {
            log::trace!("clustered: {} seed rooms", self.seeds.len());
            if !self.seeds.is_empty() {
                self.phase = ClusterPhase::Growing(uniform.into_rng());
            }
        }
    }

    /// Pull the next seed from the uniform factory
    fn next_from_seeds(&mut self) -> Option<Room> {
        let ClusterPhase::Seeds(uniform) = &mut self.phase else {
            return None;
        };
        let room = uniform.next()?;
        if room.stairs.is_empty() {
            if self.open_seeds >= self.start_count {
                return None;
            }
            self.open_seeds += 1;
        }
        self.seeds.push(room);
        Some(room)
    }

    fn grow(&mut self) -> Option<Room> {
        let ClusterPhase::Growing(rng) = &mut self.phase else {
            return None;
        };
        let n = self.seeds.len() as i32;

        while self.chain_left <= 0 {
            let seed = *self.seeds.get(self.next_seed)?;
            self.next_seed += 1;
            self.previous = Some(seed);
            self.chain_left = self.rooms.upper / n - self.rooms.lower / n;
        }
        self.chain_left -= 1;

        let previous = self.previous?;
        let (shop, w, h) = self.rolls.roll_shape(rng);
        let std_x = self.std_mult * self.rolls.room_width.upper as f64;
        let std_y = self.std_mult * self.rolls.room_height.upper as f64;
        let max_x = (self.width - w) as f64;
        let max_y = (self.height - h) as f64;

        // No attempt cap: a room that cannot fit strictly inside the floor never terminates.
        let location = loop {
            let candidate = Point::new(
                rng.gauss(previous.location.x, std_x),
                rng.gauss(previous.location.y, std_y),
            )
            .trunc();
            if candidate.x > 0.0 && candidate.y > 0.0 && candidate.x < max_x && candidate.y < max_y
            {
                break candidate;
            }
        };

        let room = self.rolls.build(rng, location, (w, h), shop, self.body_stairs);
        self.previous = Some(room);
        Some(room)
    }
}

impl Iterator for ClusteredRooms<'_> {
    type Item = Room;

    fn next(&mut self) -> Option<Room> {
        loop {
            match self.phase {
                ClusterPhase::Seeds(_) => match self.next_from_seeds() {
                    Some(room) => return Some(room),
                    None => self.start_growing(),
                },
                ClusterPhase::Growing(_) => {
                    let room = self.grow();
                    if room.is_none() {
                        self.phase = ClusterPhase::Done;
                    }
                    return room;
                }
                ClusterPhase::Done => return None,
            }
        }
    }
}

/// Block bookkeeping kept by [`LinearRooms`]
#[derive(Debug, Clone, Default)]
pub struct BlockStats {
    /// Blocks that fit on the floor
    pub total: usize,
    /// Blocks left empty
    pub skipped: usize,
    /// Top-left corners of the blocks that received rooms
    pub filled: Vec<Point>,
}

enum LinearPhase<'a> {
    Stairs(UniformRooms<'a>),
    Scanning(&'a mut DungeonRng),
    Block {
        rooms: UniformRooms<'a>,
        origin: Point,
    },
    Done,
}

/// Stair rooms from the uniform factory, then rows of blocks each filled by a
/// block-local uniform factory
pub struct LinearRooms<'a> {
    rolls: RoomRolls,
    width: i32,
    height: i32,
    rooms: Bound,
    block_width: i32,
    block_height: i32,
    empty_block_chance: f64,
    body_stairs: Stairs,
    phase: LinearPhase<'a>,
    stair_rooms: i32,
    rooms_in_block: Bound,
    cursor_x: Option<i32>,
    cursor_y: i32,
    stats: BlockStats,
}

impl<'a> LinearRooms<'a> {
    pub fn new(
        spec: &LevelSpec,
        up: Option<&'a [Point]>,
        towers: bool,
        rng: &'a mut DungeonRng,
    ) -> Result<Self> {
        let block_width = spec.extra_or("block_width", DEFAULT_BLOCK_SIZE)?;
        let block_height = spec.extra_or("block_height", DEFAULT_BLOCK_SIZE)?;
        let empty_block_chance =
            spec.extra_or("empty_block_chance", DEFAULT_EMPTY_BLOCK_CHANCE)?;
        Ok(Self {
            rolls: RoomRolls::from_spec(spec),
            width: spec.width,
            height: spec.height,
            rooms: spec.rooms,
            block_width,
            block_height,
            empty_block_chance,
            body_stairs: body_stairs(towers),
            phase: LinearPhase::Stairs(UniformRooms::new(spec, up, towers, rng)),
            stair_rooms: 0,
            rooms_in_block: Bound::exactly(0),
            cursor_x: None,
            cursor_y: 0,
            stats: BlockStats::default(),
        })
    }

    /// Block counters, complete once the iterator is exhausted
    pub fn stats(&self) -> &BlockStats {
        &self.stats
    }

    pub fn block_size(&self) -> (i32, i32) {
        (self.block_width, self.block_height)
    }

    /// Size the blocks once the stair rooms are known
    fn start_scanning(&mut self, rng: &'a mut DungeonRng) {
        let floor_area = self.width as i64 * self.height as i64;
        let blocks_for = |rw: i32, rh: i32| {
            let block_area = (self.block_width + rw) as i64 * (self.block_height + rh) as i64;
            (floor_area / block_area.max(1)).max(1) as i32
        };
        let block_count = Bound::new(
            blocks_for(self.rolls.room_width.upper, self.rolls.room_height.upper),
            blocks_for(self.rolls.room_width.lower, self.rolls.room_height.lower),
        );

        let total_rooms = rng.range_inclusive(self.rooms.lower, self.rooms.upper - self.stair_rooms);
        self.rooms_in_block = Bound::new(
            total_rooms / block_count.upper,
            total_rooms / block_count.lower,
        );
        self.cursor_y = rng.between(self.rolls.room_height);
        log::trace!(
            "linear: {} stair rooms, {} rooms over {} blocks",
            self.stair_rooms,
            total_rooms,
            block_count
        );
        self.phase = LinearPhase::Scanning(rng);
    }

    /// Advance the block cursor to the next non-empty block
    fn next_block(&mut self, rng: &mut DungeonRng) -> Option<Point> {
        loop {
            if self.cursor_y + self.block_height > self.height {
                return None;
            }
            let x = match self.cursor_x {
                Some(x) => x,
                None => rng.between(self.rolls.room_width),
            };
            if x + self.block_width > self.width {
                self.cursor_x = None;
                self.cursor_y += self.block_height + rng.between(self.rolls.room_height);
                continue;
            }

            self.stats.total += 1;
            let skip = rng.chance(self.empty_block_chance);
            self.cursor_x = Some(x + self.block_width + rng.between(self.rolls.room_width));
            if skip {
                self.stats.skipped += 1;
                continue;
            }
            let origin = Point::new(x as f64, self.cursor_y as f64);
            self.stats.filled.push(origin);
            return Some(origin);
        }
    }
}

impl Iterator for LinearRooms<'_> {
    type Item = Room;

    fn next(&mut self) -> Option<Room> {
        loop {
            match mem::replace(&mut self.phase, LinearPhase::Done) {
                LinearPhase::Stairs(mut uniform) => match uniform.next() {
                    Some(room) if !room.stairs.is_empty() => {
                        self.stair_rooms += 1;
                        self.phase = LinearPhase::Stairs(uniform);
                        return Some(room);
                    }
                    _ => self.start_scanning(uniform.into_rng()),
                },
                LinearPhase::Scanning(rng) => {
                    let Some(origin) = self.next_block(rng) else {
                        return None;
                    };
                    let rooms = UniformRooms::scoped(
                        self.rolls,
                        self.block_width,
                        self.block_height,
                        self.rooms_in_block,
                        rng,
                    );
                    self.phase = LinearPhase::Block { rooms, origin };
                }
                LinearPhase::Block { mut rooms, origin } => match rooms.next() {
                    Some(room) => {
                        self.phase = LinearPhase::Block { rooms, origin };
                        return Some(Room {
                            location: room.location.offset(origin.x, origin.y),
                            stairs: self.body_stairs,
                            ..room
                        });
                    }
                    None => self.phase = LinearPhase::Scanning(rooms.into_rng()),
                },
                LinearPhase::Done => return None,
            }
        }
    }
}

/// The room factory selected by a spec's room algorithm
pub enum RoomFactory<'a> {
    Uniform(UniformRooms<'a>),
    Clustered(ClusteredRooms<'a>),
    Linear(LinearRooms<'a>),
}

impl<'a> RoomFactory<'a> {
    /// Build the factory named by `spec.room_alg`
    pub fn new(
        spec: &LevelSpec,
        up: Option<&'a [Point]>,
        towers: bool,
        rng: &'a mut DungeonRng,
    ) -> Result<Self> {
        Ok(match spec.room_alg {
            RoomAlgorithm::Uniform => Self::Uniform(UniformRooms::new(spec, up, towers, rng)),
            RoomAlgorithm::Clustered => {
                Self::Clustered(ClusteredRooms::new(spec, up, towers, rng)?)
            }
            RoomAlgorithm::Linear => Self::Linear(LinearRooms::new(spec, up, towers, rng)?),
        })
    }
}

impl Iterator for RoomFactory<'_> {
    type Item = Room;

    fn next(&mut self) -> Option<Room> {
        match self {
            RoomFactory::Uniform(rooms) => rooms.next(),
            RoomFactory::Clustered(rooms) => rooms.next(),
            RoomFactory::Linear(rooms) => rooms.next(),
        }
    }
}
