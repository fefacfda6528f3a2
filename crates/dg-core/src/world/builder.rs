//! Level groups and whole dungeons
//!
//! Floors are generated strictly in order: each floor's stairs-up anchors are
//! the locations of the previous floor's stairs-down rooms, and each level's
//! first floor inherits from the last floor of the level above.

use std::path::PathBuf;

use rand::distributions::{Distribution, WeightedIndex};
use serde::{Serialize, Serializer};
use uuid::Uuid;

use super::DunSpec;
use crate::draw::{Document, FillPatterns, GhostOptions, LevelDrawer, composite_floors};
use crate::dungeon::{Bound, Level, LevelSpec, Point, Stairs};
use crate::error::{DungenError, Result};
use crate::rng::DungeonRng;

/// One drawn floor
#[derive(Debug, Clone)]
pub struct Floor {
    pub level: Level,
    pub document: Document,
    /// Seed both drawing passes were built from
    pub draw_seed: u64,
}

/// A stack of floors generated from one floor type
#[derive(Debug, Clone)]
pub struct LevelGroup {
    pub name: String,
    pub floors: Vec<Floor>,
}

impl LevelGroup {
    /// Generate, draw and composite every floor of one level
    ///
    /// `entrances` are the stairs-up anchors of the first floor. The last floor
    /// of the `bottom_level` gets no stairs down. With `spec.towers` every floor
    /// but the last leads down from every room, and floor `k` of `n` draws its
    /// room count from `spec.rooms` scaled by `k / (n - 1)`.
    pub fn generate(
        spec: &LevelSpec,
        entrances: &[Point],
        patterns: &FillPatterns,
        scale: u32,
        bottom_level: bool,
        rng: &mut DungeonRng,
    ) -> Result<Self> {
        spec.validate()?;
        let walls_in_fg: bool = spec.extra_or("walls_in_fg", false)?;
        let ghosting: Option<GhostOptions> = spec.extra_opt("no_floors")?;
        let drawer = LevelDrawer::new(spec.room_shape.drawer(), patterns, scale)
            .hall_width(spec.hall_width)
            .walls_in_fg(walls_in_fg);

        let count = rng.between(spec.floors).max(1) as usize;
        let mut anchors = entrances.to_vec();
        let mut levels = Vec::with_capacity(count);
        let mut documents = Vec::with_capacity(count);
        let mut seeds = Vec::with_capacity(count);

        for floor in 0..count {
            let last = floor + 1 == count;
            let floor_spec = if bottom_level && last {
                spec.with_stairs_down(Bound::exactly(0))
            } else if spec.towers && count > 1 {
                let fraction = floor as f64 / (count - 1) as f64;
                spec.with_rooms(Bound::new(
                    (spec.rooms.lower as f64 * fraction) as i32,
                    (spec.rooms.upper as f64 * fraction) as i32,
                ))
            } else {
                spec.clone()
            };

            let level = Level::new(&floor_spec, Some(anchors.as_slice()), spec.towers && !last, rng)?;
            anchors = level.stairs_down();

            let seed = rng.next_seed();
            documents.push(drawer.draw_with_seed(&level, seed));
            levels.push(level);
            seeds.push(seed);
        }

        if let Some(options) = &ghosting {
            composite_floors(&mut documents, options, scale)?;
        }

        log::info!("generated level {} with {} floors", spec.name, count);

        let floors = levels
            .into_iter()
            .zip(documents)
            .zip(seeds)
            .map(|((level, document), draw_seed)| Floor {
                level,
                document,
                draw_seed,
            })
            .collect();
        Ok(Self {
            name: spec.name.clone(),
            floors,
        })
    }

    /// Stairs-down locations of the last floor
    pub fn exits(&self) -> Vec<Point> {
        self.floors
            .last()
            .map(|floor| floor.level.stairs_down())
            .unwrap_or_default()
    }
}

/// A generated dungeon: levels of floors, top level first
#[derive(Debug, Clone)]
pub struct Dungeon {
    pub seed: u64,
    pub scale: u32,
    pub levels: Vec<LevelGroup>,
}

impl Dungeon {
    /// Generate `dunspec.floor_count` levels, picking each level's floor type
    /// by probability weight
    pub fn generate(dunspec: &DunSpec, rng: &mut DungeonRng) -> Result<Self> {
        let picker = WeightedIndex::new(dunspec.floor_types.iter().map(|t| t.spec.probability))
            .map_err(|_| DungenError::EmptyDungeon)?;

        let mut levels: Vec<LevelGroup> = Vec::with_capacity(dunspec.floor_count);
        for number in 1..=dunspec.floor_count {
            let floor_type = &dunspec.floor_types[picker.sample(rng)];
            let spec = &floor_type.spec;

            let entrances = match levels.last() {
                Some(above) => above.exits(),
                None => (0..dunspec.entrances)
                    .map(|_| {
                        Point::new(
                            rng.range_inclusive(0, spec.width - spec.room_width.upper) as f64,
                            rng.range_inclusive(0, spec.height - spec.room_height.upper) as f64,
                        )
                    })
                    .collect(),
            };

            log::debug!("level {number}: floor type {}, {} entrances", spec.name, entrances.len());
            levels.push(LevelGroup::generate(
                spec,
                &entrances,
                &floor_type.patterns,
                dunspec.scale,
                number == dunspec.floor_count,
                rng,
            )?);
        }

        Ok(Self {
            seed: rng.seed(),
            scale: dunspec.scale,
            levels,
        })
    }

    /// Relative path of a floor's document, both numbered from 1
    pub fn floor_path(level: usize, floor: usize) -> PathBuf {
        PathBuf::from(format!("level_{level}")).join(format!("floor_{floor}.svg"))
    }

    /// Every floor document with its relative output path
    pub fn documents(&self) -> impl Iterator<Item = (PathBuf, &Document)> {
        self.levels.iter().enumerate().flat_map(|(i, group)| {
            group
                .floors
                .iter()
                .enumerate()
                .map(move |(j, floor)| (Self::floor_path(i + 1, j + 1), &floor.document))
        })
    }

    /// Serialisable summary of the dungeon for other tools
    pub fn manifest(&self) -> Manifest {
        let levels = self
            .levels
            .iter()
            .enumerate()
            .map(|(i, group)| LevelEntry {
                number: i + 1,
                name: group.name.clone(),
                note: format!(
                    "Level {}: {}\nThis level contains {} floors.",
                    i + 1,
                    group.name,
                    group.floors.len()
                ),
                floors: group
                    .floors
                    .iter()
                    .enumerate()
                    .map(|(j, floor)| FloorEntry::new(i + 1, j + 1, floor))
                    .collect(),
            })
            .collect();
        Manifest {
            seed: self.seed,
            scale: self.scale,
            levels,
        }
    }
}

impl Serialize for Dungeon {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.manifest().serialize(serializer)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Manifest {
    pub seed: u64,
    pub scale: u32,
    pub levels: Vec<LevelEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LevelEntry {
    pub number: usize,
    pub name: String,
    pub note: String,
    pub floors: Vec<FloorEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FloorEntry {
    pub number: usize,
    pub document: PathBuf,
    pub width: i32,
    pub height: i32,
    pub draw_seed: u64,
    pub stairs_up: usize,
    pub stairs_down: usize,
    pub rooms: Vec<RoomEntry>,
    /// Room ids at either end of each hallway
    pub hallways: Vec<(Uuid, Uuid)>,
}

impl FloorEntry {
    fn new(level: usize, number: usize, floor: &Floor) -> Self {
        let (stairs_up, stairs_down) = floor.level.stair_counts();
        Self {
            number,
            document: Dungeon::floor_path(level, number),
            width: floor.level.width,
            height: floor.level.height,
            draw_seed: floor.draw_seed,
            stairs_up,
            stairs_down,
            rooms: floor
                .level
                .rooms()
                .iter()
                .enumerate()
                .map(|(i, room)| RoomEntry {
                    id: room.id,
                    element_id: room.element_id(),
                    location: room.location,
                    width: room.width,
                    height: room.height,
                    stairs: room.stairs,
                    tags: room.tags(),
                    note: room.note(i),
                })
                .collect(),
            hallways: floor
                .level
                .hallways()
                .iter()
                .map(|h| (h.room1.id, h.room2.id))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RoomEntry {
    pub id: Uuid,
    pub element_id: String,
    pub location: Point,
    pub width: i32,
    pub height: i32,
    pub stairs: Stairs,
    pub tags: Vec<&'static str>,
    pub note: String,
}
