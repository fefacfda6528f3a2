//! Hallways between rooms
//!
//! Connections start as the complete graph over a floor's rooms and are pruned
//! to a sparse connected set:
//! 1. Sort every candidate hallway by Manhattan distance
//! 2. Walk from the first room, always taking the shortest hallway from the
//!    current room to an unvisited one and moving there
//! 3. Add `round(density * (n - 1))` hallways drawn with replacement from the
//!    sorted candidates for loops and shortcuts
//!
//! Step 2 extends from the most recently reached room, not the whole visited
//! frontier, so the result is a nearest-neighbour chain rather than a minimum
//! spanning tree.

use std::collections::HashSet;

use crate::rng::DungeonRng;

use super::Room;

/// A hallway joining two rooms
#[derive(Debug, Clone, Copy)]
pub struct Hallway {
    pub room1: Room,
    pub room2: Room,
}

impl Hallway {
    pub fn new(room1: Room, room2: Room) -> Self {
        Self { room1, room2 }
    }

    /// L1 distance between the two room locations
    pub fn distance(&self) -> i64 {
        self.room1.location.manhattan(&self.room2.location) as i64
    }

    /// Whether either end is `room`
    pub fn touches(&self, room: &Room) -> bool {
        self.room1.id == room.id || self.room2.id == room.id
    }

    /// Unordered pair of room ids; hallways with the same key join the same rooms
    pub fn key(&self) -> (u128, u128) {
        let a = self.room1.id.as_u128();
        let b = self.room2.id.as_u128();
        (a.min(b), a.max(b))
    }

    /// The end that is not `room`, if `room` is one of the ends
    pub fn other_end(&self, room: &Room) -> Option<&Room> {
        if self.room1.id == room.id {
            Some(&self.room2)
        } else if self.room2.id == room.id {
            Some(&self.room1)
        } else {
            None
        }
    }
}

/// Two hallways are equal when they share at least one end.
///
/// This is not transitive, so `Hallway` is deliberately neither `Eq` nor `Hash`.
/// Deduplication goes through [`Hallway::key`], which only collapses hallways
/// joining the same pair of rooms in either direction.
impl PartialEq for Hallway {
    fn eq(&self, other: &Self) -> bool {
        self.room1.id == other.room1.id
            || self.room1.id == other.room2.id
            || self.room2.id == other.room1.id
            || self.room2.id == other.room2.id
    }
}

/// The hallway set of one floor
#[derive(Debug, Clone)]
pub struct Connections {
    rooms: Vec<Room>,
    hallways: Vec<Hallway>,
}

impl Connections {
    /// Connect every room to every other room
    pub fn new(rooms: &[Room]) -> Self {
        let mut seen = HashSet::new();
        let mut hallways = Vec::with_capacity(rooms.len() * rooms.len().saturating_sub(1) / 2);
        for start in rooms {
            for end in rooms {
                if start.id == end.id {
                    continue;
                }
                let hallway = Hallway::new(*start, *end);
                if seen.insert(hallway.key()) {
                    hallways.push(hallway);
                }
            }
        }
        Self {
            rooms: rooms.to_vec(),
            hallways,
        }
    }

    /// Retained hallway count
    pub fn len(&self) -> usize {
        self.hallways.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hallways.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Hallway> {
        self.hallways.iter()
    }

    /// Every retained hallway with `room` as one of its ends
    pub fn room_hallways(&self, room: &Room) -> Vec<&Hallway> {
        self.hallways.iter().filter(|h| h.touches(room)).collect()
    }

    /// Reduce the complete graph to a connected chain plus extra shortcuts
    ///
    /// Does nothing with fewer than two rooms.
    pub fn prune(&mut self, density: f64, rng: &mut DungeonRng) {
        let n = self.rooms.len();
        if n < 2 {
            return;
        }

        let mut candidates = std::mem::take(&mut self.hallways);
        candidates.sort_by_key(Hallway::distance);

        let mut visited = HashSet::with_capacity(n);
        let mut current = self.rooms[0];
        visited.insert(current.id);

        let mut seen = HashSet::with_capacity(n * 2);
        let mut retained = Vec::with_capacity(n * 2);
        while visited.len() < n {
            let next = candidates.iter().find_map(|h| {
                h.other_end(&current)
                    .filter(|other| !visited.contains(&other.id))
                    .map(|other| (*h, *other))
            });
            // The graph is complete, so an unvisited neighbour always exists
            let Some((hallway, other)) = next else {
                break;
            };
            if seen.insert(hallway.key()) {
                retained.push(hallway);
            }
            visited.insert(other.id);
            current = other;
        }

        let extra = (density * (n - 1) as f64).round() as usize;
        for _ in 0..extra {
            if let Some(hallway) = rng.choose(&candidates)
                && seen.insert(hallway.key())
            {
                retained.push(*hallway);
            }
        }

        log::debug!(
            "pruned {} candidate hallways to {} ({} rooms, density {})",
            candidates.len(),
            retained.len(),
            n,
            density
        );
        self.hallways = retained;
    }
}

impl<'a> IntoIterator for &'a Connections {
    type Item = &'a Hallway;
    type IntoIter = std::slice::Iter<'a, Hallway>;

    fn into_iter(self) -> Self::IntoIter {
        self.hallways.iter()
    }
}
