//! Floor rendering
//!
//! Room drawers turn rooms and hallways into tagged SVG primitives, the level
//! drawer assembles them into a floor document and the compositor ghosts lower
//! floors through the floors above them.

mod compositor;
pub mod document;
mod level_drawer;
mod mixed;
mod organic;
mod patterns;
mod rect;

pub use compositor::{GhostOptions, composite_floors};
pub use document::{Document, Element, ElementExt, NodeExt};
pub use level_drawer::LevelDrawer;
pub use mixed::MixedDrawer;
pub use organic::OrganicDrawer;
pub use patterns::{FillPatterns, TexturePaths, create_pattern};
pub use rect::RectDrawer;

use crate::dungeon::{Connections, Hallway, Room, RoomShape};
use crate::rng::DungeonRng;

/// A room and hallway drawing style
///
/// Output must depend only on the arguments and the RNG state: the level
/// drawer replays one seed for the wall pass and the fill pass and expects the
/// two to line up.
pub trait RoomDrawer: Sync {
    /// Draw one room outline
    fn draw_room(
        &self,
        room: &Room,
        scale: f64,
        fill: &str,
        border: &str,
        rng: &mut DungeonRng,
    ) -> Element;

    /// Draw one hallway stroke `width` tiles wide
    fn draw_hallway(
        &self,
        hallway: &Hallway,
        scale: f64,
        fill: &str,
        width: i32,
        rng: &mut DungeonRng,
    ) -> Element;

    /// Draw every room; with `set_ids` each gets `room-<id>` and its tags as classes
    fn draw_rooms(
        &self,
        rooms: &[Room],
        scale: f64,
        fill: &str,
        border: &str,
        rng: &mut DungeonRng,
        set_ids: bool,
    ) -> Vec<Element> {
        rooms
            .iter()
            .map(|room| {
                let el = self.draw_room(room, scale, fill, border, rng);
                if set_ids {
                    el.with_id(room.element_id())
                        .with_class(std::iter::once("room").chain(room.tags()))
                } else {
                    el
                }
            })
            .collect()
    }

    /// Draw every hallway; with `set_ids` each is classed `hall`
    fn draw_hallways(
        &self,
        hallways: &Connections,
        scale: f64,
        fill: &str,
        width: i32,
        rng: &mut DungeonRng,
        set_ids: bool,
    ) -> Vec<Element> {
        hallways
            .iter()
            .map(|hallway| {
                let el = self.draw_hallway(hallway, scale, fill, width, rng);
                if set_ids { el.with_class(["hall"]) } else { el }
            })
            .collect()
    }
}

impl RoomShape {
    /// The drawer registered for this shape
    pub fn drawer(self) -> &'static dyn RoomDrawer {
        match self {
            RoomShape::Rect => &RectDrawer,
            RoomShape::Organic => &OrganicDrawer,
            RoomShape::Mixed => &MixedDrawer,
        }
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;
    use crate::dungeon::{Point, Stairs};

    fn room(x: f64, y: f64, w: i32, h: i32) -> Room {
        let mut rng = DungeonRng::new(x as u64 * 31 + y as u64);
        Room {
            id: rng.uuid(),
            location: Point::new(x, y),
            width: w,
            height: h,
            monsters: true,
            treasure: false,
            trap: false,
            shop: false,
            stairs: Stairs::DOWN,
        }
    }

    #[test]
    fn test_every_shape_tags_rooms_and_halls() {
        let rooms = [room(5.0, 5.0, 10, 10), room(40.0, 30.0, 12, 6), room(70.0, 8.0, 6, 14)];
        let connections = Connections::new(&rooms);
        for shape in RoomShape::iter() {
            let drawer = shape.drawer();
            let drawn = drawer.draw_rooms(&rooms, 10.0, "url(#room_pattern)", "none", &mut DungeonRng::new(42), true);
            assert_eq!(drawn.len(), 3);
            assert_eq!(drawn[0].id(), Some(rooms[0].element_id().as_str()));
            assert_eq!(drawn[0].get_attr("class"), Some("room monsters down"));

            let halls = drawer.draw_hallways(&connections, 10.0, "url(#hallway_pattern)", 1, &mut DungeonRng::new(42), true);
            assert_eq!(halls.len(), 3);
            assert!(halls.iter().all(|h| h.has_class("hall") && h.id().is_none()));
        }
    }

    #[test]
    fn test_wall_pass_has_no_ids() {
        let rooms = [room(5.0, 5.0, 10, 10), room(40.0, 30.0, 12, 6)];
        for shape in RoomShape::iter() {
            let drawn = shape.drawer().draw_rooms(&rooms, 1.0, "none", "url(#room_wall_pattern)", &mut DungeonRng::new(1), false);
            assert!(drawn.iter().all(|el| el.id().is_none() && el.get_attr("class").is_none()));
        }
    }

    #[test]
    fn test_same_seed_same_primitives() {
        let rooms = [room(5.0, 5.0, 10, 10), room(40.0, 30.0, 12, 6), room(20.0, 60.0, 9, 9)];
        let connections = Connections::new(&rooms);
        for shape in RoomShape::iter() {
            let drawer = shape.drawer();
            let a = drawer.draw_hallways(&connections, 4.0, "a", 2, &mut DungeonRng::new(9), false);
            let b = drawer.draw_hallways(&connections, 4.0, "b", 3, &mut DungeonRng::new(9), false);
            let paths_a: Vec<_> = a.iter().map(|el| el.get_attr("d")).collect();
            let paths_b: Vec<_> = b.iter().map(|el| el.get_attr("d")).collect();
            assert_eq!(paths_a, paths_b);
        }
    }
}
