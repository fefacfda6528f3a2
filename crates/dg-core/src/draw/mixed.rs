//! Round rooms where a room is close to square, rectangles elsewhere

use crate::dungeon::{Hallway, Point, Room};
use crate::rng::DungeonRng;

use super::RoomDrawer;
use super::rect::{elbow_path, hallway_stroke, pick_sides, random_point, rect_room};
use svg::node::element::Circle;

use super::document::Element;

/// Within 10% of square
fn is_near_square(room: &Room) -> bool {
    let ratio = room.width as f64 / room.height as f64;
    (0.9..=1.1).contains(&ratio)
}

/// Half the mean side length, truncated to whole tiles
fn radius(room: &Room) -> f64 {
    ((room.width + room.height) as f64 / 4.0).trunc()
}

fn circle_center(room: &Room) -> Point {
    let r = radius(room);
    room.location.offset(r, r)
}

/// Circles and rectangles joined by elbow hallways
#[derive(Debug, Clone, Copy, Default)]
pub struct MixedDrawer;

impl RoomDrawer for MixedDrawer {
    fn draw_room(
        &self,
        room: &Room,
        scale: f64,
        fill: &str,
        border: &str,
        _rng: &mut DungeonRng,
    ) -> Element {
        if !is_near_square(room) {
            return rect_room(room, scale, fill, border);
        }
        let center = circle_center(room);
        Circle::new()
            .set("cx", center.x * scale)
            .set("cy", center.y * scale)
            .set("r", radius(room) * scale)
            .set("fill", fill)
            .set("stroke", border)
            .set("stroke-width", scale)
            .set("paint-order", "stroke")
            .into()
    }

    fn draw_hallway(
        &self,
        hallway: &Hallway,
        scale: f64,
        fill: &str,
        width: i32,
        rng: &mut DungeonRng,
    ) -> Element {
        let (from, to) = pick_sides(hallway, rng);
        // Wall points are drawn for round rooms too; RNG use must not depend on shape
        let mut start = random_point(&hallway.room1, from, rng);
        if is_near_square(&hallway.room1) {
            start = circle_center(&hallway.room1);
        }
        let mut end = random_point(&hallway.room2, to, rng);
        if is_near_square(&hallway.room2) {
            end = circle_center(&hallway.room2);
        }
        hallway_stroke(elbow_path(start, end, from, to, scale), scale, fill, width)
    }
}
