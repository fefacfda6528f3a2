//! Rectangular rooms joined by elbow hallways

use crate::dungeon::{Hallway, Point, Room};
use crate::rng::DungeonRng;

use super::RoomDrawer;
use svg::node::element::{Path, Rectangle};

use super::document::{Element, num};

/// Wall of a room a hallway leaves from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Side {
    Left,
    Right,
    Top,
    Bottom,
}

impl Side {
    fn is_vertical_wall(self) -> bool {
        matches!(self, Side::Left | Side::Right)
    }
}

/// A random tile just inside `side` of `room`
pub(super) fn random_point(room: &Room, side: Side, rng: &mut DungeonRng) -> Point {
    let mut x = (room.location.x + 1.0) as i32;
    let mut y = (room.location.y + 1.0) as i32;
    match side {
        Side::Left => y = rng.range_inclusive(y, y + room.height - 2),
        Side::Right => {
            x += room.width - 2;
            y = rng.range_inclusive(y, y + room.height - 2);
        }
        Side::Top => x = rng.range_inclusive(x, x + room.width - 2),
        Side::Bottom => {
            x = rng.range_inclusive(x, x + room.width - 2);
            y += room.height - 2;
        }
    }
    Point::new(x as f64, y as f64)
}

/// Pick the walls facing each other, one of two per room depending on quadrant
pub(super) fn pick_sides(hallway: &Hallway, rng: &mut DungeonRng) -> (Side, Side) {
    let a = hallway.room1.location;
    let b = hallway.room2.location;
    let (from, to) = if a.x < b.x && a.y < b.y {
        ([Side::Right, Side::Bottom], [Side::Left, Side::Top])
    } else if a.x > b.x && a.y < b.y {
        ([Side::Left, Side::Bottom], [Side::Right, Side::Top])
    } else if a.x < b.x && a.y > b.y {
        ([Side::Right, Side::Top], [Side::Left, Side::Bottom])
    } else {
        ([Side::Left, Side::Top], [Side::Right, Side::Bottom])
    };
    let mut pick = |sides: [Side; 2]| if rng.chance(0.5) { sides[0] } else { sides[1] };
    let first = pick(from);
    (first, pick(to))
}

/// Two-bend orthogonal path from `start` to `end` through their midpoint
pub(super) fn elbow_path(start: Point, end: Point, from: Side, to: Side, scale: f64) -> String {
    let middle = Point::new(((start.x + end.x) / 2.0).trunc(), ((start.y + end.y) / 2.0).trunc());
    let mut d = format!("M {} {} ", num(start.x * scale), num(start.y * scale));
    if from.is_vertical_wall() {
        d += &format!("H {} V {} ", num(middle.x * scale), num(middle.y * scale));
    } else {
        d += &format!("V {} H {} ", num(middle.y * scale), num(middle.x * scale));
    }
    if to.is_vertical_wall() {
        d += &format!("V {} H {}", num(end.y * scale), num(end.x * scale));
    } else {
        d += &format!("H {} V {}", num(end.x * scale), num(end.y * scale));
    }
    d
}

pub(super) fn hallway_stroke(d: String, scale: f64, fill: &str, width: i32) -> Element {
    Path::new()
        .set("d", d)
        .set("fill", "transparent")
        .set("stroke", fill)
        .set("stroke-width", scale * width as f64)
        .into()
}

pub(super) fn rect_room(room: &Room, scale: f64, fill: &str, border: &str) -> Element {
    Rectangle::new()
        .set("x", room.location.x * scale)
        .set("y", room.location.y * scale)
        .set("width", room.width as f64 * scale)
        .set("height", room.height as f64 * scale)
        .set("fill", fill)
        .set("stroke", border)
        .set("stroke-width", scale)
        .set("paint-order", "stroke")
        .into()
}

/// Axis-aligned rooms and elbow hallways
#[derive(Debug, Clone, Copy, Default)]
pub struct RectDrawer;

impl RoomDrawer for RectDrawer {
    fn draw_room(
        &self,
        room: &Room,
        scale: f64,
        fill: &str,
        border: &str,
        _rng: &mut DungeonRng,
    ) -> Element {
        rect_room(room, scale, fill, border)
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
        let start = random_point(&hallway.room1, from, rng);
        let end = random_point(&hallway.room2, to, rng);
        hallway_stroke(elbow_path(start, end, from, to, scale), scale, fill, width)
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;
    use crate::draw::document::NodeExt;
    use crate::dungeon::Stairs;

    fn room(n: u128, x: f64, y: f64, w: i32, h: i32) -> Room {
        Room {
            id: Uuid::from_u128(n),
            location: Point::new(x, y),
            width: w,
            height: h,
            monsters: false,
            treasure: false,
            trap: false,
            shop: false,
            stairs: Stairs::NONE,
        }
    }

    #[test]
    fn test_random_point_inside_walls() {
        let r = room(1, 10.0, 20.0, 8, 6);
        let mut rng = DungeonRng::new(42);
        for _ in 0..200 {
            let p = random_point(&r, Side::Left, &mut rng);
            assert_eq!(p.x, 11.0);
            assert!((21.0..=25.0).contains(&p.y));

            let p = random_point(&r, Side::Right, &mut rng);
            assert_eq!(p.x, 17.0);

            let p = random_point(&r, Side::Bottom, &mut rng);
            assert_eq!(p.y, 25.0);
            assert!((11.0..=17.0).contains(&p.x));

            let p = random_point(&r, Side::Top, &mut rng);
            assert_eq!(p.y, 21.0);
        }
    }

    #[test]
    fn test_sides_face_each_other() {
        let mut rng = DungeonRng::new(42);
        let upper_left = Hallway::new(room(1, 0.0, 0.0, 5, 5), room(2, 20.0, 20.0, 5, 5));
        let lower_right = Hallway::new(room(2, 20.0, 20.0, 5, 5), room(1, 0.0, 0.0, 5, 5));
        for _ in 0..50 {
            let (from, to) = pick_sides(&upper_left, &mut rng);
            assert!(matches!(from, Side::Right | Side::Bottom));
            assert!(matches!(to, Side::Left | Side::Top));

            let (from, to) = pick_sides(&lower_right, &mut rng);
            assert!(matches!(from, Side::Left | Side::Top));
            assert!(matches!(to, Side::Right | Side::Bottom));
        }
    }

    #[test]
    fn test_elbow_path() {
        let d = elbow_path(Point::new(2.0, 3.0), Point::new(9.0, 10.0), Side::Right, Side::Top, 10.0);
        assert_eq!(d, "M 20 30 H 50 V 60 H 90 V 100");

        let d = elbow_path(Point::new(2.0, 3.0), Point::new(9.0, 10.0), Side::Bottom, Side::Left, 1.0);
        assert_eq!(d, "M 2 3 V 6 H 5 V 10 H 9");
    }

    #[test]
    fn test_rect_room_scaled() {
        let el = RectDrawer.draw_room(&room(1, 3.0, 4.0, 5, 6), 10.0, "url(#room_pattern)", "none", &mut DungeonRng::new(1));
        assert!(el.get_attr("d").is_none());
        assert_eq!(el.get_attr("x"), Some("30"));
        assert_eq!(el.get_attr("height"), Some("60"));
        assert_eq!(el.get_attr("stroke-width"), Some("10"));
        assert_eq!(el.get_attr("paint-order"), Some("stroke"));
    }

    #[test]
    fn test_hallway_width() {
        let hallway = Hallway::new(room(1, 0.0, 0.0, 5, 5), room(2, 20.0, 20.0, 5, 5));
        let el = RectDrawer.draw_hallway(&hallway, 5.0, "url(#hallway_pattern)", 2, &mut DungeonRng::new(3));
        assert_eq!(el.get_attr("stroke-width"), Some("10"));
        assert_eq!(el.get_attr("fill"), Some("transparent"));
        assert!(el.get_attr("d").unwrap().starts_with("M "));
    }
}
