//! Hand-drawn looking rooms and meandering hallways
//!
//! Room outlines sample one point in each of `ELLIPSE_POINTS` equal arcs of the
//! room's bounding ellipse and join consecutive samples with a random walk.
//! Each walk step moves `PATH_SEG_LEN` tiles, 60% toward the goal and 40% in a
//! random direction, and stops once the goal is within one step.

use std::f64::consts::TAU;

use crate::dungeon::{Hallway, Point, Room};
use crate::rng::DungeonRng;

use super::RoomDrawer;
use svg::node::element::Path;

use super::document::{Element, num};

const PATH_SEG_LEN: f64 = 1.5;
const ELLIPSE_POINTS: usize = 16;
const RANDOM_SHARE: f64 = 0.4;

/// Walk from `start` toward `end`; the returned path excludes the final point
fn random_walk(start: Point, end: Point, step: f64, rng: &mut DungeonRng) -> Vec<Point> {
    let mut current = start;
    let mut path = Vec::new();
    while current.distance(&end) > step {
        let goal = (end.y - current.y).atan2(end.x - current.x);
        let wander = rng.uniform(0.0, TAU);
        let next = current.offset(
            RANDOM_SHARE * step * wander.cos() + (1.0 - RANDOM_SHARE) * step * goal.cos(),
            RANDOM_SHARE * step * wander.sin() + (1.0 - RANDOM_SHARE) * step * goal.sin(),
        );
        path.push(current);
        current = next;
    }
    if path.is_empty() {
        path.push(start);
    }
    path
}

fn random_point_in_triangle(p1: Point, p2: Point, p3: Point, rng: &mut DungeonRng) -> Point {
    let (a, b) = (rng.unit(), rng.unit());
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    let (s, t, u) = (lo, hi - lo, 1.0 - hi);
    Point::new(
        p1.x * s + p2.x * t + p3.x * u,
        p1.y * s + p2.y * t + p3.y * u,
    )
}

fn random_point_on_ellipse(
    center: Point,
    width: i32,
    height: i32,
    min_angle: f64,
    max_angle: f64,
    rng: &mut DungeonRng,
) -> Point {
    let angle = rng.uniform(min_angle, max_angle);
    center.offset(
        width as f64 / 2.0 * angle.cos(),
        height as f64 / 2.0 * angle.sin(),
    )
}

fn points_to_path(points: &[Point], scale: f64, closed: bool) -> String {
    let mut d = String::new();
    for (i, p) in points.iter().enumerate() {
        let cmd = if i == 0 { "M" } else { "L" };
        d += &format!("{cmd} {} {} ", num(p.x * scale), num(p.y * scale));
    }
    if closed {
        d.push('Z');
    }
    d
}

/// Rooms with wobbly elliptical outlines and wandering hallways
#[derive(Debug, Clone, Copy, Default)]
pub struct OrganicDrawer;

impl RoomDrawer for OrganicDrawer {
    fn draw_room(
        &self,
        room: &Room,
        scale: f64,
        fill: &str,
        border: &str,
        rng: &mut DungeonRng,
    ) -> Element {
        let center = room.center();
        let arc = TAU / ELLIPSE_POINTS as f64;
        let mut points = Vec::new();
        let mut first = None;
        let mut last: Option<Point> = None;
        for i in 0..ELLIPSE_POINTS {
            let p = random_point_on_ellipse(
                center,
                room.width,
                room.height,
                arc * i as f64,
                arc * (i + 1) as f64,
                rng,
            );
            match last {
                Some(prev) => points.extend(random_walk(prev, p, PATH_SEG_LEN, rng)),
                None => first = Some(p),
            }
            last = Some(p);
        }
        if let (Some(last), Some(first)) = (last, first) {
            points.extend(random_walk(last, first, PATH_SEG_LEN, rng));
        }

        Path::new()
            .set("d", points_to_path(&points, scale, true))
            .set("fill", fill)
            .set("stroke", border)
            .set("stroke-width", scale * 2.0)
            .set("paint-order", "stroke")
            .set("stroke-linejoin", "bevel")
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
        let (a, b) = (&hallway.room1, &hallway.room2);
        let start = a.center().trunc();
        let corner = if rng.chance(0.5) {
            Point::new(a.location.x, b.location.y)
        } else {
            Point::new(b.location.x, a.location.y)
        };
        let middle = random_point_in_triangle(a.location, corner, b.location, rng);
        let end = b.center().trunc();

        let mut points = random_walk(start, middle, PATH_SEG_LEN, rng);
        points.extend(random_walk(middle, end, PATH_SEG_LEN, rng));

        Path::new()
            .set("d", points_to_path(&points, scale, false))
            .set("fill", "transparent")
            .set("stroke", fill)
            .set("stroke-width", scale * width as f64)
            .set("stroke-linejoin", "bevel")
            .into()
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
    fn test_random_walk_reaches_goal() {
        let mut rng = DungeonRng::new(42);
        let start = Point::new(0.0, 0.0);
        let end = Point::new(20.0, 10.0);
        let path = random_walk(start, end, PATH_SEG_LEN, &mut rng);
        assert_eq!(path[0], start);
        assert!(path.len() > 5);
        for pair in path.windows(2) {
            assert!((pair[0].distance(&pair[1]) - PATH_SEG_LEN).abs() <= PATH_SEG_LEN);
        }
    }

    #[test]
    fn test_random_walk_short_hop() {
        let mut rng = DungeonRng::new(42);
        let start = Point::new(1.0, 1.0);
        assert_eq!(random_walk(start, Point::new(1.5, 1.0), PATH_SEG_LEN, &mut rng), vec![start]);
    }

    #[test]
    fn test_triangle_point_inside_box() {
        let mut rng = DungeonRng::new(42);
        for _ in 0..200 {
            let p = random_point_in_triangle(
                Point::new(0.0, 0.0),
                Point::new(0.0, 10.0),
                Point::new(10.0, 10.0),
                &mut rng,
            );
            assert!((0.0..=10.0).contains(&p.x));
            assert!((0.0..=10.0).contains(&p.y));
            assert!(p.y >= p.x - 1e-9);
        }
    }

    #[test]
    fn test_room_outline_is_closed() {
        let mut rng = DungeonRng::new(42);
        let el = OrganicDrawer.draw_room(&room(1, 10.0, 10.0, 12, 8), 1.0, "f", "b", &mut rng);
        let d = el.get_attr("d").unwrap();
        assert!(d.starts_with("M "));
        assert!(d.ends_with('Z'));
        assert!(d.matches('L').count() >= ELLIPSE_POINTS - 1);
        assert_eq!(el.get_attr("stroke-width"), Some("2"));
    }

    #[test]
    fn test_hallway_starts_at_room_center() {
        let hallway = Hallway::new(room(1, 0.0, 0.0, 6, 6), room(2, 30.0, 20.0, 5, 5));
        let el = OrganicDrawer.draw_hallway(&hallway, 1.0, "f", 1, &mut DungeonRng::new(8));
        let d = el.get_attr("d").unwrap();
        assert!(d.starts_with("M 3 3 "));
        assert!(!d.ends_with('Z'));
    }
}
