//! Floor document assembly
//!
//! Document layout:
//! ```text
//! defs#defs          five tiled patterns
//! g
//!   g#bg-elements    rect#background, g#hall_walls, g#room_walls
//!   g#fg-elements    g#hallways, g#rooms, g#stamps
//! ```
//! With `walls_in_fg` the two wall groups move to the front of `fg-elements`.

use crate::dungeon::Level;
use crate::rng::DungeonRng;

use svg::node::element::{Definitions, Rectangle};

use super::document::{Document, Element, ElementExt, group, pattern};
use super::{FillPatterns, RoomDrawer};

/// Draws whole floors with one room drawer and one set of patterns
#[derive(Clone, Copy)]
pub struct LevelDrawer<'a> {
    drawer: &'a dyn RoomDrawer,
    patterns: &'a FillPatterns,
    scale: u32,
    hall_width: i32,
    walls_in_fg: bool,
}

impl<'a> LevelDrawer<'a> {
    pub fn new(drawer: &'a dyn RoomDrawer, patterns: &'a FillPatterns, scale: u32) -> Self {
        Self {
            drawer,
            patterns,
            scale,
            hall_width: 1,
            walls_in_fg: false,
        }
    }

    pub fn hall_width(mut self, hall_width: i32) -> Self {
        self.hall_width = hall_width;
        self
    }

    pub fn walls_in_fg(mut self, walls_in_fg: bool) -> Self {
        self.walls_in_fg = walls_in_fg;
        self
    }

    /// Draw `level`, taking the floor's drawing seed from `rng`
    pub fn draw(&self, level: &Level, rng: &mut DungeonRng) -> Document {
        self.draw_with_seed(level, rng.next_seed())
    }

    /// Draw `level` from a fixed drawing seed
    ///
    /// The wall and fill passes each get a fresh RNG built from `seed`, so the
    /// same seed always produces the same document.
    pub fn draw_with_seed(&self, level: &Level, seed: u64) -> Document {
        let scale = self.scale as f64;
        let width = level.width as f64 * scale;
        let height = level.height as f64 * scale;

        let def = |id: &str, tile: &[Element]| pattern(id, scale, tile.to_vec());
        let defs = vec![
            def("background_pattern", &self.patterns.background),
            def("room_pattern", &self.patterns.room),
            def("hallway_pattern", &self.patterns.hallway),
            def("room_wall_pattern", &self.patterns.room_wall),
            def("hall_wall_pattern", &self.patterns.hall_wall),
        ];

        let mut bg: Vec<Element> = vec![
            Rectangle::new()
                .set("id", "background")
                .set("x", 0)
                .set("y", 0)
                .set("width", width)
                .set("height", height)
                .set("fill", "url(#background_pattern)")
                .into(),
        ];

        let walls = vec![
            group().with_id("hall_walls").with_children(self.drawer.draw_hallways(
                level.hallways(),
                scale,
                "url(#hall_wall_pattern)",
                self.hall_width + 1,
                &mut DungeonRng::new(seed),
                false,
            )),
            group().with_id("room_walls").with_children(self.drawer.draw_rooms(
                level.rooms(),
                scale,
                "none",
                "url(#room_wall_pattern)",
                &mut DungeonRng::new(seed),
                false,
            )),
        ];

        let mut fg = vec![
            group().with_id("hallways").with_children(self.drawer.draw_hallways(
                level.hallways(),
                scale,
                "url(#hallway_pattern)",
                self.hall_width,
                &mut DungeonRng::new(seed),
                true,
            )),
            group().with_id("rooms").with_children(self.drawer.draw_rooms(
                level.rooms(),
                scale,
                "url(#room_pattern)",
                "none",
                &mut DungeonRng::new(seed),
                true,
            )),
            group().with_id("stamps"),
        ];

        if self.walls_in_fg {
            fg.splice(0..0, walls);
        } else {
            bg.extend(walls);
        }

        log::trace!(
            "drew {}x{} floor with seed {seed} ({} rooms)",
            level.width,
            level.height,
            level.rooms().len()
        );

        Document::new(
            width,
            height,
            vec![
                Element::from(Definitions::new().set("id", "defs")).with_children(defs),
                group().with_children(vec![
                    group().with_id("bg-elements").with_children(bg),
                    group().with_id("fg-elements").with_children(fg),
                ]),
            ],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::NodeExt;
    use crate::dungeon::{Bound, LevelSpec, RoomShape};

    fn level(seed: u64) -> Level {
        let spec = LevelSpec {
            rooms: Bound::exactly(6),
            room_width: Bound::new(6, 12),
            room_height: Bound::new(6, 12),
            hall_density: 0.3,
            ..LevelSpec::default()
        };
        Level::new(&spec, Some(&[]), false, &mut DungeonRng::new(seed)).unwrap()
    }

    fn child_ids(doc: &Document, id: &str) -> Vec<String> {
        doc.find_element(id)
            .unwrap()
            .children()
            .iter()
            .filter_map(|c| c.id().map(str::to_string))
            .collect()
    }

    #[test]
    fn test_required_structure() {
        let patterns = FillPatterns::solid(10);
        let level = level(42);
        let doc = LevelDrawer::new(RoomShape::Rect.drawer(), &patterns, 10).draw(&level, &mut DungeonRng::new(42));

        assert_eq!(doc.width, 1000.0);
        assert_eq!(child_ids(&doc, "defs").len(), 5);
        assert_eq!(child_ids(&doc, "bg-elements"), vec!["background", "hall_walls", "room_walls"]);
        assert_eq!(child_ids(&doc, "fg-elements"), vec!["hallways", "rooms", "stamps"]);
        assert!(doc.find_element("stamps").unwrap().children().is_empty());
        for room in level.rooms() {
            assert!(doc.find_element(&room.element_id()).is_some());
        }
        assert_eq!(doc.find_element("hallways").unwrap().children().len(), level.hallways().len());
    }

    #[test]
    fn test_walls_in_fg() {
        let patterns = FillPatterns::solid(1);
        let doc = LevelDrawer::new(RoomShape::Mixed.drawer(), &patterns, 1)
            .walls_in_fg(true)
            .draw_with_seed(&level(3), 11);
        assert_eq!(child_ids(&doc, "bg-elements"), vec!["background"]);
        assert_eq!(
            child_ids(&doc, "fg-elements"),
            vec!["hall_walls", "room_walls", "hallways", "rooms", "stamps"]
        );
    }

    #[test]
    fn test_walls_line_up_with_fills() {
        let patterns = FillPatterns::solid(4);
        let doc = LevelDrawer::new(RoomShape::Organic.drawer(), &patterns, 4)
            .hall_width(2)
            .draw_with_seed(&level(5), 77);
        let walls = &doc.find_element("hall_walls").unwrap().children();
        let halls = &doc.find_element("hallways").unwrap().children();
        assert_eq!(walls.len(), halls.len());
        for (wall, hall) in walls.iter().zip(halls.iter()) {
            assert_eq!(wall.get_attr("d"), hall.get_attr("d"));
            assert_eq!(wall.get_attr("stroke-width"), Some("12"));
            assert_eq!(hall.get_attr("stroke-width"), Some("8"));
        }
    }

    #[test]
    fn test_same_seed_same_document() {
        let patterns = FillPatterns::solid(10);
        let level = level(42);
        let drawer = LevelDrawer::new(RoomShape::Organic.drawer(), &patterns, 10);
        let a = drawer.draw_with_seed(&level, 1234).to_string();
        let b = drawer.draw_with_seed(&level, 1234).to_string();
        assert_eq!(a, b);
    }
}
