use dg_core::DungeonRng;
use dg_core::draw::{FillPatterns, LevelDrawer, NodeExt};
use dg_core::dungeon::{Bound, Level, LevelSpec, Point, RoomAlgorithm, RoomShape};
use dg_core::world::{DunSpec, Dungeon};
use strum::IntoEnumIterator;

fn scenario_spec() -> LevelSpec {
    LevelSpec {
        width: 100,
        height: 100,
        rooms: Bound::new(5, 5),
        room_width: Bound::new(10, 10),
        room_height: Bound::new(10, 10),
        hall_density: 0.0,
        room_alg: RoomAlgorithm::Uniform,
        stairs_down: Bound::new(1, 1),
        ..LevelSpec::default()
    }
}

#[test]
fn test_five_rooms_four_hallways() {
    for seed in 0..20 {
        let level = Level::new(&scenario_spec(), Some(&[]), false, &mut DungeonRng::new(seed)).unwrap();
        assert_eq!(level.rooms().len(), 5);
        assert_eq!(level.hallways().len(), 4);
        let down = level
            .rooms()
            .iter()
            .filter(|r| r.tags().contains(&"down"))
            .count();
        assert_eq!(down, 1);
    }
}

#[test]
fn test_anchor_is_inherited_exactly() {
    for alg in RoomAlgorithm::iter() {
        let spec = LevelSpec {
            room_alg: alg,
            ..scenario_spec()
        };
        let anchors = [Point::new(12.0, 40.0)];
        let floor_b = Level::new(&spec, Some(&anchors), false, &mut DungeonRng::new(42)).unwrap();
        let up: Vec<_> = floor_b
            .rooms()
            .iter()
            .filter(|r| r.tags().contains(&"up"))
            .collect();
        assert_eq!(up.len(), 1, "{alg}");
        assert_eq!(up[0].location, Point::new(12.0, 40.0), "{alg}");
    }
}

#[test]
fn test_documents_are_deterministic() {
    let patterns = FillPatterns::solid(8);
    let level = Level::new(&scenario_spec(), Some(&[]), false, &mut DungeonRng::new(42)).unwrap();
    for shape in RoomShape::iter() {
        let drawer = LevelDrawer::new(shape.drawer(), &patterns, 8);
        let a = drawer.draw_with_seed(&level, 99).to_string();
        let b = drawer.draw_with_seed(&level, 99).to_string();
        assert_eq!(a, b, "{shape}");
    }
}

#[test]
fn test_required_ids_present() {
    let patterns = FillPatterns::solid(8);
    let level = Level::new(&scenario_spec(), Some(&[]), false, &mut DungeonRng::new(7)).unwrap();
    for shape in RoomShape::iter() {
        let doc = LevelDrawer::new(shape.drawer(), &patterns, 8).draw(&level, &mut DungeonRng::new(7));
        for id in ["defs", "bg-elements", "fg-elements", "rooms", "hallways", "stamps"] {
            assert!(doc.find_element(id).is_some(), "{shape} missing {id}");
        }
        for room in level.rooms() {
            let el = doc.find_element(&room.element_id()).unwrap();
            assert!(el.has_class("room"));
        }
        let halls = doc.find_element("hallways").unwrap().children();
        assert!(halls.iter().all(|h| h.has_class("hall")));

        let bounds = doc.room_bounds();
        assert_eq!(bounds.len(), level.rooms().len(), "{shape}");
    }
}

#[test]
fn test_rect_room_bounds_match_rooms() {
    let patterns = FillPatterns::solid(4);
    let level = Level::new(&scenario_spec(), Some(&[]), false, &mut DungeonRng::new(3)).unwrap();
    let doc = LevelDrawer::new(RoomShape::Rect.drawer(), &patterns, 4).draw_with_seed(&level, 1);
    for (room, bounds) in level.rooms().iter().zip(doc.room_bounds()) {
        assert_eq!(bounds.id, room.element_id());
        assert_eq!(bounds.min, Point::new(room.location.x * 4.0, room.location.y * 4.0));
        assert_eq!(bounds.max.x - bounds.min.x, 40.0);
    }
}

#[test]
fn test_dungeon_from_yaml() {
    let yaml = r#"
width: 120
height: 120
floor_count: 2
scale: 10
entrances: 2
floor_types:
  crypt:
    floors: {lower: 2, upper: 2}
    rooms: {lower: 6, upper: 9}
    room_alg: clustered
    room_shape: organic
    stairs_down: {lower: 1, upper: 3}
    extra:
      no_floors:
        max_trans_floors: 1
  barracks:
    rooms: {lower: 8, upper: 12}
    room_alg: linear
    room_shape: mixed
    probability: 3
    extra:
      block_width: 40
      block_height: 40
"#;
    let spec = DunSpec::from_yaml(yaml, std::path::Path::new(".")).unwrap();
    let dungeon = Dungeon::generate(&spec, &mut DungeonRng::new(2024)).unwrap();
    assert_eq!(dungeon.levels.len(), 2);

    let paths: Vec<_> = dungeon.documents().map(|(p, _)| p).collect();
    assert!(paths.iter().all(|p| p.extension().is_some_and(|e| e == "svg")));

    let json = serde_json::to_value(&dungeon).unwrap();
    assert_eq!(json["seed"], 2024);
    assert_eq!(json["levels"].as_array().unwrap().len(), 2);
    assert_eq!(json["levels"][0]["floors"][0]["stairs_up"], 2);
}
