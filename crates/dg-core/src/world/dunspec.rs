//! Dungeon-wide spec files
//!
//! A spec is YAML. Any value may be replaced by `!use other.yaml` to splice in
//! the contents of another file, resolved against the including file's
//! directory. Texture paths resolve the same way.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value as JsonValue;
use serde_yaml::{Mapping, Value};

use crate::draw::{FillPatterns, TexturePaths};
use crate::dungeon::LevelSpec;
use crate::error::{DungenError, Result};

fn one() -> u32 {
    1
}

fn one_entrance() -> usize {
    1
}

#[derive(Debug, Deserialize)]
struct FloorTypeEntry {
    #[serde(flatten)]
    spec: LevelSpec,
    #[serde(default)]
    textures: Option<TexturePaths>,
}

#[derive(Debug, Deserialize)]
struct SpecFile {
    width: i32,
    height: i32,
    floor_count: usize,
    #[serde(default = "one")]
    scale: u32,
    #[serde(default = "one_entrance")]
    entrances: usize,
    floor_types: BTreeMap<String, FloorTypeEntry>,
}

/// A floor archetype together with its loaded textures
#[derive(Debug, Clone)]
pub struct FloorType {
    pub spec: LevelSpec,
    pub patterns: FillPatterns,
}

/// Everything needed to generate a dungeon
#[derive(Debug, Clone)]
pub struct DunSpec {
    pub width: i32,
    pub height: i32,
    /// Number of levels to generate
    pub floor_count: usize,
    /// Size of one tile in document units
    pub scale: u32,
    /// Stairs leading into the first level
    pub entrances: usize,
    /// Ordered by name
    pub floor_types: Vec<FloorType>,
}

impl DunSpec {
    /// Load a spec file
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let root = path.parent().unwrap_or_else(|| Path::new("."));
        Self::from_yaml(&text, root)
    }

    /// Parse a spec, resolving includes and textures against `root`
    pub fn from_yaml(text: &str, root: &Path) -> Result<Self> {
        let value: Value = serde_yaml::from_str(text)?;
        let file: SpecFile = serde_yaml::from_value(resolve_includes(value, root)?)?;

        let mut floor_types = Vec::with_capacity(file.floor_types.len());
        for (name, entry) in file.floor_types {
            let mut spec = entry.spec;
            spec.name = name;
            spec.width = file.width;
            spec.height = file.height;
            spec.validate()?;
            resolve_room_top(&mut spec, root);

            let patterns = match &entry.textures {
                Some(paths) => FillPatterns::from_paths(&paths.relative_to(root), file.scale)?,
                None => {
                    log::info!("floor type {} has no textures, using solid fills", spec.name);
                    FillPatterns::solid(file.scale)
                }
            };
            floor_types.push(FloorType { spec, patterns });
        }

        let total: f64 = floor_types.iter().map(|t| t.spec.probability).sum();
        if floor_types.is_empty() || total <= 0.0 {
            return Err(DungenError::EmptyDungeon);
        }

        Ok(Self {
            width: file.width,
            height: file.height,
            floor_count: file.floor_count,
            scale: file.scale,
            entrances: file.entrances,
            floor_types,
        })
    }
}

fn resolve_includes(value: Value, root: &Path) -> Result<Value> {
    match value {
        Value::Tagged(tagged) if tagged.tag == "use" => {
            let Value::String(relative) = tagged.value else {
                return Err(DungenError::InvalidSpec(format!(
                    "!use expects a file path, found {:?}",
                    tagged.value
                )));
            };
            let path = root.join(relative);
            let text = fs::read_to_string(&path)?;
            let included: Value = serde_yaml::from_str(&text)?;
            let included_root = path.parent().map(Path::to_path_buf).unwrap_or_default();
            resolve_includes(included, &included_root)
        }
        Value::Mapping(map) => map
            .into_iter()
            .map(|(key, value)| Ok((key, resolve_includes(value, root)?)))
            .collect::<Result<Mapping>>()
            .map(Value::Mapping),
        Value::Sequence(items) => items
            .into_iter()
            .map(|item| resolve_includes(item, root))
            .collect::<Result<Vec<_>>>()
            .map(Value::Sequence),
        other => Ok(other),
    }
}

/// Make a relative `no_floors.room_top_texture` relative to the spec directory
fn resolve_room_top(spec: &mut LevelSpec, root: &Path) {
    if let Some(JsonValue::Object(ghost)) = spec.extra.get_mut("no_floors")
        && let Some(JsonValue::String(texture)) = ghost.get_mut("room_top_texture")
    {
        let resolved: PathBuf = root.join(&*texture);
        *texture = resolved.to_string_lossy().into_owned();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::NodeExt;
    use crate::dungeon::{Bound, RoomAlgorithm, RoomShape};

    const SPEC: &str = r#"
width: 80
height: 60
floor_count: 3
scale: 20
floor_types:
  caves:
    floors: {lower: 1, upper: 2}
    rooms: {lower: 4, upper: 8}
    room_width: {lower: 4, upper: 9}
    room_height: {lower: 4, upper: 9}
    room_alg: clustered
    room_shape: organic
    hall_density: 0.1
    hall_width: 1
    trap_chance: 0.1
    monster_chance: 0.3
    shop_chance: 0
    treasure_chance: 0.2
    stairs_down: {lower: 1, upper: 2}
    probability: 2
  halls:
    room_alg: uniform
    room_shape: rect
    probability: 1
    extra:
      walls_in_fg: true
"#;

    fn temp_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("dg-core-dunspec-{}-{tag}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_parse_spec() {
        let spec = DunSpec::from_yaml(SPEC, Path::new(".")).unwrap();
        assert_eq!(spec.floor_count, 3);
        assert_eq!(spec.scale, 20);
        assert_eq!(spec.entrances, 1);
        assert_eq!(spec.floor_types.len(), 2);

        let caves = &spec.floor_types[0].spec;
        assert_eq!(caves.name, "caves");
        assert_eq!(caves.width, 80);
        assert_eq!(caves.height, 60);
        assert_eq!(caves.floors, Bound::new(1, 2));
        assert_eq!(caves.room_alg, RoomAlgorithm::Clustered);
        assert_eq!(caves.room_shape, RoomShape::Organic);
        assert_eq!(caves.probability, 2.0);

        let halls = &spec.floor_types[1].spec;
        assert_eq!(halls.name, "halls");
        assert!(halls.extra_or("walls_in_fg", false).unwrap());
        let solid = &spec.floor_types[1].patterns;
        assert_eq!(solid.room.len(), 2);
        assert_eq!(solid.room[0].get_attr("fill"), Some("#d9cfb4"));
        assert_eq!(solid.room[0].get_attr("width"), Some("20"));
    }

    #[test]
    fn test_unknown_shape_is_fatal() {
        let text = SPEC.replace("room_shape: rect", "room_shape: hexagon");
        let err = DunSpec::from_yaml(&text, Path::new(".")).unwrap_err();
        assert!(err.to_string().contains("hexagon is not a recognized room shape"));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let text = SPEC.replace("trap_chance: 0.1", "trap_chance: 3");
        assert!(matches!(
            DunSpec::from_yaml(&text, Path::new(".")),
            Err(DungenError::InvalidProbability { field: "trap_chance", .. })
        ));

        let text = SPEC.replace("probability: 2", "probability: 0").replace("probability: 1", "probability: 0");
        assert!(matches!(
            DunSpec::from_yaml(&text, Path::new(".")),
            Err(DungenError::EmptyDungeon)
        ));
    }

    #[test]
    fn test_use_includes_file() {
        let dir = temp_dir("use");
        fs::write(
            dir.join("caves.yaml"),
            "room_alg: linear\nroom_shape: mixed\nextra:\n  no_floors:\n    room_top_texture: roof.png\n",
        )
        .unwrap();
        let text = "width: 50\nheight: 50\nfloor_count: 1\nfloor_types:\n  caves: !use caves.yaml\n";
        fs::write(dir.join("dungeon.yaml"), text).unwrap();

        let spec = DunSpec::load(&dir.join("dungeon.yaml")).unwrap();
        let caves = &spec.floor_types[0].spec;
        assert_eq!(caves.room_alg, RoomAlgorithm::Linear);
        assert_eq!(caves.room_shape, RoomShape::Mixed);
        let ghost: crate::draw::GhostOptions = caves.extra_or("no_floors", Default::default()).unwrap();
        assert_eq!(ghost.room_top_texture, Some(dir.join("roof.png")));
        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_textures_resolve_against_spec_dir() {
        let dir = temp_dir("textures");
        for name in ["bg.png", "room.png", "hall.png", "wall.png"] {
            fs::write(dir.join(name), b"png").unwrap();
        }
        let text = format!(
            "{SPEC}    textures:\n      background: bg.png\n      room: room.png\n      hallway: hall.png\n      room_wall: wall.png\n      hall_wall: wall.png\n"
        );
        let spec = DunSpec::from_yaml(&text, &dir).unwrap();
        let halls = &spec.floor_types[1].patterns;
        assert!(halls.room[0].get_attr("href").unwrap().starts_with("data:image/png;base64,"));
        fs::remove_dir_all(dir).ok();

        let err = DunSpec::from_yaml(&text, Path::new("/nonexistent")).unwrap_err();
        assert!(matches!(err, DungenError::TextureRead { .. }));
    }
}
