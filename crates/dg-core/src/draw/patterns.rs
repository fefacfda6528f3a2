//! Tiled fill patterns for floors
//!
//! Textures are embedded into each document as base64 data URIs so a floor
//! document is self-contained once written out.

use std::fs;
use std::path::{Path, PathBuf};

use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};

use svg::node::element::{Image, Rectangle};

use super::document::{Element, ElementExt};
use crate::error::{DungenError, Result};

/// Contents of the five patterns every floor document defines
#[derive(Debug, Clone)]
pub struct FillPatterns {
    pub background: Vec<Element>,
    pub room: Vec<Element>,
    pub hallway: Vec<Element>,
    pub room_wall: Vec<Element>,
    pub hall_wall: Vec<Element>,
}

fn default_true() -> bool {
    true
}

/// Texture files for one floor type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TexturePaths {
    pub background: PathBuf,
    pub room: PathBuf,
    pub hallway: PathBuf,
    pub room_wall: PathBuf,
    pub hall_wall: PathBuf,
    #[serde(default)]
    pub background_grid: bool,
    #[serde(default = "default_true")]
    pub room_grid: bool,
    #[serde(default = "default_true")]
    pub hall_grid: bool,
}

impl TexturePaths {
    /// Resolve relative paths against `root`
    pub fn relative_to(&self, root: &Path) -> Self {
        Self {
            background: root.join(&self.background),
            room: root.join(&self.room),
            hallway: root.join(&self.hallway),
            room_wall: root.join(&self.room_wall),
            hall_wall: root.join(&self.hall_wall),
            ..self.clone()
        }
    }
}

impl FillPatterns {
    /// Load every texture and build the patterns
    pub fn from_paths(paths: &TexturePaths, scale: u32) -> Result<Self> {
        Ok(Self {
            background: create_pattern(&paths.background, scale, paths.background_grid)?,
            room: create_pattern(&paths.room, scale, paths.room_grid)?,
            hallway: create_pattern(&paths.hallway, scale, paths.hall_grid)?,
            room_wall: create_pattern(&paths.room_wall, scale, false)?,
            hall_wall: create_pattern(&paths.hall_wall, scale, false)?,
        })
    }

    /// Flat colour patterns, used when a floor type names no textures
    pub fn solid(scale: u32) -> Self {
        let tile = |colour: &str, grid: bool| {
            let mut tile = vec![square(scale).attr("fill", colour)];
            if grid {
                tile.push(grid_outline(scale));
            }
            tile
        };
        Self {
            background: tile("#3b3a36", false),
            room: tile("#d9cfb4", true),
            hallway: tile("#c4b998", true),
            room_wall: tile("#1f1d1a", false),
            hall_wall: tile("#1f1d1a", false),
        }
    }
}

fn square(scale: u32) -> Element {
    Rectangle::new()
        .set("x", 0)
        .set("y", 0)
        .set("width", scale)
        .set("height", scale)
        .into()
}

fn grid_outline(scale: u32) -> Element {
    square(scale)
        .attr("stroke-width", scale / 50)
        .attr("stroke", "black")
        .attr("fill", "transparent")
}

fn mime_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("bmp") => "image/bmp",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

/// Embed one image file as a `scale`-sized tile, optionally outlined
pub fn create_pattern(path: &Path, scale: u32, grid: bool) -> Result<Vec<Element>> {
    let data = fs::read(path).map_err(|source| DungenError::TextureRead {
        path: path.to_path_buf(),
        source,
    })?;
    let href = format!("data:{};base64,{}", mime_type(path), STANDARD.encode(&data));

    let image = Image::new()
        .set("href", href)
        .set("x", 0)
        .set("y", 0)
        .set("width", scale)
        .set("height", scale);
    let mut tile = vec![Element::from(image)];
    if grid {
        tile.push(grid_outline(scale));
    }
    Ok(tile)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::document::NodeExt;

    fn write_texture(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, bytes).unwrap();
        path
    }

    fn temp_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("dg-core-patterns-{}-{tag}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_create_pattern_embeds_data() {
        let dir = temp_dir("embed");
        let path = write_texture(&dir, "stone.png", b"abc");
        let tile = create_pattern(&path, 100, true).unwrap();
        assert_eq!(tile.len(), 2);
        assert_eq!(tile[0].get_attr("href"), Some("data:image/png;base64,YWJj"));
        assert_eq!(tile[0].get_attr("width"), Some("100"));
        assert_eq!(tile[1].get_attr("stroke-width"), Some("2"));
        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_missing_texture() {
        let err = create_pattern(Path::new("/nonexistent/floor.jpg"), 10, false).unwrap_err();
        assert!(matches!(err, DungenError::TextureRead { .. }));
    }

    #[test]
    fn test_from_paths_grid_defaults() {
        let dir = temp_dir("defaults");
        for name in ["bg.jpg", "room.jpg", "hall.jpg", "wall.jpg"] {
            write_texture(&dir, name, b"\xff\xd8");
        }
        let paths: TexturePaths = serde_yaml::from_str(
            "background: bg.jpg\nroom: room.jpg\nhallway: hall.jpg\nroom_wall: wall.jpg\nhall_wall: wall.jpg\n",
        )
        .unwrap();
        assert!(!paths.background_grid);
        assert!(paths.room_grid && paths.hall_grid);

        let patterns = FillPatterns::from_paths(&paths.relative_to(&dir), 50).unwrap();
        assert_eq!(patterns.background.len(), 1);
        assert_eq!(patterns.room.len(), 2);
        assert_eq!(patterns.hallway.len(), 2);
        assert_eq!(patterns.room_wall.len(), 1);
        assert!(
            patterns.hall_wall[0]
                .get_attr("href")
                .unwrap()
                .starts_with("data:image/jpeg;base64,")
        );
        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_solid_patterns() {
        let patterns = FillPatterns::solid(10);
        assert_eq!(patterns.room.len(), 2);
        assert_eq!(patterns.background[0].get_attr("width"), Some("10"));
    }
}
