//! Multi-floor ghosting
//!
//! Every floor shows up to `max_trans_floors` of the floors below it as dimmed,
//! id-free copies layered under its own hall walls. For each floor `i`:
//! 1. Start at floor `min(last, i + max_trans_floors)` and walk up to `i + 1`
//! 2. Copy that floor's foreground without ids, optionally retextured as roofs
//! 3. Insert the copy plus a black rect of opacity `depth * opacity_increment`
//!    before `hall_walls` in `bg-elements`
//!
//! Deeper floors go in first, so nearer floors end up drawn over them.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use svg::node::element::Rectangle;

use super::create_pattern;
use super::document::{Document, ElementExt, NodeExt, group, num, pattern, set_texture, strip_ids};
use crate::error::{DungenError, Result};

/// Options read from a floor type's `no_floors` extra
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GhostOptions {
    /// Added to the overlay opacity for each floor of depth
    #[serde(alias = "opacity_inc")]
    pub opacity_increment: f64,
    pub max_trans_floors: usize,
    /// Keep the bottom floor's own hallways visible
    pub ground_floor_halls: bool,
    /// Roof texture painted over ghosted rooms of every floor but the bottom one
    pub room_top_texture: Option<PathBuf>,
}

impl Default for GhostOptions {
    fn default() -> Self {
        Self {
            opacity_increment: 0.2,
            max_trans_floors: 3,
            ground_floor_halls: false,
            room_top_texture: None,
        }
    }
}

fn missing(id: &str) -> DungenError {
    DungenError::MissingElement(id.to_string())
}

/// Ghost lower floors through upper ones, top floor first in `floors`
pub fn composite_floors(floors: &mut [Document], options: &GhostOptions, scale: u32) -> Result<()> {
    let Some(last) = floors.len().checked_sub(1) else {
        return Ok(());
    };

    if !options.ground_floor_halls {
        let bottom = &mut floors[last];
        for id in ["hall_wall_pattern", "hall_walls"] {
            if !bottom.clear_children(id) {
                return Err(missing(id));
            }
        }
        let fg = bottom
            .find_element_mut("fg-elements")
            .and_then(|fg| fg.get_children_mut())
            .ok_or_else(|| missing("fg-elements"))?;
        set_texture(fg, "hall", "url(#background_pattern)", false);
    }

    let room_top = options
        .room_top_texture
        .as_deref()
        .map(|path| create_pattern(path, scale, false))
        .transpose()?;
    if let Some(tile) = &room_top {
        for doc in &mut floors[..last] {
            let roof = pattern("room_top_pattern", scale as f64, tile.clone());
            if !doc.append_children("defs", vec![roof], None) {
                return Err(missing("defs"));
            }
        }
    }

    let ghosts = floors
        .iter()
        .map(|doc| {
            doc.find_element("fg-elements")
                .map(|fg| strip_ids(fg.children()))
                .ok_or_else(|| missing("fg-elements"))
        })
        .collect::<Result<Vec<_>>>()?;

    for (i, doc) in floors.iter_mut().enumerate() {
        let deepest = last.min(i.saturating_add(options.max_trans_floors));
        for floor in (i + 1..=deepest).rev() {
            let mut elements = ghosts[floor].clone();
            if room_top.is_some() {
                set_texture(&mut elements, "room", "url(#room_top_pattern)", true);
                if floor < last || options.ground_floor_halls {
                    set_texture(&mut elements, "hall", "url(#room_top_pattern)", false);
                }
            }
            let opacity = ((floor - i) as f64 * options.opacity_increment).min(1.0);
            let overlay = Rectangle::new()
                .set("x", 0)
                .set("y", 0)
                .set("width", doc.width)
                .set("height", doc.height)
                .set("fill", "black")
                .set("opacity", num(opacity));
            let layer = vec![
                group()
                    .with_id(format!("bg_floor_{}", floor + 1))
                    .with_children(elements),
                overlay.into(),
            ];
            if !doc.append_children("bg-elements", layer, Some("hall_walls")) {
                return Err(missing("bg-elements"));
            }
        }
        log::debug!("floor {} ghosts {} floors below", i + 1, deepest - i);
    }
    Ok(())
}
