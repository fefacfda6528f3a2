//! SVG document helpers
//!
//! Floors are built from [`svg`] nodes so collaborators (and the compositor)
//! can find nodes by id or class, move copies between documents and restyle
//! them before the document is written out.

use std::fmt;

use svg::node::Value;
use svg::node::element::{Group, Pattern};

pub use svg::Node;

use crate::dungeon::Point;

/// One node of a floor document
pub type Element = Box<dyn Node>;

/// Format a coordinate without a trailing `.0`
pub fn num(value: f64) -> String {
    if value == value.trunc() && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

/// A tile pattern in user space
pub fn pattern(id: &str, size: f64, children: Vec<Element>) -> Element {
    let pattern = Pattern::new()
        .set("id", id)
        .set("width", size)
        .set("height", size)
        .set("patternUnits", "userSpaceOnUse");
    Element::from(pattern).with_children(children)
}

/// An empty `<g>`
pub fn group() -> Element {
    Group::new().into()
}

fn as_str(value: &Value) -> &str {
    value
}

/// Builder helpers for boxed nodes
pub trait ElementExt {
    fn with_id(self, id: impl Into<String>) -> Self;

    /// Replace the class list
    fn with_class<I, S>(self, classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>;

    fn with_children(self, children: Vec<Element>) -> Self;

    fn attr(self, name: &str, value: impl Into<Value>) -> Self;
}

impl ElementExt for Element {
    fn with_id(self, id: impl Into<String>) -> Self {
        self.attr("id", id.into())
    }

    fn with_class<I, S>(self, classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let classes: Vec<String> = classes.into_iter().map(Into::into).collect();
        if classes.is_empty() {
            return self;
        }
        self.attr("class", classes.join(" "))
    }

    fn with_children(mut self, children: Vec<Element>) -> Self {
        if let Some(existing) = self.get_children_mut() {
            existing.extend(children);
        }
        self
    }

    fn attr(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.set_attr(name, value);
        self
    }
}

/// Attribute and tree queries over any node
pub trait NodeExt {
    fn get_attr(&self, name: &str) -> Option<&str>;

    fn set_attr(&mut self, name: &str, value: impl Into<Value>);

    fn id(&self) -> Option<&str> {
        self.get_attr("id")
    }

    fn has_class(&self, class: &str) -> bool {
        self.get_attr("class")
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
    }

    fn children(&self) -> &[Element];

    /// Depth-first search by id, including `self`
    fn find(&self, id: &str) -> Option<&(dyn Node + 'static)>;

    fn find_mut(&mut self, id: &str) -> Option<&mut (dyn Node + 'static)>;
}

impl NodeExt for dyn Node {
    fn get_attr(&self, name: &str) -> Option<&str> {
        self.get_attributes()?.get(name).map(as_str)
    }

    fn set_attr(&mut self, name: &str, value: impl Into<Value>) {
        if let Some(attributes) = self.get_attributes_mut() {
            attributes.insert(name.to_string(), value.into());
        }
    }

    fn children(&self) -> &[Element] {
        self.get_children().map(Vec::as_slice).unwrap_or_default()
    }

    fn find(&self, id: &str) -> Option<&(dyn Node + 'static)> {
        if self.id() == Some(id) {
            return Some(self);
        }
        self.children().iter().find_map(|c| c.find(id))
    }

    fn find_mut(&mut self, id: &str) -> Option<&mut (dyn Node + 'static)> {
        if self.id() == Some(id) {
            return Some(self);
        }
        self.get_children_mut()?
            .iter_mut()
            .find_map(|c| c.find_mut(id))
    }
}

fn remove_ids(node: &mut dyn Node) {
    if let Some(attributes) = node.get_attributes_mut() {
        attributes.remove("id");
    }
    if let Some(children) = node.get_children_mut() {
        for child in children {
            remove_ids(&mut **child);
        }
    }
}

/// Recursive copies of `elements` with every id removed
pub fn strip_ids(elements: &[Element]) -> Vec<Element> {
    elements
        .iter()
        .map(|el| {
            let mut copy = el.clone();
            remove_ids(&mut *copy);
            copy
        })
        .collect()
}

/// Restyle every element carrying `class`
///
/// The stroke is always replaced; the fill only when `set_fill` is set.
pub fn set_texture(elements: &mut [Element], class: &str, texture: &str, set_fill: bool) {
    for el in elements {
        if el.has_class(class) {
            el.set_attr("stroke", texture);
            if set_fill {
                el.set_attr("fill", texture);
            }
        }
        if let Some(children) = el.get_children_mut() {
            set_texture(children, class, texture, set_fill);
        }
    }
}

/// Axis-aligned bounds of a room primitive
#[derive(Debug, Clone, PartialEq)]
pub struct RoomBounds {
    pub id: String,
    pub class: Vec<String>,
    pub min: Point,
    pub max: Point,
}

/// A complete floor document
#[derive(Debug, Clone)]
pub struct Document {
    pub width: f64,
    pub height: f64,
    root: svg::Document,
}

impl Document {
    pub fn new(width: f64, height: f64, children: Vec<Element>) -> Self {
        let root = children.into_iter().fold(
            svg::Document::new()
                .set("xmlns", "http://www.w3.org/2000/svg")
                .set("width", width)
                .set("height", height),
            |doc, child| doc.add(child),
        );
        Self {
            width,
            height,
            root,
        }
    }

    fn root(&self) -> &(dyn Node + 'static) {
        &self.root
    }

    fn root_mut(&mut self) -> &mut (dyn Node + 'static) {
        &mut self.root
    }

    /// Top-level nodes
    pub fn children(&self) -> &[Element] {
        self.root().children()
    }

    pub fn find_element(&self, id: &str) -> Option<&(dyn Node + 'static)> {
        self.root().find(id)
    }

    pub fn find_element_mut(&mut self, id: &str) -> Option<&mut (dyn Node + 'static)> {
        self.root_mut().find_mut(id)
    }

    /// Insert `elements` into the element `id`, before its child `before` when
    /// exactly one child has that id, otherwise at the end
    ///
    /// Returns false when `id` is not in the document.
    pub fn append_children(&mut self, id: &str, elements: Vec<Element>, before: Option<&str>) -> bool {
        let Some(children) = self
            .find_element_mut(id)
            .and_then(|parent| parent.get_children_mut())
        else {
            return false;
        };
        let mut index = children.len();
        if let Some(before) = before {
            let matches: Vec<usize> = children
                .iter()
                .enumerate()
                .filter(|(_, c)| c.id() == Some(before))
                .map(|(i, _)| i)
                .collect();
            if let [only] = matches[..] {
                index = only;
            }
        }
        children.splice(index..index, elements);
        true
    }

    /// Remove every child of the element `id`
    ///
    /// Returns false when `id` is not in the document.
    pub fn clear_children(&mut self, id: &str) -> bool {
        match self
            .find_element_mut(id)
            .and_then(|parent| parent.get_children_mut())
        {
            Some(children) => {
                children.clear();
                true
            }
            None => false,
        }
    }

    /// Bounds of every `room-*` element, for collaborators that place overlays
    pub fn room_bounds(&self) -> Vec<RoomBounds> {
        let mut bounds = Vec::new();
        if let Some(rooms) = self.find_element("rooms") {
            collect_room_bounds(rooms.children(), &mut bounds);
        }
        bounds
    }
}

fn collect_room_bounds(elements: &[Element], out: &mut Vec<RoomBounds>) {
    for el in elements {
        if let Some(id) = el.id().filter(|id| id.starts_with("room-"))
            && let Some((min, max)) = element_extent(&**el)
        {
            out.push(RoomBounds {
                id: id.to_string(),
                class: el
                    .get_attr("class")
                    .map(|c| c.split_whitespace().map(str::to_string).collect())
                    .unwrap_or_default(),
                min,
                max,
            });
        }
        collect_room_bounds(el.children(), out);
    }
}

/// Extent from the geometry attributes: `d` for paths, `r` for circles and
/// `x`/`y`/`width`/`height` for rects
fn element_extent(el: &(dyn Node + 'static)) -> Option<(Point, Point)> {
    let attr = |name: &str| el.get_attr(name).and_then(|v| v.parse::<f64>().ok());
    if let Some(d) = el.get_attr("d") {
        let numbers: Vec<f64> = d
            .split_whitespace()
            .filter_map(|token| token.parse().ok())
            .collect();
        let mut points = numbers.chunks_exact(2).map(|p| Point::new(p[0], p[1]));
        let first = points.next()?;
        return Some(points.fold((first, first), |(min, max), p| {
            (
                Point::new(min.x.min(p.x), min.y.min(p.y)),
                Point::new(max.x.max(p.x), max.y.max(p.y)),
            )
        }));
    }
    if let Some(r) = attr("r") {
        let (cx, cy) = (attr("cx")?, attr("cy")?);
        return Some((Point::new(cx - r, cy - r), Point::new(cx + r, cy + r)));
    }
    let (x, y) = (attr("x")?, attr("y")?);
    Some((
        Point::new(x, y),
        Point::new(x + attr("width")?, y + attr("height")?),
    ))
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.root, f)
    }
}
