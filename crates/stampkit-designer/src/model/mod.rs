use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::geometry::{Point, Rect};

mod frame;
mod guide;
mod text;

pub use frame::StampFrame;
pub use guide::{GuideKind, SystemGuide};
pub use text::{CharStyle, CharStyles, StampText, StyleProperty, TextAlign};

/// Stable element identity, preserved across edits, undo and file round-trips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(Uuid);

impl ElementId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ElementId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OriginX {
    #[default]
    Left,
    Center,
    Right,
}

impl OriginX {
    /// Fraction of the width between the left edge and the anchor.
    pub fn factor(self) -> f64 {
        match self {
            OriginX::Left => 0.0,
            OriginX::Center => 0.5,
            OriginX::Right => 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OriginY {
    #[default]
    Top,
    Center,
    Bottom,
}

impl OriginY {
    /// Fraction of the height between the top edge and the anchor.
    pub fn factor(self) -> f64 {
        match self {
            OriginY::Top => 0.0,
            OriginY::Center => 0.5,
            OriginY::Bottom => 1.0,
        }
    }
}

/// Position, scale and rotation of an element.
///
/// `(left, top)` is the anchor: the point of the element's box selected by
/// `origin_x`/`origin_y`. Rotation happens around the anchor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub left: f64,
    pub top: f64,
    pub scale_x: f64,
    pub scale_y: f64,
    /// Degrees, clockwise on screen
    pub angle: f64,
    #[serde(default)]
    pub origin_x: OriginX,
    #[serde(default)]
    pub origin_y: OriginY,
}

impl Placement {
    pub fn new(left: f64, top: f64, origin_x: OriginX, origin_y: OriginY) -> Self {
        Self {
            left,
            top,
            scale_x: 1.0,
            scale_y: 1.0,
            angle: 0.0,
            origin_x,
            origin_y,
        }
    }

    pub fn anchor(&self) -> Point {
        Point::new(self.left, self.top)
    }

    /// Point of the box at the given origin, for a box of `size` on screen.
    pub fn point_by_origin(&self, origin_x: OriginX, origin_y: OriginY, size: (f64, f64)) -> Point {
        let offset = Point::new(
            (origin_x.factor() - self.origin_x.factor()) * size.0,
            (origin_y.factor() - self.origin_y.factor()) * size.1,
        )
        .rotated(self.angle);
        self.anchor().offset(offset.x, offset.y)
    }

    pub fn center(&self, size: (f64, f64)) -> Point {
        self.point_by_origin(OriginX::Center, OriginY::Center, size)
    }

    /// Moves the anchor so that the box point at `(origin_x, origin_y)` lands on `target`.
    pub fn set_position_by_origin(
        &mut self,
        target: Point,
        origin_x: OriginX,
        origin_y: OriginY,
        size: (f64, f64),
    ) {
        let current = self.point_by_origin(origin_x, origin_y, size);
        self.left += target.x - current.x;
        self.top += target.y - current.y;
    }

    /// Axis-aligned box of the rotated element.
    pub fn bounding_rect(&self, size: (f64, f64)) -> Rect {
        let (w, h) = size;
        let center = self.center(size);
        let corners: Vec<Point> = [(-0.5, -0.5), (0.5, -0.5), (0.5, 0.5), (-0.5, 0.5)]
            .iter()
            .map(|(fx, fy)| {
                let v = Point::new(fx * w, fy * h).rotated(self.angle);
                center.offset(v.x, v.y)
            })
            .collect();
        Rect::enclosing(&corners)
    }
}

/// Fields every user element carries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementMeta {
    pub id: ElementId,
    pub name: String,
    #[serde(default)]
    pub locked: bool,
    #[serde(default = "visible_default")]
    pub visible: bool,
}

fn visible_default() -> bool {
    true
}

impl ElementMeta {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ElementId::new(),
            name: name.into(),
            locked: false,
            visible: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Text,
    Frame,
}

/// Geometry shared by all user elements.
pub trait StampShape {
    fn meta(&self) -> &ElementMeta;
    fn meta_mut(&mut self) -> &mut ElementMeta;
    fn placement(&self) -> &Placement;
    fn placement_mut(&mut self) -> &mut Placement;

    /// Unscaled width and height of the content box.
    fn intrinsic_size(&self) -> (f64, f64);

    /// Stroke width in px; not affected by scale.
    fn stroke_px(&self) -> f64 {
        0.0
    }

    /// On-screen size before rotation.
    fn scaled_size(&self) -> (f64, f64) {
        let (w, h) = self.intrinsic_size();
        let p = self.placement();
        let stroke = self.stroke_px();
        (w * p.scale_x.abs() + stroke, h * p.scale_y.abs() + stroke)
    }

    fn bounding_rect(&self) -> Rect {
        self.placement().bounding_rect(self.scaled_size())
    }

    fn center(&self) -> Point {
        self.placement().center(self.scaled_size())
    }
}

/// A user element. System guides live in a separate list on the scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Element {
    Text(StampText),
    Frame(StampFrame),
}

impl Element {
    pub fn id(&self) -> ElementId {
        self.meta().id
    }

    pub fn name(&self) -> &str {
        &self.meta().name
    }

    pub fn kind(&self) -> ElementKind {
        match self {
            Element::Text(_) => ElementKind::Text,
            Element::Frame(_) => ElementKind::Frame,
        }
    }

    pub fn is_locked(&self) -> bool {
        self.meta().locked
    }

    pub fn is_visible(&self) -> bool {
        self.meta().visible
    }

    pub fn as_text(&self) -> Option<&StampText> {
        match self {
            Element::Text(t) => Some(t),
            Element::Frame(_) => None,
        }
    }

    pub fn as_text_mut(&mut self) -> Option<&mut StampText> {
        match self {
            Element::Text(t) => Some(t),
            Element::Frame(_) => None,
        }
    }

    pub fn as_frame(&self) -> Option<&StampFrame> {
        match self {
            Element::Frame(f) => Some(f),
            Element::Text(_) => None,
        }
    }
}

impl StampShape for Element {
    fn meta(&self) -> &ElementMeta {
        match self {
            Element::Text(s) => s.meta(),
            Element::Frame(s) => s.meta(),
        }
    }

    fn meta_mut(&mut self) -> &mut ElementMeta {
        match self {
            Element::Text(s) => s.meta_mut(),
            Element::Frame(s) => s.meta_mut(),
        }
    }

    fn placement(&self) -> &Placement {
        match self {
            Element::Text(s) => s.placement(),
            Element::Frame(s) => s.placement(),
        }
    }

    fn placement_mut(&mut self) -> &mut Placement {
        match self {
            Element::Text(s) => s.placement_mut(),
            Element::Frame(s) => s.placement_mut(),
        }
    }

    fn intrinsic_size(&self) -> (f64, f64) {
        match self {
            Element::Text(s) => s.intrinsic_size(),
            Element::Frame(s) => s.intrinsic_size(),
        }
    }

    fn stroke_px(&self) -> f64 {
        match self {
            Element::Text(s) => s.stroke_px(),
            Element::Frame(s) => s.stroke_px(),
        }
    }
}
