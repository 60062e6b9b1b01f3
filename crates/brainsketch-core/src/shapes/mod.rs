//! Shape definitions for the sketch board.

mod arrow;
mod circle;
mod eraser;
mod freehand;
mod line;
mod rectangle;
mod triangle;

pub use arrow::Arrow;
pub use circle::Circle;
pub use eraser::EraserStroke;
pub use freehand::Freehand;
pub use line::Line;
pub use rectangle::Rectangle;
pub use triangle::Triangle;

use kurbo::{BezPath, Point, Rect};
use peniko::Color;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

/// Default pointer distance used by the eraser when testing shapes.
pub const HIT_TOLERANCE: f64 = 8.0;

/// Identifier carried by a shape that has not been committed yet.
pub const PENDING_ID: ShapeId = Uuid::nil();

/// Serializable color representation (RGBA8).
///
/// Persisted as a CSS hex string (`#rrggbb`, or `#rrggbbaa` when not opaque) so that
/// stored drawings stay readable by the browser canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub const fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }

    pub const fn transparent() -> Self {
        Self::new(0, 0, 0, 0)
    }

    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa`.
    pub fn from_hex(color: &str) -> Option<Self> {
        if color == "transparent" {
            return Some(Self::transparent());
        }
        let hex = color.trim().strip_prefix('#')?;
        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(hex.get(range)?, 16).ok();
        match hex.len() {
            3 => {
                // #rgb -> #rrggbb
                let r = channel(0..1)? * 17;
                let g = channel(1..2)? * 17;
                let b = channel(2..3)? * 17;
                Some(Self::new(r, g, b, 255))
            }
            6 => Some(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?, 255)),
            8 => Some(Self::new(
                channel(0..2)?,
                channel(2..4)?,
                channel(4..6)?,
                channel(6..8)?,
            )),
            _ => None,
        }
    }

    /// Format as a CSS hex string.
    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

impl Serialize for SerializableColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for SerializableColor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::from_hex(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid color: {raw}")))
    }
}

/// Stroke properties shared by every colored shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeStyle {
    /// Stroke color.
    #[serde(default = "default_stroke")]
    pub stroke: SerializableColor,
    /// Stroke width in surface pixels.
    #[serde(default = "default_stroke_width")]
    pub stroke_width: f64,
}

fn default_stroke() -> SerializableColor {
    SerializableColor::white()
}

fn default_stroke_width() -> f64 {
    2.0
}

impl ShapeStyle {
    /// Get the stroke color as a peniko Color.
    pub fn stroke_color(&self) -> Color {
        self.stroke.into()
    }

    /// Set the stroke color from a peniko Color.
    pub fn set_stroke(&mut self, color: Color) {
        self.stroke = color.into();
    }
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self {
            stroke: default_stroke(),
            stroke_width: default_stroke_width(),
        }
    }
}

/// Unique identifier for shapes.
pub type ShapeId = Uuid;

/// Distance from a point to a line segment (a→b), with the projection clamped to the segment.
pub fn point_to_segment_dist(point: Point, a: Point, b: Point) -> f64 {
    let seg = b - a;
    let pv = point - a;
    let len_sq = seg.hypot2();
    if len_sq < f64::EPSILON {
        return pv.hypot();
    }
    let t = (pv.dot(seg) / len_sq).clamp(0.0, 1.0);
    let proj = a + seg * t;
    point.distance(proj)
}

/// Inclusive containment test against a (possibly unnormalized) rect.
pub(crate) fn rect_contains_inclusive(rect: Rect, point: Point) -> bool {
    let rect = rect.abs();
    point.x >= rect.x0 && point.x <= rect.x1 && point.y >= rect.y0 && point.y <= rect.y1
}

/// Axis-aligned bounds of a point list.
pub(crate) fn points_bounds(points: &[Point]) -> Rect {
    let Some(first) = points.first() else {
        return Rect::ZERO;
    };
    points
        .iter()
        .skip(1)
        .fold(Rect::from_points(*first, *first), |acc, p| acc.union_pt(*p))
}

/// Open polyline through the points.
pub(crate) fn polyline_path(points: &[Point]) -> BezPath {
    let mut path = BezPath::new();
    let Some((first, rest)) = points.split_first() else {
        return path;
    };
    path.move_to(*first);
    for point in rest {
        path.line_to(*point);
    }
    path
}

/// Common trait for all shapes.
pub trait ShapeTrait {
    /// Get the unique identifier.
    fn id(&self) -> ShapeId;

    /// Get the bounding box in surface coordinates.
    fn bounds(&self) -> Rect;

    /// Check if a point (in surface coordinates) hits this shape.
    fn hit_test(&self, point: Point, tolerance: f64) -> bool;

    /// Get the path representation for rendering.
    fn to_path(&self) -> BezPath;
}

/// Closed set of drawable shapes.
///
/// Serialized with an internal `type` tag so the persisted `lines` blob reads
/// `{ "type": "rect", "x": .., "y": .., .. }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Shape {
    Pen(Freehand),
    Line(Line),
    Rect(Rectangle),
    Circle(Circle),
    Triangle(Triangle),
    Arrow(Arrow),
    Eraser(EraserStroke),
}

impl Shape {
    pub fn id(&self) -> ShapeId {
        match self {
            Shape::Pen(s) => s.id(),
            Shape::Line(s) => s.id(),
            Shape::Rect(s) => s.id(),
            Shape::Circle(s) => s.id(),
            Shape::Triangle(s) => s.id(),
            Shape::Arrow(s) => s.id(),
            Shape::Eraser(s) => s.id(),
        }
    }

    pub fn bounds(&self) -> Rect {
        match self {
            Shape::Pen(s) => s.bounds(),
            Shape::Line(s) => s.bounds(),
            Shape::Rect(s) => s.bounds(),
            Shape::Circle(s) => s.bounds(),
            Shape::Triangle(s) => s.bounds(),
            Shape::Arrow(s) => s.bounds(),
            Shape::Eraser(s) => s.bounds(),
        }
    }

    /// Whether `point` is visually on or inside this shape.
    ///
    /// Eraser strokes never hit.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        match self {
            Shape::Pen(s) => s.hit_test(point, tolerance),
            Shape::Line(s) => s.hit_test(point, tolerance),
            Shape::Rect(s) => s.hit_test(point, tolerance),
            Shape::Circle(s) => s.hit_test(point, tolerance),
            Shape::Triangle(s) => s.hit_test(point, tolerance),
            Shape::Arrow(s) => s.hit_test(point, tolerance),
            Shape::Eraser(s) => s.hit_test(point, tolerance),
        }
    }

    pub fn to_path(&self) -> BezPath {
        match self {
            Shape::Pen(s) => s.to_path(),
            Shape::Line(s) => s.to_path(),
            Shape::Rect(s) => s.to_path(),
            Shape::Circle(s) => s.to_path(),
            Shape::Triangle(s) => s.to_path(),
            Shape::Arrow(s) => s.to_path(),
            Shape::Eraser(s) => s.to_path(),
        }
    }

    /// Stroke style, `None` for eraser strokes which carry no color.
    pub fn style(&self) -> Option<&ShapeStyle> {
        match self {
            Shape::Pen(s) => Some(&s.style),
            Shape::Line(s) => Some(&s.style),
            Shape::Rect(s) => Some(&s.style),
            Shape::Circle(s) => Some(&s.style),
            Shape::Triangle(s) => Some(&s.style),
            Shape::Arrow(s) => Some(&s.style),
            Shape::Eraser(_) => None,
        }
    }

    pub fn stroke_width(&self) -> f64 {
        match self {
            Shape::Eraser(s) => s.stroke_width,
            _ => self.style().map_or(default_stroke_width(), |s| s.stroke_width),
        }
    }

    pub fn is_eraser(&self) -> bool {
        matches!(self, Shape::Eraser(_))
    }

    /// Accumulated points for point-sequence shapes (pen and eraser).
    pub fn points(&self) -> Option<&[Point]> {
        match self {
            Shape::Pen(s) => Some(&s.points),
            Shape::Eraser(s) => Some(&s.points),
            _ => None,
        }
    }

    /// A point-sequence shape with fewer than two points draws nothing and is never committed.
    pub fn is_degenerate(&self) -> bool {
        self.points().is_some_and(|points| points.len() < 2)
    }

    /// Whether this shape still carries the placeholder identifier.
    pub fn is_pending(&self) -> bool {
        self.id() == PENDING_ID
    }

    pub(crate) fn set_id(&mut self, id: ShapeId) {
        match self {
            Shape::Pen(s) => s.id = id,
            Shape::Line(s) => s.id = id,
            Shape::Rect(s) => s.id = id,
            Shape::Circle(s) => s.id = id,
            Shape::Triangle(s) => s.id = id,
            Shape::Arrow(s) => s.id = id,
            Shape::Eraser(s) => s.id = id,
        }
    }

    /// Give the shape a fresh permanent identifier.
    pub fn regenerate_id(&mut self) {
        self.set_id(Uuid::new_v4());
    }

    /// Rebuild the geometry of a drag-defined shape from its anchor and the pointer.
    ///
    /// Point-sequence shapes append `current` instead.
    pub fn update_drag(&mut self, anchor: Point, current: Point) {
        match self {
            Shape::Pen(s) => s.add_point(current),
            Shape::Eraser(s) => s.add_point(current),
            Shape::Line(s) => s.set_endpoints(anchor, current),
            Shape::Arrow(s) => s.set_endpoints(anchor, current),
            Shape::Rect(s) => s.set_corners(anchor, current),
            Shape::Circle(s) => s.set_drag(anchor, current),
            Shape::Triangle(s) => s.set_drag(anchor, current),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_hex_round_trip() {
        let color = SerializableColor::from_hex("#0f172a").unwrap();
        assert_eq!(color, SerializableColor::new(15, 23, 42, 255));
        assert_eq!(color.to_hex(), "#0f172a");

        let short = SerializableColor::from_hex("#fff").unwrap();
        assert_eq!(short, SerializableColor::white());

        let translucent = SerializableColor::new(255, 0, 0, 128);
        assert_eq!(translucent.to_hex(), "#ff000080");
        assert_eq!(SerializableColor::from_hex("#ff000080"), Some(translucent));

        assert!(SerializableColor::from_hex("red").is_none());
        assert!(SerializableColor::from_hex("#12345").is_none());
    }

    #[test]
    fn test_point_to_segment_clamps() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(10.0, 0.0);
        assert!((point_to_segment_dist(Point::new(5.0, 3.0), a, b) - 3.0).abs() < 1e-9);
        // Beyond the end: distance to the endpoint, not to the infinite line
        assert!((point_to_segment_dist(Point::new(14.0, 3.0), a, b) - 5.0).abs() < 1e-9);
        // Zero-length segment
        assert!((point_to_segment_dist(Point::new(3.0, 4.0), a, a) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_shape_serializes_with_type_tag() {
        let mut rect = Rectangle::from_drag(Point::new(1.0, 2.0), Point::new(4.0, 6.0));
        rect.id = Uuid::new_v4();
        let json = serde_json::to_value(Shape::Rect(rect.clone())).unwrap();

        assert_eq!(json["type"], "rect");
        assert_eq!(json["width"], 3.0);
        assert_eq!(json["height"], 4.0);
        assert_eq!(json["stroke"], "#ffffff");
        assert_eq!(json["strokeWidth"], 2.0);

        let back: Shape = serde_json::from_value(json).unwrap();
        assert_eq!(back, Shape::Rect(rect));
    }

    #[test]
    fn test_legacy_eraser_without_id_deserializes() {
        let json = serde_json::json!({
            "type": "eraser",
            "points": [{ "x": 0.0, "y": 0.0 }, { "x": 4.0, "y": 4.0 }],
            "strokeWidth": 20.0
        });
        let shape: Shape = serde_json::from_value(json).unwrap();
        assert!(shape.is_eraser());
        assert!(shape.is_pending());
        assert_eq!(shape.points().map(<[Point]>::len), Some(2));
    }

    #[test]
    fn test_degenerate_only_applies_to_point_sequences() {
        let pen = Shape::Pen(Freehand::new(Point::new(1.0, 1.0)));
        assert!(pen.is_degenerate());

        let line = Shape::Line(Line::from_drag(Point::ZERO, Point::ZERO));
        assert!(!line.is_degenerate());
    }

    #[test]
    fn test_eraser_never_hits() {
        let eraser = Shape::Eraser(EraserStroke::from_points(vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
        ]));
        assert!(!eraser.hit_test(Point::new(0.0, 0.0), HIT_TOLERANCE));
    }

    #[test]
    fn test_regenerate_id_replaces_placeholder() {
        let mut shape = Shape::Circle(Circle::from_drag(Point::ZERO, Point::new(3.0, 4.0)));
        assert!(shape.is_pending());
        shape.regenerate_id();
        assert!(!shape.is_pending());
    }
}
