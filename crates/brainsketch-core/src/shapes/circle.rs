//! Circle shape.

use super::{PENDING_ID, ShapeId, ShapeStyle, ShapeTrait};
use kurbo::{BezPath, Circle as KurboCircle, Point, Rect, Shape as KurboShape};
use serde::{Deserialize, Serialize};

/// Accuracy used when flattening the outline to a path.
const PATH_TOLERANCE: f64 = 0.1;

/// An unfilled circle centered at (cx, cy).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    #[serde(default)]
    pub(crate) id: ShapeId,
    pub cx: f64,
    pub cy: f64,
    /// Radius.
    pub r: f64,
    /// Style properties.
    #[serde(flatten)]
    pub style: ShapeStyle,
}

impl Circle {
    pub fn new(center: Point, radius: f64) -> Self {
        Self {
            id: PENDING_ID,
            cx: center.x,
            cy: center.y,
            r: radius,
            style: ShapeStyle::default(),
        }
    }

    /// Create a pending circle centered on `anchor` reaching through `current`.
    pub fn from_drag(anchor: Point, current: Point) -> Self {
        Self::new(anchor, anchor.distance(current))
    }

    pub(crate) fn set_drag(&mut self, anchor: Point, current: Point) {
        self.cx = anchor.x;
        self.cy = anchor.y;
        self.r = anchor.distance(current);
    }

    pub fn center(&self) -> Point {
        Point::new(self.cx, self.cy)
    }

    /// Get as a kurbo Circle.
    pub fn as_kurbo(&self) -> KurboCircle {
        KurboCircle::new(self.center(), self.r)
    }
}

impl ShapeTrait for Circle {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn bounds(&self) -> Rect {
        Rect::new(
            self.cx - self.r,
            self.cy - self.r,
            self.cx + self.r,
            self.cy + self.r,
        )
    }

    /// Tests the disc, not just the outline.
    fn hit_test(&self, point: Point, _tolerance: f64) -> bool {
        self.center().distance(point) <= self.r
    }

    fn to_path(&self) -> BezPath {
        self.as_kurbo().to_path(PATH_TOLERANCE)
    }
}
