//! Straight line shape.

use super::{PENDING_ID, ShapeId, ShapeStyle, ShapeTrait, point_to_segment_dist};
use kurbo::{BezPath, Point, Rect};
use serde::{Deserialize, Serialize};

/// A single segment from (x1, y1) to (x2, y2).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    #[serde(default)]
    pub(crate) id: ShapeId,
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    /// Style properties.
    #[serde(flatten)]
    pub style: ShapeStyle,
}

impl Line {
    /// Create a pending line dragged from `anchor` to `current`.
    pub fn from_drag(anchor: Point, current: Point) -> Self {
        Self {
            id: PENDING_ID,
            x1: anchor.x,
            y1: anchor.y,
            x2: current.x,
            y2: current.y,
            style: ShapeStyle::default(),
        }
    }

    pub fn start(&self) -> Point {
        Point::new(self.x1, self.y1)
    }

    pub fn end(&self) -> Point {
        Point::new(self.x2, self.y2)
    }

    pub(crate) fn set_endpoints(&mut self, start: Point, end: Point) {
        self.x1 = start.x;
        self.y1 = start.y;
        self.x2 = end.x;
        self.y2 = end.y;
    }

    /// Get the length of the line.
    pub fn length(&self) -> f64 {
        self.start().distance(self.end())
    }
}

impl ShapeTrait for Line {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn bounds(&self) -> Rect {
        Rect::from_points(self.start(), self.end())
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        point_to_segment_dist(point, self.start(), self.end()) < tolerance
    }

    fn to_path(&self) -> BezPath {
        let mut path = BezPath::new();
        path.move_to(self.start());
        path.line_to(self.end());
        path
    }
}
