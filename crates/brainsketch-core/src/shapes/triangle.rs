//! Triangle shape.

use super::{PENDING_ID, ShapeId, ShapeStyle, ShapeTrait, points_bounds, rect_contains_inclusive};
use kurbo::{BezPath, Point, Rect};
use serde::{Deserialize, Serialize};

/// An unfilled triangle through three vertices.
///
/// When drawn with the tool, `p1` is the anchor, `p2` follows the pointer and `p3` is
/// `p2` mirrored across the vertical through the anchor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Triangle {
    #[serde(default)]
    pub(crate) id: ShapeId,
    pub p1: Point,
    pub p2: Point,
    pub p3: Point,
    /// Style properties.
    #[serde(flatten)]
    pub style: ShapeStyle,
}

impl Triangle {
    pub fn new(p1: Point, p2: Point, p3: Point) -> Self {
        Self {
            id: PENDING_ID,
            p1,
            p2,
            p3,
            style: ShapeStyle::default(),
        }
    }

    /// Create a pending triangle from the drag gesture.
    pub fn from_drag(anchor: Point, current: Point) -> Self {
        Self::new(anchor, current, Self::reflect(anchor, current))
    }

    pub(crate) fn set_drag(&mut self, anchor: Point, current: Point) {
        self.p1 = anchor;
        self.p2 = current;
        self.p3 = Self::reflect(anchor, current);
    }

    /// Third vertex: `current` reflected across x = anchor.x.
    fn reflect(anchor: Point, current: Point) -> Point {
        Point::new(2.0 * anchor.x - current.x, current.y)
    }

    pub fn vertices(&self) -> [Point; 3] {
        [self.p1, self.p2, self.p3]
    }
}

impl ShapeTrait for Triangle {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn bounds(&self) -> Rect {
        points_bounds(&self.vertices())
    }

    /// Bounding-box approximation, edges included.
    fn hit_test(&self, point: Point, _tolerance: f64) -> bool {
        rect_contains_inclusive(self.bounds(), point)
    }

    fn to_path(&self) -> BezPath {
        let mut path = BezPath::new();
        path.move_to(self.p1);
        path.line_to(self.p2);
        path.line_to(self.p3);
        path.close_path();
        path
    }
}
