//! Arrow shape.

use super::{PENDING_ID, ShapeId, ShapeStyle, ShapeTrait, point_to_segment_dist, points_bounds};
use kurbo::{BezPath, Point, Rect};
use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_6;

/// An arrow shape (line with a two-segment arrowhead at the end point).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Arrow {
    #[serde(default)]
    pub(crate) id: ShapeId,
    pub x1: f64,
    pub y1: f64,
    /// End point (where the arrowhead points).
    pub x2: f64,
    pub y2: f64,
    /// Length of each arrowhead segment.
    #[serde(default = "default_head_length")]
    pub head_length: f64,
    /// Style properties.
    #[serde(flatten)]
    pub style: ShapeStyle,
}

fn default_head_length() -> f64 {
    Arrow::DEFAULT_HEAD_LENGTH
}

impl Arrow {
    pub const DEFAULT_HEAD_LENGTH: f64 = 10.0;

    /// Create a pending arrow dragged from `anchor` to `current`.
    pub fn from_drag(anchor: Point, current: Point) -> Self {
        Self {
            id: PENDING_ID,
            x1: anchor.x,
            y1: anchor.y,
            x2: current.x,
            y2: current.y,
            head_length: Self::DEFAULT_HEAD_LENGTH,
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

    /// Shaft angle in radians.
    pub fn angle(&self) -> f64 {
        (self.y2 - self.y1).atan2(self.x2 - self.x1)
    }

    /// Get the length of the arrow shaft.
    pub fn length(&self) -> f64 {
        self.start().distance(self.end())
    }

    /// Outer ends of the two head segments.
    ///
    /// Each lies `head_length` away from the end point, at ±30° from the reversed shaft.
    pub fn head_points(&self) -> [Point; 2] {
        let angle = self.angle();
        let head = |offset: f64| {
            Point::new(
                self.x2 - self.head_length * (angle + offset).cos(),
                self.y2 - self.head_length * (angle + offset).sin(),
            )
        };
        [head(-FRAC_PI_6), head(FRAC_PI_6)]
    }
}

impl ShapeTrait for Arrow {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn bounds(&self) -> Rect {
        let [left, right] = self.head_points();
        points_bounds(&[self.start(), self.end(), left, right])
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        point_to_segment_dist(point, self.start(), self.end()) < tolerance
    }

    fn to_path(&self) -> BezPath {
        let mut path = BezPath::new();
        let end = self.end();

        // Shaft
        path.move_to(self.start());
        path.line_to(end);

        // Head
        let [left, right] = self.head_points();
        path.move_to(end);
        path.line_to(left);
        path.move_to(end);
        path.line_to(right);

        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Point, b: Point) -> bool {
        a.distance(b) < 1e-9
    }

    #[test]
    fn test_arrow_creation() {
        let arrow = Arrow::from_drag(Point::new(0.0, 0.0), Point::new(100.0, 0.0));
        assert!((arrow.length() - 100.0).abs() < f64::EPSILON);
        assert!((arrow.head_length - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_head_points_horizontal_shaft() {
        let arrow = Arrow::from_drag(Point::new(0.0, 0.0), Point::new(100.0, 0.0));
        let [a, b] = arrow.head_points();

        let expected_a = Point::new(
            100.0 - 10.0 * (-FRAC_PI_6).cos(),
            -10.0 * (-FRAC_PI_6).sin(),
        );
        let expected_b = Point::new(100.0 - 10.0 * FRAC_PI_6.cos(), -10.0 * FRAC_PI_6.sin());
        assert!(close(a, expected_a));
        assert!(close(b, expected_b));

        for p in [a, b] {
            assert!((p.distance(arrow.end()) - 10.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_head_points_follow_shaft_angle() {
        let arrow = Arrow::from_drag(Point::new(0.0, 0.0), Point::new(0.0, 50.0));
        let [a, b] = arrow.head_points();
        // Pointing down: both head points sit above the tip, mirrored around x = 0.
        assert!(a.y < 50.0 && b.y < 50.0);
        assert!((a.x + b.x).abs() < 1e-9);
    }

    #[test]
    fn test_hit_test_shaft() {
        let arrow = Arrow::from_drag(Point::new(0.0, 0.0), Point::new(100.0, 0.0));
        assert!(arrow.hit_test(Point::new(50.0, 5.0), 8.0));
        assert!(!arrow.hit_test(Point::new(50.0, 20.0), 8.0));
    }

    #[test]
    fn test_missing_head_length_defaults() {
        let json = serde_json::json!({ "x1": 0.0, "y1": 0.0, "x2": 5.0, "y2": 5.0 });
        let arrow: Arrow = serde_json::from_value(json).unwrap();
        assert!((arrow.head_length - Arrow::DEFAULT_HEAD_LENGTH).abs() < f64::EPSILON);
    }

    #[test]
    fn test_path_has_shaft_and_two_heads() {
        let arrow = Arrow::from_drag(Point::new(0.0, 0.0), Point::new(100.0, 0.0));
        let moves = arrow
            .to_path()
            .elements()
            .iter()
            .filter(|el| matches!(el, kurbo::PathEl::MoveTo(_)))
            .count();
        assert_eq!(moves, 3);
    }
}
