//! Rectangle shape.

use super::{PENDING_ID, ShapeId, ShapeStyle, ShapeTrait, rect_contains_inclusive};
use kurbo::{BezPath, Point, Rect};
use serde::{Deserialize, Serialize};

/// An unfilled rectangle anchored at (x, y).
///
/// Width and height are signed: a drag up or left of the anchor yields negative
/// dimensions, and the outline extends in that direction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
    #[serde(default)]
    pub(crate) id: ShapeId,
    /// Anchor corner.
    pub x: f64,
    pub y: f64,
    /// Signed width of the rectangle.
    pub width: f64,
    /// Signed height of the rectangle.
    pub height: f64,
    /// Style properties.
    #[serde(flatten)]
    pub style: ShapeStyle,
}

impl Rectangle {
    /// Create a rectangle from an anchor and signed dimensions.
    pub fn new(anchor: Point, width: f64, height: f64) -> Self {
        Self {
            id: PENDING_ID,
            x: anchor.x,
            y: anchor.y,
            width,
            height,
            style: ShapeStyle::default(),
        }
    }

    /// Create a pending rectangle dragged from `anchor` to `current`.
    pub fn from_drag(anchor: Point, current: Point) -> Self {
        Self::new(anchor, current.x - anchor.x, current.y - anchor.y)
    }

    pub(crate) fn set_corners(&mut self, anchor: Point, current: Point) {
        self.x = anchor.x;
        self.y = anchor.y;
        self.width = current.x - anchor.x;
        self.height = current.y - anchor.y;
    }

    /// Get the rectangle as a normalized kurbo Rect.
    pub fn as_rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height).abs()
    }

    /// The same rectangle with non-negative width and height.
    pub fn normalized(&self) -> Self {
        let rect = self.as_rect();
        Self {
            id: self.id,
            x: rect.x0,
            y: rect.y0,
            width: rect.width(),
            height: rect.height(),
            style: self.style.clone(),
        }
    }
}

impl ShapeTrait for Rectangle {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn bounds(&self) -> Rect {
        self.as_rect()
    }

    /// Containment in the normalized box, edges included.
    fn hit_test(&self, point: Point, _tolerance: f64) -> bool {
        rect_contains_inclusive(self.as_rect(), point)
    }

    /// Outline visiting the corners from the anchor, so signed sizes keep their direction.
    fn to_path(&self) -> BezPath {
        let (x, y, w, h) = (self.x, self.y, self.width, self.height);
        let mut path = BezPath::new();
        path.move_to((x, y));
        path.line_to((x + w, y));
        path.line_to((x + w, y + h));
        path.line_to((x, y + h));
        path.close_path();
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_drag_keeps_sign() {
        let rect = Rectangle::from_drag(Point::new(50.0, 50.0), Point::new(20.0, 10.0));
        assert!((rect.width + 30.0).abs() < f64::EPSILON);
        assert!((rect.height + 40.0).abs() < f64::EPSILON);
        assert!((rect.x - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_hit_test_inclusive_bounds() {
        let rect = Rectangle::new(Point::new(0.0, 0.0), 100.0, 50.0);
        assert!(rect.hit_test(Point::new(0.0, 0.0), 8.0));
        assert!(rect.hit_test(Point::new(100.0, 50.0), 8.0));
        assert!(rect.hit_test(Point::new(40.0, 20.0), 8.0));
        assert!(!rect.hit_test(Point::new(100.1, 20.0), 8.0));
        assert!(!rect.hit_test(Point::new(40.0, -0.1), 8.0));
    }

    #[test]
    fn test_hit_test_is_sign_invariant() {
        let negative = Rectangle::new(Point::new(100.0, 60.0), -80.0, -40.0);
        let positive = negative.normalized();
        assert!((positive.x - 20.0).abs() < f64::EPSILON);
        assert!((positive.y - 20.0).abs() < f64::EPSILON);
        assert!((positive.width - 80.0).abs() < f64::EPSILON);
        assert!((positive.height - 40.0).abs() < f64::EPSILON);

        let samples = [
            Point::new(20.0, 20.0),
            Point::new(100.0, 60.0),
            Point::new(60.0, 40.0),
            Point::new(10.0, 40.0),
            Point::new(60.0, 61.0),
            Point::new(101.0, 59.0),
        ];
        for p in samples {
            assert_eq!(negative.hit_test(p, 8.0), positive.hit_test(p, 8.0), "sample {p:?}");
        }
    }

    #[test]
    fn test_path_extends_from_anchor() {
        let rect = Rectangle::new(Point::new(10.0, 10.0), -5.0, 5.0);
        let path = rect.to_path();
        assert_eq!(path.elements()[0], kurbo::PathEl::MoveTo(Point::new(10.0, 10.0)));
        assert_eq!(path.elements()[1], kurbo::PathEl::LineTo(Point::new(5.0, 10.0)));
        assert_eq!(path.elements().last(), Some(&kurbo::PathEl::ClosePath));
    }
}
