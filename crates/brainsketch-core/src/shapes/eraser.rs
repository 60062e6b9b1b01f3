//! Eraser stroke, painted as coverage subtraction.

use super::{PENDING_ID, ShapeId, ShapeTrait, points_bounds, polyline_path};
use kurbo::{BezPath, Point, Rect};
use serde::{Deserialize, Serialize};

/// A stroke that removes previously painted color instead of adding it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EraserStroke {
    #[serde(default)]
    pub(crate) id: ShapeId,
    /// Points in the stroke.
    #[serde(default)]
    pub points: Vec<Point>,
    /// Width of the erased band.
    #[serde(default = "default_width")]
    pub stroke_width: f64,
}

fn default_width() -> f64 {
    EraserStroke::DEFAULT_WIDTH
}

impl EraserStroke {
    /// Width used when the tool does not override it.
    pub const DEFAULT_WIDTH: f64 = 20.0;

    /// Start a pending eraser stroke at `start`.
    pub fn new(start: Point, stroke_width: f64) -> Self {
        Self {
            id: PENDING_ID,
            points: vec![start],
            stroke_width,
        }
    }

    /// Create from existing points with the default width.
    pub fn from_points(points: Vec<Point>) -> Self {
        Self {
            id: PENDING_ID,
            points,
            stroke_width: Self::DEFAULT_WIDTH,
        }
    }

    pub fn add_point(&mut self, point: Point) {
        self.points.push(point);
    }
}

impl ShapeTrait for EraserStroke {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn bounds(&self) -> Rect {
        let half = self.stroke_width / 2.0;
        points_bounds(&self.points).inflate(half, half)
    }

    fn hit_test(&self, _point: Point, _tolerance: f64) -> bool {
        false
    }

    fn to_path(&self) -> BezPath {
        polyline_path(&self.points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_eraser_has_one_point() {
        let eraser = EraserStroke::new(Point::new(1.0, 2.0), 12.0);
        assert_eq!(eraser.points, vec![Point::new(1.0, 2.0)]);
        assert!((eraser.stroke_width - 12.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_bounds_include_width() {
        let eraser = EraserStroke::from_points(vec![Point::new(10.0, 10.0), Point::new(20.0, 10.0)]);
        let bounds = eraser.bounds();
        assert!((bounds.x0 - 0.0).abs() < f64::EPSILON);
        assert!((bounds.x1 - 30.0).abs() < f64::EPSILON);
        assert!((bounds.y0 - 0.0).abs() < f64::EPSILON);
        assert!((bounds.y1 - 20.0).abs() < f64::EPSILON);
    }
}
