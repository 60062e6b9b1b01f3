//! Freehand pen stroke.

use super::{PENDING_ID, ShapeId, ShapeStyle, ShapeTrait, points_bounds, polyline_path};
use kurbo::{BezPath, Point, Rect};
use serde::{Deserialize, Serialize};

/// A freehand stroke (series of points in drawing order).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Freehand {
    #[serde(default)]
    pub(crate) id: ShapeId,
    /// Points in the stroke, in the order they were drawn.
    #[serde(default)]
    pub points: Vec<Point>,
    /// Style properties.
    #[serde(flatten)]
    pub style: ShapeStyle,
}

impl Freehand {
    /// Start a pending stroke at `start`.
    pub fn new(start: Point) -> Self {
        Self::from_points(vec![start])
    }

    /// Create from existing points.
    pub fn from_points(points: Vec<Point>) -> Self {
        Self {
            id: PENDING_ID,
            points,
            style: ShapeStyle::default(),
        }
    }

    /// Add a point to the stroke.
    pub fn add_point(&mut self, point: Point) {
        self.points.push(point);
    }

    /// Get the number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the stroke is empty.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl ShapeTrait for Freehand {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn bounds(&self) -> Rect {
        points_bounds(&self.points)
    }

    /// Hits when any sampled point lies within `tolerance`.
    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        self.points.iter().any(|p| p.distance(point) <= tolerance)
    }

    fn to_path(&self) -> BezPath {
        polyline_path(&self.points)
    }
}
