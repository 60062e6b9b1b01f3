//! Canvas document and editing session.

use crate::input::{MouseButton, PointerEvent};
use crate::shapes::{HIT_TOLERANCE, Shape, ShapeId};
use crate::tools::{EraserMode, ToolKind, ToolManager};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// The committed shapes of a drawing, back to front.
///
/// Serializes as a bare array, which is the `lines` blob the persistence layer stores.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CanvasDocument {
    shapes: Vec<Shape>,
}

impl CanvasDocument {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a committed shape on top of the others.
    pub fn add_shape(&mut self, shape: Shape) {
        self.shapes.push(shape);
    }

    /// Remove the most recently added shape.
    pub fn undo(&mut self) -> Option<Shape> {
        self.shapes.pop()
    }

    /// Clear all shapes from the document.
    pub fn clear(&mut self) {
        self.shapes.clear();
    }

    /// Remove a shape by id.
    pub fn remove_shape(&mut self, id: ShapeId) -> Option<Shape> {
        let index = self.shapes.iter().position(|s| s.id() == id)?;
        Some(self.shapes.remove(index))
    }

    /// Remove every shape hit at `point`. Returns how many were removed.
    pub fn remove_hits(&mut self, point: Point, tolerance: f64) -> usize {
        let before = self.shapes.len();
        self.shapes.retain(|shape| !shape.hit_test(point, tolerance));
        before - self.shapes.len()
    }

    /// Get a shape by ID.
    pub fn get_shape(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.id() == id)
    }

    /// Shapes in paint order (back to front).
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    /// Find shapes at a point, front to back.
    pub fn shapes_at_point(&self, point: Point, tolerance: f64) -> Vec<ShapeId> {
        self.shapes
            .iter()
            .rev()
            .filter(|s| s.hit_test(point, tolerance))
            .map(Shape::id)
            .collect()
    }

    /// Get the bounding box of all shapes.
    pub fn bounds(&self) -> Option<Rect> {
        self.shapes
            .iter()
            .map(Shape::bounds)
            .reduce(|acc, bounds| acc.union(bounds))
    }

    /// Check if the document is empty.
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Get the number of shapes.
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// Encode the shapes as the opaque `lines` value persisted per user.
    pub fn to_lines(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(&self.shapes)
    }

    /// Decode a persisted `lines` value.
    ///
    /// The store enforces no schema, so entries that do not parse as a shape, or that
    /// would never have been committed, are skipped with a warning. Entries saved
    /// without an id get a fresh one.
    pub fn from_lines(lines: &serde_json::Value) -> Self {
        let Some(entries) = lines.as_array() else {
            if !lines.is_null() {
                log::warn!("Ignoring persisted lines that are not an array");
            }
            return Self::new();
        };

        let mut doc = Self::new();
        for (index, entry) in entries.iter().enumerate() {
            match Shape::deserialize(entry) {
                Ok(shape) if shape.is_degenerate() => {
                    log::warn!("Skipping degenerate stroke at index {}", index);
                }
                Ok(mut shape) => {
                    if shape.is_pending() {
                        shape.regenerate_id();
                    }
                    doc.add_shape(shape);
                }
                Err(e) => log::warn!("Skipping unreadable shape at index {}: {}", index, e),
            }
        }
        doc
    }

    /// Serialize the document to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize a document from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Toolbar commands the UI sends to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CanvasAction {
    SelectTool(ToolKind),
    Undo,
    Clear,
}

/// Editing session: committed document, the tool and its pending shape.
///
/// Every mutation bumps [`Canvas::revision`]; hosts repaint when it changes.
#[derive(Debug, Clone, Default)]
pub struct Canvas {
    /// The committed drawing.
    pub document: CanvasDocument,
    /// Tool manager.
    pub tool_manager: ToolManager,
    eraser_mode: EraserMode,
    revision: u64,
}

impl Canvas {
    /// Create a new canvas with an empty document and stroke-style erasing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a canvas whose eraser follows `mode` for its whole lifetime.
    pub fn with_eraser_mode(eraser_mode: EraserMode) -> Self {
        Self {
            eraser_mode,
            ..Self::default()
        }
    }

    /// Create a canvas with an existing document.
    pub fn with_document(document: CanvasDocument) -> Self {
        Self {
            document,
            ..Self::default()
        }
    }

    pub fn eraser_mode(&self) -> EraserMode {
        self.eraser_mode
    }

    /// Monotonic change counter.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    /// Set the current tool, dropping any shape under construction.
    pub fn set_tool(&mut self, tool: ToolKind) {
        let had_pending = self.tool_manager.is_active();
        self.tool_manager.set_tool(tool);
        if had_pending {
            self.touch();
        }
    }

    pub fn tool(&self) -> ToolKind {
        self.tool_manager.current_tool
    }

    fn erases_on_contact(&self) -> bool {
        self.tool() == ToolKind::Eraser && self.eraser_mode == EraserMode::Contact
    }

    /// Start a gesture with the active tool at `position`.
    pub fn begin_stroke(&mut self, position: Point) {
        if self.erases_on_contact() {
            self.tool_manager.begin_without_shape(position);
            self.erase_at(position);
            return;
        }
        self.tool_manager.begin(position);
        self.touch();
    }

    /// Extend the gesture in progress. No-op when idle.
    pub fn extend_stroke(&mut self, position: Point) {
        if !self.tool_manager.is_active() {
            return;
        }
        if self.erases_on_contact() {
            self.erase_at(position);
            return;
        }
        self.tool_manager.update(position);
        self.touch();
    }

    /// Delete every committed shape under `position`.
    ///
    /// Only acts with the eraser tool on an erase-on-contact canvas. Returns the number
    /// of shapes removed.
    pub fn erase_at(&mut self, position: Point) -> usize {
        if !self.erases_on_contact() {
            return 0;
        }
        let removed = self.document.remove_hits(position, HIT_TOLERANCE);
        if removed > 0 {
            log::debug!("Erased {} shape(s) at ({}, {})", removed, position.x, position.y);
            self.touch();
        }
        removed
    }

    /// Finish the gesture, committing its shape under a fresh id.
    ///
    /// Strokes with fewer than two points are discarded. Returns the committed id.
    pub fn commit_stroke(&mut self) -> Option<ShapeId> {
        let was_active = self.tool_manager.is_active();
        let pending = self.tool_manager.end();
        if was_active {
            self.touch();
        }

        let mut shape = pending?;
        if shape.is_degenerate() {
            log::debug!("Discarding stroke with fewer than two points");
            return None;
        }
        shape.regenerate_id();
        let id = shape.id();
        self.document.add_shape(shape);
        Some(id)
    }

    /// Abandon the gesture without committing.
    pub fn cancel_stroke(&mut self) {
        if self.tool_manager.is_active() {
            self.tool_manager.cancel();
            self.touch();
        }
    }

    /// Remove the most recently committed shape.
    pub fn undo(&mut self) -> Option<Shape> {
        let removed = self.document.undo();
        if removed.is_some() {
            self.touch();
        }
        removed
    }

    /// Remove every committed shape.
    pub fn clear(&mut self) {
        self.document.clear();
        self.touch();
    }

    /// Swap in a loaded document, dropping any gesture in progress.
    pub fn replace_document(&mut self, document: CanvasDocument) {
        self.tool_manager.cancel();
        self.document = document;
        self.touch();
    }

    /// Get the shape currently under construction.
    pub fn pending(&self) -> Option<&Shape> {
        self.tool_manager.pending()
    }

    /// Committed shapes followed by the pending one, in paint order.
    pub fn shapes_for_render(&self) -> impl Iterator<Item = &Shape> {
        self.document.shapes().iter().chain(self.pending())
    }

    /// Run a toolbar command. Returns true if a repaint is needed.
    pub fn apply(&mut self, action: CanvasAction) -> bool {
        let before = self.revision;
        match action {
            CanvasAction::SelectTool(tool) => self.set_tool(tool),
            CanvasAction::Undo => {
                self.undo();
            }
            CanvasAction::Clear => self.clear(),
        }
        self.revision != before
    }

    /// Route a pointer event. Returns true if a repaint is needed.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> bool {
        let before = self.revision;
        match event {
            PointerEvent::Down { position, button } => {
                if button == MouseButton::Left {
                    self.begin_stroke(position);
                }
            }
            PointerEvent::Move { position } => self.extend_stroke(position),
            PointerEvent::Up { position } => {
                if !self.tool().accumulates_points() {
                    self.extend_stroke(position);
                }
                self.commit_stroke();
            }
            PointerEvent::Leave => {
                self.commit_stroke();
            }
        }
        self.revision != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{Freehand, Rectangle};

    fn draw(canvas: &mut Canvas, points: &[(f64, f64)]) -> Option<ShapeId> {
        let mut iter = points.iter().map(|&(x, y)| Point::new(x, y));
        if let Some(first) = iter.next() {
            canvas.begin_stroke(first);
        }
        for p in iter {
            canvas.extend_stroke(p);
        }
        canvas.commit_stroke()
    }

    #[test]
    fn test_document_creation() {
        let doc = CanvasDocument::new();
        assert!(doc.is_empty());
        assert!(doc.bounds().is_none());
    }

    #[test]
    fn test_add_and_remove_shape() {
        let mut doc = CanvasDocument::new();
        let mut rect = Shape::Rect(Rectangle::new(Point::new(0.0, 0.0), 100.0, 100.0));
        rect.regenerate_id();
        let id = rect.id();

        doc.add_shape(rect);
        assert_eq!(doc.len(), 1);
        assert!(doc.get_shape(id).is_some());

        assert!(doc.remove_shape(id).is_some());
        assert!(doc.is_empty());
    }

    #[test]
    fn test_shapes_at_point_front_to_back() {
        let mut doc = CanvasDocument::new();
        let mut back = Shape::Rect(Rectangle::new(Point::new(0.0, 0.0), 100.0, 100.0));
        let mut front = Shape::Rect(Rectangle::new(Point::new(50.0, 50.0), 100.0, 100.0));
        back.regenerate_id();
        front.regenerate_id();
        let (back_id, front_id) = (back.id(), front.id());
        doc.add_shape(back);
        doc.add_shape(front);

        assert_eq!(doc.shapes_at_point(Point::new(75.0, 75.0), 0.0), vec![front_id, back_id]);
        assert_eq!(doc.shapes_at_point(Point::new(25.0, 25.0), 0.0), vec![back_id]);
    }

    #[test]
    fn test_commit_assigns_fresh_ids() {
        let mut canvas = Canvas::new();
        canvas.set_tool(ToolKind::Line);
        let a = draw(&mut canvas, &[(0.0, 0.0), (10.0, 10.0)]).unwrap();
        let b = draw(&mut canvas, &[(0.0, 0.0), (10.0, 10.0)]).unwrap();
        assert_ne!(a, b);
        assert!(canvas.document.shapes().iter().all(|s| !s.is_pending()));
        assert!(canvas.pending().is_none());
    }

    #[test]
    fn test_n_commits_then_n_undos() {
        let mut canvas = Canvas::new();
        let tools = [
            ToolKind::Pen,
            ToolKind::Line,
            ToolKind::Rect,
            ToolKind::Circle,
            ToolKind::Triangle,
            ToolKind::Arrow,
            ToolKind::Eraser,
        ];
        for (i, tool) in tools.iter().enumerate() {
            canvas.set_tool(*tool);
            draw(&mut canvas, &[(0.0, 0.0), (5.0, 5.0), (10.0, 0.0)]);
            assert_eq!(canvas.document.len(), i + 1);
        }
        for _ in 0..tools.len() {
            assert!(canvas.undo().is_some());
        }
        assert!(canvas.document.is_empty());
        // Further undos are no-ops.
        assert!(canvas.undo().is_none());
    }

    #[test]
    fn test_short_strokes_are_discarded() {
        let mut canvas = Canvas::new();
        assert!(draw(&mut canvas, &[(3.0, 3.0)]).is_none());

        canvas.set_tool(ToolKind::Eraser);
        assert!(draw(&mut canvas, &[(3.0, 3.0)]).is_none());

        assert!(canvas.document.is_empty());
        assert!(canvas.pending().is_none());
    }

    #[test]
    fn test_drag_shapes_commit_even_without_movement() {
        let mut canvas = Canvas::new();
        canvas.set_tool(ToolKind::Rect);
        assert!(draw(&mut canvas, &[(3.0, 3.0)]).is_some());
    }

    #[test]
    fn test_pen_stroke_then_undo_is_empty() {
        let mut canvas = Canvas::new();
        draw(&mut canvas, &[(0.0, 0.0), (5.0, 5.0), (10.0, 0.0)]).unwrap();
        assert_eq!(canvas.document.len(), 1);
        let Some(Shape::Pen(pen)) = canvas.document.shapes().first() else {
            panic!("expected a pen stroke");
        };
        assert_eq!(pen.points.len(), 3);

        canvas.undo();
        assert!(canvas.document.is_empty());
    }

    #[test]
    fn test_extend_without_pending_is_noop() {
        let mut canvas = Canvas::new();
        let revision = canvas.revision();
        canvas.extend_stroke(Point::new(4.0, 4.0));
        assert_eq!(canvas.revision(), revision);
        assert!(canvas.pending().is_none());
        assert!(canvas.commit_stroke().is_none());
    }

    #[test]
    fn test_triangle_gesture_reflects_third_vertex() {
        let mut canvas = Canvas::new();
        canvas.set_tool(ToolKind::Triangle);
        draw(&mut canvas, &[(10.0, 10.0), (50.0, 50.0), (30.0, 20.0)]);

        let Some(Shape::Triangle(tri)) = canvas.document.shapes().first() else {
            panic!("expected a triangle");
        };
        assert_eq!(tri.p3, Point::new(-10.0, 20.0));
    }

    #[test]
    fn test_clear_empties_committed_only() {
        let mut canvas = Canvas::new();
        draw(&mut canvas, &[(0.0, 0.0), (5.0, 5.0)]);
        canvas.begin_stroke(Point::new(1.0, 1.0));
        canvas.clear();
        assert!(canvas.document.is_empty());
        assert!(canvas.pending().is_some());
    }

    #[test]
    fn test_stroke_eraser_keeps_shapes() {
        let mut canvas = Canvas::new();
        canvas.set_tool(ToolKind::Rect);
        draw(&mut canvas, &[(0.0, 0.0), (50.0, 50.0)]);

        canvas.set_tool(ToolKind::Eraser);
        assert_eq!(canvas.erase_at(Point::new(10.0, 10.0)), 0);
        draw(&mut canvas, &[(10.0, 10.0), (20.0, 20.0)]);

        assert_eq!(canvas.document.len(), 2);
        assert!(canvas.document.shapes()[1].is_eraser());
    }

    #[test]
    fn test_contact_eraser_removes_hit_shapes() {
        let mut canvas = Canvas::with_eraser_mode(EraserMode::Contact);
        canvas.set_tool(ToolKind::Rect);
        draw(&mut canvas, &[(0.0, 0.0), (50.0, 50.0)]);
        canvas.set_tool(ToolKind::Circle);
        draw(&mut canvas, &[(200.0, 200.0), (210.0, 200.0)]);
        canvas.set_tool(ToolKind::Line);
        draw(&mut canvas, &[(0.0, 300.0), (100.0, 300.0)]);
        assert_eq!(canvas.document.len(), 3);

        canvas.set_tool(ToolKind::Eraser);
        canvas.begin_stroke(Point::new(25.0, 25.0));
        assert_eq!(canvas.document.len(), 2);
        assert!(canvas.pending().is_none());

        canvas.extend_stroke(Point::new(50.0, 303.0));
        assert_eq!(canvas.document.len(), 1);

        // Nothing is committed for the eraser gesture itself.
        assert!(canvas.commit_stroke().is_none());
        assert_eq!(canvas.document.len(), 1);
        assert!(matches!(canvas.document.shapes()[0], Shape::Circle(_)));
    }

    #[test]
    fn test_contact_erase_requires_eraser_tool() {
        let mut canvas = Canvas::with_eraser_mode(EraserMode::Contact);
        canvas.set_tool(ToolKind::Rect);
        draw(&mut canvas, &[(0.0, 0.0), (50.0, 50.0)]);
        assert_eq!(canvas.erase_at(Point::new(10.0, 10.0)), 0);
        assert_eq!(canvas.document.len(), 1);
    }

    #[test]
    fn test_shapes_for_render_ends_with_pending() {
        let mut canvas = Canvas::new();
        draw(&mut canvas, &[(0.0, 0.0), (5.0, 5.0)]);
        canvas.set_tool(ToolKind::Circle);
        canvas.begin_stroke(Point::new(1.0, 1.0));

        let shapes: Vec<&Shape> = canvas.shapes_for_render().collect();
        assert_eq!(shapes.len(), 2);
        assert!(shapes[1].is_pending());
        assert!(matches!(shapes[1], Shape::Circle(_)));
    }

    #[test]
    fn test_pointer_gesture() {
        let mut canvas = Canvas::new();
        canvas.set_tool(ToolKind::Line);

        assert!(canvas.handle_pointer(PointerEvent::Down {
            position: Point::new(0.0, 0.0),
            button: MouseButton::Left,
        }));
        assert!(canvas.handle_pointer(PointerEvent::Move {
            position: Point::new(5.0, 5.0),
        }));
        assert!(canvas.handle_pointer(PointerEvent::Up {
            position: Point::new(20.0, 0.0),
        }));

        let Some(Shape::Line(line)) = canvas.document.shapes().first() else {
            panic!("expected a line");
        };
        assert_eq!(line.end(), Point::new(20.0, 0.0));

        // Moves without a gesture need no repaint.
        assert!(!canvas.handle_pointer(PointerEvent::Move {
            position: Point::new(1.0, 1.0),
        }));
    }

    #[test]
    fn test_pointer_leave_commits() {
        let mut canvas = Canvas::new();
        canvas.handle_pointer(PointerEvent::Down {
            position: Point::new(0.0, 0.0),
            button: MouseButton::Left,
        });
        canvas.handle_pointer(PointerEvent::Move {
            position: Point::new(3.0, 3.0),
        });
        canvas.handle_pointer(PointerEvent::Leave);
        assert_eq!(canvas.document.len(), 1);
        assert!(!canvas.handle_pointer(PointerEvent::Leave));
    }

    #[test]
    fn test_right_button_does_not_draw() {
        let mut canvas = Canvas::new();
        assert!(!canvas.handle_pointer(PointerEvent::Down {
            position: Point::new(0.0, 0.0),
            button: MouseButton::Right,
        }));
        assert!(canvas.pending().is_none());
    }

    #[test]
    fn test_toolbar_actions() {
        let mut canvas = Canvas::new();
        assert!(!canvas.apply(CanvasAction::Undo));
        draw(&mut canvas, &[(0.0, 0.0), (5.0, 5.0)]);
        draw(&mut canvas, &[(1.0, 0.0), (5.0, 5.0)]);

        assert!(canvas.apply(CanvasAction::Undo));
        assert_eq!(canvas.document.len(), 1);

        canvas.apply(CanvasAction::SelectTool(ToolKind::Arrow));
        assert_eq!(canvas.tool(), ToolKind::Arrow);

        assert!(canvas.apply(CanvasAction::Clear));
        assert!(canvas.document.is_empty());
    }

    #[test]
    fn test_lines_round_trip_through_value() {
        let mut canvas = Canvas::new();
        draw(&mut canvas, &[(0.0, 0.0), (5.0, 5.0), (10.0, 0.0)]);
        canvas.set_tool(ToolKind::Arrow);
        draw(&mut canvas, &[(0.0, 0.0), (100.0, 0.0)]);

        let lines = canvas.document.to_lines().unwrap();
        assert_eq!(lines[0]["type"], "pen");
        assert_eq!(lines[1]["type"], "arrow");
        assert_eq!(CanvasDocument::from_lines(&lines), canvas.document);
    }

    #[test]
    fn test_from_lines_skips_bad_entries() {
        let lines = serde_json::json!([
            { "type": "pen", "points": [{ "x": 0, "y": 0 }, { "x": 1, "y": 1 }], "stroke": "#ffffff", "strokeWidth": 2 },
            { "type": "hexagon" },
            { "type": "pen", "points": [{ "x": 0, "y": 0 }] },
            "garbage"
        ]);
        let doc = CanvasDocument::from_lines(&lines);
        assert_eq!(doc.len(), 1);
        assert!(!doc.shapes()[0].is_pending());

        assert!(CanvasDocument::from_lines(&serde_json::json!({ "nope": 1 })).is_empty());
        assert!(CanvasDocument::from_lines(&serde_json::Value::Null).is_empty());
    }

    #[test]
    fn test_replace_document_drops_gesture() {
        let mut canvas = Canvas::new();
        canvas.begin_stroke(Point::new(0.0, 0.0));
        let mut doc = CanvasDocument::new();
        doc.add_shape(Shape::Pen(Freehand::from_points(vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 1.0),
        ])));
        canvas.replace_document(doc);
        assert!(canvas.pending().is_none());
        assert_eq!(canvas.document.len(), 1);
    }
}
