//! Platform-independent board controller.
//!
//! Routes keys, pointer events and toolbar actions to the [`Canvas`] and tracks
//! whether the drawing has changed since it was last saved.

use crate::shortcuts::{KeyCommand, ShortcutRegistry};
use brainsketch_core::canvas::{Canvas, CanvasAction, CanvasDocument};
use brainsketch_core::input::PointerEvent;
use brainsketch_core::tools::EraserMode;

/// What the host should do after an input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Nothing changed.
    None,
    /// Redraw the surface.
    Repaint,
    /// Persist the drawing.
    Save,
}

/// One user's board: the editing session plus save bookkeeping.
pub struct BoardSession {
    canvas: Canvas,
    user_id: String,
    /// Document revision at the last successful save or load.
    saved_revision: u64,
}

impl BoardSession {
    pub fn new(user_id: impl Into<String>, eraser_mode: EraserMode) -> Self {
        let canvas = Canvas::with_eraser_mode(eraser_mode);
        let saved_revision = canvas.revision();
        Self {
            canvas,
            user_id: user_id.into(),
            saved_revision,
        }
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Whether the session changed since the last save or load.
    pub fn is_dirty(&self) -> bool {
        self.canvas.revision() != self.saved_revision
    }

    /// Record a successful save of the snapshot taken at `revision`.
    pub fn mark_saved(&mut self, revision: u64) {
        self.saved_revision = revision;
    }

    /// Copy of the committed drawing and the revision it was taken at.
    pub fn snapshot(&self) -> (CanvasDocument, u64) {
        (self.canvas.document.clone(), self.canvas.revision())
    }

    /// Replace the drawing with one loaded from storage.
    pub fn load(&mut self, document: CanvasDocument) {
        self.canvas.replace_document(document);
        self.saved_revision = self.canvas.revision();
    }

    /// Apply a load requested at `revision`, unless the user has edited since.
    ///
    /// Returns whether the document was applied.
    pub fn load_if_unchanged(&mut self, document: CanvasDocument, revision: u64) -> bool {
        if self.canvas.revision() != revision {
            log::info!(
                "Discarding loaded canvas for {}: edited while loading",
                self.user_id
            );
            return false;
        }
        self.load(document);
        true
    }

    pub fn handle_pointer(&mut self, event: PointerEvent) -> Effect {
        if self.canvas.handle_pointer(event) {
            Effect::Repaint
        } else {
            Effect::None
        }
    }

    pub fn apply(&mut self, action: CanvasAction) -> Effect {
        if self.canvas.apply(action) {
            Effect::Repaint
        } else {
            Effect::None
        }
    }

    /// Handle a key press. Unbound keys are ignored.
    pub fn handle_key(&mut self, key: &str, ctrl: bool, shift: bool) -> Effect {
        match ShortcutRegistry::resolve(key, ctrl, shift) {
            Some(KeyCommand::Action(action)) => self.apply(action),
            Some(KeyCommand::Save) => Effect::Save,
            None => Effect::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brainsketch_core::Shape;
    use brainsketch_core::input::MouseButton;
    use brainsketch_core::shapes::Line;
    use brainsketch_core::tools::ToolKind;
    use kurbo::Point;

    fn stroke(session: &mut BoardSession, from: (f64, f64), to: (f64, f64)) {
        session.handle_pointer(PointerEvent::Down {
            position: Point::new(from.0, from.1),
            button: MouseButton::Left,
        });
        session.handle_pointer(PointerEvent::Move {
            position: Point::new(to.0, to.1),
        });
        session.handle_pointer(PointerEvent::Up {
            position: Point::new(to.0, to.1),
        });
    }

    fn saved_line() -> CanvasDocument {
        let mut document = CanvasDocument::new();
        document.add_shape(Shape::Line(Line::from_drag(
            Point::new(1.0, 1.0),
            Point::new(2.0, 2.0),
        )));
        document
    }

    #[test]
    fn test_keys_drive_the_canvas() {
        let mut session = BoardSession::new("alice", EraserMode::Stroke);
        // Switching tools while idle needs no repaint.
        assert_eq!(session.handle_key("l", false, false), Effect::None);
        assert_eq!(session.canvas().tool(), ToolKind::Line);

        stroke(&mut session, (0.0, 0.0), (10.0, 10.0));
        assert_eq!(session.canvas().document.len(), 1);

        assert_eq!(session.handle_key("z", true, false), Effect::Repaint);
        assert!(session.canvas().document.is_empty());

        assert_eq!(session.handle_key("s", true, false), Effect::Save);
        assert_eq!(session.handle_key("q", false, false), Effect::None);
    }

    #[test]
    fn test_dirty_tracking() {
        let mut session = BoardSession::new("alice", EraserMode::Stroke);
        assert!(!session.is_dirty());

        stroke(&mut session, (0.0, 0.0), (10.0, 10.0));
        assert!(session.is_dirty());

        let (document, revision) = session.snapshot();
        assert_eq!(document.len(), 1);
        session.mark_saved(revision);
        assert!(!session.is_dirty());

        session.apply(CanvasAction::Clear);
        assert!(session.is_dirty());
    }

    #[test]
    fn test_save_of_stale_snapshot_keeps_dirty() {
        let mut session = BoardSession::new("alice", EraserMode::Stroke);
        stroke(&mut session, (0.0, 0.0), (10.0, 10.0));
        let (_, revision) = session.snapshot();

        // Drawing continues while the save is in flight.
        stroke(&mut session, (5.0, 0.0), (10.0, 10.0));
        session.mark_saved(revision);
        assert!(session.is_dirty());
    }

    #[test]
    fn test_load_resets_dirty() {
        let mut session = BoardSession::new("alice", EraserMode::Contact);
        stroke(&mut session, (0.0, 0.0), (10.0, 10.0));

        session.load(CanvasDocument::new());
        assert!(!session.is_dirty());
        assert!(session.canvas().document.is_empty());
        assert_eq!(session.user_id(), "alice");
    }

    #[test]
    fn test_load_after_edit_keeps_local_strokes() {
        let mut session = BoardSession::new("alice", EraserMode::Stroke);
        let requested_at = session.canvas().revision();

        // A stroke lands while the load is in flight.
        stroke(&mut session, (0.0, 0.0), (10.0, 10.0));

        assert!(!session.load_if_unchanged(saved_line(), requested_at));
        assert_eq!(session.canvas().document.len(), 1);
        assert!(matches!(session.canvas().document.shapes()[0], Shape::Pen(_)));
        assert!(session.is_dirty());
    }

    #[test]
    fn test_load_without_edit_applies() {
        let mut session = BoardSession::new("alice", EraserMode::Stroke);
        let requested_at = session.canvas().revision();

        assert!(session.load_if_unchanged(saved_line(), requested_at));
        assert!(matches!(session.canvas().document.shapes(), [Shape::Line(_)]));
        assert!(!session.is_dirty());
    }
}
