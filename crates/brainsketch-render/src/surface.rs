//! Drawing surface abstraction.

use brainsketch_core::shapes::SerializableColor;
use kurbo::{BezPath, Cap, Join, Size, Stroke};

/// How a stroke combines with what is already on the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Composite {
    /// Paint over existing content.
    #[default]
    SourceOver,
    /// Subtract coverage (destination-out) along the stroke.
    Erase,
}

/// Stroke geometry used for every shape: round caps and joins.
pub fn round_stroke(width: f64) -> Stroke {
    Stroke::new(width).with_caps(Cap::Round).with_join(Join::Round)
}

/// A 2D target the painter draws on.
///
/// A surface must leave compositing at [`Composite::SourceOver`] after every call, so an
/// erase stroke never leaks into the next shape.
pub trait Surface {
    /// Surface size in pixels.
    fn size(&self) -> Size;

    /// Reset every pixel to transparent.
    fn clear(&mut self);

    /// Fill the whole surface with `color`.
    fn fill_background(&mut self, color: SerializableColor);

    /// Stroke `path` with `stroke` geometry.
    fn stroke_path(
        &mut self,
        path: &BezPath,
        stroke: &Stroke,
        color: SerializableColor,
        composite: Composite,
    );
}

/// A recorded drawing call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear,
    FillBackground {
        color: SerializableColor,
    },
    StrokePath {
        path: BezPath,
        width: f64,
        color: SerializableColor,
        composite: Composite,
    },
}

/// Surface that records drawing calls instead of rasterizing them.
#[derive(Debug, Clone, Default)]
pub struct DisplayList {
    size: Size,
    commands: Vec<DrawCommand>,
}

impl DisplayList {
    pub fn new(size: Size) -> Self {
        Self {
            size,
            commands: Vec::new(),
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Commands since the last [`Surface::clear`].
    pub fn current_frame(&self) -> &[DrawCommand] {
        let start = self
            .commands
            .iter()
            .rposition(|c| matches!(c, DrawCommand::Clear))
            .map_or(0, |i| i + 1);
        &self.commands[start..]
    }

    /// Stroke commands of the current frame.
    pub fn strokes(&self) -> impl Iterator<Item = &DrawCommand> {
        self.current_frame()
            .iter()
            .filter(|c| matches!(c, DrawCommand::StrokePath { .. }))
    }

    /// True if the current frame paints nothing but its background.
    pub fn is_background_only(&self) -> bool {
        self.current_frame()
            .iter()
            .all(|c| matches!(c, DrawCommand::FillBackground { .. }))
    }
}

impl Surface for DisplayList {
    fn size(&self) -> Size {
        self.size
    }

    fn clear(&mut self) {
        self.commands.push(DrawCommand::Clear);
    }

    fn fill_background(&mut self, color: SerializableColor) {
        self.commands.push(DrawCommand::FillBackground { color });
    }

    fn stroke_path(
        &mut self,
        path: &BezPath,
        stroke: &Stroke,
        color: SerializableColor,
        composite: Composite,
    ) {
        self.commands.push(DrawCommand::StrokePath {
            path: path.clone(),
            width: stroke.width,
            color,
            composite,
        });
    }
}
