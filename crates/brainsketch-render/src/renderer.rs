//! Renderer trait abstraction.

use crate::painter::{DEFAULT_BACKGROUND, render};
use crate::surface::DisplayList;
use brainsketch_core::canvas::Canvas;
use brainsketch_core::shapes::SerializableColor;
use kurbo::Size;
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Initialization failed: {0}")]
    InitFailed(String),
    #[error("Surface error: {0}")]
    Surface(String),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// Context for a single render frame.
pub struct RenderContext<'a> {
    /// The canvas to render.
    pub canvas: &'a Canvas,
    /// Viewport size in pixels.
    pub viewport_size: Size,
    /// Background color.
    pub background_color: SerializableColor,
}

impl<'a> RenderContext<'a> {
    /// Create a new render context.
    pub fn new(canvas: &'a Canvas, viewport_size: Size) -> Self {
        Self {
            canvas,
            viewport_size,
            background_color: DEFAULT_BACKGROUND,
        }
    }

    /// Set the background color.
    pub fn with_background(mut self, color: SerializableColor) -> Self {
        self.background_color = color;
        self
    }
}

/// Trait for rendering backends.
pub trait Renderer {
    /// Build the drawing commands for a frame: committed shapes, then the pending one.
    fn build_scene(&mut self, ctx: &RenderContext);

    /// Get the background color (for clearing).
    fn background_color(&self, ctx: &RenderContext) -> SerializableColor {
        ctx.background_color
    }
}

/// Renderer that records each frame into a [`DisplayList`].
#[derive(Debug, Default)]
pub struct DisplayListRenderer {
    list: DisplayList,
}

impl DisplayListRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// The last built frame.
    pub fn display_list(&self) -> &DisplayList {
        &self.list
    }

    /// Take ownership of the last frame.
    pub fn take_display_list(&mut self) -> DisplayList {
        std::mem::take(&mut self.list)
    }
}

impl Renderer for DisplayListRenderer {
    fn build_scene(&mut self, ctx: &RenderContext) {
        self.list = DisplayList::new(ctx.viewport_size);
        let background = self.background_color(ctx);
        render(&mut self.list, ctx.canvas.shapes_for_render(), background);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{DrawCommand, Surface};
    use kurbo::Point;

    #[test]
    fn test_frames_do_not_accumulate() {
        let mut canvas = Canvas::new();
        canvas.begin_stroke(Point::new(0.0, 0.0));
        canvas.extend_stroke(Point::new(4.0, 4.0));
        canvas.commit_stroke();

        let mut renderer = DisplayListRenderer::new();
        let ctx = RenderContext::new(&canvas, Size::new(640.0, 480.0));
        renderer.build_scene(&ctx);
        renderer.build_scene(&ctx);

        let list = renderer.display_list();
        assert_eq!(list.commands().len(), 3);
        assert_eq!(list.size(), Size::new(640.0, 480.0));
    }

    #[test]
    fn test_custom_background() {
        let canvas = Canvas::new();
        let mut renderer = DisplayListRenderer::new();
        let ctx = RenderContext::new(&canvas, Size::new(10.0, 10.0))
            .with_background(SerializableColor::white());
        renderer.build_scene(&ctx);

        let list = renderer.take_display_list();
        assert_eq!(
            list.current_frame(),
            &[DrawCommand::FillBackground {
                color: SerializableColor::white()
            }]
        );
        assert!(renderer.display_list().commands().is_empty());
    }
}
