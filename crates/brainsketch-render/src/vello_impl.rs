//! Vello-based renderer implementation.

use crate::renderer::{RenderContext, Renderer};
use crate::painter::render;
use crate::surface::{Composite, Surface};
use brainsketch_core::shapes::SerializableColor;
use kurbo::{Affine, BezPath, Rect, Size, Stroke};
use vello::Scene;
use vello::peniko::{BlendMode, Color, Compose, Fill, Mix};

/// [`Surface`] that encodes drawing calls into a Vello [`Scene`].
///
/// Erase strokes are wrapped in a destination-out layer.
#[derive(Default)]
pub struct VelloRenderer {
    /// The Vello scene being built.
    scene: Scene,
    size: Size,
}

impl VelloRenderer {
    /// Create a new Vello renderer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the built scene for rendering.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Take ownership of the scene (resets internal scene).
    pub fn take_scene(&mut self) -> Scene {
        std::mem::take(&mut self.scene)
    }

    fn viewport(&self) -> Rect {
        self.size.to_rect()
    }
}

impl Surface for VelloRenderer {
    fn size(&self) -> Size {
        self.size
    }

    fn clear(&mut self) {
        self.scene.reset();
    }

    fn fill_background(&mut self, color: SerializableColor) {
        let rect = self.viewport();
        self.scene
            .fill(Fill::NonZero, Affine::IDENTITY, Color::from(color), None, &rect);
    }

    fn stroke_path(
        &mut self,
        path: &BezPath,
        stroke: &Stroke,
        color: SerializableColor,
        composite: Composite,
    ) {
        match composite {
            Composite::SourceOver => {
                self.scene
                    .stroke(stroke, Affine::IDENTITY, Color::from(color), None, path);
            }
            Composite::Erase => {
                let clip = self.viewport();
                self.scene.push_layer(
                    BlendMode::new(Mix::Normal, Compose::DestOut),
                    1.0,
                    Affine::IDENTITY,
                    &clip,
                );
                self.scene
                    .stroke(stroke, Affine::IDENTITY, Color::from(color), None, path);
                self.scene.pop_layer();
            }
        }
    }
}

impl Renderer for VelloRenderer {
    fn build_scene(&mut self, ctx: &RenderContext) {
        self.size = ctx.viewport_size;
        let background = self.background_color(ctx);
        render(self, ctx.canvas.shapes_for_render(), background);
    }
}
