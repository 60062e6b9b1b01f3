//! Browser `<canvas>` 2D context surface.

use crate::renderer::{RenderResult, RendererError};
use crate::surface::{Composite, Surface};
use brainsketch_core::shapes::SerializableColor;
use kurbo::{BezPath, Cap, Join, PathEl, Size, Stroke};
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

const SOURCE_OVER: &str = "source-over";
const DESTINATION_OUT: &str = "destination-out";

/// [`Surface`] over a `CanvasRenderingContext2d`.
pub struct Canvas2dSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl Canvas2dSurface {
    pub fn new(canvas: HtmlCanvasElement) -> RenderResult<Self> {
        let ctx = canvas
            .get_context("2d")
            .map_err(|e| RendererError::InitFailed(format!("{:?}", e)))?
            .ok_or_else(|| RendererError::InitFailed("2d context unavailable".to_string()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| RendererError::InitFailed("not a 2d context".to_string()))?;
        Ok(Self { canvas, ctx })
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    fn set_composite(&self, operation: &str) {
        if let Err(e) = self.ctx.set_global_composite_operation(operation) {
            log::warn!("Failed to set composite operation {}: {:?}", operation, e);
        }
    }

    fn trace(&self, path: &BezPath) {
        self.ctx.begin_path();
        for el in path.elements() {
            match *el {
                PathEl::MoveTo(p) => self.ctx.move_to(p.x, p.y),
                PathEl::LineTo(p) => self.ctx.line_to(p.x, p.y),
                PathEl::QuadTo(c, p) => self.ctx.quadratic_curve_to(c.x, c.y, p.x, p.y),
                PathEl::CurveTo(c1, c2, p) => {
                    self.ctx.bezier_curve_to(c1.x, c1.y, c2.x, c2.y, p.x, p.y)
                }
                PathEl::ClosePath => self.ctx.close_path(),
            }
        }
    }
}

fn cap_name(cap: Cap) -> &'static str {
    match cap {
        Cap::Butt => "butt",
        Cap::Square => "square",
        Cap::Round => "round",
    }
}

fn join_name(join: Join) -> &'static str {
    match join {
        Join::Bevel => "bevel",
        Join::Miter => "miter",
        Join::Round => "round",
    }
}

impl Surface for Canvas2dSurface {
    fn size(&self) -> Size {
        Size::new(self.canvas.width() as f64, self.canvas.height() as f64)
    }

    fn clear(&mut self) {
        let size = self.size();
        self.ctx.clear_rect(0.0, 0.0, size.width, size.height);
    }

    fn fill_background(&mut self, color: SerializableColor) {
        let size = self.size();
        self.ctx.set_fill_style_str(&color.to_hex());
        self.ctx.fill_rect(0.0, 0.0, size.width, size.height);
    }

    fn stroke_path(
        &mut self,
        path: &BezPath,
        stroke: &Stroke,
        color: SerializableColor,
        composite: Composite,
    ) {
        if composite == Composite::Erase {
            self.set_composite(DESTINATION_OUT);
        }

        self.ctx.set_stroke_style_str(&color.to_hex());
        self.ctx.set_line_width(stroke.width);
        self.ctx.set_line_cap(cap_name(stroke.start_cap));
        self.ctx.set_line_join(join_name(stroke.join));
        self.trace(path);
        self.ctx.stroke();

        if composite == Composite::Erase {
            self.set_composite(SOURCE_OVER);
        }
    }
}
