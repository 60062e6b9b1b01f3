//! BrainSketch Render Library
//!
//! Drawing-surface abstraction and the painter that turns shapes into strokes.
//! The browser host draws through a 2D canvas context; a Vello scene backend is
//! available behind the `vello-renderer` feature.

mod painter;
mod renderer;
mod surface;

#[cfg(target_arch = "wasm32")]
mod canvas2d;

#[cfg(feature = "vello-renderer")]
mod vello_impl;

pub use painter::{DEFAULT_BACKGROUND, paint_shape, render};
pub use renderer::{DisplayListRenderer, RenderContext, RenderResult, Renderer, RendererError};
pub use surface::{Composite, DisplayList, DrawCommand, Surface, round_stroke};

#[cfg(target_arch = "wasm32")]
pub use canvas2d::Canvas2dSurface;

#[cfg(feature = "vello-renderer")]
pub use vello_impl::VelloRenderer;
