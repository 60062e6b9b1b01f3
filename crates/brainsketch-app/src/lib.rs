//! BrainSketch Application
//!
//! Browser host for the sketch board: keyboard shortcuts, the board controller and
//! the WASM bindings that connect DOM events, the 2D canvas and the server.

mod params;
mod session;
mod shortcuts;

pub use params::UrlParams;
pub use session::{BoardSession, Effect};
pub use shortcuts::{KeyCommand, Shortcut, ShortcutRegistry};

#[cfg(target_arch = "wasm32")]
mod web;

#[cfg(target_arch = "wasm32")]
pub use web::{SketchBoard, start};
