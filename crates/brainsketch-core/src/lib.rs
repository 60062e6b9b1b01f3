//! BrainSketch Core Library
//!
//! Platform-agnostic shape model, tools and editing session for the BrainSketch
//! sketch board, plus the storage backends that persist a drawing per user.

pub mod api;
pub mod canvas;
pub mod input;
pub mod shapes;
pub mod storage;
pub mod tools;

pub use api::{ApiResponse, DEFAULT_USER_ID};
pub use canvas::{Canvas, CanvasAction, CanvasDocument};
pub use input::{MouseButton, PointerEvent};
pub use shapes::{HIT_TOLERANCE, SerializableColor, Shape, ShapeId, ShapeStyle};
pub use storage::{CanvasRecord, Storage, StorageError, StorageResult};
pub use tools::{EraserMode, ToolKind, ToolManager};
