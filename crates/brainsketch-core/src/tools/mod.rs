//! Tool system for the sketch board.

use crate::shapes::{
    Arrow, Circle, EraserStroke, Freehand, Line, Rectangle, Shape, ShapeStyle, Triangle,
};
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    #[default]
    Pen,
    Line,
    Rect,
    Circle,
    Triangle,
    Arrow,
    Eraser,
}

impl ToolKind {
    /// Every tool, in toolbar order.
    pub const ALL: [ToolKind; 7] = [
        ToolKind::Pen,
        ToolKind::Line,
        ToolKind::Rect,
        ToolKind::Circle,
        ToolKind::Triangle,
        ToolKind::Arrow,
        ToolKind::Eraser,
    ];

    /// Get display name for this tool.
    pub fn name(self) -> &'static str {
        match self {
            ToolKind::Pen => "Pen",
            ToolKind::Line => "Line",
            ToolKind::Rect => "Rectangle",
            ToolKind::Circle => "Circle",
            ToolKind::Triangle => "Triangle",
            ToolKind::Arrow => "Arrow",
            ToolKind::Eraser => "Eraser",
        }
    }

    /// Single-key shortcut that selects this tool.
    pub fn shortcut(self) -> char {
        match self {
            ToolKind::Pen => 'P',
            ToolKind::Line => 'L',
            ToolKind::Rect => 'R',
            ToolKind::Circle => 'C',
            ToolKind::Triangle => 'T',
            ToolKind::Arrow => 'A',
            ToolKind::Eraser => 'E',
        }
    }

    /// Look up a tool by its shortcut key (case-insensitive).
    pub fn from_shortcut(key: char) -> Option<Self> {
        let key = key.to_ascii_uppercase();
        Self::ALL.into_iter().find(|tool| tool.shortcut() == key)
    }

    /// Tools that accumulate points rather than derive geometry from the drag.
    pub fn accumulates_points(self) -> bool {
        matches!(self, ToolKind::Pen | ToolKind::Eraser)
    }

    /// Wire name, as used by the toolbar and the `type` tag of persisted shapes.
    pub fn as_str(self) -> &'static str {
        match self {
            ToolKind::Pen => "pen",
            ToolKind::Line => "line",
            ToolKind::Rect => "rect",
            ToolKind::Circle => "circle",
            ToolKind::Triangle => "triangle",
            ToolKind::Arrow => "arrow",
            ToolKind::Eraser => "eraser",
        }
    }
}

impl std::str::FromStr for ToolKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|tool| tool.as_str() == name)
            .ok_or_else(|| format!("unknown tool: {s}"))
    }
}

/// How the eraser tool affects the drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EraserMode {
    /// Commit an eraser stroke that subtracts coverage when rendered.
    #[default]
    Stroke,
    /// Delete every committed shape the pointer touches while dragging.
    Contact,
}

/// State of a tool interaction.
#[derive(Debug, Clone, Default)]
pub enum ToolState {
    /// Tool is idle, waiting for interaction.
    #[default]
    Idle,
    /// A gesture is in progress.
    Active {
        /// Fixed point the gesture started from.
        anchor: Point,
        /// Shape under construction, if the tool builds one.
        pending: Option<Shape>,
    },
}

/// Manages the current tool and the shape it is building.
#[derive(Debug, Clone)]
pub struct ToolManager {
    /// Currently selected tool.
    pub current_tool: ToolKind,
    /// Current state of the tool.
    pub state: ToolState,
    /// Current style to apply to new shapes.
    pub current_style: ShapeStyle,
    /// Width of new eraser strokes.
    pub eraser_width: f64,
    /// Head length for new arrows.
    pub head_length: f64,
}

impl Default for ToolManager {
    fn default() -> Self {
        Self {
            current_tool: ToolKind::default(),
            state: ToolState::default(),
            current_style: ShapeStyle::default(),
            eraser_width: EraserStroke::DEFAULT_WIDTH,
            head_length: Arrow::DEFAULT_HEAD_LENGTH,
        }
    }
}

impl ToolManager {
    /// Create a new tool manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the current tool. Any gesture in progress is dropped.
    pub fn set_tool(&mut self, tool: ToolKind) {
        self.current_tool = tool;
        self.state = ToolState::Idle;
    }

    /// Begin a gesture with the current tool.
    pub fn begin(&mut self, point: Point) {
        let pending = Some(self.create_shape(point));
        self.state = ToolState::Active {
            anchor: point,
            pending,
        };
    }

    /// Begin a gesture that builds no shape (erase-on-contact).
    pub fn begin_without_shape(&mut self, point: Point) {
        self.state = ToolState::Active {
            anchor: point,
            pending: None,
        };
    }

    /// Update the pending shape with the current pointer position.
    pub fn update(&mut self, point: Point) {
        if let ToolState::Active {
            anchor,
            pending: Some(shape),
        } = &mut self.state
        {
            shape.update_drag(*anchor, point);
        }
    }

    /// End the gesture and hand back the pending shape, if any.
    pub fn end(&mut self) -> Option<Shape> {
        match std::mem::take(&mut self.state) {
            ToolState::Active { pending, .. } => pending,
            ToolState::Idle => None,
        }
    }

    /// Cancel the current interaction.
    pub fn cancel(&mut self) {
        self.state = ToolState::Idle;
    }

    /// Check if a tool interaction is active.
    pub fn is_active(&self) -> bool {
        matches!(self.state, ToolState::Active { .. })
    }

    /// Get the shape currently under construction.
    pub fn pending(&self) -> Option<&Shape> {
        match &self.state {
            ToolState::Active { pending, .. } => pending.as_ref(),
            ToolState::Idle => None,
        }
    }

    /// Fresh pending shape of the current tool's kind, anchored at `anchor`.
    fn create_shape(&self, anchor: Point) -> Shape {
        let style = self.current_style.clone();
        match self.current_tool {
            ToolKind::Pen => {
                let mut pen = Freehand::new(anchor);
                pen.style = style;
                Shape::Pen(pen)
            }
            ToolKind::Eraser => Shape::Eraser(EraserStroke::new(anchor, self.eraser_width)),
            ToolKind::Line => {
                let mut line = Line::from_drag(anchor, anchor);
                line.style = style;
                Shape::Line(line)
            }
            ToolKind::Arrow => {
                let mut arrow = Arrow::from_drag(anchor, anchor);
                arrow.head_length = self.head_length;
                arrow.style = style;
                Shape::Arrow(arrow)
            }
            ToolKind::Rect => {
                let mut rect = Rectangle::from_drag(anchor, anchor);
                rect.style = style;
                Shape::Rect(rect)
            }
            ToolKind::Circle => {
                let mut circle = Circle::from_drag(anchor, anchor);
                circle.style = style;
                Shape::Circle(circle)
            }
            ToolKind::Triangle => {
                let mut triangle = Triangle::from_drag(anchor, anchor);
                triangle.style = style;
                Shape::Triangle(triangle)
            }
        }
    }
}
