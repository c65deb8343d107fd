use kurbo::Shape as _;

use crate::draw::surface::{Surface, TextStyle};
use crate::foundation::core::{BezPath, Canvas, Point, Rect, Rgba8};
use crate::foundation::error::ReelResult;

/// One drawing call captured by [`RecordingSurface`], with the effective group alpha applied at the
/// time of the call.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    /// Solid fill of a path.
    Fill {
        /// Bounding box of the path.
        bounds: Rect,
        /// Fill color.
        color: Rgba8,
        /// Effective opacity.
        alpha: f32,
    },
    /// Solid stroke of a path.
    Stroke {
        /// Bounding box of the path (excluding line width).
        bounds: Rect,
        /// Stroke color.
        color: Rgba8,
        /// Line width.
        width: f64,
        /// Effective opacity.
        alpha: f32,
    },
    /// Vertical linear gradient fill.
    Gradient {
        /// Filled rectangle.
        rect: Rect,
        /// Color at the top edge.
        top: Rgba8,
        /// Color at the bottom edge.
        bottom: Rgba8,
        /// Effective opacity.
        alpha: f32,
    },
    /// Text run.
    Text {
        /// Text content.
        text: String,
        /// Anchor point (baseline).
        anchor: Point,
        /// Style of the run.
        style: TextStyle,
        /// Effective opacity.
        alpha: f32,
    },
}

impl DrawCommand {
    /// Effective opacity the command was drawn with.
    pub fn alpha(&self) -> f32 {
        match self {
            Self::Fill { alpha, .. }
            | Self::Stroke { alpha, .. }
            | Self::Gradient { alpha, .. }
            | Self::Text { alpha, .. } => *alpha,
        }
    }

    /// Text content when this is a text command.
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Text { text, .. } => Some(text),
            _ => None,
        }
    }
}

/// In-memory [`Surface`] that records drawing calls instead of rasterizing them.
#[derive(Debug)]
pub struct RecordingSurface {
    canvas: Canvas,
    commands: Vec<DrawCommand>,
    opacity: Vec<f32>,
    frames: u64,
}

impl RecordingSurface {
    /// Create a recorder for `canvas`.
    pub fn new(canvas: Canvas) -> Self {
        Self {
            canvas,
            commands: Vec::new(),
            opacity: Vec::new(),
            frames: 0,
        }
    }

    /// Commands recorded since the last [`Surface::begin_frame`].
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Text commands recorded since the last frame start, in draw order.
    pub fn texts(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands.iter().filter(|c| c.text().is_some())
    }

    /// Find the first text command whose content equals `text`.
    pub fn find_text(&self, text: &str) -> Option<&DrawCommand> {
        self.commands.iter().find(|c| c.text() == Some(text))
    }

    /// Number of completed frames.
    pub fn frames_completed(&self) -> u64 {
        self.frames
    }

    fn alpha(&self) -> f32 {
        self.opacity.iter().product()
    }
}

impl Surface for RecordingSurface {
    fn canvas(&self) -> Canvas {
        self.canvas
    }

    fn begin_frame(&mut self) {
        self.commands.clear();
        self.opacity.clear();
    }

    fn end_frame(&mut self) -> ReelResult<()> {
        self.frames += 1;
        Ok(())
    }

    fn fill_path(&mut self, path: &BezPath, color: Rgba8) {
        let alpha = self.alpha();
        self.commands.push(DrawCommand::Fill {
            bounds: path.bounding_box(),
            color,
            alpha,
        });
    }

    fn stroke_path(&mut self, path: &BezPath, color: Rgba8, width: f64) {
        let alpha = self.alpha();
        self.commands.push(DrawCommand::Stroke {
            bounds: path.bounding_box(),
            color,
            width,
            alpha,
        });
    }

    fn fill_vertical_gradient(&mut self, rect: Rect, top: Rgba8, bottom: Rgba8) {
        let alpha = self.alpha();
        self.commands.push(DrawCommand::Gradient {
            rect,
            top,
            bottom,
            alpha,
        });
    }

    fn fill_text(&mut self, text: &str, anchor: Point, style: &TextStyle) {
        let alpha = self.alpha();
        self.commands.push(DrawCommand::Text {
            text: text.to_owned(),
            anchor,
            style: *style,
            alpha,
        });
    }

    fn push_opacity(&mut self, alpha: f32) {
        self.opacity.push(alpha);
    }

    fn pop_opacity(&mut self) {
        self.opacity.pop();
    }
}
