//! Canvas implementations for rendering.

use crate::widget::{Canvas, TextStyle};
use crate::{Color, Point, Rect};

/// A single recorded paint operation.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Filled rectangle
    FillRect {
        /// Rectangle bounds
        bounds: Rect,
        /// Fill color
        color: Color,
    },
    /// Rectangle outline
    StrokeRect {
        /// Rectangle bounds
        bounds: Rect,
        /// Stroke color
        color: Color,
        /// Stroke width
        width: f32,
    },
    /// Text run
    Text {
        /// Text content, before the style's case transform
        content: String,
        /// Baseline position
        position: Point,
        /// Text style
        style: TextStyle,
        /// Clip region active when the text was drawn
        clip: Option<Rect>,
    },
    /// Straight line
    Line {
        /// Start point
        from: Point,
        /// End point
        to: Point,
        /// Stroke color
        color: Color,
        /// Stroke width
        width: f32,
    },
    /// Filled polygon
    Polygon {
        /// Vertices
        points: Vec<Point>,
        /// Fill color
        color: Color,
    },
}

/// A Canvas implementation that records draw operations as `DrawCommand`s.
///
/// Used by tests to verify what was painted.
#[derive(Debug, Default)]
pub struct RecordingCanvas {
    commands: Vec<DrawCommand>,
    clip_stack: Vec<Rect>,
}

impl RecordingCanvas {
    /// Create a new empty recording canvas.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the recorded draw commands.
    #[must_use]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Get the number of recorded commands.
    #[must_use]
    pub fn command_count(&self) -> usize {
        self.commands.len()
    }

    /// Check if no commands have been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Clear all recorded commands.
    pub fn clear(&mut self) {
        self.commands.clear();
        self.clip_stack.clear();
    }

    /// Get the current clip bounds (None if no clips pushed).
    #[must_use]
    pub fn current_clip(&self) -> Option<Rect> {
        self.clip_stack.last().copied()
    }

    /// All drawn text runs, with their case transform applied.
    #[must_use]
    pub fn texts(&self) -> Vec<String> {
        self.commands
            .iter()
            .filter_map(|cmd| match cmd {
                DrawCommand::Text { content, style, .. } => Some(style.apply(content).into_owned()),
                _ => None,
            })
            .collect()
    }
}

impl Canvas for RecordingCanvas {
    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(DrawCommand::FillRect {
            bounds: rect,
            color,
        });
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color, width: f32) {
        self.commands.push(DrawCommand::StrokeRect {
            bounds: rect,
            color,
            width,
        });
    }

    fn draw_text(&mut self, text: &str, position: Point, style: &TextStyle) {
        self.commands.push(DrawCommand::Text {
            content: text.to_string(),
            position,
            style: style.clone(),
            clip: self.current_clip(),
        });
    }

    fn draw_line(&mut self, from: Point, to: Point, color: Color, width: f32) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            color,
            width,
        });
    }

    fn fill_polygon(&mut self, points: &[Point], color: Color) {
        self.commands.push(DrawCommand::Polygon {
            points: points.to_vec(),
            color,
        });
    }

    fn push_clip(&mut self, rect: Rect) {
        self.clip_stack.push(rect);
    }

    fn pop_clip(&mut self) {
        self.clip_stack.pop();
    }
}
