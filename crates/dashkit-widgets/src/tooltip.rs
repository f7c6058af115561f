//! Floating panel primitive used by the flyout menu.
//!
//! A [`Tooltip`] does not own content. Its owner measures the body, asks the
//! panel for a frame size, places it against an anchor rectangle and lays
//! the body out inside [`Tooltip::content_bounds`].

use crate::positioning::{MenuOffset, CARET_HEIGHT, CARET_WIDTH};
use dashkit_core::{Canvas, Color, Point, Rect, Size};
use serde::{Deserialize, Serialize};

/// Coarse edge of the anchor the panel opens on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TooltipDirection {
    /// Above the anchor
    Top,
    /// Below the anchor
    #[default]
    Bottom,
    /// Left of the anchor
    Left,
    /// Right of the anchor
    Right,
}

/// Floating panel with a caret pointing at its anchor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tooltip {
    direction: TooltipDirection,
    offset: MenuOffset,
    padding: f32,
    light: bool,
    test_id_value: Option<String>,
    #[serde(skip)]
    anchor: Rect,
    #[serde(skip)]
    bounds: Rect,
}

impl Default for Tooltip {
    fn default() -> Self {
        Self {
            direction: TooltipDirection::Bottom,
            offset: MenuOffset::default(),
            padding: 16.0,
            light: true,
            test_id_value: None,
            anchor: Rect::default(),
            bounds: Rect::default(),
        }
    }
}

impl Tooltip {
    /// Create a panel with default styling.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the coarse edge.
    #[must_use]
    pub const fn direction(mut self, direction: TooltipDirection) -> Self {
        self.direction = direction;
        self
    }

    /// Set the inner padding.
    #[must_use]
    pub fn padding(mut self, padding: f32) -> Self {
        self.padding = padding.max(0.0);
        self
    }

    /// Use the light (white) or dark background.
    #[must_use]
    pub const fn light(mut self, light: bool) -> Self {
        self.light = light;
        self
    }

    /// Set test ID.
    #[must_use]
    pub fn test_id(mut self, id: impl Into<String>) -> Self {
        self.test_id_value = Some(id.into());
        self
    }

    /// Set the anchor correction applied on the next [`Tooltip::place`].
    pub fn set_offset(&mut self, offset: MenuOffset) {
        self.offset = offset;
    }

    /// Change the coarse edge.
    pub fn set_direction(&mut self, direction: TooltipDirection) {
        self.direction = direction;
    }

    /// Get the coarse edge.
    #[must_use]
    pub const fn get_direction(&self) -> TooltipDirection {
        self.direction
    }

    /// Get the current anchor correction.
    #[must_use]
    pub const fn get_offset(&self) -> MenuOffset {
        self.offset
    }

    /// Get the test ID.
    #[must_use]
    pub fn get_test_id(&self) -> Option<&str> {
        self.test_id_value.as_deref()
    }

    /// Whether the light background is used.
    #[must_use]
    pub const fn is_light(&self) -> bool {
        self.light
    }

    /// Outer size of a panel wrapping a body of `content` size.
    #[must_use]
    pub fn frame_size(&self, content: Size) -> Size {
        content.pad(self.padding)
    }

    /// Top-left corner of a panel of `size` on this edge of `anchor`,
    /// before the offset is applied.
    #[must_use]
    pub fn default_origin(&self, anchor: Rect, size: Size) -> Point {
        match self.direction {
            TooltipDirection::Top => Point::new(
                anchor.x + (anchor.width - size.width) / 2.0,
                anchor.y - size.height - CARET_HEIGHT,
            ),
            TooltipDirection::Bottom => Point::new(
                anchor.x + (anchor.width - size.width) / 2.0,
                anchor.bottom() + CARET_HEIGHT,
            ),
            TooltipDirection::Left => Point::new(
                anchor.x - size.width - CARET_HEIGHT,
                anchor.y + (anchor.height - size.height) / 2.0,
            ),
            TooltipDirection::Right => Point::new(
                anchor.right() + CARET_HEIGHT,
                anchor.y + (anchor.height - size.height) / 2.0,
            ),
        }
    }

    /// Place a panel of `size` against `anchor` and return its bounds.
    pub fn place(&mut self, anchor: Rect, size: Size) -> Rect {
        let origin = self.default_origin(anchor, size);
        self.anchor = anchor;
        self.bounds =
            Rect::from_origin_size(origin, size).translate(self.offset.left, self.offset.top);
        self.bounds
    }

    /// Panel bounds from the last placement.
    #[must_use]
    pub const fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Area inside the padding, where the body is laid out.
    #[must_use]
    pub fn content_bounds(&self) -> Rect {
        self.bounds.inset(self.padding)
    }

    /// Background color.
    #[must_use]
    pub fn background(&self) -> Color {
        if self.light {
            Color::WHITE
        } else {
            Color::rgb(0.22, 0.22, 0.22)
        }
    }

    fn border(&self) -> Color {
        if self.light {
            Color::rgb(0.88, 0.88, 0.88)
        } else {
            Color::rgb(0.32, 0.32, 0.32)
        }
    }

    /// Triangle pointing from the panel edge towards the anchor.
    #[must_use]
    pub fn caret(&self) -> [Point; 3] {
        let b = self.bounds;
        let half = CARET_WIDTH / 2.0;
        let mid_x = self.anchor.center().x.clamp(b.x + half, (b.right() - half).max(b.x + half));
        let mid_y = self.anchor.center().y.clamp(b.y + half, (b.bottom() - half).max(b.y + half));
        match self.direction {
            TooltipDirection::Bottom => [
                Point::new(mid_x - half, b.y),
                Point::new(mid_x, b.y - CARET_HEIGHT),
                Point::new(mid_x + half, b.y),
            ],
            TooltipDirection::Top => [
                Point::new(mid_x - half, b.bottom()),
                Point::new(mid_x, b.bottom() + CARET_HEIGHT),
                Point::new(mid_x + half, b.bottom()),
            ],
            TooltipDirection::Right => [
                Point::new(b.x, mid_y - half),
                Point::new(b.x - CARET_HEIGHT, mid_y),
                Point::new(b.x, mid_y + half),
            ],
            TooltipDirection::Left => [
                Point::new(b.right(), mid_y - half),
                Point::new(b.right() + CARET_HEIGHT, mid_y),
                Point::new(b.right(), mid_y + half),
            ],
        }
    }

    /// Paint the background, border and caret. The owner paints the body.
    pub fn paint_frame(&self, canvas: &mut dyn Canvas) {
        let background = self.background();
        canvas.fill_rect(self.bounds, background);
        canvas.stroke_rect(self.bounds, self.border(), 1.0);
        canvas.fill_polygon(&self.caret(), background);
    }
}
