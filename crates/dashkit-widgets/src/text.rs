//! Text widget, used for flyout bodies and custom footers.

use dashkit_core::{
    widget::{AccessibleRole, FontWeight, LayoutResult, TextStyle},
    Canvas, Color, Constraints, Event, Rect, Size, TypeId, Widget,
};
use serde::{Deserialize, Serialize};
use std::any::Any;

/// Single-line text label.
#[derive(Clone, Serialize, Deserialize)]
pub struct Text {
    content: String,
    color: Color,
    font_size: f32,
    font_weight: FontWeight,
    test_id_value: Option<String>,
    #[serde(skip)]
    bounds: Rect,
}

impl Text {
    /// Create new text widget.
    #[must_use]
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            color: Color::BLACK,
            font_size: 14.0,
            font_weight: FontWeight::Normal,
            test_id_value: None,
            bounds: Rect::default(),
        }
    }

    /// Set text color.
    #[must_use]
    pub const fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Set font size.
    #[must_use]
    pub const fn font_size(mut self, size: f32) -> Self {
        self.font_size = size;
        self
    }

    /// Set font weight.
    #[must_use]
    pub const fn font_weight(mut self, weight: FontWeight) -> Self {
        self.font_weight = weight;
        self
    }

    /// Set test ID.
    #[must_use]
    pub fn with_test_id(mut self, id: impl Into<String>) -> Self {
        self.test_id_value = Some(id.into());
        self
    }

    /// Get the text content.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    // ~0.6em per character
    fn estimate_size(&self) -> Size {
        let width = self.content.chars().count() as f32 * self.font_size * 0.6;
        Size::new(width, self.font_size * 1.2)
    }
}

impl Widget for Text {
    fn type_id(&self) -> TypeId {
        TypeId::of::<Self>()
    }

    fn measure(&self, constraints: Constraints) -> Size {
        constraints.constrain(self.estimate_size())
    }

    fn layout(&mut self, bounds: Rect) -> LayoutResult {
        self.bounds = bounds;
        LayoutResult {
            size: bounds.size(),
        }
    }

    fn paint(&self, canvas: &mut dyn Canvas) {
        let style = TextStyle {
            size: self.font_size,
            color: self.color,
            weight: self.font_weight,
            ..TextStyle::default()
        };
        canvas.draw_text(&self.content, self.bounds.origin(), &style);
    }

    fn event(&mut self, _event: &Event) -> Option<Box<dyn Any + Send>> {
        None
    }

    fn children(&self) -> &[Box<dyn Widget>] {
        &[]
    }

    fn children_mut(&mut self) -> &mut [Box<dyn Widget>] {
        &mut []
    }

    fn accessible_name(&self) -> Option<&str> {
        Some(&self.content)
    }

    fn accessible_role(&self) -> AccessibleRole {
        AccessibleRole::Text
    }

    fn test_id(&self) -> Option<&str> {
        self.test_id_value.as_deref()
    }

    fn bounds(&self) -> Rect {
        self.bounds
    }
}
