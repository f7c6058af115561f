//! Button widget used as the flyout trigger and footer actions.

use dashkit_core::{
    widget::{AccessibleRole, FontWeight, LayoutResult, TextStyle},
    Canvas, Color, Constraints, Event, Key, MouseButton, Point, Rect, Size, TypeId, Widget,
};
use serde::{Deserialize, Serialize};
use std::any::Any;

/// Visual emphasis of a button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonKind {
    /// Filled with the accent color
    #[default]
    Primary,
    /// Filled with a neutral color
    Secondary,
    /// No fill, accent colored label
    Ghost,
}

/// Height class of a button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonSize {
    /// 32px
    Small,
    /// 48px
    #[default]
    #[serde(rename = "default")]
    Regular,
    /// 40px, matches form fields
    Field,
    /// 64px
    Large,
}

impl ButtonSize {
    /// Height in pixels.
    #[must_use]
    pub const fn height(self) -> f32 {
        match self {
            Self::Small => 32.0,
            Self::Regular => 48.0,
            Self::Field => 40.0,
            Self::Large => 64.0,
        }
    }
}

/// Button widget with label and click handling.
#[derive(Clone, Serialize, Deserialize)]
pub struct Button {
    /// Button label, may be empty for icon-only buttons
    label: String,
    /// Icon glyph drawn after the label
    icon: Option<String>,
    /// Emphasis
    kind: ButtonKind,
    /// Height class
    size: ButtonSize,
    /// Horizontal padding
    padding: f32,
    /// Font size
    font_size: f32,
    /// Whether button is disabled
    disabled: bool,
    /// Sits on a light layer; changes the ghost hover tint
    light: bool,
    /// Test ID
    test_id_value: Option<String>,
    /// Accessible name (overrides label)
    accessible_name: Option<String>,
    /// Current hover state
    #[serde(skip)]
    hovered: bool,
    /// Current pressed state
    #[serde(skip)]
    pressed: bool,
    /// Cached bounds
    #[serde(skip)]
    bounds: Rect,
}

/// Message emitted when button is clicked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonClicked;

impl Button {
    /// Create a new button with label.
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            icon: None,
            kind: ButtonKind::Primary,
            size: ButtonSize::Regular,
            padding: 16.0,
            font_size: 14.0,
            disabled: false,
            light: false,
            test_id_value: None,
            accessible_name: None,
            hovered: false,
            pressed: false,
            bounds: Rect::default(),
        }
    }

    /// Create an icon-only button.
    #[must_use]
    pub fn icon_only(glyph: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new("")
            .icon(glyph)
            .kind(ButtonKind::Ghost)
            .with_accessible_name(description)
    }

    /// Set the icon glyph.
    #[must_use]
    pub fn icon(mut self, glyph: impl Into<String>) -> Self {
        self.icon = Some(glyph.into());
        self
    }

    /// Set the emphasis.
    #[must_use]
    pub const fn kind(mut self, kind: ButtonKind) -> Self {
        self.kind = kind;
        self
    }

    /// Set the height class.
    #[must_use]
    pub const fn size(mut self, size: ButtonSize) -> Self {
        self.size = size;
        self
    }

    /// Set horizontal padding.
    #[must_use]
    pub fn padding(mut self, padding: f32) -> Self {
        self.padding = padding.max(0.0);
        self
    }

    /// Set font size.
    #[must_use]
    pub fn font_size(mut self, size: f32) -> Self {
        self.font_size = size;
        self
    }

    /// Set disabled state.
    #[must_use]
    pub const fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Use the hover tint for light layers.
    #[must_use]
    pub const fn light(mut self, light: bool) -> Self {
        self.light = light;
        self
    }

    /// Set test ID.
    #[must_use]
    pub fn with_test_id(mut self, id: impl Into<String>) -> Self {
        self.test_id_value = Some(id.into());
        self
    }

    /// Set accessible name.
    #[must_use]
    pub fn with_accessible_name(mut self, name: impl Into<String>) -> Self {
        self.accessible_name = Some(name.into());
        self
    }

    /// Get the label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Get the height class.
    #[must_use]
    pub const fn get_size(&self) -> ButtonSize {
        self.size
    }

    /// Check if disabled.
    #[must_use]
    pub const fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Whether the light-layer hover tint is used.
    #[must_use]
    pub const fn is_light(&self) -> bool {
        self.light
    }

    /// Check if the pointer is over the button.
    #[must_use]
    pub const fn is_hovered(&self) -> bool {
        self.hovered
    }

    fn accent() -> Color {
        Color::from_hex("#0f62fe").unwrap_or(Color::BLACK)
    }

    fn current_background(&self) -> Color {
        let base = match self.kind {
            ButtonKind::Primary => Self::accent(),
            ButtonKind::Secondary => Color::from_hex("#393939").unwrap_or(Color::BLACK),
            ButtonKind::Ghost => Color::TRANSPARENT,
        };
        if self.disabled {
            Color::from_hex("#c6c6c6").unwrap_or(Color::BLACK)
        } else if self.pressed {
            base.with_alpha(0.8)
        } else if self.hovered && self.kind == ButtonKind::Ghost {
            self.ghost_hover()
        } else {
            base
        }
    }

    fn ghost_hover(&self) -> Color {
        if self.light {
            Color::from_hex("#e5e5e5").unwrap_or(Color::WHITE)
        } else {
            Color::rgba(0.55, 0.55, 0.55, 0.12)
        }
    }

    fn text_color(&self) -> Color {
        if self.disabled {
            Color::rgb(0.55, 0.55, 0.55)
        } else if self.kind == ButtonKind::Ghost {
            Self::accent()
        } else {
            Color::WHITE
        }
    }

    fn content(&self) -> String {
        match (&self.icon, self.label.is_empty()) {
            (Some(icon), true) => icon.clone(),
            (Some(icon), false) => format!("{} {icon}", self.label),
            (None, _) => self.label.clone(),
        }
    }

    fn estimate_text_width(&self) -> f32 {
        self.content().chars().count() as f32 * self.font_size * 0.6
    }
}

impl Widget for Button {
    fn type_id(&self) -> TypeId {
        TypeId::of::<Self>()
    }

    fn measure(&self, constraints: Constraints) -> Size {
        let height = self.size.height();
        let width = if self.label.is_empty() {
            height
        } else {
            self.padding.mul_add(2.0, self.estimate_text_width())
        };
        constraints.constrain(Size::new(width, height))
    }

    fn layout(&mut self, bounds: Rect) -> LayoutResult {
        self.bounds = bounds;
        LayoutResult {
            size: bounds.size(),
        }
    }

    fn paint(&self, canvas: &mut dyn Canvas) {
        canvas.fill_rect(self.bounds, self.current_background());

        let text_width = self.estimate_text_width();
        let text_pos = Point::new(
            self.bounds.x + (self.bounds.width - text_width) / 2.0,
            self.bounds.y + (self.bounds.height - self.font_size * 1.2) / 2.0,
        );
        let style = TextStyle {
            size: self.font_size,
            color: self.text_color(),
            weight: FontWeight::Medium,
            ..Default::default()
        };
        canvas.draw_text(&self.content(), text_pos, &style);
    }

    fn event(&mut self, event: &Event) -> Option<Box<dyn Any + Send>> {
        if self.disabled {
            return None;
        }

        match event {
            Event::MouseEnter => {
                self.hovered = true;
                None
            }
            Event::MouseLeave => {
                self.hovered = false;
                self.pressed = false;
                None
            }
            Event::MouseMove { position } => {
                self.hovered = self.bounds.contains_point(position);
                None
            }
            Event::MouseDown {
                position,
                button: MouseButton::Left,
            } => {
                if self.bounds.contains_point(position) {
                    self.pressed = true;
                }
                None
            }
            Event::MouseUp {
                position,
                button: MouseButton::Left,
            } => {
                let was_pressed = self.pressed;
                self.pressed = false;

                if was_pressed && self.bounds.contains_point(position) {
                    Some(Box::new(ButtonClicked))
                } else {
                    None
                }
            }
            Event::KeyDown {
                key: Key::Enter | Key::Space,
            } => {
                self.pressed = true;
                None
            }
            Event::KeyUp {
                key: Key::Enter | Key::Space,
            } => {
                self.pressed = false;
                Some(Box::new(ButtonClicked))
            }
            _ => None,
        }
    }

    fn children(&self) -> &[Box<dyn Widget>] {
        &[]
    }

    fn children_mut(&mut self) -> &mut [Box<dyn Widget>] {
        &mut []
    }

    fn is_interactive(&self) -> bool {
        !self.disabled
    }

    fn is_focusable(&self) -> bool {
        !self.disabled
    }

    fn accessible_name(&self) -> Option<&str> {
        self.accessible_name.as_deref().or(Some(&self.label))
    }

    fn accessible_role(&self) -> AccessibleRole {
        AccessibleRole::Button
    }

    fn test_id(&self) -> Option<&str> {
        self.test_id_value.as_deref()
    }

    fn bounds(&self) -> Rect {
        self.bounds
    }
}
