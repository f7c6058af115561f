//! Value renderer: turns a data-point value into the large headline text of a
//! value card.
//!
//! Numbers are scaled down by the largest of 1e12, 1e9, 1e6 or 1e3 that they
//! strictly exceed and printed with a fixed number of fraction digits; no
//! magnitude suffix is added. Booleans print as words and are painted
//! capitalized. Everything else passes through. The unscaled value and its
//! unit are kept in the widget's title.
//!
//! ```
//! use dashkit_widgets::{format_value, title_text, RenderableValue};
//!
//! let value = RenderableValue::Number(2_500_000.0);
//! assert_eq!(format_value(&value, 0).text(), Some("3"));
//! assert_eq!(format_value(&value, 1).text(), Some("2.5"));
//! assert_eq!(title_text(&value, Some("W")), "2500000 W");
//! ```

use crate::config::ValueConfig;
use crate::number::{number_to_string, to_fixed};
use dashkit_core::{
    widget::{AccessibleRole, FontWeight, LayoutResult, TextStyle, TextTransform},
    Canvas, Color, Constraints, Event, Point, Rect, Size, TypeId, Widget,
};
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt;

const FONT_SIZE: f32 = 48.0;
const FONT_SIZE_WITH_SECONDARY: f32 = 40.0;
const SECONDARY_MAX_WIDTH_RATIO: f32 = 0.66;

/// Scale steps, largest first.
const MAGNITUDES: [f64; 4] = [1e12, 1e9, 1e6, 1e3];

/// Layout of the card hosting the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardLayout {
    /// Value centered in a row
    #[default]
    Horizontal,
    /// Value left-aligned in a column
    Vertical,
}

/// A value as it arrives from a data feed.
#[derive(Default)]
pub enum RenderableValue {
    /// Boolean flag
    Bool(bool),
    /// Any number
    Number(f64),
    /// Preformatted text
    Text(String),
    /// Arbitrary widget, rendered as is
    Node(Box<dyn Widget>),
    /// Missing value
    #[default]
    Empty,
}

impl fmt::Debug for RenderableValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Self::Number(n) => f.debug_tuple("Number").field(n).finish(),
            Self::Text(s) => f.debug_tuple("Text").field(s).finish(),
            Self::Node(node) => f
                .debug_tuple("Node")
                .field(&node.accessible_name().unwrap_or(""))
                .finish(),
            Self::Empty => f.write_str("Empty"),
        }
    }
}

impl From<bool> for RenderableValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f64> for RenderableValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for RenderableValue {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<&str> for RenderableValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for RenderableValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Option<Self>> for RenderableValue {
    fn from(value: Option<Self>) -> Self {
        value.unwrap_or(Self::Empty)
    }
}

impl From<serde_json::Value> for RenderableValue {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Null => Self::Empty,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => n.as_f64().map_or(Self::Empty, Self::Number),
            Value::String(s) => Self::Text(s),
            other @ (Value::Array(_) | Value::Object(_)) => Self::Text(other.to_string()),
        }
    }
}

/// Result of [`format_value`].
pub enum FormattedValue<'a> {
    /// `"true"` or `"false"`, to be displayed capitalized
    Boolean(&'static str),
    /// Magnitude-scaled fixed-point number
    Scaled(String),
    /// Text passed through
    Text(&'a str),
    /// Widget passed through
    Node(&'a dyn Widget),
    /// Nothing to show
    Empty,
}

impl FormattedValue<'_> {
    /// Display text, if the value is textual.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Boolean(s) => Some(*s),
            Self::Scaled(s) => Some(s.as_str()),
            Self::Text(s) => Some(*s),
            Self::Node(_) | Self::Empty => None,
        }
    }

    /// Whether the display should capitalize the text.
    #[must_use]
    pub const fn is_capitalized(&self) -> bool {
        matches!(self, Self::Boolean(_))
    }
}

impl fmt::Debug for FormattedValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boolean(s) => f.debug_tuple("Boolean").field(s).finish(),
            Self::Scaled(s) => f.debug_tuple("Scaled").field(s).finish(),
            Self::Text(s) => f.debug_tuple("Text").field(s).finish(),
            Self::Node(_) => f.write_str("Node(..)"),
            Self::Empty => f.write_str("Empty"),
        }
    }
}

/// Divide `value` by the largest magnitude step it strictly exceeds.
///
/// Values at or below 1e3, negatives and NaN are returned unchanged.
#[must_use]
pub fn scale_magnitude(value: f64) -> f64 {
    MAGNITUDES
        .iter()
        .find(|&&step| value > step)
        .map_or(value, |step| value / step)
}

/// Normalize `value` for display with `precision` fraction digits.
///
/// Precision only affects numbers.
#[must_use]
pub fn format_value(value: &RenderableValue, precision: usize) -> FormattedValue<'_> {
    match value {
        RenderableValue::Bool(b) => FormattedValue::Boolean(if *b { "true" } else { "false" }),
        RenderableValue::Number(n) => {
            FormattedValue::Scaled(to_fixed(scale_magnitude(*n), precision))
        }
        RenderableValue::Text(s) => FormattedValue::Text(s),
        RenderableValue::Node(node) => FormattedValue::Node(node.as_ref()),
        RenderableValue::Empty => FormattedValue::Empty,
    }
}

/// Title text: the unscaled value followed by the unit.
///
/// Missing pieces are left out; a widget contributes its accessible name.
#[must_use]
pub fn title_text(value: &RenderableValue, unit: Option<&str>) -> String {
    let raw = match value {
        RenderableValue::Bool(b) => b.to_string(),
        RenderableValue::Number(n) => number_to_string(*n),
        RenderableValue::Text(s) => s.clone(),
        RenderableValue::Node(node) => node.accessible_name().unwrap_or_default().to_string(),
        RenderableValue::Empty => String::new(),
    };
    match unit.filter(|u| !u.is_empty()) {
        Some(unit) if !raw.is_empty() => format!("{raw} {unit}"),
        Some(unit) => unit.to_string(),
        None => raw,
    }
}

/// Headline value of a value card.
pub struct ValueRenderer {
    value: RenderableValue,
    unit: Option<String>,
    layout: CardLayout,
    precision: usize,
    has_secondary: bool,
    color: Color,
    test_id_value: Option<String>,
    title: String,
    bounds: Rect,
}

impl fmt::Debug for ValueRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueRenderer")
            .field("value", &self.value)
            .field("unit", &self.unit)
            .field("layout", &self.layout)
            .field("precision", &self.precision)
            .field("has_secondary", &self.has_secondary)
            .finish_non_exhaustive()
    }
}

impl ValueRenderer {
    /// Create a renderer for `value` with default options.
    #[must_use]
    pub fn new(value: impl Into<RenderableValue>) -> Self {
        let value = value.into();
        let title = title_text(&value, None);
        Self {
            value,
            unit: None,
            layout: CardLayout::Horizontal,
            precision: 0,
            has_secondary: false,
            color: Color::from_hex("#161616").unwrap_or(Color::BLACK),
            test_id_value: None,
            title,
            bounds: Rect::default(),
        }
    }

    /// Create a renderer for `value` from configuration.
    #[must_use]
    pub fn from_config(config: &ValueConfig, value: impl Into<RenderableValue>) -> Self {
        let renderer = Self::new(value)
            .card_layout(config.layout)
            .precision(config.precision)
            .has_secondary(config.has_secondary);
        match &config.unit {
            Some(unit) => renderer.unit(unit.clone()),
            None => renderer,
        }
    }

    /// Set the unit shown in the title.
    #[must_use]
    pub fn unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self.title = title_text(&self.value, self.unit.as_deref());
        self
    }

    /// Set the card layout.
    #[must_use]
    pub const fn card_layout(mut self, layout: CardLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Set the fraction digits for numbers.
    #[must_use]
    pub const fn precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    /// Mark that a secondary value shares the row.
    #[must_use]
    pub const fn has_secondary(mut self, has_secondary: bool) -> Self {
        self.has_secondary = has_secondary;
        self
    }

    /// Set text color.
    #[must_use]
    pub const fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Set test ID.
    #[must_use]
    pub fn with_test_id(mut self, id: impl Into<String>) -> Self {
        self.test_id_value = Some(id.into());
        self
    }

    /// Replace the value, keeping the options.
    pub fn set_value(&mut self, value: impl Into<RenderableValue>) {
        self.value = value.into();
        self.title = title_text(&self.value, self.unit.as_deref());
    }

    /// The raw value.
    #[must_use]
    pub const fn value(&self) -> &RenderableValue {
        &self.value
    }

    /// The value as displayed.
    #[must_use]
    pub fn formatted(&self) -> FormattedValue<'_> {
        format_value(&self.value, self.precision)
    }

    /// The title (unscaled value and unit).
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Font size for the current options.
    #[must_use]
    pub const fn font_size(&self) -> f32 {
        if self.has_secondary {
            FONT_SIZE_WITH_SECONDARY
        } else {
            FONT_SIZE
        }
    }

    fn text_style(&self) -> TextStyle {
        TextStyle {
            size: self.font_size(),
            color: self.color,
            weight: FontWeight::Light,
            transform: if self.formatted().is_capitalized() {
                TextTransform::Capitalize
            } else {
                TextTransform::None
            },
        }
    }

    fn estimate_text_width(&self, text: &str) -> f32 {
        text.chars().count() as f32 * self.font_size() * 0.6
    }

    fn max_width(&self, available: f32) -> f32 {
        if self.has_secondary {
            available * SECONDARY_MAX_WIDTH_RATIO
        } else {
            available
        }
    }
}

impl Widget for ValueRenderer {
    fn type_id(&self) -> TypeId {
        TypeId::of::<Self>()
    }

    fn measure(&self, constraints: Constraints) -> Size {
        let max_width = self.max_width(constraints.max_width);
        let capped = Constraints::new(
            constraints.min_width.min(max_width),
            max_width,
            constraints.min_height,
            constraints.max_height,
        );
        let natural = match self.formatted() {
            FormattedValue::Node(node) => node.measure(capped),
            FormattedValue::Empty => Size::new(0.0, self.font_size() * 1.2),
            other => Size::new(
                self.estimate_text_width(other.text().unwrap_or_default()),
                self.font_size() * 1.2,
            ),
        };
        capped.constrain(natural)
    }

    fn layout(&mut self, bounds: Rect) -> LayoutResult {
        self.bounds = Rect::new(
            bounds.x,
            bounds.y,
            self.max_width(bounds.width),
            bounds.height,
        );
        if let RenderableValue::Node(node) = &mut self.value {
            node.layout(self.bounds);
        }
        LayoutResult {
            size: self.bounds.size(),
        }
    }

    fn paint(&self, canvas: &mut dyn Canvas) {
        canvas.push_clip(self.bounds);
        match self.formatted() {
            FormattedValue::Node(node) => node.paint(canvas),
            FormattedValue::Empty => {}
            other => {
                let text = other.text().unwrap_or_default();
                let x = match self.layout {
                    CardLayout::Vertical => self.bounds.x,
                    CardLayout::Horizontal => {
                        let slack = self.bounds.width - self.estimate_text_width(text);
                        self.bounds.x + slack.max(0.0) / 2.0
                    }
                };
                canvas.draw_text(text, Point::new(x, self.bounds.y), &self.text_style());
            }
        }
        canvas.pop_clip();
    }

    fn event(&mut self, event: &Event) -> Option<Box<dyn Any + Send>> {
        match &mut self.value {
            RenderableValue::Node(node) => node.event(event),
            _ => None,
        }
    }

    fn children(&self) -> &[Box<dyn Widget>] {
        match &self.value {
            RenderableValue::Node(node) => std::slice::from_ref(node),
            _ => &[],
        }
    }

    fn children_mut(&mut self) -> &mut [Box<dyn Widget>] {
        match &mut self.value {
            RenderableValue::Node(node) => std::slice::from_mut(node),
            _ => &mut [],
        }
    }

    fn accessible_name(&self) -> Option<&str> {
        Some(&self.title)
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
