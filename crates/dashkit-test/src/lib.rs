//! Testing harness for dashkit widgets.
//!
//! Drives a widget tree the way a user would: clicks by test id, key presses,
//! then assertions on which widgets exist and which text was painted.
//!
//! ```
//! use dashkit_core::{
//!     widget::LayoutResult, Canvas, Constraints, Event, Point, Rect, Size, TextStyle, TypeId,
//!     Widget,
//! };
//! use dashkit_test::Harness;
//! use std::any::Any;
//!
//! struct Label;
//!
//! impl Widget for Label {
//!     fn type_id(&self) -> TypeId { TypeId::of::<Self>() }
//!     fn measure(&self, c: Constraints) -> Size { c.constrain(Size::new(40.0, 20.0)) }
//!     fn layout(&mut self, b: Rect) -> LayoutResult { LayoutResult { size: b.size() } }
//!     fn paint(&self, canvas: &mut dyn Canvas) {
//!         canvas.draw_text("hello", Point::ORIGIN, &TextStyle::default());
//!     }
//!     fn event(&mut self, _: &Event) -> Option<Box<dyn Any + Send>> { None }
//!     fn children(&self) -> &[Box<dyn Widget>] { &[] }
//!     fn children_mut(&mut self) -> &mut [Box<dyn Widget>] { &mut [] }
//!     fn test_id(&self) -> Option<&str> { Some("label") }
//! }
//!
//! let mut harness = Harness::new(Label);
//! harness.assert_exists("label").assert_not_exists("button");
//! harness.assert_text_visible("hello");
//! ```

mod harness;

pub use harness::Harness;
