//! Core types and traits for dashkit dashboard widgets.
//!
//! This crate provides foundational types used throughout dashkit:
//! - Geometric primitives: [`Point`], [`Size`], [`Rect`]
//! - Color representation: [`Color`]
//! - Layout constraints: [`Constraints`]
//! - Input events: [`Event`]
//! - The [`Widget`] and [`Canvas`] traits, plus a [`RecordingCanvas`]

mod canvas;
mod color;
mod constraints;
mod event;
mod geometry;
pub mod widget;

pub use canvas::{DrawCommand, RecordingCanvas};
pub use color::{Color, ColorParseError};
pub use constraints::Constraints;
pub use event::{Event, Key, MouseButton};
pub use geometry::{Point, Rect, Size};
pub use widget::{
    AccessibleRole, Canvas, FontWeight, LayoutResult, TextStyle, TextTransform, TypeId, Widget,
};
