//! Input events for widgets.

use crate::geometry::Point;
use serde::{Deserialize, Serialize};

/// Input event types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    /// Mouse moved to position
    MouseMove {
        /// New position
        position: Point,
    },
    /// Mouse button pressed
    MouseDown {
        /// Position of click
        position: Point,
        /// Button pressed
        button: MouseButton,
    },
    /// Mouse button released
    MouseUp {
        /// Position of release
        position: Point,
        /// Button released
        button: MouseButton,
    },
    /// Key pressed
    KeyDown {
        /// Key pressed
        key: Key,
    },
    /// Key released
    KeyUp {
        /// Key released
        key: Key,
    },
    /// Widget gained focus
    FocusIn,
    /// Widget lost focus
    FocusOut,
    /// Mouse entered widget bounds
    MouseEnter,
    /// Mouse left widget bounds
    MouseLeave,
    /// Window resized
    Resize {
        /// New width
        width: f32,
        /// New height
        height: f32,
    },
}

impl Event {
    /// Pointer position carried by the event, if any.
    #[must_use]
    pub const fn position(&self) -> Option<Point> {
        match self {
            Self::MouseMove { position }
            | Self::MouseDown { position, .. }
            | Self::MouseUp { position, .. } => Some(*position),
            _ => None,
        }
    }

    /// Whether this is a mouse move/press/release.
    #[must_use]
    pub const fn is_pointer(&self) -> bool {
        self.position().is_some()
    }
}

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    /// Left mouse button
    Left,
    /// Right mouse button
    Right,
    /// Middle mouse button (wheel click)
    Middle,
}

/// Keyboard keys the widgets react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    /// Enter / Return
    Enter,
    /// Space bar
    Space,
    /// Escape
    Escape,
    /// Tab
    Tab,
    /// Up arrow
    Up,
    /// Down arrow
    Down,
    /// Left arrow
    Left,
    /// Right arrow
    Right,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_position() {
        let p = Point::new(4.0, 2.0);
        assert_eq!(Event::MouseMove { position: p }.position(), Some(p));
        assert_eq!(
            Event::MouseUp {
                position: p,
                button: MouseButton::Left
            }
            .position(),
            Some(p)
        );
        assert_eq!(Event::KeyDown { key: Key::Enter }.position(), None);
    }

    #[test]
    fn test_event_is_pointer() {
        assert!(Event::MouseDown {
            position: Point::ORIGIN,
            button: MouseButton::Left
        }
        .is_pointer());
        assert!(!Event::MouseLeave.is_pointer());
        assert!(!Event::Resize {
            width: 1.0,
            height: 1.0
        }
        .is_pointer());
    }
}
