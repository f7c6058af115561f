//! Test harness for dashkit widgets.

use dashkit_core::{Event, Key, MouseButton, Point, RecordingCanvas, Rect, Widget};
use std::any::Any;
use std::collections::VecDeque;

/// Test harness owning a root widget.
///
/// The root is laid out in the viewport on creation and again after every
/// simulated interaction, so queries always see the current tree.
pub struct Harness<W: Widget> {
    /// Root widget being tested
    root: W,
    /// Event queue for simulation
    event_queue: VecDeque<Event>,
    /// Current viewport
    viewport: Rect,
    /// Messages returned by the root, oldest first
    messages: Vec<Box<dyn Any + Send>>,
}

impl<W: Widget> Harness<W> {
    /// Create a new harness with a root widget in a 1280x720 viewport.
    pub fn new(root: W) -> Self {
        let mut harness = Self {
            root,
            event_queue: VecDeque::new(),
            viewport: Rect::new(0.0, 0.0, 1280.0, 720.0),
            messages: Vec::new(),
        };
        harness.relayout();
        harness
    }

    /// Set the viewport size.
    #[must_use]
    pub fn viewport(mut self, width: f32, height: f32) -> Self {
        self.viewport = Rect::new(0.0, 0.0, width, height);
        self.relayout();
        self
    }

    /// Lay the root out in the viewport again.
    pub fn relayout(&mut self) {
        self.root.layout(self.viewport);
    }

    /// The root widget.
    pub const fn root(&self) -> &W {
        &self.root
    }

    /// The root widget, mutably. Call [`Harness::relayout`] after changes.
    pub fn root_mut(&mut self) -> &mut W {
        &mut self.root
    }

    // === Event Simulation ===

    /// Simulate a click at the center of the widget with `test_id`.
    ///
    /// Does nothing if no such widget is in the tree.
    pub fn click(&mut self, test_id: &str) -> &mut Self {
        if let Some(bounds) = self.query(test_id).map(Widget::bounds) {
            self.click_at(bounds.center());
        }
        self
    }

    /// Simulate a click at `position`.
    pub fn click_at(&mut self, position: Point) -> &mut Self {
        self.event_queue.push_back(Event::MouseMove { position });
        self.event_queue.push_back(Event::MouseDown {
            position,
            button: MouseButton::Left,
        });
        self.event_queue.push_back(Event::MouseUp {
            position,
            button: MouseButton::Left,
        });
        self.process_events();
        self
    }

    /// Simulate a key press.
    pub fn press_key(&mut self, key: Key) -> &mut Self {
        self.event_queue.push_back(Event::KeyDown { key });
        self.event_queue.push_back(Event::KeyUp { key });
        self.process_events();
        self
    }

    // === Messages ===

    /// Messages returned by the root so far.
    pub fn messages(&self) -> &[Box<dyn Any + Send>] {
        &self.messages
    }

    /// Drain the collected messages.
    pub fn take_messages(&mut self) -> Vec<Box<dyn Any + Send>> {
        std::mem::take(&mut self.messages)
    }

    /// Number of collected messages of type `M`.
    pub fn message_count<M: Any>(&self) -> usize {
        self.messages
            .iter()
            .filter(|m| m.downcast_ref::<M>().is_some())
            .count()
    }

    /// The most recent message of type `M`.
    pub fn last_message<M: Any>(&self) -> Option<&M> {
        self.messages.iter().rev().find_map(|m| m.downcast_ref::<M>())
    }

    // === Queries ===

    /// Find the widget with `test_id`.
    pub fn query(&self, test_id: &str) -> Option<&dyn Widget> {
        find_widget(&self.root, test_id)
    }

    /// Accessible name of the widget with `test_id`, or an empty string.
    pub fn text(&self, test_id: &str) -> String {
        self.query(test_id)
            .and_then(Widget::accessible_name)
            .map(str::to_string)
            .unwrap_or_default()
    }

    /// Check if a widget exists.
    pub fn exists(&self, test_id: &str) -> bool {
        self.query(test_id).is_some()
    }

    /// Paint the tree and return every text run, as displayed.
    pub fn texts(&mut self) -> Vec<String> {
        self.relayout();
        let mut canvas = RecordingCanvas::new();
        self.root.paint(&mut canvas);
        canvas.texts()
    }

    /// Whether `text` is painted anywhere in the tree.
    pub fn has_text(&mut self, text: &str) -> bool {
        self.texts().iter().any(|t| t == text)
    }

    // === Assertions ===

    /// Assert that a widget exists.
    ///
    /// # Panics
    ///
    /// Panics if the widget does not exist.
    pub fn assert_exists(&self, test_id: &str) -> &Self {
        assert!(
            self.exists(test_id),
            "Expected widget with test id '{test_id}' to exist"
        );
        self
    }

    /// Assert that a widget does not exist.
    ///
    /// # Panics
    ///
    /// Panics if the widget exists.
    pub fn assert_not_exists(&self, test_id: &str) -> &Self {
        assert!(
            !self.exists(test_id),
            "Expected widget with test id '{test_id}' to not exist"
        );
        self
    }

    /// Assert that text matches exactly.
    ///
    /// # Panics
    ///
    /// Panics if the text does not match.
    pub fn assert_text(&self, test_id: &str, expected: &str) -> &Self {
        let actual = self.text(test_id);
        assert_eq!(
            actual, expected,
            "Expected text '{expected}' but got '{actual}' for '{test_id}'"
        );
        self
    }

    /// Assert that `text` is painted.
    ///
    /// # Panics
    ///
    /// Panics if the text is not painted.
    pub fn assert_text_visible(&mut self, text: &str) -> &mut Self {
        let texts = self.texts();
        assert!(
            texts.iter().any(|t| t == text),
            "Expected '{text}' to be painted, got {texts:?}"
        );
        self
    }

    /// Assert that `text` is not painted.
    ///
    /// # Panics
    ///
    /// Panics if the text is painted.
    pub fn assert_text_hidden(&mut self, text: &str) -> &mut Self {
        let texts = self.texts();
        assert!(
            !texts.iter().any(|t| t == text),
            "Expected '{text}' not to be painted, got {texts:?}"
        );
        self
    }

    // === Internal ===

    fn process_events(&mut self) {
        while let Some(event) = self.event_queue.pop_front() {
            if let Some(message) = self.root.event(&event) {
                self.messages.push(message);
            }
        }
        self.relayout();
    }
}

fn find_widget<'a>(widget: &'a dyn Widget, test_id: &str) -> Option<&'a dyn Widget> {
    if widget.test_id() == Some(test_id) {
        return Some(widget);
    }
    widget
        .children()
        .iter()
        .find_map(|child| find_widget(child.as_ref(), test_id))
}
