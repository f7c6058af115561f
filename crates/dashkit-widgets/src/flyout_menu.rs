//! Flyout menu: an icon trigger that opens a floating panel in one of eight
//! compass directions, with an optional Apply/Cancel footer.
//!
//! Visibility is either owned by the menu ([`OpenMode::Owned`]) or read from
//! the owner on every frame ([`OpenMode::External`]). In the external mode
//! the menu still tracks its own flag, but only the owner's source decides
//! what is shown, so the panel stays up after Apply/Cancel until the owner
//! closes it.

use crate::button::{Button, ButtonClicked, ButtonKind, ButtonSize};
use crate::config::FlyoutConfig;
use crate::error::FlyoutError;
use crate::positioning::{positioning_offset, FlyoutDirection, Geometry, MenuOffset};
use crate::tooltip::Tooltip;
use dashkit_core::{
    widget::{AccessibleRole, LayoutResult},
    Canvas, Constraints, Event, Rect, Size, TypeId, Widget,
};
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt;

/// Test ID used when none is configured.
pub const DEFAULT_TEST_ID: &str = "flyout-menu";

/// Trigger glyph used when none is configured.
pub const DEFAULT_ICON: &str = "⋮";

/// Trigger description used when none is configured.
pub const DEFAULT_ICON_DESCRIPTION: &str = "Open and close list of options";

const MAX_BODY_WIDTH: f32 = 320.0;
const BODY_GAP: f32 = 8.0;

/// Owner callback invoked on Cancel or Apply.
pub type FlyoutCallback = Box<dyn FnMut() + Send + Sync>;

/// Owner-supplied visibility source for controlled menus.
pub type OpenSource = Box<dyn Fn() -> bool + Send + Sync>;

/// Who decides whether the panel is visible.
pub enum OpenMode {
    /// The menu owns its state, starting from the given value.
    Owned(bool),
    /// The owner decides; the source is read on every query.
    External(OpenSource),
}

impl Default for OpenMode {
    fn default() -> Self {
        Self::Owned(false)
    }
}

impl fmt::Debug for OpenMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Owned(open) => f.debug_tuple("Owned").field(open).finish(),
            Self::External(_) => f.write_str("External(..)"),
        }
    }
}

/// Open/close state machine.
#[derive(Debug)]
pub struct OpenState {
    mode: OpenMode,
    internal_open: bool,
}

impl OpenState {
    /// Create the state for `mode`. The internal flag starts from the
    /// initial value, or from the source's current value when external.
    #[must_use]
    pub fn new(mode: OpenMode) -> Self {
        let internal_open = match &mode {
            OpenMode::Owned(open) => *open,
            OpenMode::External(source) => source(),
        };
        Self {
            mode,
            internal_open,
        }
    }

    /// Whether the panel is shown right now.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        match &self.mode {
            OpenMode::Owned(_) => self.internal_open,
            OpenMode::External(source) => source(),
        }
    }

    /// The menu's own flag, which may diverge from visibility when external.
    #[must_use]
    pub const fn internal_open(&self) -> bool {
        self.internal_open
    }

    /// Whether visibility comes from the owner.
    #[must_use]
    pub fn is_controlled(&self) -> bool {
        matches!(self.mode, OpenMode::External(_))
    }

    /// Handle a trigger click. Returns the requested visibility.
    pub fn toggle(&mut self) -> bool {
        let requested = !self.is_visible();
        if self.is_controlled() {
            debug!("flyout toggle requested (open={requested}); visibility is owner-controlled");
        } else {
            self.internal_open = requested;
            debug!("flyout toggled (open={requested})");
        }
        requested
    }

    /// Clear the internal flag.
    pub fn close(&mut self) {
        self.internal_open = false;
    }
}

/// What the panel renders below its body.
pub enum TransactionalFooter {
    /// No footer.
    Absent,
    /// Cancel and Apply buttons.
    Default,
    /// An owner-supplied widget in a custom footer container.
    Custom(Box<dyn Widget>),
}

impl TransactionalFooter {
    /// The footer's kind, without its payload.
    #[must_use]
    pub const fn mode(&self) -> FooterMode {
        match self {
            Self::Absent => FooterMode::Absent,
            Self::Default => FooterMode::Default,
            Self::Custom(_) => FooterMode::Custom,
        }
    }
}

impl From<bool> for TransactionalFooter {
    fn from(transactional: bool) -> Self {
        if transactional {
            Self::Default
        } else {
            Self::Absent
        }
    }
}

impl fmt::Debug for TransactionalFooter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Absent => f.write_str("Absent"),
            Self::Default => f.write_str("Default"),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Payload-free footer kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FooterMode {
    /// No footer
    #[default]
    Absent,
    /// Cancel and Apply buttons
    Default,
    /// Owner-supplied footer widget
    Custom,
}

/// A built-in footer button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FooterAction {
    /// Close and call `on_cancel`
    Cancel,
    /// Close and call `on_apply`
    Apply,
}

impl FooterMode {
    /// Built-in actions rendered for this footer, in order.
    #[must_use]
    pub const fn actions(self) -> &'static [FooterAction] {
        match self {
            Self::Default => &[FooterAction::Cancel, FooterAction::Apply],
            Self::Absent | Self::Custom => &[],
        }
    }
}

/// Footer button labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlyoutI18n {
    /// Cancel label
    pub cancel_button_text: String,
    /// Apply label
    pub apply_button_text: String,
}

impl Default for FlyoutI18n {
    fn default() -> Self {
        Self {
            cancel_button_text: "Cancel".to_string(),
            apply_button_text: "Apply".to_string(),
        }
    }
}

/// Message emitted when the trigger is clicked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlyoutToggled {
    /// Requested visibility
    pub open: bool,
}

/// Message emitted after Cancel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlyoutCancelled;

/// Message emitted after Apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlyoutApplied;

fn boxed<M: Any + Send>(message: M) -> Box<dyn Any + Send> {
    Box::new(message)
}

/// Flyout menu widget.
///
/// Built with [`FlyoutMenu::builder`]. Child order is trigger, body, then
/// footer; while closed only the trigger is exposed as a child.
pub struct FlyoutMenu {
    direction: FlyoutDirection,
    state: OpenState,
    footer: FooterMode,
    disabled: bool,
    light: bool,
    button_size: ButtonSize,
    i18n: FlyoutI18n,
    test_id_value: String,
    icon_description: String,
    on_cancel: FlyoutCallback,
    on_apply: FlyoutCallback,
    tooltip: Tooltip,
    parts: Vec<Box<dyn Widget>>,
    footer_start: usize,
}

impl fmt::Debug for FlyoutMenu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlyoutMenu")
            .field("direction", &self.direction)
            .field("state", &self.state)
            .field("footer", &self.footer)
            .field("disabled", &self.disabled)
            .field("test_id", &self.test_id_value)
            .finish_non_exhaustive()
    }
}

impl FlyoutMenu {
    /// Start building a flyout menu.
    #[must_use]
    pub fn builder() -> FlyoutMenuBuilder {
        FlyoutMenuBuilder::default()
    }

    /// Build a menu from configuration and the two required callbacks.
    pub fn from_config(
        config: &FlyoutConfig,
        on_cancel: impl FnMut() + Send + Sync + 'static,
        on_apply: impl FnMut() + Send + Sync + 'static,
    ) -> Self {
        FlyoutMenuBuilder::from_config(config).assemble(Box::new(on_cancel), Box::new(on_apply))
    }

    /// Whether the panel is shown.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.state.is_visible()
    }

    /// The menu's own open flag.
    #[must_use]
    pub const fn internal_open(&self) -> bool {
        self.state.internal_open()
    }

    /// Whether visibility is owner-controlled.
    #[must_use]
    pub fn is_controlled(&self) -> bool {
        self.state.is_controlled()
    }

    /// Placement direction.
    #[must_use]
    pub const fn direction(&self) -> FlyoutDirection {
        self.direction
    }

    /// Footer kind.
    #[must_use]
    pub const fn footer_mode(&self) -> FooterMode {
        self.footer
    }

    /// Whether the trigger ignores clicks.
    #[must_use]
    pub const fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Whether the light layer styling is used for the trigger and panel.
    #[must_use]
    pub const fn is_light(&self) -> bool {
        self.light
    }

    /// Trigger height class.
    #[must_use]
    pub const fn button_size(&self) -> ButtonSize {
        self.button_size
    }

    /// Footer labels.
    #[must_use]
    pub const fn i18n(&self) -> &FlyoutI18n {
        &self.i18n
    }

    /// Offset applied on the last layout pass.
    #[must_use]
    pub const fn offset(&self) -> MenuOffset {
        self.tooltip.get_offset()
    }

    /// Panel bounds, if the panel is shown.
    #[must_use]
    pub fn panel_bounds(&self) -> Option<Rect> {
        self.is_open().then(|| self.tooltip.bounds())
    }

    /// The floating panel.
    #[must_use]
    pub const fn panel(&self) -> &Tooltip {
        &self.tooltip
    }

    /// Handle a trigger click.
    ///
    /// Returns `None` when disabled. Otherwise returns the requested
    /// visibility, which is also applied unless the menu is controlled.
    pub fn toggle(&mut self) -> Option<FlyoutToggled> {
        if self.disabled {
            debug!("flyout '{}' is disabled; toggle ignored", self.test_id_value);
            return None;
        }
        let open = self.state.toggle();
        Some(FlyoutToggled { open })
    }

    /// Cancel: close and call `on_cancel` once.
    ///
    /// Only available while the default footer is shown.
    pub fn cancel(&mut self) -> Option<FlyoutCancelled> {
        if !self.footer_actions_available() {
            return None;
        }
        self.state.close();
        (self.on_cancel)();
        debug!(
            "flyout '{}' cancelled (still visible: {})",
            self.test_id_value,
            self.state.is_visible()
        );
        Some(FlyoutCancelled)
    }

    /// Apply: close and call `on_apply` once.
    ///
    /// Only available while the default footer is shown.
    pub fn apply(&mut self) -> Option<FlyoutApplied> {
        if !self.footer_actions_available() {
            return None;
        }
        self.state.close();
        (self.on_apply)();
        debug!(
            "flyout '{}' applied (still visible: {})",
            self.test_id_value,
            self.state.is_visible()
        );
        Some(FlyoutApplied)
    }

    fn footer_actions_available(&self) -> bool {
        self.footer == FooterMode::Default && self.state.is_visible()
    }

    fn footer_action(&self, index: usize) -> Option<FooterAction> {
        index
            .checked_sub(self.footer_start)
            .and_then(|i| self.footer.actions().get(i).copied())
    }

    fn layout_panel(&mut self, trigger: Rect) {
        let body_constraints = Constraints::new(0.0, MAX_BODY_WIDTH, 0.0, f32::INFINITY);
        let body_sizes: Vec<Size> = self.parts[1..self.footer_start]
            .iter()
            .map(|child| child.measure(body_constraints))
            .collect();
        let footer_sizes: Vec<Size> = self.parts[self.footer_start..]
            .iter()
            .map(|child| child.measure(body_constraints))
            .collect();

        let body_width = body_sizes.iter().fold(0.0_f32, |w, s| w.max(s.width));
        let gaps = body_sizes.len().saturating_sub(1) as f32 * BODY_GAP;
        let body_height = body_sizes.iter().map(|s| s.height).sum::<f32>() + gaps;

        let (footer_width, footer_height) = match self.footer {
            FooterMode::Default => (
                footer_sizes.iter().map(|s| s.width).sum::<f32>(),
                footer_sizes.iter().fold(0.0_f32, |h, s| h.max(s.height)),
            ),
            FooterMode::Custom => (
                footer_sizes.iter().fold(0.0_f32, |w, s| w.max(s.width)),
                footer_sizes.iter().map(|s| s.height).sum::<f32>(),
            ),
            FooterMode::Absent => (0.0, 0.0),
        };
        let footer_gap = if body_height > 0.0 && footer_height > 0.0 {
            BODY_GAP
        } else {
            0.0
        };
        let content = Size::new(
            body_width.max(footer_width),
            body_height + footer_gap + footer_height,
        );

        let geometry = Geometry::measured(Some(trigger), Some(content));
        let offset = positioning_offset(self.direction, geometry);
        trace!(
            "flyout '{}' {:?}: {geometry:?} -> {offset:?}",
            self.test_id_value,
            self.direction
        );
        self.tooltip.set_offset(offset);
        let frame = self.tooltip.frame_size(content);
        self.tooltip.place(trigger, frame);

        let area = self.tooltip.content_bounds();
        let mut y = area.y;
        for (child, size) in self.parts[1..self.footer_start]
            .iter_mut()
            .zip(&body_sizes)
        {
            child.layout(Rect::new(area.x, y, area.width, size.height));
            y += size.height + BODY_GAP;
        }

        let footer_top = area.bottom() - footer_height;
        let footer_parts = &mut self.parts[self.footer_start..];
        match self.footer {
            FooterMode::Default => {
                let half = area.width / 2.0;
                for (i, part) in footer_parts.iter_mut().enumerate() {
                    let x = (i as f32).mul_add(half, area.x);
                    part.layout(Rect::new(x, footer_top, half, footer_height));
                }
            }
            FooterMode::Custom => {
                for part in footer_parts {
                    part.layout(Rect::new(area.x, footer_top, area.width, footer_height));
                }
            }
            FooterMode::Absent => {}
        }
    }
}

impl Widget for FlyoutMenu {
    fn type_id(&self) -> TypeId {
        TypeId::of::<Self>()
    }

    fn measure(&self, constraints: Constraints) -> Size {
        self.parts[0].measure(constraints)
    }

    fn layout(&mut self, bounds: Rect) -> LayoutResult {
        let trigger_size = self.parts[0].measure(Constraints::loose(bounds.size()));
        let trigger = Rect::from_origin_size(bounds.origin(), trigger_size);
        self.parts[0].layout(trigger);

        if self.state.is_visible() {
            self.layout_panel(trigger);
        }

        LayoutResult { size: trigger_size }
    }

    fn paint(&self, canvas: &mut dyn Canvas) {
        let open = self.state.is_visible();
        // An open trigger shares the panel's background.
        if open {
            canvas.fill_rect(self.parts[0].bounds(), self.tooltip.background());
        }
        self.parts[0].paint(canvas);
        if !open {
            return;
        }
        self.tooltip.paint_frame(canvas);
        for part in &self.parts[1..] {
            part.paint(canvas);
        }
    }

    /// Keyboard input goes to the trigger only; pointer input reaches the
    /// panel while it is shown.
    fn event(&mut self, event: &Event) -> Option<Box<dyn Any + Send>> {
        if let Some(message) = self.parts[0].event(event) {
            if message.downcast_ref::<ButtonClicked>().is_some() {
                return self.toggle().map(boxed);
            }
            return Some(message);
        }

        if !event.is_pointer() || !self.state.is_visible() {
            return None;
        }

        for index in 1..self.parts.len() {
            let Some(message) = self.parts[index].event(event) else {
                continue;
            };
            if message.downcast_ref::<ButtonClicked>().is_some() {
                match self.footer_action(index) {
                    Some(FooterAction::Cancel) => return self.cancel().map(boxed),
                    Some(FooterAction::Apply) => return self.apply().map(boxed),
                    None => {}
                }
            }
            return Some(message);
        }
        None
    }

    fn children(&self) -> &[Box<dyn Widget>] {
        if self.state.is_visible() {
            &self.parts
        } else {
            &self.parts[..1]
        }
    }

    fn children_mut(&mut self) -> &mut [Box<dyn Widget>] {
        if self.state.is_visible() {
            &mut self.parts
        } else {
            &mut self.parts[..1]
        }
    }

    fn is_interactive(&self) -> bool {
        !self.disabled
    }

    fn is_focusable(&self) -> bool {
        !self.disabled
    }

    fn accessible_name(&self) -> Option<&str> {
        Some(&self.icon_description)
    }

    fn accessible_role(&self) -> AccessibleRole {
        AccessibleRole::Menu
    }

    fn test_id(&self) -> Option<&str> {
        Some(&self.test_id_value)
    }

    fn bounds(&self) -> Rect {
        self.parts[0].bounds()
    }
}

/// Builder for [`FlyoutMenu`].
pub struct FlyoutMenuBuilder {
    direction: FlyoutDirection,
    default_open: bool,
    source: Option<OpenSource>,
    disabled: bool,
    light: bool,
    transactional: TransactionalFooter,
    button_size: ButtonSize,
    i18n: FlyoutI18n,
    test_id: String,
    icon: String,
    icon_description: String,
    body: Vec<Box<dyn Widget>>,
    on_cancel: Option<FlyoutCallback>,
    on_apply: Option<FlyoutCallback>,
}

impl Default for FlyoutMenuBuilder {
    fn default() -> Self {
        Self {
            direction: FlyoutDirection::default(),
            default_open: false,
            source: None,
            disabled: false,
            light: true,
            transactional: TransactionalFooter::Absent,
            button_size: ButtonSize::default(),
            i18n: FlyoutI18n::default(),
            test_id: DEFAULT_TEST_ID.to_string(),
            icon: DEFAULT_ICON.to_string(),
            icon_description: DEFAULT_ICON_DESCRIPTION.to_string(),
            body: Vec::new(),
            on_cancel: None,
            on_apply: None,
        }
    }
}

impl FlyoutMenuBuilder {
    /// Seed a builder from configuration. Callbacks and body are still needed.
    #[must_use]
    pub fn from_config(config: &FlyoutConfig) -> Self {
        Self::default()
            .direction(config.direction)
            .default_open(config.default_open)
            .disabled(config.disabled)
            .light(config.light)
            .transactional(config.transactional)
            .button_size(config.button_size)
            .i18n(config.i18n.clone())
            .test_id(config.test_id.clone())
            .icon(config.icon.clone())
            .icon_description(config.icon_description.clone())
    }

    /// Set the placement direction.
    #[must_use]
    pub const fn direction(mut self, direction: FlyoutDirection) -> Self {
        self.direction = direction;
        self
    }

    /// Initial state for an owned menu. Ignored when controlled.
    #[must_use]
    pub const fn default_open(mut self, open: bool) -> Self {
        self.default_open = open;
        self
    }

    /// Let the owner control visibility through `source`.
    #[must_use]
    pub fn controlled(mut self, source: impl Fn() -> bool + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Disable the trigger.
    #[must_use]
    pub const fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Use the light panel background.
    #[must_use]
    pub const fn light(mut self, light: bool) -> Self {
        self.light = light;
        self
    }

    /// Set the footer: `true`/`false` or a [`TransactionalFooter`].
    #[must_use]
    pub fn transactional(mut self, footer: impl Into<TransactionalFooter>) -> Self {
        self.transactional = footer.into();
        self
    }

    /// Render `widget` in a custom footer container.
    #[must_use]
    pub fn custom_footer(self, widget: impl Widget + 'static) -> Self {
        self.transactional(TransactionalFooter::Custom(Box::new(widget)))
    }

    /// Set the trigger height class.
    #[must_use]
    pub const fn button_size(mut self, size: ButtonSize) -> Self {
        self.button_size = size;
        self
    }

    /// Set the footer labels.
    #[must_use]
    pub fn i18n(mut self, i18n: FlyoutI18n) -> Self {
        self.i18n = i18n;
        self
    }

    /// Set the test ID. Trigger and footer buttons derive theirs from it.
    #[must_use]
    pub fn test_id(mut self, id: impl Into<String>) -> Self {
        self.test_id = id.into();
        self
    }

    /// Set the glyph painted on the trigger.
    #[must_use]
    pub fn icon(mut self, glyph: impl Into<String>) -> Self {
        self.icon = glyph.into();
        self
    }

    /// Set the trigger's accessible description.
    #[must_use]
    pub fn icon_description(mut self, description: impl Into<String>) -> Self {
        self.icon_description = description.into();
        self
    }

    /// Add a body widget.
    #[must_use]
    pub fn child(mut self, widget: impl Widget + 'static) -> Self {
        self.body.push(Box::new(widget));
        self
    }

    /// Set the Cancel callback (required).
    #[must_use]
    pub fn on_cancel(mut self, callback: impl FnMut() + Send + Sync + 'static) -> Self {
        self.on_cancel = Some(Box::new(callback));
        self
    }

    /// Set the Apply callback (required).
    #[must_use]
    pub fn on_apply(mut self, callback: impl FnMut() + Send + Sync + 'static) -> Self {
        self.on_apply = Some(Box::new(callback));
        self
    }

    /// Build the menu.
    ///
    /// Fails with [`FlyoutError::MissingCallback`] unless both `on_cancel`
    /// and `on_apply` were supplied.
    pub fn build(mut self) -> Result<FlyoutMenu, FlyoutError> {
        let on_cancel = self
            .on_cancel
            .take()
            .ok_or(FlyoutError::MissingCallback("on_cancel"))?;
        let on_apply = self
            .on_apply
            .take()
            .ok_or(FlyoutError::MissingCallback("on_apply"))?;
        Ok(self.assemble(on_cancel, on_apply))
    }

    fn assemble(self, on_cancel: FlyoutCallback, on_apply: FlyoutCallback) -> FlyoutMenu {
        let test_id = self.test_id;
        let mode = match self.source {
            Some(source) => OpenMode::External(source),
            None => OpenMode::Owned(self.default_open),
        };

        let trigger = Button::icon_only(self.icon, self.icon_description.clone())
            .size(self.button_size)
            .disabled(self.disabled)
            .light(self.light)
            .with_test_id(format!("{test_id}__trigger"));

        let mut parts: Vec<Box<dyn Widget>> = Vec::with_capacity(self.body.len() + 3);
        parts.push(Box::new(trigger));
        parts.extend(self.body);
        let footer_start = parts.len();

        let footer = self.transactional.mode();
        match self.transactional {
            TransactionalFooter::Default => {
                parts.push(Box::new(
                    Button::new(self.i18n.cancel_button_text.clone())
                        .kind(ButtonKind::Secondary)
                        .with_test_id(format!("{test_id}__cancel")),
                ));
                parts.push(Box::new(
                    Button::new(self.i18n.apply_button_text.clone())
                        .kind(ButtonKind::Primary)
                        .with_test_id(format!("{test_id}__apply")),
                ));
            }
            TransactionalFooter::Custom(widget) => parts.push(widget),
            TransactionalFooter::Absent => {}
        }

        let tooltip = Tooltip::new()
            .direction(self.direction.coarse_edge())
            .light(self.light)
            .test_id(test_id.clone());

        FlyoutMenu {
            direction: self.direction,
            state: OpenState::new(mode),
            footer,
            disabled: self.disabled,
            light: self.light,
            button_size: self.button_size,
            i18n: self.i18n,
            test_id_value: test_id,
            icon_description: self.icon_description,
            on_cancel,
            on_apply,
            tooltip,
            parts,
            footer_start,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::Text;
    use crate::tooltip::TooltipDirection;
    use dashkit_core::{DrawCommand, MouseButton, Point, RecordingCanvas};
    use proptest::prelude::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Arc;

    fn menu() -> FlyoutMenuBuilder {
        FlyoutMenu::builder().on_cancel(|| {}).on_apply(|| {})
    }

    fn click(menu: &mut FlyoutMenu, at: Point) -> Option<Box<dyn Any + Send>> {
        menu.event(&Event::MouseDown {
            position: at,
            button: MouseButton::Left,
        });
        menu.event(&Event::MouseUp {
            position: at,
            button: MouseButton::Left,
        })
    }

    fn viewport() -> Rect {
        Rect::new(400.0, 300.0, 800.0, 600.0)
    }

    // ===== OpenState =====

    #[test]
    fn test_owned_state_toggles() {
        let mut state = OpenState::new(OpenMode::Owned(false));
        assert!(!state.is_visible());
        assert!(state.toggle());
        assert!(state.is_visible());
        assert!(!state.toggle());
        assert!(!state.is_visible());
    }

    #[test]
    fn test_external_state_follows_source() {
        let flag = Arc::new(AtomicBool::new(true));
        let source = Arc::clone(&flag);
        let mut state =
            OpenState::new(OpenMode::External(Box::new(move || source.load(Ordering::SeqCst))));
        assert!(state.is_controlled());
        assert!(state.internal_open());

        assert!(!state.toggle());
        assert!(state.is_visible());
        assert!(state.internal_open());

        state.close();
        assert!(!state.internal_open());
        assert!(state.is_visible());

        flag.store(false, Ordering::SeqCst);
        assert!(!state.is_visible());
    }

    #[test]
    fn test_open_mode_debug() {
        assert_eq!(format!("{:?}", OpenMode::Owned(true)), "Owned(true)");
        assert_eq!(
            format!("{:?}", OpenMode::External(Box::new(|| false))),
            "External(..)"
        );
    }

    // ===== Footer =====

    #[test]
    fn test_footer_from_bool() {
        assert_eq!(TransactionalFooter::from(true).mode(), FooterMode::Default);
        assert_eq!(TransactionalFooter::from(false).mode(), FooterMode::Absent);
        assert_eq!(
            TransactionalFooter::Custom(Box::new(Text::new("x"))).mode(),
            FooterMode::Custom
        );
    }

    #[test]
    fn test_footer_actions() {
        assert_eq!(
            FooterMode::Default.actions(),
            &[FooterAction::Cancel, FooterAction::Apply]
        );
        assert!(FooterMode::Absent.actions().is_empty());
        assert!(FooterMode::Custom.actions().is_empty());
    }

    #[test]
    fn test_i18n_defaults() {
        let i18n = FlyoutI18n::default();
        assert_eq!(i18n.cancel_button_text, "Cancel");
        assert_eq!(i18n.apply_button_text, "Apply");
    }

    // ===== Builder =====

    #[test]
    fn test_build_requires_callbacks() {
        let err = FlyoutMenu::builder().on_apply(|| {}).build().unwrap_err();
        assert_eq!(err, FlyoutError::MissingCallback("on_cancel"));
        let err = FlyoutMenu::builder().on_cancel(|| {}).build().unwrap_err();
        assert_eq!(err, FlyoutError::MissingCallback("on_apply"));
    }

    #[test]
    fn test_builder_defaults() {
        let menu = menu().build().unwrap();
        assert_eq!(menu.direction(), FlyoutDirection::BottomStart);
        assert!(!menu.is_open());
        assert!(!menu.is_disabled());
        assert!(!menu.is_controlled());
        assert_eq!(menu.footer_mode(), FooterMode::Absent);
        assert_eq!(menu.button_size(), ButtonSize::Regular);
        assert_eq!(Widget::test_id(&menu), Some(DEFAULT_TEST_ID));
        assert_eq!(Widget::accessible_name(&menu), Some(DEFAULT_ICON_DESCRIPTION));
        assert_eq!(Widget::accessible_role(&menu), AccessibleRole::Menu);
        assert!(menu.panel().is_light());
    }

    #[test]
    fn test_panel_uses_coarse_edge() {
        let menu = menu().direction(FlyoutDirection::LeftEnd).build().unwrap();
        assert_eq!(menu.panel().get_direction(), TooltipDirection::Left);
    }

    #[test]
    fn test_children_hidden_while_closed() {
        let mut menu = menu()
            .transactional(true)
            .child(Text::new("Body"))
            .build()
            .unwrap();
        assert_eq!(menu.children().len(), 1);
        menu.toggle();
        assert_eq!(menu.children().len(), 4);
        assert_eq!(menu.children_mut().len(), 4);
    }

    // ===== Transitions =====

    #[test]
    fn test_toggle_emits_requested_state() {
        let mut menu = menu().build().unwrap();
        assert_eq!(menu.toggle(), Some(FlyoutToggled { open: true }));
        assert!(menu.is_open());
        assert_eq!(menu.toggle(), Some(FlyoutToggled { open: false }));
        assert!(!menu.is_open());
    }

    #[test]
    fn test_disabled_ignores_toggle() {
        let mut menu = menu().disabled(true).build().unwrap();
        assert_eq!(menu.toggle(), None);
        assert!(!menu.is_open());
        assert!(!Widget::is_interactive(&menu));
    }

    #[test]
    fn test_cancel_closes_and_calls_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let mut menu = FlyoutMenu::builder()
            .default_open(true)
            .transactional(true)
            .on_cancel(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .on_apply(|| {})
            .build()
            .unwrap();

        assert_eq!(menu.cancel(), Some(FlyoutCancelled));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(!menu.is_open());
        assert_eq!(menu.cancel(), None);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_apply_unavailable_without_default_footer() {
        let mut menu = menu().default_open(true).build().unwrap();
        assert_eq!(menu.apply(), None);
        assert!(menu.is_open());

        let mut custom = menu_with_custom_footer();
        assert_eq!(custom.apply(), None);
        assert!(custom.is_open());
    }

    fn menu_with_custom_footer() -> FlyoutMenu {
        menu()
            .default_open(true)
            .custom_footer(Text::new("Custom footer"))
            .build()
            .unwrap()
    }

    #[test]
    fn test_controlled_apply_diverges() {
        let mut menu = menu()
            .controlled(|| true)
            .transactional(true)
            .build()
            .unwrap();
        assert_eq!(menu.apply(), Some(FlyoutApplied));
        assert!(!menu.internal_open());
        assert!(menu.is_open());
    }

    // ===== Layout and events =====

    #[test]
    fn test_layout_places_trigger_at_origin() {
        let mut menu = menu().button_size(ButtonSize::Field).build().unwrap();
        let result = menu.layout(viewport());
        assert_eq!(result.size, Size::new(40.0, 40.0));
        assert_eq!(Widget::bounds(&menu), Rect::new(400.0, 300.0, 40.0, 40.0));
        assert_eq!(menu.panel_bounds(), None);
    }

    #[test]
    fn test_layout_applies_offset_for_top_end() {
        let mut menu = menu()
            .direction(FlyoutDirection::TopEnd)
            .default_open(true)
            .child(Text::new("Body").font_size(10.0))
            .build()
            .unwrap();
        menu.layout(viewport());

        // Body is 4 chars at 6px each and 12px tall; trigger is 48px wide.
        let offset = menu.offset();
        assert!((offset.top - 12.0).abs() < 1e-3);
        assert!((offset.left - 20.0).abs() < 1e-3);

        let panel = menu.panel_bounds().unwrap();
        let frame = menu.panel().frame_size(Size::new(24.0, 12.0));
        let anchor = Rect::new(400.0, 300.0, 48.0, 48.0);
        let origin = menu.panel().default_origin(anchor, frame);
        assert!((panel.x - (origin.x + 20.0)).abs() < 1e-3);
        assert!((panel.y - (origin.y + 12.0)).abs() < 1e-3);
    }

    #[test]
    fn test_trigger_click_toggles() {
        let mut menu = menu().build().unwrap();
        menu.layout(viewport());
        let center = Widget::bounds(&menu).center();

        let msg = click(&mut menu, center).unwrap();
        assert_eq!(msg.downcast_ref::<FlyoutToggled>(), Some(&FlyoutToggled { open: true }));
        assert!(menu.is_open());

        let msg = click(&mut menu, center).unwrap();
        assert_eq!(msg.downcast_ref::<FlyoutToggled>(), Some(&FlyoutToggled { open: false }));
        assert!(!menu.is_open());
    }

    #[test]
    fn test_footer_click_applies() {
        let applied = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&applied);
        let mut menu = FlyoutMenu::builder()
            .default_open(true)
            .transactional(true)
            .on_cancel(|| {})
            .on_apply(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .build()
            .unwrap();
        menu.layout(viewport());

        let apply_center = menu.children()[2].bounds().center();
        let msg = click(&mut menu, apply_center).unwrap();
        assert!(msg.downcast_ref::<FlyoutApplied>().is_some());
        assert_eq!(applied.load(Ordering::SeqCst), 1);
        assert!(!menu.is_open());
    }

    #[test]
    fn test_custom_footer_is_rendered() {
        let mut menu = menu_with_custom_footer();
        menu.layout(viewport());
        let mut canvas = RecordingCanvas::new();
        menu.paint(&mut canvas);
        let texts = canvas.texts();
        assert!(texts.contains(&"Custom footer".to_string()));
        assert!(!texts.contains(&"Apply".to_string()));
    }

    #[test]
    fn test_closed_menu_paints_trigger_only() {
        let mut menu = menu().transactional(true).build().unwrap();
        menu.layout(viewport());
        let mut canvas = RecordingCanvas::new();
        menu.paint(&mut canvas);
        assert_eq!(canvas.texts(), vec![DEFAULT_ICON.to_string()]);
    }

    #[test]
    fn test_open_trigger_shares_panel_background() {
        for light in [true, false] {
            let mut menu = menu().light(light).build().unwrap();
            assert_eq!(menu.is_light(), light);
            menu.layout(viewport());

            let mut closed = RecordingCanvas::new();
            menu.paint(&mut closed);
            let trigger = Widget::bounds(&menu);
            let backdrop = DrawCommand::FillRect {
                bounds: trigger,
                color: menu.panel().background(),
            };
            assert_ne!(closed.commands()[0], backdrop);

            assert!(menu.toggle().is_some());
            menu.layout(viewport());
            let mut open = RecordingCanvas::new();
            menu.paint(&mut open);
            assert_eq!(open.commands()[0], backdrop);
        }
    }

    #[test]
    fn test_keyboard_does_not_reach_footer() {
        let mut menu = menu().default_open(true).transactional(true).build().unwrap();
        menu.layout(viewport());
        let msg = menu.event(&Event::KeyUp {
            key: dashkit_core::Key::Enter,
        });
        // Trigger handles the key and closes the menu.
        assert_eq!(
            msg.and_then(|m| m.downcast_ref::<FlyoutToggled>().copied()),
            Some(FlyoutToggled { open: false })
        );
    }

    proptest! {
        #[test]
        fn prop_owned_toggle_pairs_restore_state(initial in any::<bool>(), pairs in 0usize..8) {
            let mut menu = menu().default_open(initial).build().unwrap();
            for _ in 0..pairs {
                menu.toggle();
                menu.toggle();
            }
            prop_assert_eq!(menu.is_open(), initial);
        }

        #[test]
        fn prop_controlled_toggle_never_changes_visibility(visible in any::<bool>(), n in 1usize..8) {
            let mut menu = menu().controlled(move || visible).build().unwrap();
            for _ in 0..n {
                let requested = menu.toggle().map(|t| t.open);
                prop_assert_eq!(requested, Some(!visible));
            }
            prop_assert_eq!(menu.is_open(), visible);
        }
    }
}
