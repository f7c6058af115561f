//! Flyout placement: compass directions and the panel offset math.
//!
//! The floating panel only knows four coarse edges. Eight-way placement is
//! achieved by shifting the panel's default anchor for the coarse edge so
//! that its start or end edge lines up with the trigger instead of its
//! center. [`positioning_offset`] computes that shift from a [`Geometry`]
//! snapshot and nothing else, so it can be tested without a widget tree.

use crate::tooltip::TooltipDirection;
use dashkit_core::{Rect, Size};
use serde::{Deserialize, Serialize};

/// Width of the panel caret in pixels.
pub const CARET_WIDTH: f32 = 16.0;

/// Height of the panel caret in pixels.
pub const CARET_HEIGHT: f32 = 12.0;

/// Where the flyout panel opens, relative to its trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FlyoutDirection {
    /// Below the trigger, aligned to its start edge
    #[default]
    BottomStart,
    /// Below the trigger, aligned to its end edge
    BottomEnd,
    /// Above the trigger, aligned to its start edge
    TopStart,
    /// Above the trigger, aligned to its end edge
    TopEnd,
    /// Left of the trigger, aligned to its top
    LeftStart,
    /// Left of the trigger, aligned to its bottom
    LeftEnd,
    /// Right of the trigger, aligned to its top
    RightStart,
    /// Right of the trigger, aligned to its bottom
    RightEnd,
}

impl FlyoutDirection {
    /// Every direction, in declaration order.
    pub const ALL: [Self; 8] = [
        Self::BottomStart,
        Self::BottomEnd,
        Self::TopStart,
        Self::TopEnd,
        Self::LeftStart,
        Self::LeftEnd,
        Self::RightStart,
        Self::RightEnd,
    ];

    /// The coarse edge the floating panel is placed on.
    #[must_use]
    pub const fn coarse_edge(self) -> TooltipDirection {
        match self {
            Self::TopStart | Self::TopEnd => TooltipDirection::Top,
            Self::RightStart | Self::RightEnd => TooltipDirection::Right,
            Self::LeftStart | Self::LeftEnd => TooltipDirection::Left,
            Self::BottomStart | Self::BottomEnd => TooltipDirection::Bottom,
        }
    }
}

/// Measurement snapshot taken on a single positioning pass.
///
/// Missing or non-finite measurements are stored as zero.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Geometry {
    /// Width of the trigger element
    pub button_width: f32,
    /// Width of the panel body
    pub tooltip_width: f32,
    /// Height of the panel body
    pub tooltip_height: f32,
}

impl Geometry {
    /// Create a snapshot from raw measurements.
    #[must_use]
    pub fn new(button_width: f32, tooltip_width: f32, tooltip_height: f32) -> Self {
        Self {
            button_width: sanitize(button_width),
            tooltip_width: sanitize(tooltip_width),
            tooltip_height: sanitize(tooltip_height),
        }
    }

    /// Create a snapshot from optional trigger bounds and panel size.
    ///
    /// `None` means the element is not mounted or not yet measured.
    #[must_use]
    pub fn measured(trigger: Option<Rect>, panel: Option<Size>) -> Self {
        let panel = panel.unwrap_or(Size::ZERO);
        Self::new(
            trigger.map_or(0.0, |r| r.width),
            panel.width,
            panel.height,
        )
    }
}

fn sanitize(v: f32) -> f32 {
    if v.is_finite() {
        v
    } else {
        0.0
    }
}

/// Pixel shift added to the panel's default anchor point.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MenuOffset {
    /// Vertical shift, positive moves down
    pub top: f32,
    /// Horizontal shift, positive moves right
    pub left: f32,
}

impl MenuOffset {
    /// Create a new offset.
    #[must_use]
    pub const fn new(top: f32, left: f32) -> Self {
        Self { top, left }
    }
}

/// Compute the anchor correction for `direction` from live `geometry`.
#[must_use]
pub fn positioning_offset(direction: FlyoutDirection, geometry: Geometry) -> MenuOffset {
    let Geometry {
        button_width,
        tooltip_width,
        tooltip_height,
    } = geometry;
    let start_left = CARET_WIDTH + tooltip_width / 2.0;
    let end_left = -tooltip_width / 2.0 - CARET_WIDTH + button_width;

    match direction {
        FlyoutDirection::BottomStart => MenuOffset::new(-CARET_HEIGHT, start_left),
        FlyoutDirection::BottomEnd => MenuOffset::new(-CARET_HEIGHT, end_left),
        FlyoutDirection::TopStart => MenuOffset::new(CARET_HEIGHT, start_left),
        FlyoutDirection::TopEnd => MenuOffset::new(CARET_HEIGHT, end_left),
        FlyoutDirection::LeftStart => MenuOffset::new(tooltip_height / 2.0 + CARET_HEIGHT, 0.0),
        FlyoutDirection::LeftEnd => {
            MenuOffset::new(-tooltip_height / 2.0 + CARET_HEIGHT + CARET_WIDTH, 0.0)
        }
        FlyoutDirection::RightStart => MenuOffset::new(tooltip_height / 2.0 + 2.0, 0.0),
        FlyoutDirection::RightEnd => MenuOffset::new(CARET_WIDTH - tooltip_height / 2.0, 0.0),
    }
}
