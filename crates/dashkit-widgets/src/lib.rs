//! Dashboard widgets for dashkit: a directional flyout menu and a value
//! renderer, plus the small controls they are built from.

pub mod button;
pub mod config;
pub mod error;
pub mod flyout_menu;
pub mod number;
pub mod positioning;
pub mod text;
pub mod tooltip;
pub mod value_renderer;

pub use button::{Button, ButtonClicked, ButtonKind, ButtonSize};
pub use config::{FlyoutConfig, ValueConfig};
pub use error::{ConfigError, FlyoutError};
pub use flyout_menu::{
    FlyoutApplied, FlyoutCallback, FlyoutCancelled, FlyoutI18n, FlyoutMenu, FlyoutMenuBuilder,
    FlyoutToggled, FooterAction, FooterMode, OpenMode, OpenSource, OpenState, DEFAULT_ICON,
    TransactionalFooter,
};
pub use number::{number_to_string, to_fixed};
pub use positioning::{
    positioning_offset, FlyoutDirection, Geometry, MenuOffset, CARET_HEIGHT, CARET_WIDTH,
};
pub use text::Text;
pub use tooltip::{Tooltip, TooltipDirection};
pub use value_renderer::{
    format_value, scale_magnitude, title_text, CardLayout, FormattedValue, RenderableValue,
    ValueRenderer,
};
