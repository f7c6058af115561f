//! YAML configuration for the flyout menu and value renderer.
//!
//! Every field is optional; missing fields take the widget defaults.
//!
//! ```
//! use dashkit_widgets::{FlyoutConfig, FlyoutDirection};
//!
//! let config = FlyoutConfig::from_yaml("direction: top-end\ntransactional: true\n").unwrap();
//! assert_eq!(config.direction, FlyoutDirection::TopEnd);
//! assert!(config.transactional);
//! assert_eq!(config.test_id, "flyout-menu");
//! ```

use crate::button::ButtonSize;
use crate::error::ConfigError;
use crate::flyout_menu::{FlyoutI18n, DEFAULT_ICON, DEFAULT_ICON_DESCRIPTION, DEFAULT_TEST_ID};
use crate::number::MAX_FRACTION_DIGITS;
use crate::positioning::FlyoutDirection;
use crate::value_renderer::CardLayout;
use log::warn;
use serde::{Deserialize, Serialize};
use serde_yaml_ng as serde_yaml;

/// Flyout menu options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlyoutConfig {
    /// Placement relative to the trigger
    pub direction: FlyoutDirection,
    /// Initial state of an uncontrolled menu
    pub default_open: bool,
    /// Ignore trigger clicks
    pub disabled: bool,
    /// Light panel background
    pub light: bool,
    /// Render the Cancel/Apply footer
    pub transactional: bool,
    /// Trigger height class
    pub button_size: ButtonSize,
    /// Footer labels
    pub i18n: FlyoutI18n,
    /// Test ID of the menu
    pub test_id: String,
    /// Glyph painted on the trigger
    pub icon: String,
    /// Accessible description of the trigger
    pub icon_description: String,
}

impl Default for FlyoutConfig {
    fn default() -> Self {
        Self {
            direction: FlyoutDirection::default(),
            default_open: false,
            disabled: false,
            light: true,
            transactional: false,
            button_size: ButtonSize::default(),
            i18n: FlyoutI18n::default(),
            test_id: DEFAULT_TEST_ID.to_string(),
            icon: DEFAULT_ICON.to_string(),
            icon_description: DEFAULT_ICON_DESCRIPTION.to_string(),
        }
    }
}

impl FlyoutConfig {
    /// Parse from a YAML document.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(yaml).map_err(|e| {
            warn!("rejected flyout config: {e}");
            ConfigError::from(e)
        })
    }

    /// Serialize to YAML.
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }
}

/// Value renderer options. The value itself is supplied at runtime.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ValueConfig {
    /// Unit shown in the title
    pub unit: Option<String>,
    /// Card layout the value sits in
    pub layout: CardLayout,
    /// Fraction digits for scaled numbers
    pub precision: usize,
    /// A secondary value shares the row
    pub has_secondary: bool,
}

impl ValueConfig {
    /// Parse from a YAML document and validate ranges.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml).map_err(|e| {
            warn!("rejected value config: {e}");
            ConfigError::from(e)
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every field is in range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.precision > MAX_FRACTION_DIGITS {
            warn!(
                "rejected value config: precision {} exceeds {MAX_FRACTION_DIGITS}",
                self.precision
            );
            return Err(ConfigError::InvalidValue {
                field: "precision".to_string(),
                message: format!("must be at most {MAX_FRACTION_DIGITS}, got {}", self.precision),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flyout_config_defaults() {
        let config = FlyoutConfig::default();
        assert_eq!(config.direction, FlyoutDirection::BottomStart);
        assert!(config.light);
        assert!(!config.transactional);
        assert!(!config.default_open);
        assert_eq!(config.button_size, ButtonSize::Regular);
        assert_eq!(config.test_id, "flyout-menu");
        assert_eq!(config.icon, "⋮");
        assert_eq!(config.icon_description, "Open and close list of options");
    }

    #[test]
    fn test_flyout_config_empty_document() {
        let config = FlyoutConfig::from_yaml("{}").unwrap();
        assert_eq!(config, FlyoutConfig::default());
    }

    #[test]
    fn test_flyout_config_full_document() {
        let yaml = r"
direction: right-end
default_open: true
disabled: true
light: false
transactional: true
button_size: field
i18n:
  cancel_button_text: Annuler
test_id: filters
icon: ☰
icon_description: Filters
";
        let config = FlyoutConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.direction, FlyoutDirection::RightEnd);
        assert!(config.default_open);
        assert!(config.disabled);
        assert!(!config.light);
        assert!(config.transactional);
        assert_eq!(config.button_size, ButtonSize::Field);
        assert_eq!(config.i18n.cancel_button_text, "Annuler");
        assert_eq!(config.i18n.apply_button_text, "Apply");
        assert_eq!(config.test_id, "filters");
        assert_eq!(config.icon, "☰");
    }

    #[test]
    fn test_flyout_config_unknown_direction() {
        let err = FlyoutConfig::from_yaml("direction: sideways").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }

    #[test]
    fn test_flyout_config_yaml_round_trip() {
        let config = FlyoutConfig {
            direction: FlyoutDirection::LeftStart,
            ..FlyoutConfig::default()
        };
        let yaml = config.to_yaml().unwrap();
        assert!(yaml.contains("left-start"));
        assert_eq!(FlyoutConfig::from_yaml(&yaml).unwrap(), config);
    }

    #[test]
    fn test_value_config_defaults() {
        let config = ValueConfig::from_yaml("{}").unwrap();
        assert_eq!(config.unit, None);
        assert_eq!(config.layout, CardLayout::Horizontal);
        assert_eq!(config.precision, 0);
        assert!(!config.has_secondary);
    }

    #[test]
    fn test_value_config_parses() {
        let config =
            ValueConfig::from_yaml("unit: kW\nlayout: vertical\nprecision: 2\nhas_secondary: true")
                .unwrap();
        assert_eq!(config.unit.as_deref(), Some("kW"));
        assert_eq!(config.layout, CardLayout::Vertical);
        assert_eq!(config.precision, 2);
        assert!(config.has_secondary);
    }

    #[test]
    fn test_value_config_rejects_large_precision() {
        let err = ValueConfig::from_yaml("precision: 101").unwrap_err();
        match err {
            ConfigError::InvalidValue { field, .. } => assert_eq!(field, "precision"),
            other => panic!("Expected InvalidValue, got {other:?}"),
        }
        assert!(ValueConfig::from_yaml("precision: 100").is_ok());
    }

    #[test]
    fn test_value_config_rejects_negative_precision() {
        assert!(matches!(
            ValueConfig::from_yaml("precision: -1"),
            Err(ConfigError::Yaml(_))
        ));
    }
}
