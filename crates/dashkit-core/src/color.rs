//! RGBA colors and the dashboard palette.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// RGBA color with values in the range [0.0, 1.0].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    /// Red component [0.0, 1.0]
    pub r: f32,
    /// Green component [0.0, 1.0]
    pub g: f32,
    /// Blue component [0.0, 1.0]
    pub b: f32,
    /// Alpha component [0.0, 1.0]
    pub a: f32,
}

impl Color {
    /// Opaque black
    pub const BLACK: Self = Self {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 1.0,
    };
    /// Opaque white
    pub const WHITE: Self = Self {
        r: 1.0,
        g: 1.0,
        b: 1.0,
        a: 1.0,
    };
    /// Fully transparent
    pub const TRANSPARENT: Self = Self {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 0.0,
    };

    /// Create a new color, clamping values to [0.0, 1.0].
    #[must_use]
    pub fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self {
            r: r.clamp(0.0, 1.0),
            g: g.clamp(0.0, 1.0),
            b: b.clamp(0.0, 1.0),
            a: a.clamp(0.0, 1.0),
        }
    }

    /// Create an opaque color from RGB values.
    #[must_use]
    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::new(r, g, b, 1.0)
    }

    /// Create a color from RGBA values.
    #[must_use]
    pub fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self::new(r, g, b, a)
    }

    /// Parse a hex color string (e.g., "#ff0000" or "ff0000").
    ///
    /// Supports 6-character RGB and 8-character RGBA formats.
    pub fn from_hex(hex: &str) -> Result<Self, ColorParseError> {
        let hex = hex.trim_start_matches('#');
        if hex.len() != 6 && hex.len() != 8 {
            return Err(ColorParseError::InvalidLength(hex.len()));
        }

        let channel = |range: std::ops::Range<usize>| -> Result<f32, ColorParseError> {
            let digits = hex.get(range).ok_or(ColorParseError::InvalidHex)?;
            u8::from_str_radix(digits, 16)
                .map(|v| f32::from(v) / 255.0)
                .map_err(|_| ColorParseError::InvalidHex)
        };

        let alpha = if hex.len() == 8 { channel(6..8)? } else { 1.0 };
        Ok(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?, alpha))
    }

    /// Same color with a different alpha.
    #[must_use]
    pub fn with_alpha(self, a: f32) -> Self {
        Self::new(self.r, self.g, self.b, a)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

/// Error returned by [`Color::from_hex`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ColorParseError {
    /// Wrong number of hex digits.
    #[error("expected 6 or 8 hex digits, got {0}")]
    InvalidLength(usize),
    /// A channel was not valid hexadecimal.
    #[error("invalid hex digit in color")]
    InvalidHex,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_color_new_clamps_values() {
        let c = Color::new(1.5, -0.5, 0.5, 2.0);
        assert_eq!(c.r, 1.0);
        assert_eq!(c.g, 0.0);
        assert_eq!(c.b, 0.5);
        assert_eq!(c.a, 1.0);
    }

    #[test]
    fn test_color_from_hex() {
        let c = Color::from_hex("#ff0000").unwrap();
        assert_eq!(c, Color::rgb(1.0, 0.0, 0.0));

        let c2 = Color::from_hex("0000ff").unwrap();
        assert_eq!(c2.b, 1.0);
    }

    #[test]
    fn test_color_from_hex_with_alpha() {
        let c = Color::from_hex("#ff000080").unwrap();
        assert!((c.a - 0.502).abs() < 0.01);
    }

    #[test]
    fn test_color_from_hex_invalid() {
        assert_eq!(
            Color::from_hex("#ff"),
            Err(ColorParseError::InvalidLength(2))
        );
        assert_eq!(Color::from_hex("#gg0000"), Err(ColorParseError::InvalidHex));
        assert!(Color::from_hex("invalid").is_err());
    }

    #[test]
    fn test_color_parse_error_display() {
        assert_eq!(
            ColorParseError::InvalidLength(3).to_string(),
            "expected 6 or 8 hex digits, got 3"
        );
    }

    #[test]
    fn test_color_with_alpha() {
        let c = Color::WHITE.with_alpha(0.5);
        assert_eq!(c.a, 0.5);
        assert_eq!(c.r, 1.0);
    }

    proptest! {
        #[test]
        fn prop_color_clamps_to_valid_range(r in -1.0f32..2.0, g in -1.0f32..2.0, b in -1.0f32..2.0, a in -1.0f32..2.0) {
            let c = Color::new(r, g, b, a);
            prop_assert!((0.0..=1.0).contains(&c.r));
            prop_assert!((0.0..=1.0).contains(&c.g));
            prop_assert!((0.0..=1.0).contains(&c.b));
            prop_assert!((0.0..=1.0).contains(&c.a));
        }
    }
}
