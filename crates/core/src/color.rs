//! Color types for particle and connection paint.
//!
//! [`Srgb`] carries the hue (components in [0, 1], serialized as `"#rrggbb"`);
//! [`Rgba`] pairs it with a straight alpha for a single draw call.

use crate::error::PlexusError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Default accent used for every particle and connection.
pub const DEFAULT_ACCENT: &str = "#06b6d4";

/// sRGB color with components in [0, 1].
///
/// Serializes as a hex string. The hex round-trip quantizes to 8 bits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Srgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Srgb {
    /// Parses a hex color string like "#06b6d4" or "06B6D4".
    ///
    /// Returns `PlexusError::InvalidColor` if the input is not 6 hex digits.
    pub fn from_hex(hex: &str) -> Result<Srgb, PlexusError> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(PlexusError::InvalidColor(format!(
                "expected 6 hex digits, got {hex:?}"
            )));
        }
        let channel = |range: std::ops::Range<usize>, name: &str| {
            u8::from_str_radix(&hex[range], 16)
                .map(|v| v as f64 / 255.0)
                .map_err(|e| PlexusError::InvalidColor(format!("invalid {name} component: {e}")))
        };
        Ok(Srgb {
            r: channel(0..2, "red")?,
            g: channel(2..4, "green")?,
            b: channel(4..6, "blue")?,
        })
    }

    /// Converts the color to `"#rrggbb"`, quantizing each component to 8 bits.
    pub fn to_hex(self) -> String {
        let [r, g, b] = self.to_u8();
        format!("#{r:02x}{g:02x}{b:02x}")
    }

    /// Components quantized to 8 bits with rounding.
    pub fn to_u8(self) -> [u8; 3] {
        let q = |c: f64| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b)]
    }

    /// Pairs this color with an alpha, clamped to [0, 1].
    pub fn with_alpha(self, alpha: f64) -> Rgba {
        Rgba {
            color: self,
            alpha: alpha.clamp(0.0, 1.0),
        }
    }
}

impl Default for Srgb {
    /// The accent color `#06b6d4`.
    fn default() -> Self {
        Srgb {
            r: 6.0 / 255.0,
            g: 182.0 / 255.0,
            b: 212.0 / 255.0,
        }
    }
}

impl Serialize for Srgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Srgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Srgb::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// A color with straight (non-premultiplied) alpha.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub color: Srgb,
    pub alpha: f64,
}

impl Rgba {
    /// CSS form accepted by canvas 2D `fillStyle`/`strokeStyle`.
    pub fn to_css(self) -> String {
        let [r, g, b] = self.color.to_u8();
        format!("rgba({r}, {g}, {b}, {})", self.alpha)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_hex_parses_accent() {
        let c = Srgb::from_hex(DEFAULT_ACCENT).unwrap();
        assert_eq!(c.to_u8(), [6, 182, 212]);
    }

    #[test]
    fn from_hex_accepts_missing_hash_and_uppercase() {
        let c = Srgb::from_hex("0C1222").unwrap();
        assert_eq!(c.to_hex(), "#0c1222");
    }

    #[test]
    fn from_hex_rejects_wrong_length() {
        assert!(matches!(
            Srgb::from_hex("#fff"),
            Err(PlexusError::InvalidColor(_))
        ));
    }

    #[test]
    fn from_hex_rejects_non_hex_digits() {
        assert!(Srgb::from_hex("#gg0000").is_err());
    }

    #[test]
    fn from_hex_rejects_multibyte_input() {
        assert!(Srgb::from_hex("ééé").is_err());
    }

    #[test]
    fn default_is_accent() {
        assert_eq!(Srgb::default().to_hex(), DEFAULT_ACCENT);
    }

    #[test]
    fn with_alpha_clamps() {
        assert_eq!(Srgb::default().with_alpha(1.5).alpha, 1.0);
        assert_eq!(Srgb::default().with_alpha(-0.1).alpha, 0.0);
    }

    #[test]
    fn to_css_matches_canvas_syntax() {
        let css = Srgb::default().with_alpha(0.5).to_css();
        assert_eq!(css, "rgba(6, 182, 212, 0.5)");
    }

    #[test]
    fn serde_uses_hex_string() {
        let json = serde_json::to_string(&Srgb::default()).unwrap();
        assert_eq!(json, "\"#06b6d4\"");
        let back: Srgb = serde_json::from_str(&json).unwrap();
        assert_eq!(back.to_u8(), [6, 182, 212]);
    }

    #[test]
    fn serde_rejects_bad_hex() {
        assert!(serde_json::from_str::<Srgb>("\"nope\"").is_err());
    }
}
