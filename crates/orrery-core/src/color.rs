//! RGB color triples and the fixed palette.

use std::{fmt, str::FromStr};

use ratatui::style::Color;
use serde::{Deserialize, Serialize};

/// An 8-bit RGB color. Serialized as a `#RRGGBB` string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Error returned when a hex color string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid hex color {0:?}: expected #rrggbb")]
pub struct ParseColorError(pub String);

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a `#rrggbb` (or `rrggbb`) string.
    pub fn from_hex(s: &str) -> Result<Self, ParseColorError> {
        let digits = s.strip_prefix('#').unwrap_or(s);
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ParseColorError(s.to_string()));
        }
        let value =
            u32::from_str_radix(digits, 16).map_err(|_| ParseColorError(s.to_string()))?;
        Ok(Self::new(
            ((value >> 16) & 0xff) as u8,
            ((value >> 8) & 0xff) as u8,
            (value & 0xff) as u8,
        ))
    }

    /// Linear interpolation from `self` toward `other`, rounding each channel.
    pub fn lerp(self, other: Rgb, f: f32) -> Rgb {
        let channel = |a: u8, b: u8| {
            let v = a as f32 + (b as f32 - a as f32) * f;
            v.round().clamp(0.0, 255.0) as u8
        };
        Rgb::new(
            channel(self.r, other.r),
            channel(self.g, other.g),
            channel(self.b, other.b),
        )
    }

    /// Channels as floats in `0.0..=1.0`.
    pub fn to_unit(self) -> [f32; 3] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        ]
    }

    /// Build a color from unit floats, clamping out-of-range channels.
    pub fn from_unit([r, g, b]: [f32; 3]) -> Rgb {
        let to_u8 = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        Rgb::new(to_u8(r), to_u8(g), to_u8(b))
    }
}

impl FromStr for Rgb {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Rgb::from_hex(s)
    }
}

impl TryFrom<String> for Rgb {
    type Error = ParseColorError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Rgb> for String {
    fn from(c: Rgb) -> Self {
        c.to_string()
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl From<Rgb> for Color {
    fn from(c: Rgb) -> Self {
        Color::Rgb(c.r, c.g, c.b)
    }
}

/// The site palette. Every drawn color comes from here.
pub mod palette {
    use super::Rgb;

    pub const RED: Rgb = Rgb::new(0xA3, 0x1F, 0x34);
    pub const GRAY: Rgb = Rgb::new(0x8A, 0x8B, 0x8C);
    pub const SILVER: Rgb = Rgb::new(0xC2, 0xC0, 0xBF);
    pub const COAL: Rgb = Rgb::new(0x22, 0x22, 0x22);
    pub const JET: Rgb = Rgb::new(0x11, 0x11, 0x11);
    pub const WHITE: Rgb = Rgb::new(0xFF, 0xFF, 0xFF);
    /// Border color used by the navigation pills.
    pub const RULE: Rgb = Rgb::new(0x2B, 0x2B, 0x2B);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hex() {
        assert_eq!(Rgb::from_hex("#A31F34"), Ok(palette::RED));
        assert_eq!(Rgb::from_hex("c2c0bf"), Ok(palette::SILVER));
        assert!(Rgb::from_hex("#A31F3").is_err());
        assert!(Rgb::from_hex("#GGGGGG").is_err());
        assert!(Rgb::from_hex("").is_err());
        // A sign is not a hex digit even though integer parsing accepts it.
        assert!(Rgb::from_hex("#+12345").is_err());
        assert!(Rgb::from_hex("-12345").is_err());
    }

    #[test]
    fn test_display_matches_hex() {
        assert_eq!(palette::RED.to_string(), "#A31F34");
        assert_eq!("#A31F34".parse::<Rgb>(), Ok(palette::RED));
    }

    #[test]
    fn test_lerp_endpoints_and_midpoint() {
        let a = Rgb::new(0, 100, 200);
        let b = Rgb::new(100, 0, 250);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        assert_eq!(a.lerp(b, 0.5), Rgb::new(50, 50, 225));
    }

    #[test]
    fn test_unit_conversion() {
        assert_eq!(Rgb::from_unit(Rgb::WHITE.to_unit()), Rgb::WHITE);
        assert_eq!(Rgb::from_unit([2.0, -1.0, 0.0]), Rgb::new(255, 0, 0));
    }
}
