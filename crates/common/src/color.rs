use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Errors from parsing a colour string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ColorParseError {
    #[error("colour must start with '#': {0:?}")]
    MissingHash(String),
    #[error("colour must have 3 or 6 hex digits: {0:?}")]
    BadLength(String),
    #[error("invalid hex digit in colour: {0:?}")]
    BadDigit(String),
}

/// An RGB colour in linear space.
///
/// Constructors taking hex values or 8-bit channels treat their input as sRGB
/// and convert, so `Color::from_hex(0x2d2d2d)` is the colour a picker shows as `#2d2d2d`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const WHITE: Color = Color::linear(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::linear(0.0, 0.0, 0.0);

    pub const fn linear(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Build from a packed `0xRRGGBB` sRGB value.
    pub fn from_hex(hex: u32) -> Self {
        Self::from_srgb_u8([(hex >> 16) as u8, (hex >> 8) as u8, hex as u8])
    }

    pub fn from_srgb_u8(rgb: [u8; 3]) -> Self {
        let [r, g, b] = rgb.map(|c| srgb_to_linear(c as f32 / 255.0));
        Self { r, g, b }
    }

    pub fn to_srgb_u8(&self) -> [u8; 3] {
        [self.r, self.g, self.b].map(|c| (linear_to_srgb(c).clamp(0.0, 1.0) * 255.0).round() as u8)
    }

    pub fn to_hex(&self) -> u32 {
        let [r, g, b] = self.to_srgb_u8();
        (r as u32) << 16 | (g as u32) << 8 | b as u32
    }

    pub fn to_array(&self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06x}", self.to_hex())
    }
}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .trim()
            .strip_prefix('#')
            .ok_or_else(|| ColorParseError::MissingHash(s.to_string()))?;
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ColorParseError::BadDigit(s.to_string()));
        }
        let expanded: String = match digits.len() {
            3 => digits.chars().flat_map(|c| [c, c]).collect(),
            6 => digits.to_string(),
            _ => return Err(ColorParseError::BadLength(s.to_string())),
        };
        let hex =
            u32::from_str_radix(&expanded, 16).map_err(|_| ColorParseError::BadDigit(s.to_string()))?;
        Ok(Self::from_hex(hex))
    }
}

impl TryFrom<String> for Color {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

fn srgb_to_linear(c: f32) -> f32 {
    if c < 0.04045 {
        c * 0.077_399_38
    } else {
        (c * 0.947_867_3 + 0.052_132_7).powf(2.4)
    }
}

fn linear_to_srgb(c: f32) -> f32 {
    if c < 0.003_130_8 {
        c * 12.92
    } else {
        1.055 * c.powf(0.41666) - 0.055
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_display_keep_hex() {
        let fog: Color = "#2d2d2d".parse().unwrap();
        assert_eq!(fog.to_string(), "#2d2d2d");
        assert_eq!(fog.to_hex(), 0x2d2d2d);
        assert!(fog.r < 45.0 / 255.0, "stored value should be linear");
    }

    #[test]
    fn short_form_expands() {
        let c: Color = "#0f0".parse().unwrap();
        assert_eq!(c, Color::from_hex(0x00ff00));
        assert_eq!(c.r, 0.0);
        assert!((c.g - 1.0).abs() < 1e-5);
    }

    #[test]
    fn rejects_malformed_strings() {
        assert!(matches!("2d2d2d".parse::<Color>(), Err(ColorParseError::MissingHash(_))));
        assert!(matches!("#2d2d".parse::<Color>(), Err(ColorParseError::BadLength(_))));
        assert!(matches!("#zzzzzz".parse::<Color>(), Err(ColorParseError::BadDigit(_))));
    }

    #[test]
    fn rejects_sign_before_digits() {
        assert!(matches!("#+12345".parse::<Color>(), Err(ColorParseError::BadDigit(_))));
        assert!(matches!("#+12".parse::<Color>(), Err(ColorParseError::BadDigit(_))));
        assert!(matches!("#-12345".parse::<Color>(), Err(ColorParseError::BadDigit(_))));
    }

    #[test]
    fn serializes_as_hex_string() {
        let yaml = serde_yaml::to_string(&Color::from_hex(0x6593aa)).unwrap();
        assert!(yaml.contains("#6593aa"));
        let back: Color = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back.to_hex(), 0x6593aa);
    }
}
