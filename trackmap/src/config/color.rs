//! Track stroke color.

use std::fmt;
use std::str::FromStr;

/// Error parsing a color string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorParseError {
    input: String,
}

impl fmt::Display for ColorParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid color '{}' - expected a name like 'blue' or a hex value like '#rrggbb[aa]'",
            self.input
        )
    }
}

impl std::error::Error for ColorParseError {}

/// Straight (non-premultiplied) RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TrackColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl TrackColor {
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const RED: Self = Self::rgb(255, 0, 0);
    pub const GREEN: Self = Self::rgb(0, 128, 0);
    pub const BLUE: Self = Self::rgb(0, 0, 255);

    const NAMED: [(&'static str, TrackColor); 12] = [
        ("black", Self::BLACK),
        ("white", Self::WHITE),
        ("red", Self::RED),
        ("green", Self::GREEN),
        ("blue", Self::BLUE),
        ("yellow", Self::rgb(255, 255, 0)),
        ("orange", Self::rgb(255, 165, 0)),
        ("purple", Self::rgb(128, 0, 128)),
        ("magenta", Self::rgb(255, 0, 255)),
        ("cyan", Self::rgb(0, 255, 255)),
        ("gray", Self::rgb(128, 128, 128)),
        ("grey", Self::rgb(128, 128, 128)),
    ];

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    fn parse_hex(hex: &str) -> Option<Self> {
        if !hex.is_ascii() {
            return None;
        }
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|n| n * 17);

        match hex.len() {
            3 => Some(Self::rgb(nibble(0)?, nibble(1)?, nibble(2)?)),
            6 => Some(Self::rgb(byte(0)?, byte(2)?, byte(4)?)),
            8 => Some(Self::rgba(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
            _ => None,
        }
    }
}

impl Default for TrackColor {
    fn default() -> Self {
        Self::BLUE
    }
}

impl FromStr for TrackColor {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let parsed = match trimmed.strip_prefix('#') {
            Some(hex) => Self::parse_hex(hex),
            None => {
                let lower = trimmed.to_ascii_lowercase();
                Self::NAMED
                    .iter()
                    .find(|(name, _)| *name == lower)
                    .map(|(_, color)| *color)
                    // '#' starts a comment in INI files, so bare hex is accepted too
                    .or_else(|| match trimmed.len() {
                        6 | 8 => Self::parse_hex(trimmed),
                        _ => None,
                    })
            }
        };

        parsed.ok_or_else(|| ColorParseError {
            input: s.to_string(),
        })
    }
}

impl fmt::Display for TrackColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)?;
        if self.a != 255 {
            write!(f, "{:02x}", self.a)?;
        }
        Ok(())
    }
}
