//! Accent color schemes.

use rand::seq::SliceRandom;
use rand::Rng;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ColorError {
    #[error("Unknown color scheme '{0}'")]
    UnknownScheme(String),
}

/// 8-bit sRGB color
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Pair of accent colors held for the lifetime of a loaded file
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColorScheme {
    pub primary: Rgb,
    pub secondary: Rgb,
    pub name: &'static str,
}

/// Built-in schemes, one is picked at random per file
pub const COLOR_SCHEMES: [ColorScheme; 4] = [
    ColorScheme {
        primary: Rgb::new(0xFF, 0x6B, 0x35),
        secondary: Rgb::new(0xF7, 0x93, 0x1E),
        name: "Sunset",
    },
    ColorScheme {
        primary: Rgb::new(0x4E, 0xCD, 0xC4),
        secondary: Rgb::new(0xC7, 0xF0, 0xDB),
        name: "Mint",
    },
    ColorScheme {
        primary: Rgb::new(0xFF, 0x6B, 0x9D),
        secondary: Rgb::new(0xC3, 0xB1, 0xE1),
        name: "Candy",
    },
    ColorScheme {
        primary: Rgb::new(0x95, 0xE1, 0xD3),
        secondary: Rgb::new(0x9B, 0x59, 0xB6),
        name: "Aurora",
    },
];

impl Default for ColorScheme {
    fn default() -> Self {
        COLOR_SCHEMES[0]
    }
}

impl ColorScheme {
    /// Look up a built-in scheme by name (case-insensitive)
    pub fn by_name(name: &str) -> Result<Self, ColorError> {
        COLOR_SCHEMES
            .iter()
            .find(|scheme| scheme.name.eq_ignore_ascii_case(name))
            .copied()
            .ok_or_else(|| ColorError::UnknownScheme(name.to_string()))
    }

    /// Pick a built-in scheme at random
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        COLOR_SCHEMES.choose(rng).copied().unwrap_or_default()
    }
}
