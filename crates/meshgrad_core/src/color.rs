//! Color values and parsing
//!
//! Callers hand the widget colors as strings (`"#6EC3F4"`, `"rgb(110, 195, 244)"`,
//! `"navy"`) or as packed `0xRRGGBB` integers. Internally every color is stored
//! in linear space, which is what the shader blends in; the sRGB surface
//! encodes on write.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A linear-space RGB color
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const WHITE: Color = Color { r: 1.0, g: 1.0, b: 1.0 };
    pub const BLACK: Color = Color { r: 0.0, g: 0.0, b: 0.0 };

    /// Create a color from linear components
    pub const fn linear(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Create a color from sRGB components in 0..1
    pub fn from_srgb(r: f32, g: f32, b: f32) -> Self {
        Self {
            r: srgb_to_linear(r),
            g: srgb_to_linear(g),
            b: srgb_to_linear(b),
        }
    }

    /// Create a color from a packed sRGB `0xRRGGBB` value
    ///
    /// Bits above the low 24 are ignored.
    pub fn from_hex(hex: u32) -> Self {
        let r = ((hex >> 16) & 0xFF) as f32 / 255.0;
        let g = ((hex >> 8) & 0xFF) as f32 / 255.0;
        let b = (hex & 0xFF) as f32 / 255.0;
        Self::from_srgb(r, g, b)
    }

    /// Convert back to sRGB components in 0..1
    pub fn to_srgb(&self) -> [f32; 3] {
        [
            linear_to_srgb(self.r),
            linear_to_srgb(self.g),
            linear_to_srgb(self.b),
        ]
    }

    /// Packed sRGB value, rounded to the nearest 8-bit channel
    pub fn to_hex(&self) -> u32 {
        let [r, g, b] = self.to_srgb();
        let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u32;
        (channel(r) << 16) | (channel(g) << 8) | channel(b)
    }

    /// Linear RGBA array for GPU upload
    pub fn to_array(&self, alpha: f32) -> [f32; 4] {
        [self.r, self.g, self.b, alpha]
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::WHITE
    }
}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim();
        if input.is_empty() {
            return Err(ColorParseError::Empty);
        }

        if let Some(hex) = input.strip_prefix('#') {
            return parse_hex_digits(hex, input);
        }
        if let Some(hex) = input
            .strip_prefix("0x")
            .or_else(|| input.strip_prefix("0X"))
        {
            return parse_hex_digits(hex, input);
        }

        let lower = input.to_ascii_lowercase();
        if let Some(args) = functional_args(&lower, "rgb") {
            return parse_rgb(&args, input);
        }
        if let Some(args) = functional_args(&lower, "hsl") {
            return parse_hsl(&args, input);
        }

        named_color(&lower)
            .map(Color::from_hex)
            .ok_or_else(|| ColorParseError::UnknownName(input.to_string()))
    }
}

/// Error produced when a color string cannot be understood
#[derive(Debug, Clone, PartialEq)]
pub enum ColorParseError {
    /// Empty or whitespace-only input
    Empty,
    /// Hex notation with bad digits or a length other than 3 or 6
    InvalidHex(String),
    /// `rgb(...)` / `hsl(...)` with the wrong arity or bad numbers
    InvalidFunction(String),
    /// Not a hex value, function, or known color name
    UnknownName(String),
}

impl fmt::Display for ColorParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorParseError::Empty => write!(f, "Empty color string"),
            ColorParseError::InvalidHex(s) => write!(f, "Invalid hex color: {}", s),
            ColorParseError::InvalidFunction(s) => write!(f, "Invalid color function: {}", s),
            ColorParseError::UnknownName(s) => write!(f, "Unknown color: {}", s),
        }
    }
}

impl std::error::Error for ColorParseError {}

/// A color as supplied by the caller, before conversion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColorInput {
    /// Packed `0xRRGGBB`
    Numeric(u32),
    /// Hex string, `rgb()`/`hsl()` function, or color name
    Css(String),
}

impl ColorInput {
    /// Convert to a linear color
    pub fn resolve(&self) -> Result<Color, ColorParseError> {
        match self {
            ColorInput::Numeric(hex) => Ok(Color::from_hex(*hex)),
            ColorInput::Css(s) => s.parse(),
        }
    }

    /// Convert to a linear color, falling back to white on bad input
    ///
    /// Malformed colors are never reported to the caller; they render white.
    pub fn resolve_lossy(&self) -> Color {
        self.resolve().unwrap_or_else(|e| {
            log::warn!("{}; rendering white instead", e);
            Color::WHITE
        })
    }
}

impl From<&str> for ColorInput {
    fn from(s: &str) -> Self {
        ColorInput::Css(s.to_string())
    }
}

impl From<String> for ColorInput {
    fn from(s: String) -> Self {
        ColorInput::Css(s)
    }
}

impl From<u32> for ColorInput {
    fn from(hex: u32) -> Self {
        ColorInput::Numeric(hex)
    }
}

impl fmt::Display for ColorInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorInput::Numeric(hex) => write!(f, "0x{:06X}", hex),
            ColorInput::Css(s) => write!(f, "{}", s),
        }
    }
}

fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

fn linear_to_srgb(c: f32) -> f32 {
    if c <= 0.003_130_8 {
        c * 12.92
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

fn parse_hex_digits(digits: &str, original: &str) -> Result<Color, ColorParseError> {
    let invalid = || ColorParseError::InvalidHex(original.to_string());
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid());
    }
    match digits.len() {
        3 => {
            // #rgb expands each nibble: #abc -> #aabbcc
            let short = u32::from_str_radix(digits, 16).map_err(|_| invalid())?;
            let r = (short >> 8) & 0xF;
            let g = (short >> 4) & 0xF;
            let b = short & 0xF;
            Ok(Color::from_hex((r * 0x11) << 16 | (g * 0x11) << 8 | (b * 0x11)))
        }
        6 => {
            let hex = u32::from_str_radix(digits, 16).map_err(|_| invalid())?;
            Ok(Color::from_hex(hex))
        }
        _ => Err(invalid()),
    }
}

/// Split `name(a, b, c)` or `namea(a, b, c, d)` into its arguments
fn functional_args(lower: &str, name: &str) -> Option<Vec<String>> {
    let rest = lower.strip_prefix(name)?;
    // rgba()/hsla() share the parser; alpha is dropped
    let rest = rest.strip_prefix('a').unwrap_or(rest);
    let inner = rest.trim().strip_prefix('(')?.strip_suffix(')')?;
    Some(
        inner
            .split(|c: char| c == ',' || c == '/' || c.is_whitespace())
            .filter(|part| !part.is_empty())
            .map(str::to_string)
            .collect(),
    )
}

fn parse_rgb(args: &[String], original: &str) -> Result<Color, ColorParseError> {
    let invalid = || ColorParseError::InvalidFunction(original.to_string());
    if args.len() != 3 && args.len() != 4 {
        return Err(invalid());
    }
    let mut channels = [0.0f32; 3];
    for (slot, arg) in channels.iter_mut().zip(args) {
        *slot = if let Some(pct) = arg.strip_suffix('%') {
            pct.parse::<f32>().map_err(|_| invalid())? / 100.0
        } else {
            arg.parse::<f32>().map_err(|_| invalid())? / 255.0
        }
        .clamp(0.0, 1.0);
    }
    Ok(Color::from_srgb(channels[0], channels[1], channels[2]))
}

fn parse_hsl(args: &[String], original: &str) -> Result<Color, ColorParseError> {
    let invalid = || ColorParseError::InvalidFunction(original.to_string());
    if args.len() != 3 && args.len() != 4 {
        return Err(invalid());
    }
    let hue = args[0]
        .trim_end_matches("deg")
        .parse::<f32>()
        .map_err(|_| invalid())?;
    let percent = |arg: &String| -> Result<f32, ColorParseError> {
        let value = arg
            .strip_suffix('%')
            .ok_or_else(invalid)?
            .parse::<f32>()
            .map_err(|_| invalid())?;
        Ok((value / 100.0).clamp(0.0, 1.0))
    };
    let saturation = percent(&args[1])?;
    let lightness = percent(&args[2])?;

    let h = hue.rem_euclid(360.0) / 360.0;
    if saturation == 0.0 {
        return Ok(Color::from_srgb(lightness, lightness, lightness));
    }
    let q = if lightness < 0.5 {
        lightness * (1.0 + saturation)
    } else {
        lightness + saturation - lightness * saturation
    };
    let p = 2.0 * lightness - q;
    Ok(Color::from_srgb(
        hue_to_rgb(p, q, h + 1.0 / 3.0),
        hue_to_rgb(p, q, h),
        hue_to_rgb(p, q, h - 1.0 / 3.0),
    ))
}

fn hue_to_rgb(p: f32, q: f32, t: f32) -> f32 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * 6.0 * (2.0 / 3.0 - t)
    } else {
        p
    }
}

/// Full CSS named color table, looked up in lowercase
fn named_color(name: &str) -> Option<u32> {
    ::palette::named::from_str(name).map(|c| {
        (u32::from(c.red) << 16) | (u32::from(c.green) << 8) | u32::from(c.blue)
    })
}
