//! Mesh gradient properties
//!
//! [`MeshGradientProps`] is the whole configuration surface of the widget.
//! Every optional field carries a serde default so a partially specified
//! table (or a builder that never touches a field) gets exactly the
//! documented default.

use serde::{Deserialize, Serialize};

use crate::color::{Color, ColorInput};
use crate::palette::Palette;

/// Default animation speed
pub const DEFAULT_SPEED: f32 = 0.01;
/// Default background opacity
pub const DEFAULT_BACKGROUND_OPACITY: f32 = 1.0;
/// Default background color
pub const DEFAULT_BACKGROUND_COLOR: &str = "#FFFFFF";
/// Speeds the widget is tuned for; values outside are accepted as-is
pub const EXPECTED_SPEED_RANGE: std::ops::RangeInclusive<f32> = 0.0..=0.1;

/// Configuration of a mesh gradient instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshGradientProps {
    /// Ordered palette, hex strings or packed integers
    #[serde(default)]
    pub colors: Vec<ColorInput>,
    /// Draw only the mesh edges
    #[serde(default)]
    pub wireframe: bool,
    /// Time units advanced per second of wall clock
    #[serde(default = "default_speed")]
    pub speed: f32,
    /// Clear color behind the mesh
    #[serde(default = "default_background_color")]
    pub background_color: ColorInput,
    /// Clear alpha, 0..1
    #[serde(default = "default_background_opacity")]
    pub background_opacity: f32,
}

fn default_speed() -> f32 {
    DEFAULT_SPEED
}

fn default_background_color() -> ColorInput {
    ColorInput::from(DEFAULT_BACKGROUND_COLOR)
}

fn default_background_opacity() -> f32 {
    DEFAULT_BACKGROUND_OPACITY
}

impl Default for MeshGradientProps {
    fn default() -> Self {
        Self {
            colors: Vec::new(),
            wireframe: false,
            speed: DEFAULT_SPEED,
            background_color: default_background_color(),
            background_opacity: DEFAULT_BACKGROUND_OPACITY,
        }
    }
}

impl MeshGradientProps {
    /// Props with the given palette and every other field at its default
    pub fn new<I, C>(colors: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<ColorInput>,
    {
        Self {
            colors: colors.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Replace the palette
    pub fn with_colors<I, C>(mut self, colors: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<ColorInput>,
    {
        self.colors = colors.into_iter().map(Into::into).collect();
        self
    }

    /// Set wireframe mode
    pub fn with_wireframe(mut self, wireframe: bool) -> Self {
        self.wireframe = wireframe;
        self
    }

    /// Set the animation speed
    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    /// Set the background color
    pub fn with_background_color(mut self, color: impl Into<ColorInput>) -> Self {
        self.background_color = color.into();
        self
    }

    /// Set the background opacity
    pub fn with_background_opacity(mut self, opacity: f32) -> Self {
        self.background_opacity = opacity;
        self
    }

    /// Whether speed lies in the range the shader is tuned for
    pub fn speed_in_expected_range(&self) -> bool {
        EXPECTED_SPEED_RANGE.contains(&self.speed)
    }

    /// Convert the palette to linear colors
    pub fn palette(&self) -> Palette {
        Palette::from_inputs(&self.colors)
    }

    /// Resolve the background color, white if malformed
    pub fn background(&self) -> Color {
        self.background_color.resolve_lossy()
    }

    /// Which fields differ from `previous`
    pub fn diff(&self, previous: &MeshGradientProps) -> PropsDiff {
        PropsDiff {
            colors: self.colors != previous.colors,
            wireframe: self.wireframe != previous.wireframe,
            speed: self.speed != previous.speed,
            background: self.background_color != previous.background_color
                || self.background_opacity != previous.background_opacity,
        }
    }
}

/// Fields changed between two props values
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PropsDiff {
    pub colors: bool,
    pub wireframe: bool,
    pub speed: bool,
    pub background: bool,
}

impl PropsDiff {
    /// Diff describing a freshly mounted instance: everything is new
    pub const MOUNT: PropsDiff = PropsDiff {
        colors: true,
        wireframe: true,
        speed: true,
        background: true,
    };

    /// True if any field changed
    pub fn any(&self) -> bool {
        self.colors || self.wireframe || self.speed || self.background
    }
}
