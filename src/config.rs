//! Application configuration
//!
//! Configuration is loaded from multiple sources with the following priority (lowest to highest):
//! 1. `config/default.toml` (version controlled)
//! 2. `config/user.toml` (gitignored, user overrides)
//! 3. Environment variables (`MG_SECTION__KEY`)

use figment::{Figment, providers::{Format, Toml, Env}};
use serde::{Serialize, Deserialize};
use std::path::Path;
use std::time::Duration;

use meshgrad_core::{ColorInput, MeshGradientProps, PerspectiveCamera};
use meshgrad_core::clock::DEFAULT_MAX_FRAME_DELTA;
use meshgrad_core::geometry::{clamp_segments, DEFAULT_SEGMENTS};
use meshgrad_input::{DEFAULT_DOUBLE_CLICK_DISTANCE, DEFAULT_DOUBLE_CLICK_MS};
use meshgrad_render::DEFAULT_MAX_PIXEL_RATIO;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Window configuration
    #[serde(default)]
    pub window: WindowConfig,
    /// Initial gradient props
    #[serde(default = "default_gradient")]
    pub gradient: MeshGradientProps,
    /// Camera configuration
    #[serde(default)]
    pub camera: CameraConfig,
    /// Rendering configuration
    #[serde(default)]
    pub rendering: RenderingConfig,
    /// Input configuration
    #[serde(default)]
    pub input: InputConfig,
    /// Demo behavior
    #[serde(default)]
    pub demo: DemoConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            gradient: default_gradient(),
            camera: CameraConfig::default(),
            rendering: RenderingConfig::default(),
            input: InputConfig::default(),
            demo: DemoConfig::default(),
        }
    }
}

/// Demo page look: dark translucent background, palette from the demo list
fn default_gradient() -> MeshGradientProps {
    MeshGradientProps::default()
        .with_background_color("#000000")
        .with_background_opacity(0.8)
}

impl AppConfig {
    /// Load configuration from default locations
    ///
    /// Priority (lowest to highest):
    /// 1. `config/default.toml`
    /// 2. `config/user.toml`
    /// 3. Environment variables (`MG_*`)
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific config directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();
        let default_path = config_dir.join("default.toml");
        let user_path = config_dir.join("user.toml");

        let mut figment = Figment::new();

        if default_path.exists() {
            figment = figment.merge(Toml::file(&default_path));
        }

        if user_path.exists() {
            figment = figment.merge(Toml::file(&user_path));
        }

        // Environment variables override everything
        // MG_WINDOW__TITLE=Test -> window.title = "Test"
        figment = figment.merge(Env::prefixed("MG_").split("__"));

        figment.extract().map_err(ConfigError::from)
    }

    /// Props the demo starts with
    ///
    /// An empty `gradient.colors` takes the first demo palette.
    pub fn initial_props(&self) -> MeshGradientProps {
        let mut props = self.gradient.clone();
        if props.colors.is_empty() {
            if let Some(palette) = self.demo.palettes.first() {
                props.colors = palette.clone();
            }
        }
        props
    }
}

/// Window configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowConfig {
    /// Window title
    pub title: String,
    /// Window width in pixels
    pub width: u32,
    /// Window height in pixels
    pub height: u32,
    /// Start in fullscreen mode
    pub fullscreen: bool,
    /// Let the background opacity show what is behind the window
    pub transparent: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Mesh Gradient".to_string(),
            width: 1280,
            height: 720,
            fullscreen: false,
            transparent: true,
        }
    }
}

/// Camera configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraConfig {
    /// Eye position [x, y, z]
    pub position: [f32; 3],
    /// Look-at target [x, y, z]
    pub target: [f32; 3],
    /// Vertical field of view in degrees
    pub fov: f32,
    /// Near clipping plane
    pub near: f32,
    /// Far clipping plane
    pub far: f32,
    /// Fixed aspect ratio; 0 follows the window
    pub aspect: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        let camera = PerspectiveCamera::default();
        Self {
            position: camera.position,
            target: camera.target,
            fov: camera.fov_y,
            near: camera.near,
            far: camera.far,
            aspect: camera.aspect,
        }
    }
}

impl CameraConfig {
    /// Build the camera this config describes
    pub fn to_camera(&self) -> PerspectiveCamera {
        let manual_aspect = self.aspect > 0.0;
        PerspectiveCamera {
            position: self.position,
            target: self.target,
            fov_y: self.fov,
            near: self.near,
            far: self.far,
            aspect: if manual_aspect { self.aspect } else { 1.0 },
            manual_aspect,
        }
    }
}

/// Rendering configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderingConfig {
    /// Plane segments along each axis
    pub segments: u32,
    /// Cap on the device pixel ratio
    pub max_pixel_ratio: f32,
    /// Longest frame delta fed to the animation, in seconds
    pub max_frame_delta: f32,
    /// Enable VSync
    pub vsync: bool,
}

impl Default for RenderingConfig {
    fn default() -> Self {
        Self {
            segments: DEFAULT_SEGMENTS,
            max_pixel_ratio: DEFAULT_MAX_PIXEL_RATIO,
            max_frame_delta: DEFAULT_MAX_FRAME_DELTA,
            vsync: true,
        }
    }
}

impl RenderingConfig {
    /// Segments per axis, clamped to what a GPU buffer can hold
    pub fn plane_segments(&self) -> u32 {
        clamp_segments(self.segments)
    }
}

/// Input configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    /// Longest gap between the clicks of a double-click, in milliseconds
    pub double_click_ms: u64,
    /// Furthest the second click may land from the first, in pixels
    pub double_click_distance: f32,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            double_click_ms: DEFAULT_DOUBLE_CLICK_MS,
            double_click_distance: DEFAULT_DOUBLE_CLICK_DISTANCE,
        }
    }
}

impl InputConfig {
    pub fn double_click_interval(&self) -> Duration {
        Duration::from_millis(self.double_click_ms)
    }
}

/// Demo configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemoConfig {
    /// Palettes cycled by clicks and the `C` key
    pub palettes: Vec<Vec<ColorInput>>,
    /// Speed change per Up/Down key press
    pub speed_step: f32,
}

impl Default for DemoConfig {
    fn default() -> Self {
        let palette = |hexes: [&str; 5]| hexes.iter().map(|h| ColorInput::from(*h)).collect();
        Self {
            palettes: vec![
                palette(["#C3E4FF", "#6EC3F4", "#EAE2FF", "#B9BEFF", "#B3B8F9"]),
                palette(["#69D2E7", "#A7DBD8", "#E0E4CC", "#F38630", "#FA6900"]),
            ],
            speed_step: 0.001,
        }
    }
}

/// Configuration error
#[derive(Debug)]
pub struct ConfigError {
    message: String,
}

impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self {
        ConfigError {
            message: e.to_string(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Configuration error: {}", self.message)
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.window.width, 1280);
        assert_eq!(config.rendering.segments, 500);
        assert_eq!(config.input.double_click_ms, 300);
        assert_eq!(config.demo.palettes.len(), 2);
        assert_eq!(config.gradient.speed, 0.01);
        assert_eq!(config.gradient.background_opacity, 0.8);
    }

    #[test]
    fn test_plane_segments_clamped() {
        let mut rendering = RenderingConfig::default();
        assert_eq!(rendering.plane_segments(), 500);
        rendering.segments = 70_000;
        assert_eq!(rendering.plane_segments(), meshgrad_core::MAX_SEGMENTS);
        rendering.segments = 0;
        assert_eq!(rendering.plane_segments(), 1);
    }

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let toml = toml::to_string(&config).unwrap();
        assert!(toml.contains("title"));
        assert!(toml.contains("background_opacity"));
        assert!(toml.contains("double_click_ms"));
    }

    #[test]
    fn test_initial_props_fall_back_to_demo_palette() {
        let config = AppConfig::default();
        let props = config.initial_props();
        assert_eq!(props.colors, config.demo.palettes[0]);
    }

    #[test]
    fn test_initial_props_keep_configured_colors() {
        let mut config = AppConfig::default();
        config.gradient.colors = vec![ColorInput::from("#FF0000")];
        assert_eq!(config.initial_props().colors.len(), 1);
    }

    #[test]
    fn test_camera_config_round_trip() {
        let camera = CameraConfig::default().to_camera();
        assert_eq!(camera, PerspectiveCamera::default());

        let follow = CameraConfig {
            aspect: 0.0,
            ..CameraConfig::default()
        };
        assert!(!follow.to_camera().manual_aspect);
    }

    #[test]
    fn test_partial_gradient_table_uses_prop_defaults() {
        let config: AppConfig = toml::from_str(
            r##"
            [gradient]
            wireframe = true
            "##,
        )
        .unwrap();
        assert!(config.gradient.wireframe);
        assert_eq!(config.gradient.speed, 0.01);
        assert_eq!(config.gradient.background_opacity, 1.0);
    }
}
