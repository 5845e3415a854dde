//! Renderer draw state
//!
//! Clear color, clear alpha and pixel ratio are global to the surface. They
//! are recomputed from props and written every frame; nothing else writes
//! them.
//!
//! The pixel ratio never resizes the surface. Vulkan on X11 and Win32
//! requires the swapchain extent to equal the window's physical size, so
//! the surface always tracks the window and the capped ratio is reported
//! alongside it.

use meshgrad_core::{Color, MeshGradientProps};

/// Default cap on the device pixel ratio
pub const DEFAULT_MAX_PIXEL_RATIO: f32 = 2.0;

/// Per-frame renderer settings derived from props
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawState {
    /// Linear clear color
    pub clear_color: Color,
    /// Clear alpha, clamped to 0..1
    pub opacity: f32,
    /// Display scale after the cap
    pub pixel_ratio: f32,
}

impl DrawState {
    /// Derive the draw state for the current props and display scale
    pub fn from_props(props: &MeshGradientProps, scale_factor: f64, max_pixel_ratio: f32) -> Self {
        Self {
            clear_color: props.background(),
            opacity: props.background_opacity.clamp(0.0, 1.0),
            pixel_ratio: pixel_ratio(scale_factor, max_pixel_ratio),
        }
    }

    /// Clear color for a render pass
    ///
    /// With a premultiplied-alpha surface the color channels are scaled by
    /// the opacity.
    pub fn wgpu_clear_color(&self, premultiplied: bool) -> wgpu::Color {
        let alpha = self.opacity as f64;
        let scale = if premultiplied { alpha } else { 1.0 };
        wgpu::Color {
            r: self.clear_color.r as f64 * scale,
            g: self.clear_color.g as f64 * scale,
            b: self.clear_color.b as f64 * scale,
            a: alpha,
        }
    }
}

/// `min(scale_factor, max)`, never below a tiny positive ratio
pub fn pixel_ratio(scale_factor: f64, max_pixel_ratio: f32) -> f32 {
    let scale = if scale_factor.is_finite() && scale_factor > 0.0 {
        scale_factor as f32
    } else {
        1.0
    };
    scale.min(max_pixel_ratio).max(0.1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_ratio_capped() {
        assert_eq!(pixel_ratio(1.0, 2.0), 1.0);
        assert_eq!(pixel_ratio(1.5, 2.0), 1.5);
        assert_eq!(pixel_ratio(3.0, 2.0), 2.0);
        assert_eq!(pixel_ratio(f64::NAN, 2.0), 1.0);
    }

    #[test]
    fn test_from_props_defaults() {
        let state = DrawState::from_props(&MeshGradientProps::default(), 1.0, 2.0);
        assert_eq!(state.clear_color, Color::WHITE);
        assert_eq!(state.opacity, 1.0);
        assert_eq!(state.pixel_ratio, 1.0);
    }

    #[test]
    fn test_opacity_clamped() {
        let props = MeshGradientProps::default().with_background_opacity(1.5);
        assert_eq!(DrawState::from_props(&props, 1.0, 2.0).opacity, 1.0);
    }

    #[test]
    fn test_clear_color_premultiplied() {
        let props = MeshGradientProps::default()
            .with_background_color("#FFFFFF")
            .with_background_opacity(0.8);
        let state = DrawState::from_props(&props, 1.0, 2.0);

        let straight = state.wgpu_clear_color(false);
        assert!((straight.r - 1.0).abs() < 1e-6);
        assert!((straight.a - 0.8).abs() < 1e-6);

        let premultiplied = state.wgpu_clear_color(true);
        assert!((premultiplied.r - 0.8).abs() < 1e-6);
        assert!((premultiplied.a - 0.8).abs() < 1e-6);
    }
}
