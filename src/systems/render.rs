//! GPU rendering system
//!
//! Manages GPU rendering including:
//! - Render context and surface
//! - The mesh gradient widget and its camera
//! - Frame rendering

use std::sync::Arc;
use winit::dpi::PhysicalSize;
use winit::window::Window;
use meshgrad_core::{GradientEvent, GradientHandlers, MeshGradientProps, PerspectiveCamera, PlaneGeometry, PropsDiff};
use meshgrad_render::{
    context::{ContextError, RenderContext},
    pipeline::PipelineError,
    MeshGradient,
};
use crate::config::RenderingConfig;

/// Render error types
#[derive(Debug)]
pub enum RenderError {
    /// GPU setup failed
    Context(ContextError),
    /// Surface was lost (window resized, minimized, etc.)
    SurfaceLost,
    /// GPU out of memory
    OutOfMemory,
    /// Other surface or pass error
    Other(String),
}

impl std::fmt::Display for RenderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RenderError::Context(e) => write!(f, "GPU setup failed: {}", e),
            RenderError::SurfaceLost => write!(f, "Surface lost"),
            RenderError::OutOfMemory => write!(f, "Out of memory"),
            RenderError::Other(msg) => write!(f, "Render error: {}", msg),
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RenderError::Context(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ContextError> for RenderError {
    fn from(e: ContextError) -> Self {
        RenderError::Context(e)
    }
}

impl From<PipelineError> for RenderError {
    fn from(e: PipelineError) -> Self {
        RenderError::Other(e.to_string())
    }
}

/// Manages GPU rendering
pub struct RenderSystem {
    context: RenderContext,
    gradient: MeshGradient,
    camera: PerspectiveCamera,
    render_config: RenderingConfig,
    scale_factor: f64,
}

impl RenderSystem {
    /// Create render system from window and config, mounting the gradient
    pub fn new(
        window: Arc<Window>,
        props: MeshGradientProps,
        handlers: GradientHandlers,
        camera: PerspectiveCamera,
        render_config: RenderingConfig,
        transparent: bool,
    ) -> Result<Self, RenderError> {
        let scale_factor = window.scale_factor();
        let window_size = window.inner_size();
        let context = pollster::block_on(RenderContext::with_options(
            window,
            render_config.vsync,
            transparent,
        ))?;

        let segments = render_config.plane_segments();
        let geometry = PlaneGeometry::new(1.0, 1.0, segments, segments);
        let gradient = MeshGradient::with_geometry(
            &context.device,
            context.config.format,
            &geometry,
            props,
            handlers,
        );

        let mut system = Self {
            context,
            gradient,
            camera,
            render_config,
            scale_factor,
        };
        system.resize(window_size, scale_factor);
        Ok(system)
    }

    /// Handle a window resize or scale-factor change
    ///
    /// The surface always takes the window's physical size.
    pub fn resize(&mut self, window_size: PhysicalSize<u32>, scale_factor: f64) {
        if window_size.width == 0 || window_size.height == 0 {
            return;
        }
        self.scale_factor = scale_factor;
        let draw_state = self
            .gradient
            .draw_state(scale_factor, self.render_config.max_pixel_ratio);
        self.context.resize(window_size);

        self.gradient.resize(
            &self.context.device,
            self.context.size.width,
            self.context.size.height,
        );
        self.camera
            .update_aspect(self.context.size.width, self.context.size.height);
        log::info!(
            "Resized: {}x{}, scale {:.2}, pixel ratio {:.2}",
            self.context.size.width,
            self.context.size.height,
            scale_factor,
            draw_state.pixel_ratio
        );
    }

    /// Apply new gradient props
    pub fn set_props(&mut self, props: MeshGradientProps) -> PropsDiff {
        self.gradient
            .set_props(&self.context.device, &self.context.queue, props)
    }

    /// Advance the animation by `dt` seconds
    pub fn update(&mut self, dt: f32) -> f64 {
        self.gradient.frame(dt)
    }

    /// Forward a pointer event to the gradient's handlers
    pub fn dispatch(&mut self, event: &GradientEvent) -> bool {
        self.gradient.dispatch(event)
    }

    /// Render a single frame
    pub fn render_frame(&mut self) -> Result<(), RenderError> {
        self.gradient
            .prepare(&self.context.queue, self.camera.view_projection());

        // Draw state is global to the surface and rewritten every frame
        let draw_state = self
            .gradient
            .draw_state(self.scale_factor, self.render_config.max_pixel_ratio);
        let clear_color = draw_state.wgpu_clear_color(self.context.premultiplied_alpha());

        // Get surface texture
        let output = match self.context.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost) => return Err(RenderError::SurfaceLost),
            Err(wgpu::SurfaceError::OutOfMemory) => return Err(RenderError::OutOfMemory),
            Err(e) => return Err(RenderError::Other(format!("{:?}", e))),
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .context
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        self.gradient.render(&mut encoder, &view, clear_color)?;

        // Submit
        self.context.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }

    /// Reconfigure the surface at its current size after it was lost
    pub fn recover_surface(&mut self) {
        let size = self.context.size;
        self.context.resize(size);
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    pub fn props(&self) -> &MeshGradientProps {
        self.gradient.props()
    }

    pub fn time(&self) -> f64 {
        self.gradient.time()
    }

    /// Get current surface size
    pub fn size(&self) -> (u32, u32) {
        (self.context.size.width, self.context.size.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_error_display() {
        assert_eq!(format!("{}", RenderError::SurfaceLost), "Surface lost");
        assert_eq!(format!("{}", RenderError::OutOfMemory), "Out of memory");
        assert_eq!(
            format!("{}", RenderError::Other("test".to_string())),
            "Render error: test"
        );
        assert_eq!(
            format!("{}", RenderError::Context(ContextError::NoAdapter)),
            "GPU setup failed: No compatible GPU adapter found"
        );
    }

    #[test]
    fn test_pipeline_error_converts() {
        let err = RenderError::from(PipelineError::MissingDepthTexture);
        assert!(matches!(err, RenderError::Other(_)));
    }
}
