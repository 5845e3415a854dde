//! WGPU device, queue, and surface management

use std::sync::Arc;
use winit::dpi::PhysicalSize;
use winit::window::Window;

/// Errors raised while setting up the GPU
#[derive(Debug)]
pub enum ContextError {
    /// The window could not back a surface
    Surface(wgpu::CreateSurfaceError),
    /// No adapter can present to the surface
    NoAdapter,
    /// The adapter refused to create a device
    Device(wgpu::RequestDeviceError),
}

impl std::fmt::Display for ContextError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContextError::Surface(e) => write!(f, "Failed to create surface: {}", e),
            ContextError::NoAdapter => write!(f, "No compatible GPU adapter found"),
            ContextError::Device(e) => write!(f, "Failed to create device: {}", e),
        }
    }
}

impl std::error::Error for ContextError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ContextError::Surface(e) => Some(e),
            ContextError::NoAdapter => None,
            ContextError::Device(e) => Some(e),
        }
    }
}

impl From<wgpu::CreateSurfaceError> for ContextError {
    fn from(e: wgpu::CreateSurfaceError) -> Self {
        ContextError::Surface(e)
    }
}

impl From<wgpu::RequestDeviceError> for ContextError {
    fn from(e: wgpu::RequestDeviceError) -> Self {
        ContextError::Device(e)
    }
}

/// GPU state bound to one window
pub struct RenderContext {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    /// Current surface size, always the window's physical size
    pub size: PhysicalSize<u32>,
    pub window: Arc<Window>,
}

impl RenderContext {
    /// Create a context with vsync on and an opaque surface
    pub async fn new(window: Arc<Window>) -> Result<Self, ContextError> {
        Self::with_options(window, true, false).await
    }

    /// Create a context
    ///
    /// # Arguments
    /// * `vsync` - Present with `AutoVsync` instead of `AutoNoVsync`
    /// * `transparent` - Prefer a surface alpha mode that composites the
    ///   clear alpha with whatever is behind the window
    pub async fn with_options(
        window: Arc<Window>,
        vsync: bool,
        transparent: bool,
    ) -> Result<Self, ContextError> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance.create_surface(window.clone())?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(ContextError::NoAdapter)?;

        log::info!("Using adapter: {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Mesh Gradient Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        // Output is sRGB-encoded; colors stay linear until the surface write
        let format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or(ContextError::NoAdapter)?;

        let alpha_mode = choose_alpha_mode(&surface_caps.alpha_modes, transparent);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: if vsync {
                wgpu::PresentMode::AutoVsync
            } else {
                wgpu::PresentMode::AutoNoVsync
            },
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            size,
            window,
        })
    }

    /// Reconfigure the surface for a new window size
    ///
    /// Zero-sized windows (minimized) leave the surface as it was.
    pub fn resize(&mut self, window_size: PhysicalSize<u32>) {
        if let Some(extent) = surface_extent(window_size) {
            self.size = extent;
            self.config.width = extent.width;
            self.config.height = extent.height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Width over height of the surface
    pub fn aspect_ratio(&self) -> f32 {
        self.size.width as f32 / self.size.height.max(1) as f32
    }

    /// Whether clear colors must be premultiplied for this surface
    pub fn premultiplied_alpha(&self) -> bool {
        self.config.alpha_mode == wgpu::CompositeAlphaMode::PreMultiplied
    }
}

/// Surface extent for a window of the given physical size
///
/// Swapchains must match the window extent exactly on some platforms, so
/// this is the window size itself, or `None` while either side is zero.
pub fn surface_extent(window_size: PhysicalSize<u32>) -> Option<PhysicalSize<u32>> {
    (window_size.width > 0 && window_size.height > 0).then_some(window_size)
}

/// Pick a composite alpha mode
///
/// Opaque surfaces take the first supported mode. Transparent ones prefer
/// premultiplied, then postmultiplied, before falling back.
pub fn choose_alpha_mode(
    supported: &[wgpu::CompositeAlphaMode],
    transparent: bool,
) -> wgpu::CompositeAlphaMode {
    if transparent {
        for preferred in [
            wgpu::CompositeAlphaMode::PreMultiplied,
            wgpu::CompositeAlphaMode::PostMultiplied,
        ] {
            if supported.contains(&preferred) {
                return preferred;
            }
        }
    }
    supported
        .first()
        .copied()
        .unwrap_or(wgpu::CompositeAlphaMode::Auto)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opaque_takes_first_mode() {
        let modes = [
            wgpu::CompositeAlphaMode::Opaque,
            wgpu::CompositeAlphaMode::PreMultiplied,
        ];
        assert_eq!(choose_alpha_mode(&modes, false), wgpu::CompositeAlphaMode::Opaque);
    }

    #[test]
    fn test_transparent_prefers_premultiplied() {
        let modes = [
            wgpu::CompositeAlphaMode::Opaque,
            wgpu::CompositeAlphaMode::PostMultiplied,
            wgpu::CompositeAlphaMode::PreMultiplied,
        ];
        assert_eq!(
            choose_alpha_mode(&modes, true),
            wgpu::CompositeAlphaMode::PreMultiplied
        );
    }

    #[test]
    fn test_transparent_falls_back() {
        let modes = [wgpu::CompositeAlphaMode::Opaque];
        assert_eq!(choose_alpha_mode(&modes, true), wgpu::CompositeAlphaMode::Opaque);
        assert_eq!(choose_alpha_mode(&[], true), wgpu::CompositeAlphaMode::Auto);
    }

    #[test]
    fn test_surface_extent_matches_window() {
        // A 3x display with the ratio capped at 2 still gets a full-size surface
        let window = PhysicalSize::new(3000, 1500);
        let draw_state = crate::DrawState::from_props(
            &meshgrad_core::MeshGradientProps::default(),
            3.0,
            2.0,
        );
        assert_eq!(draw_state.pixel_ratio, 2.0);
        assert_eq!(surface_extent(window), Some(window));
        assert_eq!(
            surface_extent(PhysicalSize::new(800, 600)),
            Some(PhysicalSize::new(800, 600))
        );
    }

    #[test]
    fn test_surface_extent_skips_minimized() {
        assert_eq!(surface_extent(PhysicalSize::new(0, 600)), None);
        assert_eq!(surface_extent(PhysicalSize::new(800, 0)), None);
    }

    #[test]
    fn test_context_error_display() {
        assert_eq!(
            format!("{}", ContextError::NoAdapter),
            "No compatible GPU adapter found"
        );
    }
}
