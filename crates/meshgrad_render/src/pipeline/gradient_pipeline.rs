//! Render pipeline for the mesh gradient
//!
//! One shader, two pipelines: a triangle list for the filled surface and a
//! line list over the plane's unique edges for wireframe mode. Both share the
//! bind group (uniforms + palette storage buffer) and the vertex buffer, so
//! switching mode never touches time or colors.

use wgpu::util::DeviceExt;

use meshgrad_core::{Palette, PlaneGeometry};

use super::types::{GradientUniforms, GradientVertex, PALETTE_ENTRY_SIZE};

/// Depth format used by the gradient passes
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Which of the two pipelines draws the plane
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawMode {
    Fill,
    Wireframe,
}

impl DrawMode {
    pub fn from_wireframe(wireframe: bool) -> Self {
        if wireframe {
            DrawMode::Wireframe
        } else {
            DrawMode::Fill
        }
    }

    fn topology(self) -> wgpu::PrimitiveTopology {
        match self {
            DrawMode::Fill => wgpu::PrimitiveTopology::TriangleList,
            DrawMode::Wireframe => wgpu::PrimitiveTopology::LineList,
        }
    }
}

/// GPU resources for drawing the gradient plane
pub struct GradientPipeline {
    fill_pipeline: wgpu::RenderPipeline,
    wireframe_pipeline: wgpu::RenderPipeline,
    /// Bind group layout, kept to rebuild the bind group when the palette grows
    bind_group_layout: wgpu::BindGroupLayout,
    uniform_buffer: wgpu::Buffer,
    palette_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    wireframe_index_buffer: wgpu::Buffer,
    wireframe_index_count: u32,
    depth_texture: Option<wgpu::TextureView>,
    depth_size: (u32, u32),
}

impl GradientPipeline {
    /// Create the pipelines and upload the plane geometry and palette
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        geometry: &PlaneGeometry,
        palette: &Palette,
    ) -> Self {
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Gradient Bind Group Layout"),
            entries: &[
                // Uniforms
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                // Palette (read-only storage)
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Storage { read_only: true },
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Gradient Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let shader_source = include_str!("../shaders/gradient.wgsl");
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Gradient Shader"),
            source: wgpu::ShaderSource::Wgsl(shader_source.into()),
        });

        let fill_pipeline =
            Self::create_pipeline(device, &pipeline_layout, &shader, surface_format, DrawMode::Fill);
        let wireframe_pipeline = Self::create_pipeline(
            device,
            &pipeline_layout,
            &shader,
            surface_format,
            DrawMode::Wireframe,
        );

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Gradient Uniform Buffer"),
            contents: bytemuck::bytes_of(&GradientUniforms::default()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let gpu_colors = palette.to_gpu_colors();
        let palette_buffer = Self::create_palette_buffer(device, &gpu_colors);
        let bind_group =
            Self::create_bind_group(device, &bind_group_layout, &uniform_buffer, &palette_buffer);

        let vertices: Vec<GradientVertex> = geometry.vertices().iter().map(GradientVertex::from).collect();
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Gradient Vertex Buffer"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Gradient Index Buffer"),
            contents: bytemuck::cast_slice(geometry.indices()),
            usage: wgpu::BufferUsages::INDEX,
        });
        let wireframe_index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Gradient Wireframe Index Buffer"),
            contents: bytemuck::cast_slice(geometry.wireframe_indices()),
            usage: wgpu::BufferUsages::INDEX,
        });

        log::info!(
            "Gradient plane: {} vertices, {} triangles, {} edges",
            geometry.vertex_count(),
            geometry.triangle_count(),
            geometry.edge_count()
        );

        Self {
            fill_pipeline,
            wireframe_pipeline,
            bind_group_layout,
            uniform_buffer,
            palette_buffer,
            bind_group,
            vertex_buffer,
            index_buffer,
            index_count: geometry.indices().len() as u32,
            wireframe_index_buffer,
            wireframe_index_count: geometry.wireframe_indices().len() as u32,
            depth_texture: None,
            depth_size: (0, 0),
        }
    }

    fn create_pipeline(
        device: &wgpu::Device,
        layout: &wgpu::PipelineLayout,
        shader: &wgpu::ShaderModule,
        surface_format: wgpu::TextureFormat,
        mode: DrawMode,
    ) -> wgpu::RenderPipeline {
        let label = match mode {
            DrawMode::Fill => "Gradient Fill Pipeline",
            DrawMode::Wireframe => "Gradient Wireframe Pipeline",
        };
        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(label),
            layout: Some(layout),
            vertex: wgpu::VertexState {
                module: shader,
                entry_point: Some("vs_main"),
                buffers: &[Self::vertex_buffer_layout()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: mode.topology(),
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                // Double-sided
                cull_mode: None,
                unclipped_depth: false,
                polygon_mode: wgpu::PolygonMode::Fill,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
            cache: None,
        })
    }

    fn create_palette_buffer(device: &wgpu::Device, colors: &[[f32; 4]]) -> wgpu::Buffer {
        device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Gradient Palette Buffer"),
            contents: bytemuck::cast_slice(colors),
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
        })
    }

    fn create_bind_group(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        uniform_buffer: &wgpu::Buffer,
        palette_buffer: &wgpu::Buffer,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Gradient Bind Group"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: palette_buffer.as_entire_binding(),
                },
            ],
        })
    }

    /// Get the vertex buffer layout for GradientVertex
    fn vertex_buffer_layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<GradientVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                // position: vec3<f32>
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x3,
                    offset: 0,
                    shader_location: 0,
                },
                // uv: vec2<f32>
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x2,
                    offset: 12,
                    shader_location: 1,
                },
            ],
        }
    }

    /// Update uniforms
    pub fn update_uniforms(&self, queue: &wgpu::Queue, uniforms: &GradientUniforms) {
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(uniforms));
    }

    /// Upload a new palette
    ///
    /// The storage buffer is reused while the palette fits and recreated
    /// (with a fresh bind group) when it grows.
    pub fn update_palette(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, palette: &Palette) {
        let gpu_colors = palette.to_gpu_colors();
        if needs_realloc(self.palette_buffer.size(), gpu_colors.len()) {
            self.palette_buffer = Self::create_palette_buffer(device, &gpu_colors);
            self.bind_group = Self::create_bind_group(
                device,
                &self.bind_group_layout,
                &self.uniform_buffer,
                &self.palette_buffer,
            );
            log::debug!("Palette buffer grown to {} entries", self.palette_capacity());
        } else {
            queue.write_buffer(&self.palette_buffer, 0, bytemuck::cast_slice(&gpu_colors));
        }
    }

    /// Entries the palette buffer can currently hold
    pub fn palette_capacity(&self) -> usize {
        (self.palette_buffer.size() / PALETTE_ENTRY_SIZE) as usize
    }

    /// Ensure depth texture exists and is the right size
    pub fn ensure_depth_texture(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        let width = width.max(1);
        let height = height.max(1);
        if self.depth_texture.is_none() || self.depth_size != (width, height) {
            let depth_texture = device.create_texture(&wgpu::TextureDescriptor {
                label: Some("Gradient Depth Texture"),
                size: wgpu::Extent3d {
                    width,
                    height,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: DEPTH_FORMAT,
                usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
                view_formats: &[],
            });

            self.depth_texture = Some(depth_texture.create_view(&wgpu::TextureViewDescriptor::default()));
            self.depth_size = (width, height);
        }
    }

    /// Record the plane draw into an existing pass
    ///
    /// The pass must have a color target of the pipeline's surface format and
    /// a [`DEPTH_FORMAT`] depth attachment.
    pub fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>, mode: DrawMode) {
        render_pass.set_bind_group(0, &self.bind_group, &[]);
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        match mode {
            DrawMode::Fill => {
                render_pass.set_pipeline(&self.fill_pipeline);
                render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                render_pass.draw_indexed(0..self.index_count, 0, 0..1);
            }
            DrawMode::Wireframe => {
                render_pass.set_pipeline(&self.wireframe_pipeline);
                render_pass.set_index_buffer(
                    self.wireframe_index_buffer.slice(..),
                    wgpu::IndexFormat::Uint32,
                );
                render_pass.draw_indexed(0..self.wireframe_index_count, 0, 0..1);
            }
        }
    }

    /// Clear the target and draw the plane in a pass of its own
    pub fn render(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        clear_color: wgpu::Color,
        mode: DrawMode,
    ) -> Result<(), PipelineError> {
        let depth_view = self
            .depth_texture
            .as_ref()
            .ok_or(PipelineError::MissingDepthTexture)?;

        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Gradient Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(clear_color),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        self.draw(&mut render_pass, mode);
        Ok(())
    }
}

/// Errors from recording gradient passes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    /// `render` was called before `ensure_depth_texture`
    MissingDepthTexture,
}

impl std::fmt::Display for PipelineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineError::MissingDepthTexture => {
                write!(f, "Depth texture not created; call ensure_depth_texture first")
            }
        }
    }
}

impl std::error::Error for PipelineError {}

/// Bytes needed to hold `entries` palette colors
pub fn palette_buffer_size(entries: usize) -> u64 {
    entries.max(1) as u64 * PALETTE_ENTRY_SIZE
}

/// Whether a palette buffer of `current_size` bytes is too small for `entries`
///
/// Buffers only grow; a shorter palette is written into the existing one.
pub fn needs_realloc(current_size: u64, entries: usize) -> bool {
    palette_buffer_size(entries) > current_size
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_buffer_layout_stride() {
        let layout = GradientPipeline::vertex_buffer_layout();
        assert_eq!(layout.array_stride, std::mem::size_of::<GradientVertex>() as u64);
        assert_eq!(layout.attributes.len(), 2);
    }

    #[test]
    fn test_draw_mode_from_wireframe() {
        assert_eq!(DrawMode::from_wireframe(false), DrawMode::Fill);
        assert_eq!(DrawMode::from_wireframe(true), DrawMode::Wireframe);
        assert_eq!(DrawMode::Fill.topology(), wgpu::PrimitiveTopology::TriangleList);
        assert_eq!(DrawMode::Wireframe.topology(), wgpu::PrimitiveTopology::LineList);
    }

    #[test]
    fn test_palette_buffer_size() {
        assert_eq!(palette_buffer_size(0), 16);
        assert_eq!(palette_buffer_size(5), 80);
    }

    #[test]
    fn test_palette_realloc_on_grow() {
        assert!(needs_realloc(palette_buffer_size(1), 5));
        assert!(needs_realloc(80, 6));
    }

    #[test]
    fn test_palette_reused_on_shrink_or_equal() {
        assert!(!needs_realloc(80, 2));
        assert!(!needs_realloc(80, 5));
    }

    #[test]
    fn test_empty_palette_fits_minimum_buffer() {
        assert!(!needs_realloc(palette_buffer_size(0), 0));
        assert!(!needs_realloc(palette_buffer_size(0), 1));
    }

    #[test]
    fn test_pipeline_error_display() {
        assert!(PipelineError::MissingDepthTexture
            .to_string()
            .contains("ensure_depth_texture"));
    }
}
