//! Tessellated plane geometry
//!
//! The gradient is a flat rectangle split into a dense grid so the vertex
//! shader has enough vertices to displace smoothly. Rows run top to bottom;
//! each cell is two triangles sharing the b-d diagonal.

/// Default plane segments per axis
pub const DEFAULT_SEGMENTS: u32 = 500;

/// Most segments per axis a plane is built with
///
/// At 2048 the largest index buffer is about 100 MiB, under the 256 MiB
/// default `max_buffer_size` of wgpu devices.
pub const MAX_SEGMENTS: u32 = 2048;

/// Clamp a per-axis segment count to `1..=MAX_SEGMENTS`
pub fn clamp_segments(segments: u32) -> u32 {
    let clamped = segments.clamp(1, MAX_SEGMENTS);
    if clamped != segments {
        log::warn!(
            "Plane segments {} out of range, using {}",
            segments,
            clamped
        );
    }
    clamped
}

/// A plane vertex before GPU conversion
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneVertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
}

/// Grid plane in z = 0, centered at the origin
#[derive(Debug, Clone)]
pub struct PlaneGeometry {
    width: f32,
    height: f32,
    width_segments: u32,
    height_segments: u32,
    vertices: Vec<PlaneVertex>,
    indices: Vec<u32>,
    wireframe_indices: Vec<u32>,
}

impl PlaneGeometry {
    /// Build a plane
    ///
    /// # Arguments
    /// * `width`, `height` - Plane extent
    /// * `width_segments`, `height_segments` - Cells per axis, clamped to
    ///   `1..=MAX_SEGMENTS`
    pub fn new(width: f32, height: f32, width_segments: u32, height_segments: u32) -> Self {
        let grid_x = clamp_segments(width_segments);
        let grid_y = clamp_segments(height_segments);
        let grid_x1 = grid_x + 1;
        let grid_y1 = grid_y + 1;

        // Capacities in usize; the clamp keeps every vertex index within u32
        let (cells_x, cells_y) = (grid_x as usize, grid_y as usize);
        let vertex_count = (cells_x + 1) * (cells_y + 1);
        let index_count = cells_x * cells_y * 6;
        let edge_count = cells_x * (cells_y + 1) + (cells_x + 1) * cells_y + cells_x * cells_y;

        let segment_width = width / grid_x as f32;
        let segment_height = height / grid_y as f32;
        let half_width = width / 2.0;
        let half_height = height / 2.0;

        let mut vertices = Vec::with_capacity(vertex_count);
        for iy in 0..grid_y1 {
            let y = iy as f32 * segment_height - half_height;
            for ix in 0..grid_x1 {
                let x = ix as f32 * segment_width - half_width;
                vertices.push(PlaneVertex {
                    position: [x, -y, 0.0],
                    uv: [ix as f32 / grid_x as f32, 1.0 - iy as f32 / grid_y as f32],
                });
            }
        }

        let mut indices = Vec::with_capacity(index_count);
        let mut wireframe_indices = Vec::with_capacity(edge_count * 2);

        for iy in 0..grid_y {
            for ix in 0..grid_x {
                let a = ix + grid_x1 * iy;
                let b = ix + grid_x1 * (iy + 1);
                let c = (ix + 1) + grid_x1 * (iy + 1);
                let d = (ix + 1) + grid_x1 * iy;

                indices.extend_from_slice(&[a, b, d, b, c, d]);
                // Top and left edges plus the shared diagonal; the last row
                // and column close the grid below.
                wireframe_indices.extend_from_slice(&[a, d, a, b, b, d]);
            }
        }
        for ix in 0..grid_x {
            let b = ix + grid_x1 * grid_y;
            wireframe_indices.extend_from_slice(&[b, b + 1]);
        }
        for iy in 0..grid_y {
            let d = grid_x + grid_x1 * iy;
            wireframe_indices.extend_from_slice(&[d, d + grid_x1]);
        }

        Self {
            width,
            height,
            width_segments: grid_x,
            height_segments: grid_y,
            vertices,
            indices,
            wireframe_indices,
        }
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.height
    }

    #[inline]
    pub fn segments(&self) -> (u32, u32) {
        (self.width_segments, self.height_segments)
    }

    pub fn vertices(&self) -> &[PlaneVertex] {
        &self.vertices
    }

    /// Triangle list indices
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Line list indices, each edge once
    pub fn wireframe_indices(&self) -> &[u32] {
        &self.wireframe_indices
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    #[inline]
    pub fn edge_count(&self) -> usize {
        self.wireframe_indices.len() / 2
    }
}

impl Default for PlaneGeometry {
    fn default() -> Self {
        Self::new(1.0, 1.0, DEFAULT_SEGMENTS, DEFAULT_SEGMENTS)
    }
}
