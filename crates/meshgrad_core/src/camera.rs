//! Perspective camera and picking rays
//!
//! The gradient plane sits at the origin in the XY plane and the camera looks
//! at it from +Z. Matrices are column-major `[[f32; 4]; 4]` with wgpu's 0..1
//! clip depth.

use serde::{Deserialize, Serialize};

/// Camera parameters as configured
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerspectiveCamera {
    /// Eye position
    pub position: [f32; 3],
    /// Point the camera looks at
    pub target: [f32; 3],
    /// Vertical field of view in degrees
    pub fov_y: f32,
    /// Near clipping plane
    pub near: f32,
    /// Far clipping plane
    pub far: f32,
    /// Aspect ratio (width / height)
    pub aspect: f32,
    /// Keep `aspect` fixed instead of following the surface
    pub manual_aspect: bool,
}

impl Default for PerspectiveCamera {
    fn default() -> Self {
        // A 1x1 plane half a unit away at 50 degrees overfills the view; with
        // the aspect pinned at 1 it stretches to cover any surface shape.
        Self {
            position: [0.0, 0.0, 0.5],
            target: [0.0, 0.0, 0.0],
            fov_y: 50.0,
            near: 0.001,
            far: 1000.0,
            aspect: 1.0,
            manual_aspect: true,
        }
    }
}

impl PerspectiveCamera {
    /// Follow the surface aspect ratio unless the aspect is manual
    pub fn update_aspect(&mut self, width: u32, height: u32) {
        if self.manual_aspect || width == 0 || height == 0 {
            return;
        }
        self.aspect = width as f32 / height as f32;
    }

    pub fn projection_matrix(&self) -> [[f32; 4]; 4] {
        perspective_matrix(self.fov_y.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn view_matrix(&self) -> [[f32; 4]; 4] {
        look_at_matrix(self.position, self.target, [0.0, 1.0, 0.0])
    }

    /// Combined projection * view
    pub fn view_projection(&self) -> [[f32; 4]; 4] {
        mat4_mul(self.projection_matrix(), self.view_matrix())
    }

    /// World-space ray through a point in normalized device coordinates
    ///
    /// `ndc_x` runs -1 (left) to 1 (right), `ndc_y` -1 (bottom) to 1 (top).
    pub fn ray_from_ndc(&self, ndc_x: f32, ndc_y: f32) -> Ray {
        let forward = normalize(sub(self.target, self.position));
        let right = normalize(cross(forward, [0.0, 1.0, 0.0]));
        let up = cross(right, forward);

        let half_height = (self.fov_y.to_radians() / 2.0).tan();
        let half_width = half_height * self.aspect;
        let x = ndc_x * half_width;
        let y = ndc_y * half_height;

        let direction = normalize([
            forward[0] + right[0] * x + up[0] * y,
            forward[1] + right[1] * x + up[1] * y,
            forward[2] + right[2] * x + up[2] * y,
        ]);

        Ray {
            origin: self.position,
            direction,
        }
    }
}

/// A picking ray with a normalized direction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: [f32; 3],
    pub direction: [f32; 3],
}

/// Where a ray meets the gradient plane
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneHit {
    /// World-space intersection point
    pub point: [f32; 3],
    /// Texture coordinate, (0, 0) at the bottom-left corner
    pub uv: [f32; 2],
    /// Distance from the ray origin
    pub distance: f32,
}

impl Ray {
    /// Intersect the `width` x `height` plane centered at the origin in z = 0
    ///
    /// Both faces are hittable. Returns `None` for misses, rays parallel to
    /// the plane, and intersections behind the origin.
    pub fn intersect_plane_z0(&self, width: f32, height: f32) -> Option<PlaneHit> {
        if self.direction[2].abs() < f32::EPSILON {
            return None;
        }
        let t = -self.origin[2] / self.direction[2];
        if t <= 0.0 {
            return None;
        }
        let x = self.origin[0] + self.direction[0] * t;
        let y = self.origin[1] + self.direction[1] * t;
        if x.abs() > width / 2.0 || y.abs() > height / 2.0 {
            return None;
        }
        Some(PlaneHit {
            point: [x, y, 0.0],
            uv: [x / width + 0.5, y / height + 0.5],
            distance: t,
        })
    }
}

/// Perspective projection with 0..1 depth (right-handed)
pub fn perspective_matrix(fov_y: f32, aspect: f32, near: f32, far: f32) -> [[f32; 4]; 4] {
    let f = 1.0 / (fov_y / 2.0).tan();
    let nf = 1.0 / (near - far);

    [
        [f / aspect, 0.0, 0.0, 0.0],
        [0.0, f, 0.0, 0.0],
        [0.0, 0.0, far * nf, -1.0],
        [0.0, 0.0, far * near * nf, 0.0],
    ]
}

/// Right-handed look-at view matrix
pub fn look_at_matrix(eye: [f32; 3], target: [f32; 3], up: [f32; 3]) -> [[f32; 4]; 4] {
    let f = normalize(sub(target, eye));
    let s = normalize(cross(f, up));
    let u = cross(s, f);

    [
        [s[0], u[0], -f[0], 0.0],
        [s[1], u[1], -f[1], 0.0],
        [s[2], u[2], -f[2], 0.0],
        [-dot(s, eye), -dot(u, eye), dot(f, eye), 1.0],
    ]
}

/// Multiply two column-major 4x4 matrices (`a * b`)
pub fn mat4_mul(a: [[f32; 4]; 4], b: [[f32; 4]; 4]) -> [[f32; 4]; 4] {
    let mut result = [[0.0f32; 4]; 4];
    for (col, out) in result.iter_mut().enumerate() {
        for (row, value) in out.iter_mut().enumerate() {
            *value = (0..4).map(|k| a[k][row] * b[col][k]).sum();
        }
    }
    result
}

/// Transform a point by a column-major matrix, returning clip coordinates
pub fn transform_point(m: [[f32; 4]; 4], p: [f32; 3]) -> [f32; 4] {
    let mut out = [0.0f32; 4];
    for (row, value) in out.iter_mut().enumerate() {
        *value = m[0][row] * p[0] + m[1][row] * p[1] + m[2][row] * p[2] + m[3][row];
    }
    out
}

fn sub(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

fn normalize(v: [f32; 3]) -> [f32; 3] {
    let len = dot(v, v).sqrt();
    if len > 0.0 {
        [v[0] / len, v[1] / len, v[2] / len]
    } else {
        v
    }
}

fn cross(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

fn dot(a: [f32; 3], b: [f32; 3]) -> f32 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    #[test]
    fn test_center_ray_hits_plane_center() {
        let camera = PerspectiveCamera::default();
        let hit = camera.ray_from_ndc(0.0, 0.0).intersect_plane_z0(1.0, 1.0).unwrap();
        assert!(hit.point[0].abs() < EPS);
        assert!(hit.point[1].abs() < EPS);
        assert!((hit.uv[0] - 0.5).abs() < EPS);
        assert!((hit.uv[1] - 0.5).abs() < EPS);
        assert!((hit.distance - 0.5).abs() < EPS);
    }

    #[test]
    fn test_default_camera_sees_only_plane() {
        // The default framing puts the plane behind every pixel
        let camera = PerspectiveCamera::default();
        for (x, y) in [(-1.0, -1.0), (1.0, 1.0), (-1.0, 1.0), (1.0, -1.0)] {
            assert!(camera.ray_from_ndc(x, y).intersect_plane_z0(1.0, 1.0).is_some());
        }
    }

    #[test]
    fn test_top_right_maps_to_upper_uv() {
        let camera = PerspectiveCamera::default();
        let hit = camera.ray_from_ndc(1.0, 1.0).intersect_plane_z0(1.0, 1.0).unwrap();
        assert!(hit.uv[0] > 0.5);
        assert!(hit.uv[1] > 0.5);
    }

    #[test]
    fn test_wide_camera_misses_edges() {
        let camera = PerspectiveCamera {
            position: [0.0, 0.0, 3.0],
            ..PerspectiveCamera::default()
        };
        assert!(camera.ray_from_ndc(1.0, 0.0).intersect_plane_z0(1.0, 1.0).is_none());
        assert!(camera.ray_from_ndc(0.0, 0.0).intersect_plane_z0(1.0, 1.0).is_some());
    }

    #[test]
    fn test_ray_behind_origin_misses() {
        let ray = Ray {
            origin: [0.0, 0.0, 0.5],
            direction: [0.0, 0.0, 1.0],
        };
        assert!(ray.intersect_plane_z0(1.0, 1.0).is_none());
    }

    #[test]
    fn test_manual_aspect_ignores_resize() {
        let mut camera = PerspectiveCamera::default();
        camera.update_aspect(1920, 1080);
        assert_eq!(camera.aspect, 1.0);

        camera.manual_aspect = false;
        camera.update_aspect(1920, 1080);
        assert!((camera.aspect - 16.0 / 9.0).abs() < EPS);
    }

    #[test]
    fn test_view_projection_maps_center_to_ndc_origin() {
        let camera = PerspectiveCamera::default();
        let clip = transform_point(camera.view_projection(), [0.0, 0.0, 0.0]);
        assert!((clip[0] / clip[3]).abs() < EPS);
        assert!((clip[1] / clip[3]).abs() < EPS);
        let depth = clip[2] / clip[3];
        assert!(depth > 0.0 && depth < 1.0);
    }

    #[test]
    fn test_projection_agrees_with_picking() {
        // A point projected to NDC should be picked back at the same spot
        let camera = PerspectiveCamera::default();
        let clip = transform_point(camera.view_projection(), [0.1, -0.15, 0.0]);
        let (nx, ny) = (clip[0] / clip[3], clip[1] / clip[3]);
        let hit = camera.ray_from_ndc(nx, ny).intersect_plane_z0(1.0, 1.0).unwrap();
        assert!((hit.point[0] - 0.1).abs() < EPS);
        assert!((hit.point[1] + 0.15).abs() < EPS);
    }

    #[test]
    fn test_mat4_mul_identity() {
        let identity = [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ];
        let proj = perspective_matrix(1.0, 1.5, 0.1, 100.0);
        assert_eq!(mat4_mul(identity, proj), proj);
        assert_eq!(mat4_mul(proj, identity), proj);
    }
}
