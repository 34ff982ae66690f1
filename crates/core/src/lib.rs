//! Courtside core types shared across crates.
//!
//! Provides the GPU vertex layout, world gravity and conversions
//! between nalgebra (ball physics) and glam (camera and renderer).
//!
//! The world is Y-up everywhere: there is no separate physics frame.

use nalgebra as na;

// Re-export key types so downstream crates don't repeat use-declarations
pub use na::Vector3;

/// Gravitational acceleration (units/s²) along world Y.
pub const GRAVITY_Y: f64 = -9.81;

/// Convert nalgebra Vector3<f64> → glam Vec3.
pub fn vec3_to_glam(v: &Vector3<f64>) -> glam::Vec3 {
    glam::Vec3::new(v.x as f32, v.y as f32, v.z as f32)
}

/// Convert glam Vec3 → nalgebra Vector3<f64>.
pub fn glam_to_vec3(v: glam::Vec3) -> Vector3<f64> {
    Vector3::new(v.x as f64, v.y as f64, v.z as f64)
}

/// GPU-uploadable vertex for textured mesh rendering.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl Vertex {
    pub fn new(position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> Self {
        Self {
            position,
            normal,
            uv,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_glam_roundtrip() {
        let v = Vector3::new(1.5, -2.0, 3.25);
        let g = vec3_to_glam(&v);
        assert_eq!(g, glam::Vec3::new(1.5, -2.0, 3.25));
        let back = glam_to_vec3(g);
        assert!((back - v).norm() < 1e-9);
    }

    #[test]
    fn test_gravity_points_down() {
        assert!(GRAVITY_Y < 0.0);
    }

    #[test]
    fn test_vertex_layout_size() {
        // position (12) + normal (12) + uv (8)
        assert_eq!(std::mem::size_of::<Vertex>(), 32);
    }
}
