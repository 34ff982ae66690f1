//! Procedural primitive meshes with normals and texture coordinates.
//!
//! All generators return `(vertices, indices)` centered at the origin with
//! counter-clockwise front faces.

use std::f32::consts::{PI, TAU};

use courtside_core::Vertex;

pub type MeshData = (Vec<Vertex>, Vec<u32>);

/// Box with given half-extents. Each face maps the full [0,1] UV square.
pub fn generate_box(hx: f32, hy: f32, hz: f32) -> MeshData {
    let faces: [([[f32; 3]; 4], [f32; 3]); 6] = [
        // Front face (+Z)
        ([[-hx, -hy, hz], [hx, -hy, hz], [hx, hy, hz], [-hx, hy, hz]], [0.0, 0.0, 1.0]),
        // Back face (-Z)
        ([[hx, -hy, -hz], [-hx, -hy, -hz], [-hx, hy, -hz], [hx, hy, -hz]], [0.0, 0.0, -1.0]),
        // Top face (+Y)
        ([[-hx, hy, hz], [hx, hy, hz], [hx, hy, -hz], [-hx, hy, -hz]], [0.0, 1.0, 0.0]),
        // Bottom face (-Y)
        ([[-hx, -hy, -hz], [hx, -hy, -hz], [hx, -hy, hz], [-hx, -hy, hz]], [0.0, -1.0, 0.0]),
        // Right face (+X)
        ([[hx, -hy, hz], [hx, -hy, -hz], [hx, hy, -hz], [hx, hy, hz]], [1.0, 0.0, 0.0]),
        // Left face (-X)
        ([[-hx, -hy, -hz], [-hx, -hy, hz], [-hx, hy, hz], [-hx, hy, -hz]], [-1.0, 0.0, 0.0]),
    ];
    // image rows run top to bottom
    let uvs = [[0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]];

    let mut vertices = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);
    for (corners, normal) in faces.iter() {
        let base = vertices.len() as u32;
        for (p, uv) in corners.iter().zip(uvs.iter()) {
            vertices.push(Vertex::new(*p, *normal, *uv));
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    (vertices, indices)
}

/// Horizontal quad at y = 0 facing +Y. UVs repeat `uv_repeat` times across each axis.
pub fn generate_plane(hx: f32, hz: f32, uv_repeat: f32) -> MeshData {
    let n = [0.0, 1.0, 0.0];
    let vertices = vec![
        Vertex::new([-hx, 0.0, hz], n, [0.0, uv_repeat]),
        Vertex::new([hx, 0.0, hz], n, [uv_repeat, uv_repeat]),
        Vertex::new([hx, 0.0, -hz], n, [uv_repeat, 0.0]),
        Vertex::new([-hx, 0.0, -hz], n, [0.0, 0.0]),
    ];
    (vertices, vec![0, 1, 2, 0, 2, 3])
}

/// UV sphere. `stacks` rings from pole to pole, `slices` segments around Y.
pub fn generate_sphere(radius: f32, stacks: u32, slices: u32) -> MeshData {
    let stacks = stacks.max(2);
    let slices = slices.max(3);
    let mut vertices = Vec::with_capacity(((stacks + 1) * (slices + 1)) as usize);
    let mut indices = Vec::with_capacity((stacks * slices * 6) as usize);

    for i in 0..=stacks {
        let v = i as f32 / stacks as f32;
        let (sin_t, cos_t) = (v * PI).sin_cos();
        for j in 0..=slices {
            let u = j as f32 / slices as f32;
            let (sin_p, cos_p) = (u * TAU).sin_cos();
            let n = [sin_t * cos_p, cos_t, sin_t * sin_p];
            vertices.push(Vertex::new(
                [n[0] * radius, n[1] * radius, n[2] * radius],
                n,
                [u, v],
            ));
        }
    }

    let row = slices + 1;
    for i in 0..stacks {
        for j in 0..slices {
            let a = i * row + j;
            let b = a + row;
            let c = a + 1;
            let d = b + 1;
            indices.extend_from_slice(&[a, c, b, c, d, b]);
        }
    }

    (vertices, indices)
}

/// Capped cylinder along the Y axis, from -height/2 to +height/2.
pub fn generate_cylinder(radius: f32, height: f32, segments: u32) -> MeshData {
    let segments = segments.max(3);
    let half_h = height / 2.0;
    let mut vertices = Vec::new();
    let mut indices = Vec::new();

    // Side
    for i in 0..=segments {
        let u = i as f32 / segments as f32;
        let (sin_a, cos_a) = (u * TAU).sin_cos();
        let n = [cos_a, 0.0, sin_a];
        vertices.push(Vertex::new([radius * cos_a, -half_h, radius * sin_a], n, [u, 1.0]));
        vertices.push(Vertex::new([radius * cos_a, half_h, radius * sin_a], n, [u, 0.0]));
    }
    for i in 0..segments {
        let base = i * 2;
        indices.extend_from_slice(&[base, base + 1, base + 2, base + 1, base + 3, base + 2]);
    }

    // Caps
    for (y, ny) in [(half_h, 1.0f32), (-half_h, -1.0)] {
        let center = vertices.len() as u32;
        vertices.push(Vertex::new([0.0, y, 0.0], [0.0, ny, 0.0], [0.5, 0.5]));
        for i in 0..=segments {
            let (sin_a, cos_a) = (i as f32 / segments as f32 * TAU).sin_cos();
            vertices.push(Vertex::new(
                [radius * cos_a, y, radius * sin_a],
                [0.0, ny, 0.0],
                [0.5 + 0.5 * cos_a, 0.5 + 0.5 * sin_a],
            ));
        }
        for i in 0..segments {
            if ny > 0.0 {
                indices.extend_from_slice(&[center, center + 2 + i, center + 1 + i]);
            } else {
                indices.extend_from_slice(&[center, center + 1 + i, center + 2 + i]);
            }
        }
    }

    (vertices, indices)
}

/// Torus lying in the XZ plane (axis along Y).
pub fn generate_torus(
    major_radius: f32,
    minor_radius: f32,
    major_segments: u32,
    minor_segments: u32,
) -> MeshData {
    let major_segments = major_segments.max(3);
    let minor_segments = minor_segments.max(3);
    let mut vertices = Vec::with_capacity(((major_segments + 1) * (minor_segments + 1)) as usize);
    let mut indices = Vec::with_capacity((major_segments * minor_segments * 6) as usize);

    for i in 0..=major_segments {
        let u = i as f32 / major_segments as f32;
        let (sin_p, cos_p) = (u * TAU).sin_cos();
        for j in 0..=minor_segments {
            let v = j as f32 / minor_segments as f32;
            let (sin_t, cos_t) = (v * TAU).sin_cos();
            let ring = major_radius + minor_radius * cos_t;
            vertices.push(Vertex::new(
                [ring * cos_p, minor_radius * sin_t, ring * sin_p],
                [cos_t * cos_p, sin_t, cos_t * sin_p],
                [u, v],
            ));
        }
    }

    let row = minor_segments + 1;
    for i in 0..major_segments {
        for j in 0..minor_segments {
            let a = i * row + j;
            let b = a + row;
            let c = a + 1;
            let d = b + 1;
            indices.extend_from_slice(&[a, c, b, c, d, b]);
        }
    }

    (vertices, indices)
}

/// Turn a closed mesh inside out so it is visible from within (backdrops, skyboxes).
pub fn flip_inside(mesh: &mut MeshData) {
    let (vertices, indices) = mesh;
    for v in vertices.iter_mut() {
        v.normal = [-v.normal[0], -v.normal[1], -v.normal[2]];
    }
    for tri in indices.chunks_exact_mut(3) {
        tri.swap(1, 2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn check_mesh(name: &str, (vertices, indices): &MeshData) {
        assert!(!vertices.is_empty(), "{name}: no vertices");
        assert_eq!(indices.len() % 3, 0, "{name}: index count not a multiple of 3");
        for &i in indices {
            assert!((i as usize) < vertices.len(), "{name}: index {i} out of range");
        }
        for v in vertices {
            let len = Vec3::from(v.normal).length();
            assert!((len - 1.0).abs() < 1e-4, "{name}: normal length {len}");
        }
    }

    /// Count triangles whose winding agrees with the stored vertex normals.
    fn outward_fraction((vertices, indices): &MeshData) -> f32 {
        let mut agree = 0;
        let mut total = 0;
        for tri in indices.chunks_exact(3) {
            let p: Vec<Vec3> = tri.iter().map(|&i| Vec3::from(vertices[i as usize].position)).collect();
            let face = (p[1] - p[0]).cross(p[2] - p[0]);
            if face.length_squared() < 1e-12 {
                continue;
            }
            let n: Vec3 = tri
                .iter()
                .map(|&i| Vec3::from(vertices[i as usize].normal))
                .sum();
            total += 1;
            if face.dot(n) > 0.0 {
                agree += 1;
            }
        }
        agree as f32 / total as f32
    }

    #[test]
    fn test_box_counts_and_winding() {
        let mesh = generate_box(1.0, 0.5, 2.0);
        check_mesh("box", &mesh);
        assert_eq!(mesh.0.len(), 24);
        assert_eq!(mesh.1.len(), 36);
        assert_eq!(outward_fraction(&mesh), 1.0);
    }

    #[test]
    fn test_plane_faces_up() {
        let mesh = generate_plane(5.0, 5.0, 4.0);
        check_mesh("plane", &mesh);
        assert_eq!(outward_fraction(&mesh), 1.0);
        assert!(mesh.0.iter().all(|v| v.uv[0] <= 4.0 && v.uv[1] <= 4.0));
    }

    #[test]
    fn test_sphere_on_radius() {
        let mesh = generate_sphere(0.25, 12, 16);
        check_mesh("sphere", &mesh);
        for v in &mesh.0 {
            assert!((Vec3::from(v.position).length() - 0.25).abs() < 1e-5);
        }
        assert_eq!(outward_fraction(&mesh), 1.0);
    }

    #[test]
    fn test_cylinder_winding() {
        let mesh = generate_cylinder(0.1, 3.0, 16);
        check_mesh("cylinder", &mesh);
        assert_eq!(outward_fraction(&mesh), 1.0);
        let max_y = mesh.0.iter().map(|v| v.position[1]).fold(f32::MIN, f32::max);
        assert!((max_y - 1.5).abs() < 1e-6);
    }

    #[test]
    fn test_torus_extent() {
        let mesh = generate_torus(0.23, 0.02, 32, 8);
        check_mesh("torus", &mesh);
        assert_eq!(outward_fraction(&mesh), 1.0);
        for v in &mesh.0 {
            let p = Vec3::from(v.position);
            let r = (p.x * p.x + p.z * p.z).sqrt();
            assert!(r >= 0.21 - 1e-5 && r <= 0.25 + 1e-5);
            assert!(p.y.abs() <= 0.02 + 1e-6);
        }
    }

    #[test]
    fn test_flip_inside_reverses_winding() {
        let mut mesh = generate_box(10.0, 10.0, 10.0);
        flip_inside(&mut mesh);
        check_mesh("inverted box", &mesh);
        // normals and winding flipped together, so they still agree
        assert_eq!(outward_fraction(&mesh), 1.0);
        // front face now points toward the center
        let front = &mesh.0[0];
        assert_eq!(front.normal, [0.0, 0.0, -1.0]);
    }
}
