//! Tessellation of 3D shapes to triangle meshes.
//!
//! All generated triangles wind counter-clockwise when seen from outside.

use super::geometry::{Mesh, Shape, ShapeKind};
use glam::Vec3;
use std::f32::consts::TAU;

/// Tessellation quality settings.
#[derive(Debug, Clone, Copy)]
pub struct TessellationOptions {
    /// Number of segments around curved surfaces.
    pub curve_segments: u32,
}

impl Default for TessellationOptions {
    fn default() -> Self {
        Self { curve_segments: 24 }
    }
}

/// Tessellate a shape to a triangle mesh in its local frame.
///
/// `deflection` controls the quality (smaller = more triangles).
pub fn tessellate(shape: &Shape, deflection: f64) -> Mesh {
    let options = TessellationOptions {
        curve_segments: ((1.0 / deflection) as u32).clamp(8, 128),
    };
    tessellate_with_options(shape, &options)
}

/// Tessellate a shape in its local frame with specific options.
pub fn tessellate_with_options(shape: &Shape, options: &TessellationOptions) -> Mesh {
    match *shape.kind() {
        ShapeKind::Box { width, height, depth } => {
            tessellate_box(width as f32, height as f32, depth as f32)
        }
        ShapeKind::Cylinder { radius, height } => {
            tessellate_cylinder(radius as f32, height as f32, options.curve_segments)
        }
    }
}

/// Tessellate a shape and move the result into model space.
pub fn tessellate_placed(shape: &Shape, options: &TessellationOptions) -> Mesh {
    let mut mesh = tessellate_with_options(shape, options);
    mesh.transform(shape.transform());
    mesh
}

/// Tessellate a box centered at origin.
fn tessellate_box(width: f32, height: f32, depth: f32) -> Mesh {
    let hx = width / 2.0;
    let hy = height / 2.0;
    let hz = depth / 2.0;

    let mut mesh = Mesh {
        vertices: Vec::with_capacity(24),
        normals: Vec::with_capacity(24),
        indices: Vec::with_capacity(36),
    };

    // 6 faces, 4 vertices each so every face keeps a flat normal
    let faces: [([[f32; 3]; 4], Vec3); 6] = [
        ([[hx, -hy, -hz], [hx, hy, -hz], [hx, hy, hz], [hx, -hy, hz]], Vec3::X),
        ([[-hx, hy, -hz], [-hx, -hy, -hz], [-hx, -hy, hz], [-hx, hy, hz]], Vec3::NEG_X),
        ([[hx, hy, -hz], [-hx, hy, -hz], [-hx, hy, hz], [hx, hy, hz]], Vec3::Y),
        ([[-hx, -hy, -hz], [hx, -hy, -hz], [hx, -hy, hz], [-hx, -hy, hz]], Vec3::NEG_Y),
        ([[-hx, -hy, hz], [hx, -hy, hz], [hx, hy, hz], [-hx, hy, hz]], Vec3::Z),
        ([[hx, -hy, -hz], [-hx, -hy, -hz], [-hx, hy, -hz], [hx, hy, -hz]], Vec3::NEG_Z),
    ];

    for (corners, normal) in faces {
        let base = mesh.vertices.len() as u32;
        for corner in corners {
            mesh.vertices.push(Vec3::from_array(corner));
            mesh.normals.push(normal);
        }
        mesh.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    mesh
}

/// Tessellate a cylinder centered at origin, extending along Y axis.
fn tessellate_cylinder(radius: f32, height: f32, segments: u32) -> Mesh {
    let half_height = height / 2.0;
    let segments = segments.max(8);
    let ring = |i: u32| {
        let angle = (i as f32 / segments as f32) * TAU;
        (angle.cos(), angle.sin())
    };

    let mut vertices = Vec::new();
    let mut normals = Vec::new();
    let mut indices = Vec::new();

    // Side: bottom/top vertex pairs
    for i in 0..=segments {
        let (c, s) = ring(i);
        let normal = Vec3::new(c, 0.0, s);
        vertices.push(Vec3::new(c * radius, -half_height, s * radius));
        normals.push(normal);
        vertices.push(Vec3::new(c * radius, half_height, s * radius));
        normals.push(normal);
    }

    for i in 0..segments {
        let bottom = i * 2;
        let top = bottom + 1;
        let next_bottom = bottom + 2;
        let next_top = bottom + 3;
        indices.extend_from_slice(&[bottom, top, next_bottom, top, next_top, next_bottom]);
    }

    // Caps
    for (y, normal) in [(half_height, Vec3::Y), (-half_height, Vec3::NEG_Y)] {
        let center = vertices.len() as u32;
        vertices.push(Vec3::new(0.0, y, 0.0));
        normals.push(normal);

        for i in 0..=segments {
            let (c, s) = ring(i);
            vertices.push(Vec3::new(c * radius, y, s * radius));
            normals.push(normal);
        }

        for i in 0..segments {
            let current = center + 1 + i;
            if normal.y > 0.0 {
                indices.extend_from_slice(&[center, current + 1, current]);
            } else {
                indices.extend_from_slice(&[center, current, current + 1]);
            }
        }
    }

    Mesh { vertices, normals, indices }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Every triangle's winding agrees with its stored vertex normals.
    fn assert_outward(mesh: &Mesh) {
        for tri in mesh.indices.chunks_exact(3) {
            let [a, b, c] = [0, 1, 2].map(|k| mesh.vertices[tri[k] as usize]);
            let face = (b - a).cross(c - a);
            let stored = mesh.normals[tri[0] as usize];
            assert!(face.dot(stored) > 0.0, "triangle {:?} winds inward", tri);
        }
    }

    #[test]
    fn test_tessellate_box() {
        let mesh = tessellate_box(2.0, 3.0, 4.0);

        // 6 faces * 4 vertices
        assert_eq!(mesh.vertices.len(), 24);
        assert_eq!(mesh.normals.len(), 24);
        // 6 faces * 2 triangles
        assert_eq!(mesh.triangle_count(), 12);
        assert_outward(&mesh);

        let bounds = mesh.bounding_box().unwrap();
        assert_eq!(bounds.size(), Vec3::new(2.0, 3.0, 4.0));
    }

    #[test]
    fn test_tessellate_cylinder() {
        let mesh = tessellate_cylinder(1.0, 2.0, 16);

        // 32 side triangles + 16 per cap
        assert_eq!(mesh.triangle_count(), 64);
        assert_eq!(mesh.vertices.len(), mesh.normals.len());
        assert_outward(&mesh);
    }

    #[test]
    fn test_placed_mesh_follows_transform() {
        let shape = Shape::box_shape(1.0, 1.0, 1.0).translate(Vec3::new(3.0, 0.0, 0.0));
        let mesh = tessellate_placed(&shape, &TessellationOptions::default());
        let bounds = mesh.bounding_box().unwrap();

        assert!((bounds.center() - Vec3::new(3.0, 0.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_deflection_controls_segments() {
        let shape = Shape::cylinder(1.0, 1.0);
        let coarse = tessellate(&shape, 1.0);
        let fine = tessellate(&shape, 0.01);
        assert!(fine.triangle_count() > coarse.triangle_count());
    }
}
