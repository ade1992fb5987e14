//! STL export of the solid subtree.

use std::fmt::Write as _;
use std::io::Write;

use bookcase_core::ExportError;
use bookcase_render_3d::{Mesh, SceneGraph};
use glam::{Mat4, Vec3};
use tracing::debug;

use crate::{ExportOptions, ExportSpace};

const HEADER: &[u8] = b"Binary STL exported by bookcase configurator";

/// Merge every solid of `scene` into one mesh.
pub fn collect_mesh(scene: &SceneGraph, options: &ExportOptions) -> Mesh {
    let mut combined = Mesh::new();
    for node in scene.solids() {
        if !options.include_translucent && node.primitive().material.is_translucent() {
            continue;
        }
        combined.merge(node.mesh());
    }
    if options.space == ExportSpace::World {
        combined.transform(scene.root_transform());
    }
    if options.scale != 1.0 {
        combined.transform(Mat4::from_scale(Vec3::splat(options.scale)));
    }
    combined
}

/// Export the scene to binary STL.
pub fn export(scene: &SceneGraph, options: &ExportOptions) -> Result<Vec<u8>, ExportError> {
    let mesh = non_empty(collect_mesh(scene, options))?;
    let mut output = Vec::with_capacity(84 + mesh.triangle_count() * 50);
    write_binary(&mesh, &mut output)?;
    debug!(triangles = mesh.triangle_count(), bytes = output.len(), "binary STL written");
    Ok(output)
}

/// Export the scene to ASCII STL.
pub fn export_ascii(scene: &SceneGraph, options: &ExportOptions) -> Result<String, ExportError> {
    let mesh = non_empty(collect_mesh(scene, options))?;
    Ok(encode_ascii(&mesh, &options.name))
}

/// Write a mesh as binary STL: an 80 byte header, the triangle count and
/// 50 bytes per triangle.
pub fn write_binary<W: Write>(mesh: &Mesh, writer: &mut W) -> Result<(), ExportError> {
    let mut header = [b' '; 80];
    header[..HEADER.len()].copy_from_slice(HEADER);
    writer.write_all(&header)?;
    writer.write_all(&(mesh.triangle_count() as u32).to_le_bytes())?;

    for triangle in mesh.triangles() {
        let normal = facet_normal(&triangle);
        for v in std::iter::once(normal).chain(triangle) {
            for component in v.to_array() {
                writer.write_all(&component.to_le_bytes())?;
            }
        }
        writer.write_all(&0u16.to_le_bytes())?;
    }
    Ok(())
}

/// Encode a mesh as ASCII STL.
pub fn encode_ascii(mesh: &Mesh, name: &str) -> String {
    let mut output = String::with_capacity(mesh.triangle_count() * 256);
    let _ = writeln!(output, "solid {name}");
    for triangle in mesh.triangles() {
        let n = facet_normal(&triangle);
        let _ = writeln!(output, "  facet normal {} {} {}", n.x, n.y, n.z);
        output.push_str("    outer loop\n");
        for v in triangle {
            let _ = writeln!(output, "      vertex {} {} {}", v.x, v.y, v.z);
        }
        output.push_str("    endloop\n  endfacet\n");
    }
    let _ = writeln!(output, "endsolid {name}");
    output
}

fn facet_normal([a, b, c]: &[Vec3; 3]) -> Vec3 {
    (*b - *a).cross(*c - *a).normalize_or_zero()
}

fn non_empty(mesh: Mesh) -> Result<Mesh, ExportError> {
    if mesh.triangle_count() == 0 {
        Err(ExportError::NoGeometry)
    } else {
        Ok(mesh)
    }
}
