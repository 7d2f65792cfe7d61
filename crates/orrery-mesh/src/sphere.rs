//! Latitude/longitude sphere generation.

use std::f32::consts::{PI, TAU};

use glam::Vec3;

use crate::mesh::{MeshData, MeshError, check_radius};

/// Generate a UV sphere centered on the origin.
///
/// `width_segments` (clamped to >= 3) splits the equator, `height_segments`
/// (clamped to >= 2) splits pole to pole. The mesh has
/// `(w + 1) * (h + 1)` vertices (the seam column is duplicated for UVs) and
/// `w * (2h - 2)` triangles, since each pole row emits a single triangle per segment.
pub fn generate_sphere(
    radius: f32,
    width_segments: u32,
    height_segments: u32,
) -> Result<MeshData, MeshError> {
    check_radius("sphere radius", radius)?;
    let w = width_segments.max(3);
    let h = height_segments.max(2);

    let row = (w + 1) as usize;
    let vertex_count = row * (h + 1) as usize;
    let mut positions = Vec::with_capacity(vertex_count);
    let mut normals = Vec::with_capacity(vertex_count);
    let mut uvs = Vec::with_capacity(vertex_count);

    for iy in 0..=h {
        let v = iy as f32 / h as f32;
        for ix in 0..=w {
            let u = ix as f32 / w as f32;
            let normal = Vec3::new(
                -(u * TAU).cos() * (v * PI).sin(),
                (v * PI).cos(),
                (u * TAU).sin() * (v * PI).sin(),
            );
            positions.push(normal * radius);
            normals.push(normal.normalize_or_zero());
            uvs.push([u, 1.0 - v]);
        }
    }

    let mut indices = Vec::with_capacity((w * (2 * h - 2) * 3) as usize);
    for iy in 0..h {
        for ix in 0..w {
            let a = iy * (w + 1) + ix + 1;
            let b = iy * (w + 1) + ix;
            let c = (iy + 1) * (w + 1) + ix;
            let d = (iy + 1) * (w + 1) + ix + 1;
            if iy != 0 {
                indices.extend_from_slice(&[a, b, d]);
            }
            if iy != h - 1 {
                indices.extend_from_slice(&[b, c, d]);
            }
        }
    }

    Ok(MeshData {
        positions,
        normals,
        uvs,
        indices,
    })
}
