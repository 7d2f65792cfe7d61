//! Flat annulus generation.

use std::f32::consts::TAU;

use glam::Vec3;

use crate::mesh::{MeshData, MeshError, check_radius};

/// Generate a flat ring in the XY plane facing +Z.
///
/// `segments` (clamped to >= 3) splits the circumference. One radial band:
/// `2 * (segments + 1)` vertices and `2 * segments` triangles. UVs map the
/// outer circle onto the unit square.
pub fn generate_ring(
    inner_radius: f32,
    outer_radius: f32,
    segments: u32,
) -> Result<MeshData, MeshError> {
    check_radius("ring inner radius", inner_radius)?;
    check_radius("ring outer radius", outer_radius)?;
    if outer_radius <= inner_radius {
        return Err(MeshError::InvertedRing {
            inner: inner_radius,
            outer: outer_radius,
        });
    }
    let segments = segments.max(3);

    let mut positions = Vec::with_capacity(2 * (segments + 1) as usize);
    let mut uvs = Vec::with_capacity(positions.capacity());

    for radius in [inner_radius, outer_radius] {
        for i in 0..=segments {
            let theta = i as f32 / segments as f32 * TAU;
            let p = Vec3::new(radius * theta.cos(), radius * theta.sin(), 0.0);
            uvs.push([
                (p.x / outer_radius + 1.0) / 2.0,
                (p.y / outer_radius + 1.0) / 2.0,
            ]);
            positions.push(p);
        }
    }
    let normals = vec![Vec3::Z; positions.len()];

    let mut indices = Vec::with_capacity((segments * 6) as usize);
    for i in 0..segments {
        let a = i;
        let b = i + segments + 1;
        let c = i + segments + 2;
        let d = i + 1;
        indices.extend_from_slice(&[a, b, d, b, c, d]);
    }

    Ok(MeshData {
        positions,
        normals,
        uvs,
        indices,
    })
}
