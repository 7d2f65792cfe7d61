//! Tube sweep along a Catmull-Rom curve.

use std::f32::consts::TAU;

use glam::{Quat, Vec3};

use crate::curve::CatmullRomCurve;
use crate::mesh::{MeshData, MeshError, check_radius};

/// Tangent/normal/binormal per curve sample.
struct Frames {
    tangents: Vec<Vec3>,
    normals: Vec<Vec3>,
    binormals: Vec<Vec3>,
}

/// Parallel-transport frames along the curve, free of the flips Frenet frames
/// show on straight or inflecting sections.
fn transport_frames(curve: &CatmullRomCurve, segments: u32) -> Frames {
    let n = segments as usize;
    let tangents: Vec<Vec3> = (0..=n)
        .map(|i| curve.tangent(i as f32 / segments as f32))
        .collect();

    // Seed the first normal from the axis least aligned with the tangent.
    let t0 = tangents[0];
    let abs = t0.abs();
    let axis = if abs.x <= abs.y && abs.x <= abs.z {
        Vec3::X
    } else if abs.y <= abs.z {
        Vec3::Y
    } else {
        Vec3::Z
    };
    let seed = t0.cross(axis).normalize_or_zero();

    let mut normals = Vec::with_capacity(n + 1);
    let mut binormals = Vec::with_capacity(n + 1);
    normals.push(t0.cross(seed));
    binormals.push(t0.cross(normals[0]));

    for i in 1..=n {
        let mut normal = normals[i - 1];
        let axis = tangents[i - 1].cross(tangents[i]);
        if axis.length() > f32::EPSILON {
            let theta = tangents[i - 1].dot(tangents[i]).clamp(-1.0, 1.0).acos();
            normal = Quat::from_axis_angle(axis.normalize(), theta) * normal;
        }
        normals.push(normal);
        binormals.push(tangents[i].cross(normal));
    }

    if curve.is_closed() {
        // Spread the residual twist evenly so the seam lines up.
        let mut theta = normals[0].dot(normals[n]).clamp(-1.0, 1.0).acos() / n as f32;
        if tangents[0].dot(normals[0].cross(normals[n])) > 0.0 {
            theta = -theta;
        }
        for i in 1..=n {
            normals[i] = Quat::from_axis_angle(tangents[i], theta * i as f32) * normals[i];
            binormals[i] = tangents[i].cross(normals[i]);
        }
    }

    Frames {
        tangents,
        normals,
        binormals,
    }
}

/// Sweep a circular cross-section of `tube_radius` along a Catmull-Rom curve
/// through `points`.
///
/// `tubular_segments` (>= 1) samples the curve, `radial_segments` (>= 3)
/// splits the cross-section. Produces `(tubular + 1) * (radial + 1)` vertices
/// and `2 * tubular * radial` triangles. A closed tube reuses the first ring's
/// positions for the last one so the seam is watertight.
pub fn generate_tube(
    points: &[Vec3],
    tubular_segments: u32,
    tube_radius: f32,
    radial_segments: u32,
    closed: bool,
) -> Result<MeshData, MeshError> {
    check_radius("tube radius", tube_radius)?;
    let curve = CatmullRomCurve::new(points.to_vec(), closed)?;
    let tubular = tubular_segments.max(1);
    let radial = radial_segments.max(3);
    let frames = transport_frames(&curve, tubular);
    debug_assert_eq!(frames.tangents.len(), tubular as usize + 1);

    let vertex_count = ((tubular + 1) * (radial + 1)) as usize;
    let mut positions = Vec::with_capacity(vertex_count);
    let mut normals = Vec::with_capacity(vertex_count);
    let mut uvs = Vec::with_capacity(vertex_count);

    for i in 0..=tubular {
        // Closed tubes: last ring duplicates the first.
        let (sample, t) = if closed && i == tubular {
            (0, 0.0)
        } else {
            (i as usize, i as f32 / tubular as f32)
        };
        let center = curve.point(t);
        let n = frames.normals[sample];
        let b = frames.binormals[sample];

        for j in 0..=radial {
            let v = j as f32 / radial as f32 * TAU;
            let normal = (n * -v.cos() + b * v.sin()).normalize_or_zero();
            positions.push(center + normal * tube_radius);
            normals.push(normal);
            uvs.push([i as f32 / tubular as f32, j as f32 / radial as f32]);
        }
    }

    let stride = radial + 1;
    let mut indices = Vec::with_capacity((tubular * radial * 6) as usize);
    for j in 1..=tubular {
        for i in 1..=radial {
            let a = stride * (j - 1) + (i - 1);
            let b = stride * j + (i - 1);
            let c = stride * j + i;
            let d = stride * (j - 1) + i;
            indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }

    Ok(MeshData {
        positions,
        normals,
        uvs,
        indices,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arc_points() -> Vec<Vec3> {
        (0..=20)
            .map(|i| {
                let t = i as f32 / 20.0;
                let a = t * std::f32::consts::FRAC_PI_4;
                Vec3::new(a.cos() * 2.55, (t * std::f32::consts::PI).sin() * 2.0, a.sin() * 2.55)
            })
            .collect()
    }

    #[test]
    fn test_tube_counts() {
        let mesh = generate_tube(&arc_points(), 64, 0.01, 8, false).unwrap();
        assert_eq!(mesh.vertex_count(), 65 * 9);
        assert_eq!(mesh.triangle_count(), 2 * 64 * 8);
    }

    #[test]
    fn test_tube_vertices_at_radius_from_curve() {
        let pts = arc_points();
        let curve = CatmullRomCurve::new(pts.clone(), false).unwrap();
        let mesh = generate_tube(&pts, 16, 0.05, 6, false).unwrap();
        for i in 0..=16u32 {
            let center = curve.point(i as f32 / 16.0);
            for j in 0..=6u32 {
                let p = mesh.positions[(i * 7 + j) as usize];
                assert!(
                    ((p - center).length() - 0.05).abs() < 1e-4,
                    "vertex ({i}, {j}) not on tube surface"
                );
            }
        }
    }

    #[test]
    fn test_tube_normals_perpendicular_to_tangent() {
        let pts = arc_points();
        let curve = CatmullRomCurve::new(pts.clone(), false).unwrap();
        let mesh = generate_tube(&pts, 32, 0.01, 8, false).unwrap();
        for i in 0..=32u32 {
            let tangent = curve.tangent(i as f32 / 32.0);
            for j in 0..=8u32 {
                let n = mesh.normals[(i * 9 + j) as usize];
                assert!(n.dot(tangent).abs() < 1e-2, "normal not perpendicular");
            }
        }
    }

    #[test]
    fn test_closed_tube_seam_matches() {
        let loop_pts = vec![Vec3::X, Vec3::Z, Vec3::NEG_X, Vec3::NEG_Z];
        let mesh = generate_tube(&loop_pts, 40, 0.1, 6, true).unwrap();
        let stride = 7;
        for j in 0..stride {
            let first = mesh.positions[j];
            let last = mesh.positions[40 * stride + j];
            assert!((first - last).length() < 1e-5);
        }
    }

    #[test]
    fn test_tube_is_deterministic() {
        let a = generate_tube(&arc_points(), 64, 0.01, 8, false).unwrap();
        let b = generate_tube(&arc_points(), 64, 0.01, 8, false).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_tube_requires_two_points() {
        assert_eq!(
            generate_tube(&[Vec3::ZERO], 8, 0.1, 4, false),
            Err(MeshError::TooFewPoints(1))
        );
    }
}
