//! Plasma arc curves.

use std::f32::consts::{FRAC_PI_4, PI, TAU};

use glam::Vec3;

/// Intervals along one arc; the curve passes through `ARC_SAMPLES + 1` points.
pub const ARC_SAMPLES: u32 = 20;
/// Angular span covered by one arc.
pub const ARC_SPAN: f32 = FRAC_PI_4;
/// Unlit arc tint.
pub const ARC_COLOR: Vec3 = Vec3::new(1.0, 0.4, 0.1);

/// Points an arc's tube is swept through.
///
/// The arc starts at `start_angle` on a circle of `radius` in the XZ plane and
/// bulges up to `height` halfway along.
pub fn arc_points(radius: f32, height: f32, start_angle: f32) -> Vec<Vec3> {
    (0..=ARC_SAMPLES)
        .map(|i| {
            let t = i as f32 / ARC_SAMPLES as f32;
            let a = start_angle + t * ARC_SPAN;
            Vec3::new(a.cos() * radius, (t * PI).sin() * height, a.sin() * radius)
        })
        .collect()
}

/// Start angle of arc `index` out of `amount`, offset by `angle`.
pub fn arc_start_angle(index: u32, amount: u32, angle: f32) -> f32 {
    if amount == 0 {
        return angle;
    }
    TAU * index as f32 / amount as f32 + angle
}
