//! Background star shell.

use std::f32::consts::TAU;

use glam::Vec3;
use rand::Rng;

/// Places stars uniformly in solid angle on a shell whose radius is uniform
/// (not volume-weighted) in `[min_distance, max_distance]`.
#[derive(Clone, Copy, Debug)]
pub struct StarfieldGenerator {
    pub amount: u32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl StarfieldGenerator {
    pub fn new(amount: u32, min_distance: f32, max_distance: f32) -> Self {
        Self {
            amount,
            min_distance,
            max_distance,
        }
    }

    /// Generate the star positions. Deterministic for a given RNG state.
    pub fn generate<R: Rng>(&self, rng: &mut R) -> Vec<Vec3> {
        (0..self.amount)
            .map(|_| shell_point(rng, self.min_distance, self.max_distance))
            .collect()
    }
}

/// One random point on the shell.
pub fn shell_point<R: Rng>(rng: &mut R, min_distance: f32, max_distance: f32) -> Vec3 {
    let radius = if max_distance > min_distance {
        rng.random_range(min_distance..=max_distance)
    } else {
        min_distance
    };
    let theta = rng.random::<f32>() * TAU;
    let phi = rng.random_range(-1.0f32..=1.0).acos();

    Vec3::new(
        radius * phi.sin() * theta.cos(),
        radius * phi.sin() * theta.sin(),
        radius * phi.cos(),
    )
}
