//! CPU-side mesh container and its GPU vertex layout.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use thiserror::Error;

/// Errors produced by the geometry generators.
#[derive(Debug, Error, PartialEq)]
pub enum MeshError {
    /// A radius was zero, negative, or not finite.
    #[error("{what} must be a finite value > 0 (got {value})")]
    InvalidRadius { what: &'static str, value: f32 },

    /// Ring outer radius does not exceed its inner radius.
    #[error("ring outer radius {outer} must exceed inner radius {inner}")]
    InvertedRing { inner: f32, outer: f32 },

    /// A curve needs at least two control points.
    #[error("curve needs at least 2 points, got {0}")]
    TooFewPoints(usize),
}

/// Indexed triangle mesh.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshData {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub uvs: Vec<[f32; 2]>,
    /// Triangle list, counter-clockwise front faces.
    pub indices: Vec<u32>,
}

/// Interleaved vertex for upload: position, normal, uv.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable, PartialEq)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

static_assertions::const_assert_eq!(std::mem::size_of::<MeshVertex>(), 32);

impl MeshData {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Largest distance of any vertex from the local origin.
    pub fn bounding_radius(&self) -> f32 {
        self.positions
            .iter()
            .map(|p| p.length())
            .fold(0.0, f32::max)
    }

    /// Interleave attributes into [`MeshVertex`] records.
    pub fn interleaved(&self) -> Vec<MeshVertex> {
        self.positions
            .iter()
            .zip(&self.normals)
            .zip(&self.uvs)
            .map(|((p, n), uv)| MeshVertex {
                position: p.to_array(),
                normal: n.to_array(),
                uv: *uv,
            })
            .collect()
    }

    /// Raw bytes of [`MeshData::interleaved`], ready for a vertex buffer.
    pub fn vertex_bytes(&self) -> Vec<u8> {
        bytemuck::cast_slice(&self.interleaved()).to_vec()
    }
}

pub(crate) fn check_radius(what: &'static str, value: f32) -> Result<(), MeshError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(MeshError::InvalidRadius { what, value })
    }
}
