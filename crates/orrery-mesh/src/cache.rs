//! Shared geometry cache.
//!
//! Spheres and rings are keyed by their exact numeric inputs, so every body
//! asking for the same tessellation gets the same allocation. Bodies of
//! different sizes reuse one unit sphere and scale it at the node level.
//! Tubes follow arbitrary point lists and are never cached.

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use glam::Vec3;
use rustc_hash::FxHashMap;

use crate::mesh::{MeshData, MeshError};
use crate::{generate_ring, generate_sphere, generate_tube};

/// Cheaply clonable reference to an immutable mesh.
#[derive(Clone)]
pub struct GeometryHandle(Arc<MeshData>);

impl GeometryHandle {
    pub fn new(mesh: MeshData) -> Self {
        Self(Arc::new(mesh))
    }

    /// `true` if both handles point at the same cached allocation.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Deref for GeometryHandle {
    type Target = MeshData;

    fn deref(&self) -> &MeshData {
        &self.0
    }
}

impl fmt::Debug for GeometryHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeometryHandle")
            .field("vertices", &self.vertex_count())
            .field("triangles", &self.triangle_count())
            .finish()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum GeometryKey {
    Sphere {
        radius: u32,
        width: u32,
        height: u32,
    },
    Ring {
        inner: u32,
        outer: u32,
        segments: u32,
    },
}

/// Cache counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    /// Tubes generated (always fresh).
    pub uncached: u64,
}

/// Produces geometry and reuses identical requests.
///
/// Owned explicitly by whoever builds a scene; two caches never share state.
#[derive(Default)]
pub struct GeometryCache {
    entries: FxHashMap<GeometryKey, GeometryHandle>,
    stats: CacheStats,
}

impl GeometryCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn get_or_insert(
        &mut self,
        key: GeometryKey,
        generate: impl FnOnce() -> Result<MeshData, MeshError>,
    ) -> Result<GeometryHandle, MeshError> {
        if let Some(handle) = self.entries.get(&key) {
            self.stats.hits += 1;
            log::trace!("geometry cache hit: {key:?}");
            return Ok(handle.clone());
        }
        let handle = GeometryHandle::new(generate()?);
        self.stats.misses += 1;
        log::debug!(
            "generated {key:?}: {} vertices, {} triangles",
            handle.vertex_count(),
            handle.triangle_count()
        );
        self.entries.insert(key, handle.clone());
        Ok(handle)
    }

    /// UV sphere, see [`generate_sphere`].
    pub fn sphere(
        &mut self,
        radius: f32,
        width_segments: u32,
        height_segments: u32,
    ) -> Result<GeometryHandle, MeshError> {
        let key = GeometryKey::Sphere {
            radius: radius.to_bits(),
            width: width_segments,
            height: height_segments,
        };
        self.get_or_insert(key, || {
            generate_sphere(radius, width_segments, height_segments)
        })
    }

    /// Flat ring, see [`generate_ring`].
    pub fn ring(
        &mut self,
        inner_radius: f32,
        outer_radius: f32,
        segments: u32,
    ) -> Result<GeometryHandle, MeshError> {
        let key = GeometryKey::Ring {
            inner: inner_radius.to_bits(),
            outer: outer_radius.to_bits(),
            segments,
        };
        self.get_or_insert(key, || generate_ring(inner_radius, outer_radius, segments))
    }

    /// Tube swept along `points`, see [`generate_tube`]. Not cached.
    pub fn tube_along_points(
        &mut self,
        points: &[Vec3],
        tube_segments: u32,
        tube_radius: f32,
        radial_segments: u32,
        closed: bool,
    ) -> Result<GeometryHandle, MeshError> {
        let mesh = generate_tube(points, tube_segments, tube_radius, radial_segments, closed)?;
        self.stats.uncached += 1;
        Ok(GeometryHandle::new(mesh))
    }

    /// Number of distinct cached meshes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Drop every cached mesh. Outstanding handles stay valid.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
