//! Procedural geometry for celestial bodies: UV spheres, flat rings, and tubes
//! swept along Catmull-Rom curves, plus a cache that shares identical meshes.

mod cache;
mod curve;
mod mesh;
mod ring;
mod sphere;
mod tube;

pub use cache::{CacheStats, GeometryCache, GeometryHandle};
pub use curve::CatmullRomCurve;
pub use mesh::{MeshData, MeshError, MeshVertex};
pub use ring::generate_ring;
pub use sphere::generate_sphere;
pub use tube::generate_tube;
