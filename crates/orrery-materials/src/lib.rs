//! Material system: opaque shader program text, named uniform bundles, the
//! fixed render policy of each material variant, and the catalog that binds
//! them together.

mod catalog;
mod material;
mod shader;
mod uniform;

pub use catalog::{DEFAULT_GLOW_COLOR, DEFAULT_VIEW_VECTOR, MaterialCatalog};
pub use material::{Blending, Material, MaterialError, MaterialVariant, RenderPolicy, Side};
pub use shader::{ShaderError, ShaderLibrary, ShaderManifest, ShaderProgram, programs};
pub use uniform::{BaseUniforms, UniformBundle, UniformValue, names};
