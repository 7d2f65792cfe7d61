//! Program text for the demo: a directory on disk or the built-in set.

use std::path::Path;

use orrery_materials::{ShaderError, ShaderLibrary, programs};

const EMBEDDED: [(&str, &str, &str); 6] = [
    (
        programs::PLAIN,
        include_str!("../shaders/plain.vert.glsl"),
        include_str!("../shaders/plain.frag.glsl"),
    ),
    (
        programs::SUN,
        include_str!("../shaders/sun.vert.glsl"),
        include_str!("../shaders/sun.frag.glsl"),
    ),
    (
        programs::SUN_GLOW,
        include_str!("../shaders/sun_glow.vert.glsl"),
        include_str!("../shaders/sun_glow.frag.glsl"),
    ),
    (
        programs::FLARE,
        include_str!("../shaders/flare.vert.glsl"),
        include_str!("../shaders/flare.frag.glsl"),
    ),
    (
        programs::PLANET_VARIANT,
        include_str!("../shaders/planet_variant.vert.glsl"),
        include_str!("../shaders/planet_variant.frag.glsl"),
    ),
    (
        programs::RING_VARIANT,
        include_str!("../shaders/ring_variant.vert.glsl"),
        include_str!("../shaders/ring_variant.frag.glsl"),
    ),
];

/// Library with every program compiled into the binary.
pub fn embedded_library() -> ShaderLibrary {
    let mut library = ShaderLibrary::new();
    for (name, vertex, fragment) in EMBEDDED {
        library.load_from_source(name, vertex, fragment);
    }
    library
}

/// Load programs from `dir`.
///
/// A `shaders.ron` manifest is used when present. Otherwise each well-known
/// program is looked up as `<name>.vert.glsl` / `<name>.frag.glsl`; programs
/// with no files are skipped, which leaves the ring program optional.
pub fn load_library(dir: &Path) -> Result<ShaderLibrary, ShaderError> {
    let mut library = ShaderLibrary::new();
    let manifest = dir.join("shaders.ron");
    if manifest.exists() {
        library.load_manifest(&manifest)?;
        return Ok(library);
    }
    for name in programs::ALL {
        match library.load_from_dir(dir, name) {
            Ok(_) => {}
            Err(ShaderError::FileNotFound { path }) => {
                tracing::debug!("No program '{}' ({} missing)", name, path.display());
            }
            Err(e) => return Err(e),
        }
    }
    Ok(library)
}
