//! Shader program text registry.
//!
//! Programs are opaque vertex/fragment source pairs. Nothing here parses or
//! compiles them; the backend does that when it sees a material.

use log::{debug, info};
use serde::Deserialize;
use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::Arc,
};
use thiserror::Error;

/// Well-known program names.
pub mod programs {
    /// Default planet surface.
    pub const PLAIN: &str = "plain";
    /// Emissive sun surface.
    pub const SUN: &str = "sun";
    /// Back-lit additive halo around the sun.
    pub const SUN_GLOW: &str = "sun_glow";
    /// Flat flare ring.
    pub const FLARE: &str = "flare";
    /// Alternate planet surface.
    pub const PLANET_VARIANT: &str = "planet_variant";
    /// Tinted planetary ring.
    pub const RING_VARIANT: &str = "ring_variant";

    /// Every program the default scene binds.
    pub const ALL: [&str; 6] = [PLAIN, SUN, SUN_GLOW, FLARE, PLANET_VARIANT, RING_VARIANT];
}

/// Error types for shader loading operations.
#[derive(Debug, Error)]
pub enum ShaderError {
    #[error("shader file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to read shader file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("failed to parse shader manifest: {0}")]
    Manifest(#[from] ron::error::SpannedError),
}

/// A vertex/fragment source pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderProgram {
    pub name: String,
    pub vertex: String,
    pub fragment: String,
}

/// RON manifest listing programs relative to the manifest's directory.
///
/// ```ron
/// (programs: [(name: "sun", vertex: "sun.vert.glsl", fragment: "sun.frag.glsl")])
/// ```
#[derive(Debug, Deserialize)]
pub struct ShaderManifest {
    pub programs: Vec<ProgramEntry>,
}

/// One manifest entry.
#[derive(Debug, Deserialize)]
pub struct ProgramEntry {
    pub name: String,
    pub vertex: PathBuf,
    pub fragment: PathBuf,
}

/// Central registry of shader program text.
#[derive(Debug, Default, Clone)]
pub struct ShaderLibrary {
    programs: HashMap<String, Arc<ShaderProgram>>,
}

impl ShaderLibrary {
    /// Create a new empty shader library.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a program from source strings, replacing any program of the same name.
    pub fn load_from_source(
        &mut self,
        name: &str,
        vertex: impl Into<String>,
        fragment: impl Into<String>,
    ) -> Arc<ShaderProgram> {
        debug!("Loading program '{}' from source", name);

        let program = Arc::new(ShaderProgram {
            name: name.to_string(),
            vertex: vertex.into(),
            fragment: fragment.into(),
        });
        let replaced = self
            .programs
            .insert(name.to_string(), program.clone())
            .is_some();

        if replaced {
            info!("Replaced program '{}'", name);
        } else {
            debug!("Loaded program '{}'", name);
        }
        program
    }

    /// Load `<name>.vert.glsl` and `<name>.frag.glsl` from `dir`.
    pub fn load_from_dir(
        &mut self,
        dir: &Path,
        name: &str,
    ) -> Result<Arc<ShaderProgram>, ShaderError> {
        let vertex = read_source(&dir.join(format!("{name}.vert.glsl")))?;
        let fragment = read_source(&dir.join(format!("{name}.frag.glsl")))?;
        Ok(self.load_from_source(name, vertex, fragment))
    }

    /// Load every program listed in a RON manifest.
    ///
    /// Returns the number of programs loaded.
    pub fn load_manifest(&mut self, manifest_path: &Path) -> Result<usize, ShaderError> {
        if !manifest_path.exists() {
            return Err(ShaderError::FileNotFound {
                path: manifest_path.to_path_buf(),
            });
        }
        let text = std::fs::read_to_string(manifest_path)?;
        let manifest: ShaderManifest = ron::from_str(&text)?;
        let base = manifest_path.parent().unwrap_or_else(|| Path::new("."));

        for entry in &manifest.programs {
            let vertex = read_source(&base.join(&entry.vertex))?;
            let fragment = read_source(&base.join(&entry.fragment))?;
            self.load_from_source(&entry.name, vertex, fragment);
        }
        info!(
            "Loaded {} programs from {}",
            manifest.programs.len(),
            manifest_path.display()
        );
        Ok(manifest.programs.len())
    }

    /// Get a previously loaded program by name.
    pub fn get(&self, name: &str) -> Option<Arc<ShaderProgram>> {
        self.programs.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.programs.contains_key(name)
    }

    /// Number of loaded programs.
    pub fn len(&self) -> usize {
        self.programs.len()
    }

    /// Check if the shader library is empty.
    pub fn is_empty(&self) -> bool {
        self.programs.is_empty()
    }
}

fn read_source(path: &Path) -> Result<String, ShaderError> {
    if !path.exists() {
        return Err(ShaderError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    Ok(std::fs::read_to_string(path)?)
}
