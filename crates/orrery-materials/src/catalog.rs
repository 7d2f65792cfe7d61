//! Material factories, one per variant, bound to supplied program text.

use std::sync::Arc;

use glam::Vec3;

use crate::material::{Material, MaterialError, MaterialVariant};
use crate::shader::{ShaderLibrary, ShaderProgram, programs};
use crate::uniform::{BaseUniforms, UniformBundle, UniformValue, names};

/// Default rim glow tint (cyan).
pub const DEFAULT_GLOW_COLOR: Vec3 = Vec3::new(0.0, 1.0, 1.0);
/// Initial view vector before the first camera update.
pub const DEFAULT_VIEW_VECTOR: Vec3 = Vec3::Z;

/// Builds [`Material`]s from a [`ShaderLibrary`].
///
/// The catalog never inspects program text beyond checking that both stages
/// are non-blank; compilation is the backend's business.
#[derive(Debug, Default, Clone)]
pub struct MaterialCatalog {
    library: ShaderLibrary,
}

impl MaterialCatalog {
    pub fn new(library: ShaderLibrary) -> Self {
        Self { library }
    }

    pub fn library(&self) -> &ShaderLibrary {
        &self.library
    }

    pub fn has_program(&self, name: &str) -> bool {
        self.library.contains(name)
    }

    fn program(&self, name: &str) -> Result<Arc<ShaderProgram>, MaterialError> {
        let program = self
            .library
            .get(name)
            .ok_or_else(|| MaterialError::MissingProgram {
                name: name.to_string(),
            })?;
        for (stage, text) in [("vertex", &program.vertex), ("fragment", &program.fragment)] {
            if text.trim().is_empty() {
                return Err(MaterialError::EmptyProgram {
                    name: name.to_string(),
                    stage,
                });
            }
        }
        Ok(program)
    }

    fn bind(
        &self,
        variant: MaterialVariant,
        program: &str,
        uniforms: UniformBundle,
    ) -> Result<Material, MaterialError> {
        Ok(Material {
            variant,
            program: Some(self.program(program)?),
            uniforms,
        })
    }

    /// Opaque planet surface using `program` (e.g. [`programs::PLAIN`]).
    pub fn planet(&self, program: &str, base: &BaseUniforms) -> Result<Material, MaterialError> {
        self.bind(MaterialVariant::Planet, program, base.to_bundle())
    }

    /// Emissive sun surface.
    pub fn sun(&self, base: &BaseUniforms) -> Result<Material, MaterialError> {
        self.bind(MaterialVariant::Sun, programs::SUN, base.to_bundle())
    }

    /// Back-lit additive halo with a camera-relative `viewVector`.
    pub fn glow(&self, base: &BaseUniforms, color: Vec3) -> Result<Material, MaterialError> {
        let uniforms = base
            .to_bundle()
            .with(names::GLOW_COLOR, UniformValue::Vec3(color))
            .with(names::VIEW_VECTOR, UniformValue::Vec3(DEFAULT_VIEW_VECTOR));
        self.bind(MaterialVariant::Glow, programs::SUN_GLOW, uniforms)
    }

    /// Flat flare ring.
    pub fn flare(
        &self,
        base: &BaseUniforms,
        color: Vec3,
        opacity: f32,
        size: f32,
    ) -> Result<Material, MaterialError> {
        let uniforms = base
            .to_bundle()
            .with(names::COLOR, UniformValue::Vec3(color))
            .with(names::FLARE_OPACITY, UniformValue::Float(opacity))
            .with(names::FLARE_SIZE, UniformValue::Float(size));
        self.bind(MaterialVariant::Flare, programs::FLARE, uniforms)
    }

    /// Tinted planetary ring.
    pub fn ring(&self, base: &BaseUniforms) -> Result<Material, MaterialError> {
        self.bind(MaterialVariant::Ring, programs::RING_VARIANT, base.to_bundle())
    }

    /// Ring material if the ring program was supplied, `None` otherwise.
    ///
    /// A supplied but blank program is still an error.
    pub fn ring_if_available(
        &self,
        base: &BaseUniforms,
    ) -> Result<Option<Material>, MaterialError> {
        if self.has_program(programs::RING_VARIANT) {
            self.ring(base).map(Some)
        } else {
            Ok(None)
        }
    }

    /// Unlit plasma arc. Built-in shading, so it cannot fail.
    pub fn plasma_arc(&self, color: Vec3, opacity: f32) -> Material {
        Material {
            variant: MaterialVariant::PlasmaArc,
            program: None,
            uniforms: UniformBundle::new()
                .with(names::BASIC_COLOR, UniformValue::Vec3(color))
                .with(names::OPACITY, UniformValue::Float(opacity)),
        }
    }

    /// Unlit point sprites.
    pub fn points(&self, color: Vec3, size: f32, opacity: f32) -> Material {
        Material {
            variant: MaterialVariant::Points,
            program: None,
            uniforms: UniformBundle::new()
                .with(names::BASIC_COLOR, UniformValue::Vec3(color))
                .with(names::POINT_SIZE, UniformValue::Float(size))
                .with(names::OPACITY, UniformValue::Float(opacity)),
        }
    }
}
