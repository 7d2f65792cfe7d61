//! Material variants, their fixed render policy, and bound material instances.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::shader::ShaderProgram;
use crate::uniform::{UniformBundle, names};

// ---------------------------------------------------------------------------
// MaterialError
// ---------------------------------------------------------------------------

/// Errors returned when binding a material to its program.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MaterialError {
    /// No program text was supplied under this name.
    #[error("no shader program named '{name}' was supplied")]
    MissingProgram { name: String },

    /// The program exists but one of its stages is blank.
    #[error("shader program '{name}' has an empty {stage} stage")]
    EmptyProgram { name: String, stage: &'static str },
}

// ---------------------------------------------------------------------------
// Render policy
// ---------------------------------------------------------------------------

/// Which triangle faces are rasterized.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    /// Front faces only (back faces culled).
    Front,
    /// Back faces only (front faces culled).
    Back,
    /// Both faces, no culling.
    Double,
}

/// Color blend equation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Blending {
    /// Standard alpha blending.
    Normal,
    /// `src + dst`, for glows.
    Additive,
}

/// Fixed pipeline state of a material variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderPolicy {
    pub side: Side,
    pub blending: Blending,
    pub depth_write: bool,
    pub transparent: bool,
    /// Opacity is rewritten every frame.
    pub animated_opacity: bool,
}

// ---------------------------------------------------------------------------
// MaterialVariant
// ---------------------------------------------------------------------------

/// The kinds of material the scene uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MaterialVariant {
    /// Opaque planet surface.
    Planet,
    /// Opaque emissive sun surface.
    Sun,
    /// Back-face additive halo.
    Glow,
    /// Double-sided transparent flare ring, no depth write.
    Flare,
    /// Double-sided transparent planetary ring.
    Ring,
    /// Double-sided unlit arc with pulsing opacity.
    PlasmaArc,
    /// Unlit point sprites.
    Points,
}

impl MaterialVariant {
    /// Culling, blending, depth and transparency for this variant.
    pub const fn policy(self) -> RenderPolicy {
        let (side, blending, depth_write, transparent, animated_opacity) = match self {
            Self::Planet => (Side::Front, Blending::Normal, true, false, false),
            Self::Sun => (Side::Front, Blending::Normal, true, false, false),
            Self::Glow => (Side::Back, Blending::Additive, false, true, false),
            Self::Flare => (Side::Double, Blending::Normal, false, true, false),
            Self::Ring => (Side::Double, Blending::Normal, true, true, false),
            Self::PlasmaArc => (Side::Double, Blending::Normal, true, true, true),
            Self::Points => (Side::Front, Blending::Normal, true, true, false),
        };
        RenderPolicy {
            side,
            blending,
            depth_write,
            transparent,
            animated_opacity,
        }
    }

    /// Whether the variant renders with the backend's built-in unlit shading
    /// instead of supplied program text.
    pub const fn is_builtin(self) -> bool {
        matches!(self, Self::PlasmaArc | Self::Points)
    }
}

// ---------------------------------------------------------------------------
// Material
// ---------------------------------------------------------------------------

/// A variant bound to its program text and uniform values.
#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    pub variant: MaterialVariant,
    /// `None` for built-in variants.
    pub program: Option<Arc<ShaderProgram>>,
    pub uniforms: UniformBundle,
}

impl Material {
    pub fn policy(&self) -> RenderPolicy {
        self.variant.policy()
    }

    pub fn opacity(&self) -> Option<f32> {
        self.uniforms.float(names::OPACITY)
    }

    /// Set the built-in opacity uniform. Returns `false` if not declared.
    pub fn set_opacity(&mut self, opacity: f32) -> bool {
        self.uniforms.set_float(names::OPACITY, opacity)
    }

    pub fn program_name(&self) -> Option<&str> {
        self.program.as_deref().map(|p| p.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::uniform::UniformValue;

    #[test]
    fn test_policy_table() {
        let planet = MaterialVariant::Planet.policy();
        assert_eq!(planet.side, Side::Front);
        assert_eq!(planet.blending, Blending::Normal);
        assert!(planet.depth_write && !planet.transparent);

        assert_eq!(MaterialVariant::Sun.policy(), planet);

        let glow = MaterialVariant::Glow.policy();
        assert_eq!(glow.side, Side::Back);
        assert_eq!(glow.blending, Blending::Additive);
        assert!(!glow.depth_write && glow.transparent);

        let flare = MaterialVariant::Flare.policy();
        assert_eq!(flare.side, Side::Double);
        assert!(!flare.depth_write && flare.transparent);

        let ring = MaterialVariant::Ring.policy();
        assert_eq!(ring.side, Side::Double);
        assert!(ring.depth_write && ring.transparent);

        let arc = MaterialVariant::PlasmaArc.policy();
        assert_eq!(arc.side, Side::Double);
        assert!(arc.depth_write && arc.transparent && arc.animated_opacity);
    }

    #[test]
    fn test_only_arcs_animate_opacity() {
        let animated: Vec<MaterialVariant> = [
            MaterialVariant::Planet,
            MaterialVariant::Sun,
            MaterialVariant::Glow,
            MaterialVariant::Flare,
            MaterialVariant::Ring,
            MaterialVariant::PlasmaArc,
            MaterialVariant::Points,
        ]
        .into_iter()
        .filter(|v| v.policy().animated_opacity)
        .collect();
        assert_eq!(animated, vec![MaterialVariant::PlasmaArc]);
    }

    #[test]
    fn test_opacity_accessors() {
        let mut mat = Material {
            variant: MaterialVariant::PlasmaArc,
            program: None,
            uniforms: UniformBundle::new().with(names::OPACITY, UniformValue::Float(1.0)),
        };
        assert_eq!(mat.opacity(), Some(1.0));
        assert!(mat.set_opacity(0.25));
        assert_eq!(mat.opacity(), Some(0.25));
        assert_eq!(mat.program_name(), None);
    }
}
