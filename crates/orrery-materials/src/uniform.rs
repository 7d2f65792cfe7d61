//! Named uniform values fed to shading programs.

use std::collections::BTreeMap;

use glam::Vec3;

/// Uniform names shared between the catalog, the animator, and shader text.
pub mod names {
    /// Elapsed seconds.
    pub const TIME: &str = "uTime";
    /// World-space light (sun) position.
    pub const LIGHT_POS: &str = "uLightPos";
    /// Camera-relative view vector for rim glow.
    pub const VIEW_VECTOR: &str = "viewVector";
    /// Glow tint.
    pub const GLOW_COLOR: &str = "glowColor";
    /// Flare tint.
    pub const COLOR: &str = "uColor";
    /// Flare base opacity.
    pub const FLARE_OPACITY: &str = "uOpacity";
    /// Flare intensity scale.
    pub const FLARE_SIZE: &str = "uSize";
    /// Built-in unlit color.
    pub const BASIC_COLOR: &str = "color";
    /// Built-in unlit opacity.
    pub const OPACITY: &str = "opacity";
    /// Built-in point sprite size.
    pub const POINT_SIZE: &str = "size";
}

/// A single uniform value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum UniformValue {
    Float(f32),
    Vec3(Vec3),
}

/// Ordered set of named uniforms.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UniformBundle {
    values: BTreeMap<String, UniformValue>,
}

impl UniformBundle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: &str, value: UniformValue) -> Self {
        self.insert(name, value);
        self
    }

    /// Insert or replace a uniform, returning the previous value.
    pub fn insert(&mut self, name: &str, value: UniformValue) -> Option<UniformValue> {
        self.values.insert(name.to_string(), value)
    }

    pub fn get(&self, name: &str) -> Option<UniformValue> {
        self.values.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn float(&self, name: &str) -> Option<f32> {
        match self.values.get(name) {
            Some(UniformValue::Float(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn vec3(&self, name: &str) -> Option<Vec3> {
        match self.values.get(name) {
            Some(UniformValue::Vec3(v)) => Some(*v),
            _ => None,
        }
    }

    /// Overwrite an existing float uniform. Returns `false` when the bundle
    /// does not declare `name` as a float; undeclared uniforms are never added.
    pub fn set_float(&mut self, name: &str, value: f32) -> bool {
        match self.values.get_mut(name) {
            Some(UniformValue::Float(v)) => {
                *v = value;
                true
            }
            _ => false,
        }
    }

    /// Overwrite an existing vec3 uniform. Same contract as [`Self::set_float`].
    pub fn set_vec3(&mut self, name: &str, value: Vec3) -> bool {
        match self.values.get_mut(name) {
            Some(UniformValue::Vec3(v)) => {
                *v = value;
                true
            }
            _ => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &UniformValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// The uniforms every program-backed material declares: `uTime` and an optional `uLightPos`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BaseUniforms {
    pub time: f32,
    pub light_pos: Option<Vec3>,
}

impl BaseUniforms {
    pub fn lit_by(light_pos: Vec3) -> Self {
        Self {
            time: 0.0,
            light_pos: Some(light_pos),
        }
    }

    pub fn to_bundle(&self) -> UniformBundle {
        let mut bundle = UniformBundle::new().with(names::TIME, UniformValue::Float(self.time));
        if let Some(pos) = self.light_pos {
            bundle.insert(names::LIGHT_POS, UniformValue::Vec3(pos));
        }
        bundle
    }
}
