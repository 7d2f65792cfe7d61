use glam::Vec3;
use orrery_config::AnimationConfig;
use orrery_materials::names;
use orrery_scene::{CameraProvider, NodeId, SceneRoot};
use orrery_space::SceneHandles;

use crate::error::UpdateError;

/// Logical ticks per second that `angular_speed` values are expressed in.
pub const DEFAULT_REFERENCE_TICK_RATE: f32 = 60.0;

/// Wall-clock seconds converted to reference ticks.
pub fn normalized_ticks(delta_seconds: f32, reference_tick_rate: f32) -> f32 {
    delta_seconds * reference_tick_rate
}

/// Opacity of plasma arc `index` at `elapsed` seconds. Always in `[0.2, 1.0]`.
pub fn arc_opacity(elapsed: f32, index: usize) -> f32 {
    0.6 + 0.4 * (2.0 * elapsed + index as f32).sin()
}

/// Advances a built scene by one frame.
///
/// Holds no per-frame state. Orbital rotation is applied as a delta, so each
/// logical frame must be ticked exactly once; every other parameter is a pure
/// function of `elapsed`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationUpdater {
    reference_tick_rate: f32,
}

impl Default for AnimationUpdater {
    fn default() -> Self {
        Self::new(DEFAULT_REFERENCE_TICK_RATE)
    }
}

impl AnimationUpdater {
    pub fn new(reference_tick_rate: f32) -> Self {
        Self {
            reference_tick_rate,
        }
    }

    pub fn from_config(config: &AnimationConfig) -> Self {
        Self::new(config.reference_tick_rate)
    }

    pub fn reference_tick_rate(&self) -> f32 {
        self.reference_tick_rate
    }

    /// Apply one frame.
    ///
    /// `elapsed` is seconds since the animation started and `delta` seconds
    /// since the previous frame. `camera` feeds camera-relative uniforms and is
    /// only read. Fails without touching the scene if `handles` were not built
    /// against `scene`.
    pub fn tick(
        &self,
        handles: &SceneHandles,
        scene: &mut dyn SceneRoot,
        camera: Option<&dyn CameraProvider>,
        elapsed: f32,
        delta: f32,
    ) -> Result<(), UpdateError> {
        if !elapsed.is_finite() || !delta.is_finite() {
            return Err(UpdateError::InvalidTime { elapsed, delta });
        }
        if scene.id() != handles.scene_id {
            return Err(UpdateError::ForeignScene {
                expected: handles.scene_id,
                found: scene.id(),
            });
        }
        let nodes = handles.nodes();
        if let Some(&missing) = nodes.iter().find(|&&id| scene.node(id).is_none()) {
            return Err(UpdateError::MissingNode(missing));
        }

        let ticks = normalized_ticks(delta, self.reference_tick_rate);
        for planet in &handles.planets {
            rotate(scene, planet.pivot, planet.angular_speed * ticks)?;
            if planet.spin_speed != 0.0 {
                rotate(scene, planet.body, planet.spin_speed * ticks)?;
            }
        }

        if let Some(arcs) = handles.arcs() {
            for (i, &arc) in arcs.arcs.iter().enumerate() {
                if let Some(material) = node_material(scene, arc)? {
                    material.set_opacity(arc_opacity(elapsed, i));
                }
            }
        }

        for &id in &nodes {
            if let Some(material) = node_material(scene, id)? {
                material.uniforms.set_float(names::TIME, elapsed);
            }
        }

        if let Some(camera) = camera {
            let eye = camera.position();
            let facing = [Some(handles.glow.node), handles.flare.map(|f| f.node)];
            for id in facing.into_iter().flatten() {
                let center = scene
                    .world_transform(id)
                    .map(|m| m.transform_point3(Vec3::ZERO))
                    .ok_or(UpdateError::MissingNode(id))?;
                if let Some(material) = node_material(scene, id)? {
                    material.uniforms.set_vec3(names::VIEW_VECTOR, eye - center);
                }
            }
        }

        log::trace!("tick: elapsed {elapsed:.3}s, {ticks:.3} reference ticks");
        Ok(())
    }
}

fn rotate(scene: &mut dyn SceneRoot, id: NodeId, angle: f32) -> Result<(), UpdateError> {
    scene
        .node_mut(id)
        .ok_or(UpdateError::MissingNode(id))?
        .transform
        .rotate_y(angle);
    Ok(())
}

fn node_material(
    scene: &mut dyn SceneRoot,
    id: NodeId,
) -> Result<Option<&mut orrery_materials::Material>, UpdateError> {
    Ok(scene
        .node_mut(id)
        .ok_or(UpdateError::MissingNode(id))?
        .material_mut())
}
