//! Handles returned by the factory, used by the updater without walking the
//! scene graph.

use std::f32::consts::TAU;
use std::sync::Arc;

use glam::Vec3;
use orrery_scene::{NodeId, SceneId, SceneRoot};

/// The emissive sun mesh and its optional arc bundle.
#[derive(Clone, Debug)]
pub struct SunHandle {
    pub node: NodeId,
    pub arcs: Option<PlasmaArcGroup>,
}

#[derive(Clone, Copy, Debug)]
pub struct GlowHandle {
    pub node: NodeId,
}

#[derive(Clone, Copy, Debug)]
pub struct FlareHandle {
    pub node: NodeId,
}

/// A group node holding one mesh per plasma arc, in arc-index order.
#[derive(Clone, Debug)]
pub struct PlasmaArcGroup {
    pub group: NodeId,
    pub arcs: Vec<NodeId>,
}

/// One planet.
///
/// `pivot` sits at the origin and carries the orbital rotation. `orbit_frame`
/// is its child at `(orbit_radius, 0, 0)`. The body and optional ring hang off
/// the orbit frame, so the ring orbits with the planet but does not spin.
#[derive(Clone, Debug)]
pub struct PlanetHandle {
    pub id: String,
    /// Display metadata copied from the config for UI collaborators.
    pub label: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub pivot: NodeId,
    pub orbit_frame: NodeId,
    pub body: NodeId,
    pub ring: Option<NodeId>,
    /// Radians per reference tick about +Y.
    pub angular_speed: f32,
    /// Radians per reference tick about the body's own +Y.
    pub spin_speed: f32,
}

impl PlanetHandle {
    /// Current orbital angle in `[0, 2π)`, read from the pivot.
    pub fn orbit_angle(&self, scene: &dyn SceneRoot) -> Option<f32> {
        let rotation = scene.node(self.pivot)?.transform.rotation;
        let x = rotation * Vec3::X;
        Some((-x.z).atan2(x.x).rem_euclid(TAU))
    }

    /// World-space center of the planet body.
    pub fn world_position(&self, scene: &dyn SceneRoot) -> Option<Vec3> {
        scene
            .world_transform(self.body)
            .map(|m| m.transform_point3(Vec3::ZERO))
    }

    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        [self.pivot, self.orbit_frame, self.body]
            .into_iter()
            .chain(self.ring)
    }
}

/// The immutable star point cloud.
#[derive(Clone, Debug)]
pub struct StarfieldHandle {
    pub node: NodeId,
    pub cloud: Arc<[Vec3]>,
}

/// Everything a built scene exposes for animation.
#[derive(Clone, Debug)]
pub struct SceneHandles {
    /// Scene these handles were built against.
    pub scene_id: SceneId,
    pub sun: SunHandle,
    pub glow: GlowHandle,
    pub flare: Option<FlareHandle>,
    /// In construction (`order_index`) order.
    pub planets: Vec<PlanetHandle>,
    pub starfield: StarfieldHandle,
}

impl SceneHandles {
    /// Look up a planet by its configured id.
    pub fn planet(&self, id: &str) -> Option<&PlanetHandle> {
        self.planets.iter().find(|p| p.id == id)
    }

    pub fn planet_ids(&self) -> impl Iterator<Item = &str> {
        self.planets.iter().map(|p| p.id.as_str())
    }

    pub fn arcs(&self) -> Option<&PlasmaArcGroup> {
        self.sun.arcs.as_ref()
    }

    /// Every node referenced by any handle.
    pub fn nodes(&self) -> Vec<NodeId> {
        let mut nodes = vec![self.sun.node, self.glow.node, self.starfield.node];
        if let Some(arcs) = &self.sun.arcs {
            nodes.push(arcs.group);
            nodes.extend(&arcs.arcs);
        }
        nodes.extend(self.flare.map(|f| f.node));
        for planet in &self.planets {
            nodes.extend(planet.nodes());
        }
        nodes
    }
}
