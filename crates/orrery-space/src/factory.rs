//! Composes geometry and materials into positioned, parented scene nodes.
//!
//! Spheres come from the shared cache at unit radius and are scaled at the
//! node. Rings and flares are generated at their final radii so their width
//! is not distorted by a node scale.
//!
//! Each body is split into a `*_geometry` step on the factory, which can fail,
//! and a `place_*` step, which only inserts nodes. The `build_*` methods run
//! both for one body; the scene builder runs every geometry step first.

use std::f32::consts::{FRAC_PI_2, TAU};
use std::sync::Arc;

use glam::{EulerRot, Quat, Vec3};
use orrery_config::{ArcSpec, PlanetSpec, StarfieldSpec, SunSpec};
use orrery_materials::Material;
use orrery_mesh::{GeometryCache, GeometryHandle};
use orrery_scene::{Node, NodeId, SceneRoot, Transform};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::error::BuildError;
use crate::handles::{
    FlareHandle, GlowHandle, PlanetHandle, PlasmaArcGroup, StarfieldHandle, SunHandle,
};
use crate::plasma::{arc_points, arc_start_angle};
use crate::starfield::StarfieldGenerator;

/// Glow sphere radius is the sun's size plus this.
pub const GLOW_MARGIN: f32 = 0.6;
/// Flare ring spans `[size + 0.4, size + 0.6]`.
pub const FLARE_INNER_OFFSET: f32 = 0.4;
pub const FLARE_OUTER_OFFSET: f32 = 0.6;
/// Planet ring inner radius is `size + RING_INNER_OFFSET`.
pub const RING_INNER_OFFSET: f32 = 0.1;
/// Planet ring outer radius is `size * RING_OUTER_FACTOR`.
pub const RING_OUTER_FACTOR: f32 = 1.3;
/// Narrowest ring emitted when the outer factor would collapse it.
pub const RING_MIN_WIDTH: f32 = 0.05;

/// Segment counts used for every generated mesh.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tessellation {
    pub sphere_width: u32,
    pub sphere_height: u32,
    pub ring_segments: u32,
    pub arc_tube_segments: u32,
    pub arc_tube_radius: f32,
    pub arc_radial_segments: u32,
}

impl Default for Tessellation {
    fn default() -> Self {
        Self {
            sphere_width: 32,
            sphere_height: 32,
            ring_segments: 64,
            arc_tube_segments: 64,
            arc_tube_radius: 0.01,
            arc_radial_segments: 8,
        }
    }
}

/// Inner and outer radius of a planetary ring for a planet of `size`.
pub fn ring_radii(size: f32) -> (f32, f32) {
    let inner = size + RING_INNER_OFFSET;
    let outer = size * RING_OUTER_FACTOR;
    if outer > inner {
        (inner, outer)
    } else {
        (inner, inner + RING_MIN_WIDTH)
    }
}

/// Builds sun, glow, flare, plasma arcs, planets and the starfield.
///
/// Owns the geometry cache and the random source for cosmetic jitter and star
/// placement. Inject a seeded RNG for reproducible scenes.
pub struct CelestialBodyFactory<R = ChaCha8Rng> {
    cache: GeometryCache,
    tessellation: Tessellation,
    rng: R,
    arc_jitter: bool,
}

impl CelestialBodyFactory<ChaCha8Rng> {
    /// Factory seeded from OS entropy.
    pub fn new() -> Self {
        Self::with_rng(ChaCha8Rng::from_os_rng())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(ChaCha8Rng::seed_from_u64(seed))
    }
}

impl Default for CelestialBodyFactory<ChaCha8Rng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> CelestialBodyFactory<R> {
    pub fn with_rng(rng: R) -> Self {
        Self {
            cache: GeometryCache::new(),
            tessellation: Tessellation::default(),
            rng,
            arc_jitter: true,
        }
    }

    pub fn with_tessellation(mut self, tessellation: Tessellation) -> Self {
        self.tessellation = tessellation;
        self
    }

    pub fn set_rng(&mut self, rng: R) {
        self.rng = rng;
    }

    /// Enable or disable the random initial rotation of plasma arcs.
    pub fn set_arc_jitter(&mut self, enabled: bool) {
        self.arc_jitter = enabled;
    }

    pub fn tessellation(&self) -> Tessellation {
        self.tessellation
    }

    pub fn cache(&self) -> &GeometryCache {
        &self.cache
    }

    fn unit_sphere(&mut self) -> Result<GeometryHandle, BuildError> {
        let t = self.tessellation;
        Ok(self.cache.sphere(1.0, t.sphere_width, t.sphere_height)?)
    }

    /// Sun sphere plus one tube per plasma arc, with arc jitter drawn now.
    pub fn sun_geometry(&mut self, spec: &SunSpec) -> Result<SunGeometry, BuildError> {
        let body = self.unit_sphere()?;
        let arcs = match &spec.arcs {
            Some(arcs) if arcs.amount > 0 => Some(self.arc_meshes(arcs)?),
            _ => None,
        };
        Ok(SunGeometry { body, arcs })
    }

    /// Unit sphere scaled at the node to `size + GLOW_MARGIN`.
    pub fn glow_geometry(&mut self) -> Result<GeometryHandle, BuildError> {
        self.unit_sphere()
    }

    pub fn flare_geometry(&mut self, spec: &SunSpec) -> Result<GeometryHandle, BuildError> {
        Ok(self.cache.ring(
            spec.size + FLARE_INNER_OFFSET,
            spec.size + FLARE_OUTER_OFFSET,
            self.tessellation.ring_segments,
        )?)
    }

    /// Body sphere, and ring geometry when `spec.with_ring` and `ringed` are both set.
    pub fn planet_geometry(
        &mut self,
        spec: &PlanetSpec,
        ringed: bool,
    ) -> Result<PlanetGeometry, BuildError> {
        let body = self.unit_sphere()?;
        let ring = if spec.with_ring && ringed {
            let (inner, outer) = ring_radii(spec.size);
            Some(
                self.cache
                    .ring(inner, outer, self.tessellation.ring_segments)?,
            )
        } else {
            None
        };
        Ok(PlanetGeometry { body, ring })
    }

    /// Star positions, drawn from the factory's RNG.
    pub fn starfield_cloud(&mut self, spec: &StarfieldSpec) -> Arc<[Vec3]> {
        StarfieldGenerator::new(spec.amount, spec.distance.min, spec.distance.max)
            .generate(&mut self.rng)
            .into()
    }

    /// Emissive sun at the origin, plus its plasma arcs if any are configured.
    ///
    /// The arc group is attached to the scene root at the sun's position, not
    /// parented to the sun mesh.
    pub fn build_sun(
        &mut self,
        spec: &SunSpec,
        material: Material,
        arc_material: &Material,
        scene: &mut dyn SceneRoot,
    ) -> Result<SunHandle, BuildError> {
        let geometry = self.sun_geometry(spec)?;
        place_sun(spec, geometry, material, arc_material, scene)
    }

    /// A standalone plasma arc bundle at `anchor`.
    pub fn build_plasma_arcs(
        &mut self,
        spec: &ArcSpec,
        anchor: Vec3,
        material: &Material,
        scene: &mut dyn SceneRoot,
    ) -> Result<PlasmaArcGroup, BuildError> {
        let meshes = self.arc_meshes(spec)?;
        attach_arcs(meshes, anchor, material, scene)
    }

    fn arc_meshes(&mut self, spec: &ArcSpec) -> Result<Vec<(GeometryHandle, Quat)>, BuildError> {
        let t = self.tessellation;
        let mut meshes = Vec::with_capacity(spec.amount as usize);
        for i in 0..spec.amount {
            let points = arc_points(
                spec.radius,
                spec.height,
                arc_start_angle(i, spec.amount, spec.angle),
            );
            let geometry = self.cache.tube_along_points(
                &points,
                t.arc_tube_segments,
                t.arc_tube_radius,
                t.arc_radial_segments,
                false,
            )?;
            let rotation = if self.arc_jitter {
                Quat::from_euler(
                    EulerRot::XYZ,
                    self.rng.random::<f32>() * TAU,
                    self.rng.random::<f32>() * TAU,
                    self.rng.random::<f32>() * TAU,
                )
            } else {
                Quat::IDENTITY
            };
            meshes.push((geometry, rotation));
        }
        Ok(meshes)
    }

    /// Back-lit halo sphere of radius `size + GLOW_MARGIN`, placed at a copy
    /// of `anchor`. It does not follow the anchor afterwards.
    pub fn build_sun_glow(
        &mut self,
        spec: &SunSpec,
        material: Material,
        anchor: Vec3,
        scene: &mut dyn SceneRoot,
    ) -> Result<GlowHandle, BuildError> {
        let geometry = self.glow_geometry()?;
        place_sun_glow(spec, geometry, material, anchor, scene)
    }

    /// Flat flare ring around the sun, turned into the horizontal plane.
    pub fn build_solar_flare(
        &mut self,
        spec: &SunSpec,
        material: Material,
        scene: &mut dyn SceneRoot,
    ) -> Result<FlareHandle, BuildError> {
        let geometry = self.flare_geometry(spec)?;
        place_solar_flare(geometry, material, scene)
    }

    /// Pivot, orbit frame, body and optional ring for one planet.
    ///
    /// A ringed planet without a ring material gets no ring.
    pub fn build_planet(
        &mut self,
        spec: &PlanetSpec,
        material: Material,
        ring_material: Option<Material>,
        scene: &mut dyn SceneRoot,
    ) -> Result<PlanetHandle, BuildError> {
        let geometry = self.planet_geometry(spec, ring_material.is_some())?;
        place_planet(spec, geometry, material, ring_material, scene)
    }

    /// Point cloud of `spec.amount` stars, generated once.
    pub fn build_starfield(
        &mut self,
        spec: &StarfieldSpec,
        material: Material,
        scene: &mut dyn SceneRoot,
    ) -> Result<StarfieldHandle, BuildError> {
        let cloud = self.starfield_cloud(spec);
        place_starfield(cloud, material, scene)
    }
}

/// Sun geometry generated ahead of placement.
#[derive(Clone)]
pub struct SunGeometry {
    pub body: GeometryHandle,
    /// One tube and its initial rotation per arc.
    pub arcs: Option<Vec<(GeometryHandle, Quat)>>,
}

#[derive(Clone)]
pub struct PlanetGeometry {
    pub body: GeometryHandle,
    pub ring: Option<GeometryHandle>,
}

// Placement only inserts nodes. Geometry errors cannot happen past this point.

pub fn place_sun(
    spec: &SunSpec,
    geometry: SunGeometry,
    material: Material,
    arc_material: &Material,
    scene: &mut dyn SceneRoot,
) -> Result<SunHandle, BuildError> {
    let transform = Transform::IDENTITY.with_uniform_scale(spec.size);
    let sun_position = transform.translation;
    let node = scene.insert(Node::mesh("sun", geometry.body, material).with_transform(transform));
    scene.add(node)?;
    log::debug!("Built sun (size {})", spec.size);

    let arcs = match geometry.arcs {
        Some(meshes) => Some(attach_arcs(meshes, sun_position, arc_material, scene)?),
        None => None,
    };
    Ok(SunHandle { node, arcs })
}

pub fn place_sun_glow(
    spec: &SunSpec,
    geometry: GeometryHandle,
    material: Material,
    anchor: Vec3,
    scene: &mut dyn SceneRoot,
) -> Result<GlowHandle, BuildError> {
    let transform =
        Transform::from_translation(anchor).with_uniform_scale(spec.size + GLOW_MARGIN);
    let node = scene.insert(Node::mesh("sun_glow", geometry, material).with_transform(transform));
    scene.add(node)?;
    log::debug!("Built sun glow at {anchor}");
    Ok(GlowHandle { node })
}

pub fn place_solar_flare(
    geometry: GeometryHandle,
    material: Material,
    scene: &mut dyn SceneRoot,
) -> Result<FlareHandle, BuildError> {
    let transform = Transform::from_rotation(Quat::from_rotation_x(FRAC_PI_2));
    let node =
        scene.insert(Node::mesh("solar_flare", geometry, material).with_transform(transform));
    scene.add(node)?;
    log::debug!("Built solar flare");
    Ok(FlareHandle { node })
}

pub fn place_planet(
    spec: &PlanetSpec,
    geometry: PlanetGeometry,
    material: Material,
    ring_material: Option<Material>,
    scene: &mut dyn SceneRoot,
) -> Result<PlanetHandle, BuildError> {
    let ring_parts = match (spec.with_ring, geometry.ring, ring_material) {
        (true, Some(ring_geometry), Some(ring_material)) => Some((ring_geometry, ring_material)),
        (true, _, _) => {
            log::debug!("Planet '{}' has no ring material, omitting ring", spec.id);
            None
        }
        (false, _, _) => None,
    };

    let pivot = scene.insert(Node::group(format!("{}/pivot", spec.id)));
    let orbit_frame = scene.insert(
        Node::group(format!("{}/orbit", spec.id)).with_transform(Transform::from_translation(
            Vec3::new(spec.orbit_radius, 0.0, 0.0),
        )),
    );
    let body = scene.insert(
        Node::mesh(spec.id.clone(), geometry.body, material)
            .with_transform(Transform::IDENTITY.with_uniform_scale(spec.size)),
    );
    scene.set_parent(orbit_frame, pivot)?;
    scene.set_parent(body, orbit_frame)?;

    let ring = match ring_parts {
        Some((ring_geometry, ring_material)) => {
            let id = scene.insert(
                Node::mesh(format!("{}/ring", spec.id), ring_geometry, ring_material)
                    .with_transform(Transform::from_rotation(Quat::from_rotation_x(-FRAC_PI_2))),
            );
            scene.set_parent(id, orbit_frame)?;
            Some(id)
        }
        None => None,
    };
    scene.add(pivot)?;

    log::debug!(
        "Built planet '{}' at orbit radius {} (ring: {})",
        spec.id,
        spec.orbit_radius,
        ring.is_some()
    );
    Ok(PlanetHandle {
        id: spec.id.clone(),
        label: spec.label.clone(),
        title: spec.title.clone(),
        description: spec.description.clone(),
        pivot,
        orbit_frame,
        body,
        ring,
        angular_speed: spec.angular_speed,
        spin_speed: spec.spin_speed,
    })
}

pub fn place_starfield(
    cloud: Arc<[Vec3]>,
    material: Material,
    scene: &mut dyn SceneRoot,
) -> Result<StarfieldHandle, BuildError> {
    let node = scene.insert(Node::points("starfield", cloud.clone(), material));
    scene.add(node)?;
    log::debug!("Built starfield with {} stars", cloud.len());
    Ok(StarfieldHandle { node, cloud })
}

fn attach_arcs(
    meshes: Vec<(GeometryHandle, Quat)>,
    anchor: Vec3,
    material: &Material,
    scene: &mut dyn SceneRoot,
) -> Result<PlasmaArcGroup, BuildError> {
    let group = scene.insert(
        Node::group("plasma_arcs").with_transform(Transform::from_translation(anchor)),
    );
    let mut arcs = Vec::with_capacity(meshes.len());
    for (i, (geometry, rotation)) in meshes.into_iter().enumerate() {
        let arc = scene.insert(
            Node::mesh(format!("plasma_arc/{i}"), geometry, material.clone())
                .with_transform(Transform::from_rotation(rotation)),
        );
        scene.set_parent(arc, group)?;
        arcs.push(arc);
    }
    scene.add(group)?;
    log::debug!("Built {} plasma arcs", arcs.len());
    Ok(PlasmaArcGroup { group, arcs })
}

/// Node ids in `group` that carry a visual, for tests and tooling.
pub fn visual_children(scene: &dyn SceneRoot, group: NodeId) -> Vec<NodeId> {
    scene
        .node(group)
        .map(|node| {
            node.children()
                .iter()
                .copied()
                .filter(|&c| scene.node(c).is_some_and(|n| n.visual.is_some()))
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use orrery_config::Config;
    use orrery_materials::{MaterialVariant, UniformBundle};
    use orrery_scene::SceneGraph;

    fn material(variant: MaterialVariant) -> Material {
        Material {
            variant,
            program: None,
            uniforms: UniformBundle::new(),
        }
    }

    fn origin(scene: &SceneGraph, id: NodeId) -> Vec3 {
        scene.world_transform(id).unwrap().transform_point3(Vec3::ZERO)
    }

    #[test]
    fn test_sun_is_scaled_unit_sphere_with_arcs() {
        let mut factory = CelestialBodyFactory::seeded(1);
        let mut scene = SceneGraph::new();
        let spec = Config::default().solar_system.sun;

        let sun = factory
            .build_sun(
                &spec,
                material(MaterialVariant::Sun),
                &material(MaterialVariant::PlasmaArc),
                &mut scene,
            )
            .unwrap();

        let node = scene.node(sun.node).unwrap();
        assert_eq!(node.transform.scale, Vec3::splat(2.2));
        assert!(node.cast_shadow && node.receive_shadow);

        let arcs = sun.arcs.expect("default sun has arcs");
        assert_eq!(arcs.arcs.len(), 6);
        assert_eq!(visual_children(&scene, arcs.group), arcs.arcs);
        // Attached to the root at the sun's position, not under the sun.
        assert!(scene.roots().contains(&arcs.group));
        assert!(scene.node(sun.node).unwrap().children().is_empty());
        assert_eq!(origin(&scene, arcs.group), Vec3::ZERO);
    }

    #[test]
    fn test_sun_without_arcs() {
        let mut factory = CelestialBodyFactory::seeded(1);
        let mut scene = SceneGraph::new();
        let mut spec = Config::default().solar_system.sun;
        spec.arcs = None;
        let sun = factory
            .build_sun(
                &spec,
                material(MaterialVariant::Sun),
                &material(MaterialVariant::PlasmaArc),
                &mut scene,
            )
            .unwrap();
        assert!(sun.arcs.is_none());
        assert_eq!(scene.len(), 1);
    }

    #[test]
    fn test_arc_jitter_is_seeded_and_can_be_disabled() {
        let spec = Config::default().solar_system.sun.arcs.unwrap();
        let arc_mat = material(MaterialVariant::PlasmaArc);
        let rotations = |factory: &mut CelestialBodyFactory| {
            let mut scene = SceneGraph::new();
            let group = factory
                .build_plasma_arcs(&spec, Vec3::ZERO, &arc_mat, &mut scene)
                .unwrap();
            group
                .arcs
                .iter()
                .map(|&a| scene.node(a).unwrap().transform.rotation)
                .collect::<Vec<_>>()
        };

        let a = rotations(&mut CelestialBodyFactory::seeded(9));
        let b = rotations(&mut CelestialBodyFactory::seeded(9));
        assert_eq!(a, b);
        assert!(a.iter().any(|q| *q != Quat::IDENTITY));

        let mut still = CelestialBodyFactory::seeded(9);
        still.set_arc_jitter(false);
        assert!(rotations(&mut still).iter().all(|q| *q == Quat::IDENTITY));
    }

    #[test]
    fn test_glow_copies_anchor_and_adds_margin() {
        let mut factory = CelestialBodyFactory::seeded(1);
        let mut scene = SceneGraph::new();
        let spec = Config::default().solar_system.sun;
        let anchor = Vec3::new(1.0, 2.0, 3.0);
        let glow = factory
            .build_sun_glow(&spec, material(MaterialVariant::Glow), anchor, &mut scene)
            .unwrap();
        let node = scene.node(glow.node).unwrap();
        assert_eq!(node.transform.translation, anchor);
        assert!((node.transform.scale.x - 2.8).abs() < 1e-6);
    }

    #[test]
    fn test_flare_ring_radii_and_orientation() {
        let mut factory = CelestialBodyFactory::seeded(1);
        let mut scene = SceneGraph::new();
        let spec = Config::default().solar_system.sun;
        let flare = factory
            .build_solar_flare(&spec, material(MaterialVariant::Flare), &mut scene)
            .unwrap();
        let node = scene.node(flare.node).unwrap();
        let Some(orrery_scene::Visual::Mesh { geometry, .. }) = &node.visual else {
            panic!("flare should be a mesh");
        };
        let radii: Vec<f32> = geometry
            .positions
            .iter()
            .map(|p| p.length())
            .collect();
        let min = radii.iter().copied().fold(f32::MAX, f32::min);
        let max = radii.iter().copied().fold(f32::MIN, f32::max);
        assert!((min - 2.6).abs() < 1e-4);
        assert!((max - 2.8).abs() < 1e-4);
        // Ring normal (+Z) ends up pointing along -Y.
        let normal = node.transform.rotation * Vec3::Z;
        assert!((normal - Vec3::NEG_Y).length() < 1e-5);
    }

    #[test]
    fn test_planet_orbit_frame_offset_and_ring_parent() {
        let mut factory = CelestialBodyFactory::seeded(1);
        let mut scene = SceneGraph::new();
        let mut spec = PlanetSpec::new("planet2", 1, "Blog", 1.0, 8.0, 0.008);
        spec.with_ring = true;

        let planet = factory
            .build_planet(
                &spec,
                material(MaterialVariant::Planet),
                Some(material(MaterialVariant::Ring)),
                &mut scene,
            )
            .unwrap();

        let frame = scene.node(planet.orbit_frame).unwrap();
        assert_eq!(frame.transform.translation, Vec3::new(8.0, 0.0, 0.0));
        assert_eq!(frame.parent(), Some(planet.pivot));

        let ring = planet.ring.expect("ring requested and available");
        assert_eq!(scene.node(ring).unwrap().parent(), Some(planet.orbit_frame));
        assert_eq!(scene.node(ring).unwrap().transform.scale, Vec3::ONE);
        assert_eq!(scene.node(planet.body).unwrap().parent(), Some(planet.orbit_frame));
        assert_eq!(scene.node(planet.body).unwrap().transform.scale, Vec3::ONE);

        assert_eq!(scene.roots(), &[planet.pivot]);
        assert!((origin(&scene, planet.body) - Vec3::new(8.0, 0.0, 0.0)).length() < 1e-6);
        assert_eq!(planet.orbit_angle(&scene), Some(0.0));
    }

    #[test]
    fn test_ringed_planet_without_ring_material() {
        let mut factory = CelestialBodyFactory::seeded(1);
        let mut scene = SceneGraph::new();
        let mut spec = PlanetSpec::new("planet2", 1, "Blog", 1.0, 8.0, 0.008);
        spec.with_ring = true;
        let planet = factory
            .build_planet(&spec, material(MaterialVariant::Planet), None, &mut scene)
            .unwrap();
        assert!(planet.ring.is_none());
        assert_eq!(scene.node(planet.orbit_frame).unwrap().children(), &[planet.body]);
    }

    #[test]
    fn test_ring_radii() {
        let (inner, outer) = ring_radii(1.0);
        assert!((inner - 1.1).abs() < 1e-6);
        assert!((outer - 1.3).abs() < 1e-6);
        let (inner, outer) = ring_radii(0.2);
        assert!(outer > inner);
        assert!((outer - inner - RING_MIN_WIDTH).abs() < 1e-6);
    }

    #[test]
    fn test_bodies_share_one_unit_sphere() {
        let mut factory = CelestialBodyFactory::seeded(1);
        let mut scene = SceneGraph::new();
        for (i, size) in [0.7, 1.0, 1.3].into_iter().enumerate() {
            let spec = PlanetSpec::new(format!("p{i}"), i as i32, "", size, 5.0, 0.0);
            factory
                .build_planet(&spec, material(MaterialVariant::Planet), None, &mut scene)
                .unwrap();
        }
        assert_eq!(factory.cache().len(), 1);
        assert_eq!(factory.cache().stats().hits, 2);
    }

    #[test]
    fn test_starfield_is_committed_once() {
        let mut factory = CelestialBodyFactory::seeded(5);
        let mut scene = SceneGraph::new();
        let spec = StarfieldSpec::default();
        let stars = factory
            .build_starfield(&spec, material(MaterialVariant::Points), &mut scene)
            .unwrap();
        assert_eq!(stars.cloud.len(), 2500);
        let Some(orrery_scene::Visual::Points { cloud, .. }) = &scene.node(stars.node).unwrap().visual
        else {
            panic!("starfield should be a point cloud");
        };
        assert!(Arc::ptr_eq(cloud, &stars.cloud));
        assert!(!scene.node(stars.node).unwrap().cast_shadow);
    }
}
