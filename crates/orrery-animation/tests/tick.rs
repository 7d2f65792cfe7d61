use std::f32::consts::TAU;

use glam::{Mat4, Quat, Vec3};
use orrery_animation::{AnimationUpdater, UpdateError, arc_opacity};
use orrery_config::{Config, PlanetSpec};
use orrery_materials::{MaterialCatalog, ShaderLibrary, names, programs};
use orrery_scene::{Camera, Node, NodeId, SceneError, SceneGraph, SceneId, SceneRoot};
use orrery_space::{SceneGraphBuilder, SceneHandles};

fn catalog() -> MaterialCatalog {
    let mut library = ShaderLibrary::new();
    for name in programs::ALL {
        library.load_from_source(name, "void main() {}", "void main() {}");
    }
    MaterialCatalog::new(library)
}

fn single_planet_scene(angular_speed: f32) -> (SceneGraph, SceneHandles) {
    let mut config = Config {
        seed: Some(3),
        ..Config::default()
    };
    config.solar_system.planets = vec![PlanetSpec::new("planet1", 0, "A", 1.0, 5.0, angular_speed)];
    let mut scene = SceneGraph::new();
    let handles = SceneGraphBuilder::new(catalog())
        .build(&config, &mut scene)
        .unwrap();
    (scene, handles)
}

fn angle_diff(a: f32, b: f32) -> f32 {
    let d = (a - b).rem_euclid(TAU);
    d.min(TAU - d)
}

#[test]
fn orbit_rotation_is_independent_of_batching() {
    let updater = AnimationUpdater::default();
    let (mut stepped, stepped_handles) = single_planet_scene(0.01);
    let (mut batched, batched_handles) = single_planet_scene(0.01);

    for frame in 1..=100 {
        let elapsed = frame as f32 / 60.0;
        updater
            .tick(&stepped_handles, &mut stepped, None, elapsed, 1.0 / 60.0)
            .unwrap();
    }
    updater
        .tick(&batched_handles, &mut batched, None, 100.0 / 60.0, 100.0 / 60.0)
        .unwrap();

    let a = stepped_handles.planets[0].orbit_angle(&stepped).unwrap();
    let b = batched_handles.planets[0].orbit_angle(&batched).unwrap();
    assert!(angle_diff(a, 1.0) < 1e-3, "stepped angle {a}");
    assert!(angle_diff(b, 1.0) < 1e-3, "batched angle {b}");
    assert!(angle_diff(a, b) < 1e-3);
}

#[test]
fn high_frame_rate_keeps_orbital_speed() {
    let updater = AnimationUpdater::default();
    let (mut scene, handles) = single_planet_scene(0.01);
    // One second at 144 fps is 60 reference ticks.
    for frame in 1..=144 {
        updater
            .tick(&handles, &mut scene, None, frame as f32 / 144.0, 1.0 / 144.0)
            .unwrap();
    }
    let angle = handles.planets[0].orbit_angle(&scene).unwrap();
    assert!(angle_diff(angle, 0.6) < 1e-3, "angle {angle}");
}

#[test]
fn orbit_moves_planet_but_keeps_radius() {
    let updater = AnimationUpdater::default();
    let (mut scene, handles) = single_planet_scene(0.05);
    let planet = &handles.planets[0];
    let before = planet.world_position(&scene).unwrap();
    assert!((before - Vec3::new(5.0, 0.0, 0.0)).length() < 1e-5);

    updater.tick(&handles, &mut scene, None, 0.5, 0.5).unwrap();
    let after = planet.world_position(&scene).unwrap();
    assert!((after.length() - 5.0).abs() < 1e-4);
    assert!(after.y.abs() < 1e-5);
    assert!((after - before).length() > 0.1);
    // The orbit frame's own offset never changes.
    assert_eq!(
        scene.node(planet.orbit_frame).unwrap().transform.translation,
        Vec3::new(5.0, 0.0, 0.0)
    );
}

#[test]
fn spin_turns_body_only() {
    let mut config = Config {
        seed: Some(3),
        ..Config::default()
    };
    let mut ringed = PlanetSpec::new("planet2", 0, "B", 1.0, 5.0, 0.01);
    ringed.with_ring = true;
    ringed.spin_speed = 0.02;
    config.solar_system.planets = vec![ringed];
    let mut scene = SceneGraph::new();
    let handles = SceneGraphBuilder::new(catalog())
        .build(&config, &mut scene)
        .unwrap();
    let planet = &handles.planets[0];
    let ring = planet.ring.expect("ring program is loaded");
    let ring_before = scene.node(ring).unwrap().transform.rotation;

    // Half a second is 30 reference ticks.
    AnimationUpdater::default()
        .tick(&handles, &mut scene, None, 0.5, 0.5)
        .unwrap();

    let body = scene.node(planet.body).unwrap().transform.rotation;
    assert!(body.angle_between(Quat::from_rotation_y(0.6)) < 1e-4, "{body:?}");
    assert_eq!(scene.node(ring).unwrap().transform.rotation, ring_before);
    assert_eq!(
        scene.node(planet.orbit_frame).unwrap().transform.rotation,
        Quat::IDENTITY
    );

    let orbit = Quat::from_rotation_y(0.3) * Vec3::new(5.0, 0.0, 0.0);
    let position = planet.world_position(&scene).unwrap();
    assert!((position - orbit).length() < 1e-4, "{position}");
    assert!(angle_diff(planet.orbit_angle(&scene).unwrap(), 0.3) < 1e-4);
}

#[test]
fn arc_opacity_follows_elapsed_time() {
    let updater = AnimationUpdater::default();
    let (mut scene, handles) = single_planet_scene(0.0);
    updater.tick(&handles, &mut scene, None, 0.0, 0.0).unwrap();

    let arcs = handles.arcs().unwrap();
    for (i, &arc) in arcs.arcs.iter().enumerate() {
        let material = scene.node(arc).unwrap().material().unwrap();
        let opacity = material.opacity().unwrap();
        assert!((opacity - arc_opacity(0.0, i)).abs() < 1e-6);
        assert!((0.2..=1.0).contains(&opacity));
    }
    let third = scene.node(arcs.arcs[2]).unwrap().material().unwrap();
    assert!((third.opacity().unwrap() - (0.6 + 0.4 * 2f32.sin())).abs() < 1e-6);
}

#[test]
fn repeated_elapsed_gives_same_opacity() {
    let updater = AnimationUpdater::default();
    let (mut scene, handles) = single_planet_scene(0.0);
    let arc = handles.arcs().unwrap().arcs[1];
    updater.tick(&handles, &mut scene, None, 1.25, 0.0).unwrap();
    let first = scene.node(arc).unwrap().material().unwrap().opacity();
    updater.tick(&handles, &mut scene, None, 1.25, 0.0).unwrap();
    let second = scene.node(arc).unwrap().material().unwrap().opacity();
    assert_eq!(first, second);
}

#[test]
fn time_and_view_uniforms_are_refreshed() {
    let updater = AnimationUpdater::default();
    let (mut scene, handles) = single_planet_scene(0.0);
    let camera = Camera::looking_at(Vec3::new(0.0, 10.0, 40.0), Vec3::ZERO);

    updater
        .tick(&handles, &mut scene, Some(&camera), 2.5, 1.0 / 60.0)
        .unwrap();

    let sun = scene.node(handles.sun.node).unwrap().material().unwrap();
    assert_eq!(sun.uniforms.float(names::TIME), Some(2.5));
    let body = scene.node(handles.planets[0].body).unwrap().material().unwrap();
    assert_eq!(body.uniforms.float(names::TIME), Some(2.5));

    let glow = scene.node(handles.glow.node).unwrap().material().unwrap();
    let view = glow.uniforms.vec3(names::VIEW_VECTOR).unwrap();
    assert!((view - Vec3::new(0.0, 10.0, 40.0)).length() < 1e-5);

    // Built-in arc materials declare no time uniform and must not gain one.
    let arc = handles.arcs().unwrap().arcs[0];
    assert!(!scene.node(arc).unwrap().material().unwrap().uniforms.contains(names::TIME));
}

#[test]
fn handles_from_another_scene_are_rejected() {
    let updater = AnimationUpdater::default();
    let (_, handles) = single_planet_scene(0.01);
    let (mut other, _) = single_planet_scene(0.01);
    let err = updater
        .tick(&handles, &mut other, None, 0.0, 1.0 / 60.0)
        .unwrap_err();
    assert!(matches!(err, UpdateError::ForeignScene { .. }));
}

#[test]
fn non_finite_time_is_rejected() {
    let updater = AnimationUpdater::default();
    let (mut scene, handles) = single_planet_scene(0.01);
    assert!(matches!(
        updater.tick(&handles, &mut scene, None, f32::NAN, 0.0),
        Err(UpdateError::InvalidTime { .. })
    ));
    assert_eq!(handles.planets[0].orbit_angle(&scene), Some(0.0));
}

/// A scene root that has lost one node.
struct Pruned {
    inner: SceneGraph,
    hidden: NodeId,
}

impl SceneRoot for Pruned {
    fn id(&self) -> SceneId {
        self.inner.id()
    }

    fn insert(&mut self, node: Node) -> NodeId {
        self.inner.insert(node)
    }

    fn add(&mut self, id: NodeId) -> Result<(), SceneError> {
        self.inner.add(id)
    }

    fn set_parent(&mut self, child: NodeId, parent: NodeId) -> Result<(), SceneError> {
        self.inner.set_parent(child, parent)
    }

    fn node(&self, id: NodeId) -> Option<&Node> {
        (id != self.hidden).then(|| self.inner.node(id)).flatten()
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        if id == self.hidden {
            None
        } else {
            self.inner.node_mut(id)
        }
    }

    fn world_transform(&self, id: NodeId) -> Option<Mat4> {
        (id != self.hidden)
            .then(|| self.inner.world_transform(id))
            .flatten()
    }
}

#[test]
fn missing_node_is_fatal_and_nothing_moves() {
    let updater = AnimationUpdater::default();
    let (inner, handles) = single_planet_scene(0.01);
    let planet = handles.planets[0].clone();
    let mut scene = Pruned {
        inner,
        hidden: planet.body,
    };

    let err = updater
        .tick(&handles, &mut scene, None, 1.0, 1.0)
        .unwrap_err();
    assert_eq!(err, UpdateError::MissingNode(planet.body));
    assert_eq!(
        scene.inner.node(planet.pivot).unwrap().transform.rotation,
        Quat::IDENTITY
    );
}
