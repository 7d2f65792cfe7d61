//! Turns a whole [`Config`] into scene nodes and handles.

use std::sync::Arc;

use glam::Vec3;
use orrery_config::{Config, ConfigError, RingPolicy};
use orrery_materials::{BaseUniforms, DEFAULT_GLOW_COLOR, Material, MaterialCatalog, programs};
use orrery_mesh::GeometryHandle;
use orrery_scene::SceneRoot;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::error::BuildError;
use crate::factory::{
    CelestialBodyFactory, PlanetGeometry, SunGeometry, Tessellation, place_planet,
    place_solar_flare, place_starfield, place_sun, place_sun_glow,
};
use crate::handles::SceneHandles;
use crate::plasma::ARC_COLOR;

/// Star point sprite size.
pub const STAR_POINT_SIZE: f32 = 0.05;
/// Star point opacity.
pub const STAR_OPACITY: f32 = 0.8;

/// Materials for every node, resolved before any node is inserted.
struct PreparedMaterials {
    sun: Material,
    glow: Material,
    flare: Option<Material>,
    arc: Material,
    planets: Vec<(Material, Option<Material>)>,
    stars: Material,
}

/// Geometry and star positions for every node, generated before any node is inserted.
struct PreparedGeometry {
    sun: SunGeometry,
    glow: GeometryHandle,
    flare: Option<GeometryHandle>,
    planets: Vec<PlanetGeometry>,
    stars: Arc<[Vec3]>,
}

/// Builds a complete solar system into a scene root.
///
/// Construction is all-or-nothing: the configuration is validated, every
/// material is bound and every mesh is generated before the first node is added.
pub struct SceneGraphBuilder {
    catalog: MaterialCatalog,
    factory: CelestialBodyFactory,
}

impl SceneGraphBuilder {
    pub fn new(catalog: MaterialCatalog) -> Self {
        Self {
            catalog,
            factory: CelestialBodyFactory::new(),
        }
    }

    pub fn with_tessellation(mut self, tessellation: Tessellation) -> Self {
        self.factory = self.factory.with_tessellation(tessellation);
        self
    }

    pub fn catalog(&self) -> &MaterialCatalog {
        &self.catalog
    }

    pub fn factory(&self) -> &CelestialBodyFactory {
        &self.factory
    }

    /// Build every body described by `config` into `scene`.
    ///
    /// Planets are built in `order_index` order. `config.seed` fixes star
    /// placement and arc jitter.
    pub fn build(
        &mut self,
        config: &Config,
        scene: &mut dyn SceneRoot,
    ) -> Result<SceneHandles, BuildError> {
        config.validate()?;
        let materials = self.prepare_materials(config)?;

        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_os_rng(),
        };
        self.factory.set_rng(rng);
        self.factory.set_arc_jitter(config.animation.arc_jitter);

        let geometry = self.prepare_geometry(config, &materials)?;

        let sun_spec = &config.solar_system.sun;
        let sun = place_sun(sun_spec, geometry.sun, materials.sun, &materials.arc, scene)?;
        let anchor = scene
            .node(sun.node)
            .map(|n| n.transform.translation)
            .unwrap_or(Vec3::ZERO);
        let glow = place_sun_glow(sun_spec, geometry.glow, materials.glow, anchor, scene)?;
        let flare = match (geometry.flare, materials.flare) {
            (Some(mesh), Some(material)) => Some(place_solar_flare(mesh, material, scene)?),
            _ => None,
        };

        let mut planets = Vec::with_capacity(materials.planets.len());
        for ((spec, mesh), (material, ring_material)) in config
            .planets_in_order()
            .into_iter()
            .zip(geometry.planets)
            .zip(materials.planets)
        {
            planets.push(place_planet(spec, mesh, material, ring_material, scene)?);
        }

        let starfield = place_starfield(geometry.stars, materials.stars, scene)?;

        log::info!(
            "Built solar system: {} planets, {} plasma arcs, {} stars",
            planets.len(),
            sun.arcs.as_ref().map_or(0, |a| a.arcs.len()),
            starfield.cloud.len()
        );

        Ok(SceneHandles {
            scene_id: scene.id(),
            sun,
            glow,
            flare,
            planets,
            starfield,
        })
    }

    /// Arc jitter is drawn before star positions, so a seed fixes both.
    fn prepare_geometry(
        &mut self,
        config: &Config,
        materials: &PreparedMaterials,
    ) -> Result<PreparedGeometry, BuildError> {
        let sun_spec = &config.solar_system.sun;
        let sun = self.factory.sun_geometry(sun_spec)?;
        let glow = self.factory.glow_geometry()?;
        let flare = match (&sun_spec.flares, &materials.flare) {
            (Some(_), Some(_)) => Some(self.factory.flare_geometry(sun_spec)?),
            _ => None,
        };
        let mut planets = Vec::with_capacity(materials.planets.len());
        for (spec, (_, ring)) in config.planets_in_order().into_iter().zip(&materials.planets) {
            planets.push(self.factory.planet_geometry(spec, ring.is_some())?);
        }
        let stars = self.factory.starfield_cloud(&config.starfield);
        Ok(PreparedGeometry {
            sun,
            glow,
            flare,
            planets,
            stars,
        })
    }

    fn prepare_materials(&self, config: &Config) -> Result<PreparedMaterials, BuildError> {
        let sun_spec = &config.solar_system.sun;
        let base = BaseUniforms::lit_by(Vec3::ZERO);

        let sun = self.catalog.sun(&base)?;
        let glow = self.catalog.glow(&base, DEFAULT_GLOW_COLOR)?;
        let flare = match &sun_spec.flares {
            Some(f) => Some(self.catalog.flare(
                &base,
                Vec3::from(f.rgb()),
                f.opacity,
                f.size,
            )?),
            None => None,
        };
        let arc_opacity = sun_spec.arcs.as_ref().map_or(1.0, |a| a.opacity);
        let arc = self.catalog.plasma_arc(ARC_COLOR, arc_opacity);

        let mut planets = Vec::new();
        for spec in config.planets_in_order() {
            let program = spec.program.as_deref().unwrap_or(programs::PLAIN);
            let surface = self.catalog.planet(program, &base)?;
            let ring = if spec.with_ring {
                let ring = self.catalog.ring_if_available(&base)?;
                if ring.is_none() && config.animation.ring_policy == RingPolicy::Strict {
                    return Err(ConfigError::RingMaterialMissing(spec.id.clone()).into());
                }
                ring
            } else {
                None
            };
            planets.push((surface, ring));
        }

        let stars = self
            .catalog
            .points(Vec3::ONE, STAR_POINT_SIZE, STAR_OPACITY);

        Ok(PreparedMaterials {
            sun,
            glow,
            flare,
            arc,
            planets,
            stars,
        })
    }
}
