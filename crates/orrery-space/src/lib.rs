//! Celestial bodies: the factory that turns specs into parented scene nodes,
//! the builder that walks a whole configuration, and the handles the
//! animation updater drives afterwards.

pub mod builder;
pub mod error;
pub mod factory;
pub mod handles;
pub mod plasma;
pub mod starfield;

pub use builder::SceneGraphBuilder;
pub use error::BuildError;
pub use factory::{CelestialBodyFactory, Tessellation};
pub use handles::{
    FlareHandle, GlowHandle, PlanetHandle, PlasmaArcGroup, SceneHandles, StarfieldHandle,
    SunHandle,
};
pub use starfield::StarfieldGenerator;
