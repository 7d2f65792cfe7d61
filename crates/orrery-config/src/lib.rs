//! Configuration system for the orrery.
//!
//! Declarative description of the sun, the planets and the starfield, persisted
//! to disk as RON. Supports CLI overrides via clap, hot-reload detection,
//! forward/backward compatible serialization and up-front validation so a scene
//! is never partially built from a bad table.

mod cli;
mod config;
mod error;
mod validate;

pub use cli::CliArgs;
pub use config::{
    AnimationConfig, ArcSpec, BloomConfig, CONFIG_FILE_NAME, Config, DebugConfig, DistanceRange,
    FlareSpec, PlanetSpec, RingPolicy, SolarSystemConfig, StarfieldSpec, SunSpec,
    default_config_dir,
};
pub use error::ConfigError;
