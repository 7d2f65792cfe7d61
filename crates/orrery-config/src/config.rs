//! Configuration structs with sensible defaults and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level orrery configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// The sun and its planets.
    pub solar_system: SolarSystemConfig,
    /// Background star shell.
    pub starfield: StarfieldSpec,
    /// Per-frame animation settings.
    pub animation: AnimationConfig,
    /// Diagnostics.
    pub debug: DebugConfig,
    /// Seed for cosmetic randomness (star placement, arc jitter).
    /// `None` draws a fresh seed from the OS on every build.
    pub seed: Option<u64>,
}

/// The central body and everything orbiting it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SolarSystemConfig {
    pub sun: SunSpec,
    /// Planets, built in `order_index` order.
    pub planets: Vec<PlanetSpec>,
}

/// Central emissive body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SunSpec {
    /// Sphere radius in scene units. Must be > 0.
    pub size: f32,
    /// Post-process bloom parameters, consumed by the renderer.
    pub bloom: BloomConfig,
    /// Flat flare ring around the sun. `None` disables it.
    pub flares: Option<FlareSpec>,
    /// Plasma arcs looping over the surface. `None` disables them.
    pub arcs: Option<ArcSpec>,
}

/// Bloom settings forwarded untouched to the post-process stage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BloomConfig {
    pub enabled: bool,
    pub strength: f32,
    pub radius: f32,
    pub threshold: f32,
}

/// Solar flare ring appearance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FlareSpec {
    /// Flare intensity scale fed to the flare program.
    pub size: f32,
    /// Hex color, `#rrggbb`.
    pub color: String,
    /// Base opacity in `[0, 1]`.
    pub opacity: f32,
}

/// Plasma arc bundle parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ArcSpec {
    /// Number of arcs, evenly spread around the sun.
    pub amount: u32,
    /// Opacity before the first animation tick.
    pub opacity: f32,
    /// Distance of the arc footpoints from the sun center.
    pub radius: f32,
    /// Peak height of each arc above its footpoints.
    pub height: f32,
    /// Angular offset (radians) added to every arc's start angle.
    pub angle: f32,
}

/// One orbiting body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlanetSpec {
    /// Unique identifier; duplicates are rejected.
    pub id: String,
    /// Construction order.
    pub order_index: i32,
    pub label: String,
    pub title: Option<String>,
    pub description: Option<String>,
    /// Visual scale of the body. Must be > 0.
    pub size: f32,
    /// Distance from the sun. Must be > 0.
    pub orbit_radius: f32,
    /// Orbital speed in radians per reference tick.
    pub angular_speed: f32,
    /// Own-axis spin in radians per reference tick.
    pub spin_speed: f32,
    /// Whether a ring should surround the planet.
    pub with_ring: bool,
    /// Surface program name. `None` uses the plain planet program.
    pub program: Option<String>,
}

/// Background starfield shell.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StarfieldSpec {
    /// Number of stars.
    pub amount: u32,
    /// Shell bounds; stars are placed with radius uniform in `[min, max]`.
    pub distance: DistanceRange,
}

/// Inner and outer radius of the star shell.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DistanceRange {
    pub min: f32,
    pub max: f32,
}

/// What happens when a planet asks for a ring and no ring material exists.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum RingPolicy {
    /// Build the planet without its ring.
    #[default]
    Omit,
    /// Fail the build with a configuration error.
    Strict,
}

/// Animation settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnimationConfig {
    /// Logical ticks per second that speeds are expressed against.
    pub reference_tick_rate: f32,
    /// Apply random initial rotation to plasma arcs.
    pub arc_jitter: bool,
    pub ring_policy: RingPolicy,
}

/// Diagnostic knobs that do not affect the scene.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Filter directive for the subscriber, e.g. `"debug"` or `"orrery_space=trace"`.
    pub log_level: String,
}

// Defaults reproduce the reference scene.

impl Default for SolarSystemConfig {
    fn default() -> Self {
        Self {
            sun: SunSpec::default(),
            planets: vec![
                PlanetSpec::new("planet1", 1, "About", 0.7, 5.0, 0.002),
                PlanetSpec {
                    with_ring: true,
                    program: Some("planet_variant".to_string()),
                    ..PlanetSpec::new("planet2", 2, "Blog", 1.0, 8.0, 0.008)
                },
                PlanetSpec::new("planet3", 3, "Projects", 1.3, 11.0, 0.006),
                PlanetSpec::new("planet4", 4, "Contact", 0.9, 14.0, 0.004),
            ],
        }
    }
}

impl Default for SunSpec {
    fn default() -> Self {
        Self {
            size: 2.2,
            bloom: BloomConfig::default(),
            flares: Some(FlareSpec::default()),
            arcs: Some(ArcSpec::default()),
        }
    }
}

impl Default for BloomConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            strength: 1.5,
            radius: 0.4,
            threshold: 0.9,
        }
    }
}

impl Default for FlareSpec {
    fn default() -> Self {
        Self {
            size: 0.2,
            color: "#ffaa33".to_string(),
            opacity: 0.8,
        }
    }
}

impl Default for ArcSpec {
    fn default() -> Self {
        Self {
            amount: 6,
            opacity: 1.0,
            radius: 2.55,
            height: 2.0,
            angle: 0.0,
        }
    }
}

impl Default for PlanetSpec {
    fn default() -> Self {
        Self {
            id: String::new(),
            order_index: 0,
            label: String::new(),
            title: None,
            description: None,
            size: 1.0,
            orbit_radius: 5.0,
            angular_speed: 0.0,
            spin_speed: 0.0,
            with_ring: false,
            program: None,
        }
    }
}

impl Default for StarfieldSpec {
    fn default() -> Self {
        Self {
            amount: 2500,
            distance: DistanceRange::default(),
        }
    }
}

impl Default for DistanceRange {
    fn default() -> Self {
        Self {
            min: 40.0,
            max: 150.0,
        }
    }
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            reference_tick_rate: 60.0,
            arc_jitter: true,
            ring_policy: RingPolicy::Omit,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

impl PlanetSpec {
    /// Shorthand for an unringed planet with the plain surface program.
    pub fn new(
        id: impl Into<String>,
        order_index: i32,
        label: impl Into<String>,
        size: f32,
        orbit_radius: f32,
        angular_speed: f32,
    ) -> Self {
        Self {
            id: id.into(),
            order_index,
            label: label.into(),
            size,
            orbit_radius,
            angular_speed,
            ..Default::default()
        }
    }
}

impl FlareSpec {
    /// Parse [`FlareSpec::color`] into linear `[r, g, b]` in `[0, 1]`.
    ///
    /// Accepts `#rrggbb` or `rrggbb`; anything else falls back to white.
    pub fn rgb(&self) -> [f32; 3] {
        let hex = self.color.trim_start_matches('#');
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return [1.0, 1.0, 1.0];
        }
        // All six bytes are ASCII hex digits, so every slice is on a char boundary.
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map(|v| v as f32 / 255.0)
                .unwrap_or(1.0)
        };
        [channel(0), channel(2), channel(4)]
    }
}

/// Platform config directory for the orrery, e.g. `~/.config/orrery`.
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("orrery")
}

// Persistence

/// File name used inside the config directory.
pub const CONFIG_FILE_NAME: &str = "config.ron";

fn read_config(path: &Path) -> Result<Config, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(ConfigError::ReadError)?;
    ron::from_str(&text).map_err(ConfigError::ParseError)
}

impl Config {
    /// Read `config.ron` from `dir`, writing the defaults there first if it is absent.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let path = config_dir.join(CONFIG_FILE_NAME);
        if !path.exists() {
            let fresh = Config::default();
            fresh.save(config_dir)?;
            log::info!("Wrote default config to {}", path.display());
            return Ok(fresh);
        }
        let config = read_config(&path)?;
        log::info!("Using config {}", path.display());
        Ok(config)
    }

    /// Write this config to `dir/config.ron`, creating `dir` if needed.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(4)
            .separate_tuple_members(true)
            .enumerate_arrays(false);
        let text = ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;
        std::fs::write(config_dir.join(CONFIG_FILE_NAME), text).map_err(ConfigError::WriteError)
    }

    /// Re-read the file. `None` means it still matches `self`.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let fresh = read_config(&config_dir.join(CONFIG_FILE_NAME))?;
        if fresh == *self {
            return Ok(None);
        }
        log::info!("Config changed on disk");
        Ok(Some(fresh))
    }

    /// Planets sorted by `order_index`. Ties keep their declaration order.
    pub fn planets_in_order(&self) -> Vec<&PlanetSpec> {
        let mut planets: Vec<&PlanetSpec> = self.solar_system.planets.iter().collect();
        planets.sort_by_key(|p| p.order_index);
        planets
    }
}
