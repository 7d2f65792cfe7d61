//! Command-line argument parsing for the orrery demo.

use std::path::PathBuf;

use clap::Parser;

use crate::{Config, RingPolicy};

/// Orrery command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug)]
#[command(name = "orrery", about = "Procedural solar system visualization")]
pub struct CliArgs {
    /// Number of frames to simulate before exiting.
    #[arg(long, default_value_t = 600)]
    pub frames: u32,

    /// Simulated display refresh rate used to pace frames.
    #[arg(long, default_value_t = 144.0)]
    pub fps: f64,

    /// Seed for star placement and plasma arc jitter.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Override the number of background stars.
    #[arg(long)]
    pub stars: Option<u32>,

    /// Fail the build when a ringed planet has no ring material.
    #[arg(long)]
    pub strict_rings: bool,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Directory holding `<name>.vert.glsl` / `<name>.frag.glsl` programs.
    #[arg(long)]
    pub shaders: Option<PathBuf>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(seed) = args.seed {
            self.seed = Some(seed);
        }
        if let Some(stars) = args.stars {
            self.starfield.amount = stars;
        }
        if args.strict_rings {
            self.animation.ring_policy = RingPolicy::Strict;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}
