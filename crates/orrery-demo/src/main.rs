//! Headless orrery: builds the configured solar system and animates it for a
//! fixed number of synthetic frames, logging where the planets end up.

mod frame_loop;
mod shaders;

use std::process::ExitCode;

use clap::Parser;
use glam::Vec3;
use orrery_animation::{AnimationUpdater, UpdateError};
use orrery_config::{CliArgs, Config, default_config_dir};
use orrery_materials::MaterialCatalog;
use orrery_scene::{Camera, SceneGraph};
use orrery_space::{SceneGraphBuilder, SceneHandles};
use tracing::{debug, error, info};

use frame_loop::FrameLoop;

/// Default viewpoint, looking at the sun from above the orbital plane.
const CAMERA_POSITION: Vec3 = Vec3::new(0.0, 12.0, 30.0);

fn main() -> ExitCode {
    let args = CliArgs::parse();

    let config_dir = args.config.clone().unwrap_or_else(default_config_dir);
    let mut config = Config::load_or_create(&config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    config.apply_cli_overrides(&args);

    let log_dir = config_dir.join("logs");
    orrery_log::init_logging(Some(&log_dir), cfg!(debug_assertions), Some(&config));

    let library = match &args.shaders {
        Some(dir) => match shaders::load_library(dir) {
            Ok(library) => library,
            Err(e) => {
                error!("Failed to load shader programs from {}: {e}", dir.display());
                return ExitCode::FAILURE;
            }
        },
        None => shaders::embedded_library(),
    };
    info!("Loaded {} shader programs", library.len());

    let mut scene = SceneGraph::new();
    let mut builder = SceneGraphBuilder::new(MaterialCatalog::new(library));
    let handles = match builder.build(&config, &mut scene) {
        Ok(handles) => handles,
        Err(e) => {
            error!("Failed to build scene: {e}");
            return ExitCode::FAILURE;
        }
    };
    info!(
        "Scene has {} nodes, geometry cache holds {} meshes",
        scene.len(),
        builder.factory().cache().len()
    );

    let camera = Camera::looking_at(CAMERA_POSITION, Vec3::ZERO);
    let updater = AnimationUpdater::from_config(&config.animation);

    match run(&args, &handles, &mut scene, &camera, &updater) {
        Ok(frames) => {
            info!(
                "Simulated {} frames ({} logical steps, {:.2}s)",
                frames.frame_count(),
                frames.step_count(),
                frames.elapsed()
            );
            log_planets(&handles, &scene);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Animation stopped: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Drive the updater once per fixed step for `args.frames` frames.
fn run(
    args: &CliArgs,
    handles: &SceneHandles,
    scene: &mut SceneGraph,
    camera: &Camera,
    updater: &AnimationUpdater,
) -> Result<FrameLoop, UpdateError> {
    let frame_time = if args.fps > 0.0 {
        1.0 / args.fps
    } else {
        frame_loop::FIXED_DT
    };
    let report_every = (args.fps.round() as u32).max(1);
    let mut frames = FrameLoop::new();

    for frame in 0..args.frames {
        for step in frames.frame(frame_time) {
            updater.tick(
                handles,
                &mut *scene,
                Some(camera),
                step.elapsed as f32,
                step.dt as f32,
            )?;
        }
        if frame % report_every == 0 {
            debug!("frame {frame}: simulated {:.2}s", frames.elapsed());
        }
    }
    Ok(frames)
}

fn log_planets(handles: &SceneHandles, scene: &SceneGraph) {
    for planet in &handles.planets {
        let angle = planet.orbit_angle(scene).unwrap_or_default();
        let position = planet.world_position(scene).unwrap_or_default();
        info!(
            "{}: orbit angle {:.3} rad, position ({:.2}, {:.2}, {:.2}){}",
            planet.id,
            angle,
            position.x,
            position.y,
            position.z,
            if planet.ring.is_some() { ", ringed" } else { "" }
        );
    }
}
