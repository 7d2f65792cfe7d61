//! Per-frame animation of a built solar system: orbital motion normalized to
//! a reference tick rate, plasma-arc opacity pulses, and time / camera
//! uniforms.

mod error;
mod updater;

pub use error::UpdateError;
pub use updater::{
    AnimationUpdater, DEFAULT_REFERENCE_TICK_RATE, arc_opacity, normalized_ticks,
};
