//! Fixed-step pacing for synthetic frames.
//!
//! The demo has no window, so the caller supplies each frame's duration. Each
//! frame is turned into zero or more logical steps of a fixed length; the
//! remainder carries over to the next frame.

use tracing::warn;

/// Fixed logical timestep: 60 Hz.
pub const FIXED_DT: f64 = 1.0 / 60.0;

/// Longest frame accepted. Longer frames are shortened instead of replayed.
pub const MAX_FRAME_TIME: f64 = 0.25;

/// One logical step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixedStep {
    /// Step length in seconds.
    pub dt: f64,
    /// Simulated time at the end of this step.
    pub elapsed: f64,
}

/// Steps produced by a single [`FrameLoop::frame`] call.
#[derive(Debug)]
pub struct FixedSteps {
    start: f64,
    dt: f64,
    next: u64,
    count: u64,
}

impl Iterator for FixedSteps {
    type Item = FixedStep;

    fn next(&mut self) -> Option<FixedStep> {
        if self.next >= self.count {
            return None;
        }
        self.next += 1;
        Some(FixedStep {
            dt: self.dt,
            elapsed: self.start + self.next as f64 * self.dt,
        })
    }
}

/// Accumulator that converts frame durations into fixed steps.
#[derive(Debug, Default)]
pub struct FrameLoop {
    carry: f64,
    elapsed: f64,
    frames: u64,
    steps: u64,
}

impl FrameLoop {
    pub fn new() -> Self {
        Self::default()
    }

    /// Account for a frame lasting `frame_time` seconds and return the logical
    /// steps it covers. Negative times count as zero.
    pub fn frame(&mut self, frame_time: f64) -> FixedSteps {
        let mut frame_time = frame_time.max(0.0);
        if frame_time > MAX_FRAME_TIME {
            warn!(
                "Frame of {:.1}ms clamped to {:.1}ms",
                frame_time * 1000.0,
                MAX_FRAME_TIME * 1000.0
            );
            frame_time = MAX_FRAME_TIME;
        }

        self.carry += frame_time;
        let mut count = 0;
        while self.carry >= FIXED_DT {
            self.carry -= FIXED_DT;
            count += 1;
        }

        let start = self.elapsed;
        self.elapsed += count as f64 * FIXED_DT;
        self.steps += count;
        self.frames += 1;
        FixedSteps {
            start,
            dt: FIXED_DT,
            next: 0,
            count,
        }
    }

    /// Fraction of a step left over, in `[0, 1)`.
    pub fn alpha(&self) -> f64 {
        (self.carry / FIXED_DT).max(0.0)
    }

    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    pub fn step_count(&self) -> u64 {
        self.steps
    }

    /// Simulated seconds covered by all steps so far.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }
}
