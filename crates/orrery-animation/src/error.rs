use orrery_scene::{NodeId, SceneId};
use thiserror::Error;

/// Precondition failures of [`AnimationUpdater::tick`](crate::AnimationUpdater::tick).
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum UpdateError {
    #[error("handles were built for scene {expected:?}, not {found:?}")]
    ForeignScene { expected: SceneId, found: SceneId },

    #[error("handle refers to node {0:?}, which is not in the scene")]
    MissingNode(NodeId),

    #[error("non-finite frame time (elapsed {elapsed}, delta {delta})")]
    InvalidTime { elapsed: f32, delta: f32 },
}
