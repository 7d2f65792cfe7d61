use thiserror::Error;

use crate::node::NodeId;

/// Errors from structural scene graph operations.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SceneError {
    #[error("node {0:?} does not exist in this scene")]
    UnknownNode(NodeId),

    #[error("node {child:?} already has parent {parent:?}")]
    AlreadyParented { child: NodeId, parent: NodeId },

    #[error("node {0:?} is already attached to the scene root")]
    AlreadyAttached(NodeId),

    #[error("parenting {child:?} under {parent:?} would create a cycle")]
    Cycle { child: NodeId, parent: NodeId },
}
