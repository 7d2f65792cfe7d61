//! Arena scene graph: the scene-root capability the celestial-body factory
//! attaches nodes to, plus the read-only camera provider the animation
//! updater polls.

mod camera;
mod error;
mod graph;
mod node;
mod transform;

pub use camera::{Camera, CameraProvider};
pub use error::SceneError;
pub use graph::{SceneGraph, SceneId, SceneRoot};
pub use node::{Node, NodeId, Visual};
pub use transform::Transform;
