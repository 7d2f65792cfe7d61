use orrery_config::ConfigError;
use orrery_materials::MaterialError;
use orrery_mesh::MeshError;
use orrery_scene::SceneError;
use thiserror::Error;

/// Everything that can stop a scene from being built.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("material binding failed: {0}")]
    Material(#[from] MaterialError),

    #[error("geometry generation failed: {0}")]
    Mesh(#[from] MeshError),

    #[error("scene graph rejected a node: {0}")]
    Scene(#[from] SceneError),
}
