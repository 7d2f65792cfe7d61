use std::sync::Arc;

use glam::Vec3;
use orrery_materials::Material;
use orrery_mesh::GeometryHandle;

use crate::transform::Transform;

/// Index of a node inside one [`SceneGraph`](crate::SceneGraph).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Renderable payload handed to the backend.
#[derive(Clone, Debug)]
pub enum Visual {
    Mesh {
        geometry: GeometryHandle,
        material: Material,
    },
    /// Immutable point cloud.
    Points {
        cloud: Arc<[Vec3]>,
        material: Material,
    },
}

impl Visual {
    pub fn material(&self) -> &Material {
        match self {
            Self::Mesh { material, .. } | Self::Points { material, .. } => material,
        }
    }

    pub fn material_mut(&mut self) -> &mut Material {
        match self {
            Self::Mesh { material, .. } | Self::Points { material, .. } => material,
        }
    }
}

/// A transform node with an optional visual.
#[derive(Clone, Debug)]
pub struct Node {
    pub name: String,
    pub transform: Transform,
    pub visual: Option<Visual>,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) attached: bool,
}

impl Node {
    /// Empty transform node (group / pivot / orbit frame).
    pub fn group(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transform: Transform::IDENTITY,
            visual: None,
            cast_shadow: false,
            receive_shadow: false,
            parent: None,
            children: Vec::new(),
            attached: false,
        }
    }

    /// Mesh node. Meshes cast and receive shadows.
    pub fn mesh(name: impl Into<String>, geometry: GeometryHandle, material: Material) -> Self {
        Self {
            visual: Some(Visual::Mesh { geometry, material }),
            cast_shadow: true,
            receive_shadow: true,
            ..Self::group(name)
        }
    }

    pub fn points(name: impl Into<String>, cloud: Arc<[Vec3]>, material: Material) -> Self {
        Self {
            visual: Some(Visual::Points { cloud, material }),
            ..Self::group(name)
        }
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Attached directly to the scene root.
    pub fn is_root(&self) -> bool {
        self.attached
    }

    pub fn material(&self) -> Option<&Material> {
        self.visual.as_ref().map(Visual::material)
    }

    pub fn material_mut(&mut self) -> Option<&mut Material> {
        self.visual.as_mut().map(Visual::material_mut)
    }
}
