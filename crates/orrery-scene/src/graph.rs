//! Arena-backed scene graph.

use std::sync::atomic::{AtomicU64, Ordering};

use glam::Mat4;

use crate::error::SceneError;
use crate::node::{Node, NodeId};

static NEXT_SCENE_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a scene, recorded in handles built against it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SceneId(u64);

impl SceneId {
    fn next() -> Self {
        Self(NEXT_SCENE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// The scene-root capability nodes are attached to.
///
/// Nodes are first inserted detached, then either parented under another node
/// or attached to the root with [`SceneRoot::add`].
pub trait SceneRoot {
    fn id(&self) -> SceneId;

    /// Store a detached node and return its id.
    fn insert(&mut self, node: Node) -> NodeId;

    /// Attach a detached node directly under the scene root.
    fn add(&mut self, id: NodeId) -> Result<(), SceneError>;

    /// Make `child` a child of `parent`. `child` must be detached.
    fn set_parent(&mut self, child: NodeId, parent: NodeId) -> Result<(), SceneError>;

    fn node(&self, id: NodeId) -> Option<&Node>;

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node>;

    /// Composed parent-to-child matrix of a node.
    fn world_transform(&self, id: NodeId) -> Option<Mat4>;
}

/// Default [`SceneRoot`] implementation.
#[derive(Debug)]
pub struct SceneGraph {
    id: SceneId,
    nodes: Vec<Node>,
    roots: Vec<NodeId>,
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneGraph {
    pub fn new() -> Self {
        Self {
            id: SceneId::next(),
            nodes: Vec::new(),
            roots: Vec::new(),
        }
    }

    /// Total number of nodes, attached or not.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes attached directly to the root, in attach order.
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    /// First node with the given name.
    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.iter().find(|(_, n)| n.name == name).map(|(id, _)| id)
    }

    /// Whether `id` is reachable from the scene root.
    pub fn is_attached(&self, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(cur) = current {
            match self.nodes.get(cur.0) {
                Some(node) if node.attached => return true,
                Some(node) => current = node.parent,
                None => return false,
            }
        }
        false
    }

    /// Depth-first traversal from the root, parents before children.
    pub fn traverse(&self) -> Vec<NodeId> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<NodeId> = self.roots.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.nodes[id.0].children.iter().rev().copied());
        }
        out
    }

    fn check(&self, id: NodeId) -> Result<&Node, SceneError> {
        self.nodes.get(id.0).ok_or(SceneError::UnknownNode(id))
    }

    fn ensure_detached(&self, id: NodeId) -> Result<(), SceneError> {
        let node = self.check(id)?;
        if let Some(parent) = node.parent {
            return Err(SceneError::AlreadyParented { child: id, parent });
        }
        if node.attached {
            return Err(SceneError::AlreadyAttached(id));
        }
        Ok(())
    }
}

impl SceneRoot for SceneGraph {
    fn id(&self) -> SceneId {
        self.id
    }

    fn insert(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        log::trace!("insert node {:?} '{}'", id, node.name);
        self.nodes.push(Node {
            parent: None,
            children: Vec::new(),
            attached: false,
            ..node
        });
        id
    }

    fn add(&mut self, id: NodeId) -> Result<(), SceneError> {
        self.ensure_detached(id)?;
        self.nodes[id.0].attached = true;
        self.roots.push(id);
        Ok(())
    }

    fn set_parent(&mut self, child: NodeId, parent: NodeId) -> Result<(), SceneError> {
        self.check(parent)?;
        self.ensure_detached(child)?;

        let mut current = Some(parent);
        while let Some(cur) = current {
            if cur == child {
                return Err(SceneError::Cycle { child, parent });
            }
            current = self.nodes[cur.0].parent;
        }

        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
        Ok(())
    }

    fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    fn world_transform(&self, id: NodeId) -> Option<Mat4> {
        let mut node = self.nodes.get(id.0)?;
        let mut matrix = node.transform.matrix();
        while let Some(parent) = node.parent {
            node = self.nodes.get(parent.0)?;
            matrix = node.transform.matrix() * matrix;
        }
        Some(matrix)
    }
}
