//! Scene graph nodes
//!
//! A node carries a local [`Transform`], a visibility flag and a payload
//! ([`NodeKind`]). Parent and child links are owned by the [`Scene`] arena
//! and only readable from here.
//!
//! [`Scene`]: super::Scene

use std::fmt;
use std::rc::Rc;

use crate::gfx::{
    geometry::GeometryData, helpers::Helper, lights::Light, resources::material::MaterialHandle,
};

use super::transform::Transform;

/// Index of a node inside its scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Triangle mesh payload
#[derive(Debug, Clone)]
pub struct Mesh {
    pub geometry: Rc<GeometryData>,
    pub material: MaterialHandle,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
}

/// Particle cloud payload
///
/// `base` keeps the positions the cloud was created with; animations write
/// `positions` relative to it.
#[derive(Debug, Clone)]
pub struct PointCloud {
    pub base: Vec<[f32; 3]>,
    pub positions: Vec<[f32; 3]>,
    pub colors: Option<Vec<[f32; 3]>>,
    pub material: MaterialHandle,
}

impl PointCloud {
    pub fn new(positions: Vec<[f32; 3]>, material: MaterialHandle) -> Self {
        Self {
            base: positions.clone(),
            positions,
            colors: None,
            material,
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

#[derive(Debug, Clone)]
pub enum NodeKind {
    Group,
    Mesh(Mesh),
    Points(PointCloud),
    Light(Light),
    Helper(Helper),
}

impl NodeKind {
    /// Short label used in errors and the debug panel
    pub fn label(&self) -> &'static str {
        match self {
            NodeKind::Group => "group",
            NodeKind::Mesh(_) => "mesh",
            NodeKind::Points(_) => "points",
            NodeKind::Light(_) => "light",
            NodeKind::Helper(_) => "helper",
        }
    }
}

/// A node in the scene graph
#[derive(Debug, Clone)]
pub struct Node {
    pub name: String,
    pub transform: Transform,
    pub visible: bool,
    pub kind: NodeKind,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
}

impl Node {
    fn with_kind(name: &str, kind: NodeKind) -> Self {
        Self {
            name: name.to_string(),
            transform: Transform::default(),
            visible: true,
            kind,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn group(name: &str) -> Self {
        Self::with_kind(name, NodeKind::Group)
    }

    pub fn mesh(name: &str, geometry: Rc<GeometryData>, material: MaterialHandle) -> Self {
        Self::with_kind(
            name,
            NodeKind::Mesh(Mesh {
                geometry,
                material,
                cast_shadow: false,
                receive_shadow: false,
            }),
        )
    }

    pub fn points(name: &str, cloud: PointCloud) -> Self {
        Self::with_kind(name, NodeKind::Points(cloud))
    }

    pub fn light(name: &str, light: Light) -> Self {
        Self::with_kind(name, NodeKind::Light(light))
    }

    pub fn helper(name: &str, helper: Helper) -> Self {
        Self::with_kind(name, NodeKind::Helper(helper))
    }

    /// Builder pattern: Set local position
    pub fn with_position(mut self, x: f32, y: f32, z: f32) -> Self {
        self.transform.position = cgmath::Vector3::new(x, y, z);
        self
    }

    /// Builder pattern: Set local Euler rotation in radians
    pub fn with_rotation(mut self, x: f32, y: f32, z: f32) -> Self {
        self.transform = self.transform.with_rotation(x, y, z);
        self
    }

    /// Builder pattern: Set local scale
    pub fn with_scale(mut self, x: f32, y: f32, z: f32) -> Self {
        self.transform = self.transform.with_scale(x, y, z);
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    /// Builder pattern: Toggle shadow casting and receiving on meshes
    pub fn with_shadows(mut self, cast: bool, receive: bool) -> Self {
        if let NodeKind::Mesh(mesh) = &mut self.kind {
            mesh.cast_shadow = cast;
            mesh.receive_shadow = receive;
        }
        self
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Material of mesh and point nodes
    pub fn material(&self) -> Option<&MaterialHandle> {
        match &self.kind {
            NodeKind::Mesh(mesh) => Some(&mesh.material),
            NodeKind::Points(cloud) => Some(&cloud.material),
            _ => None,
        }
    }

    /// Swaps the material handle, returning the previous one
    pub fn set_material(&mut self, material: MaterialHandle) -> Option<MaterialHandle> {
        match &mut self.kind {
            NodeKind::Mesh(mesh) => Some(std::mem::replace(&mut mesh.material, material)),
            NodeKind::Points(cloud) => Some(std::mem::replace(&mut cloud.material, material)),
            _ => None,
        }
    }

    pub fn as_light(&self) -> Option<&Light> {
        match &self.kind {
            NodeKind::Light(light) => Some(light),
            _ => None,
        }
    }

    pub fn as_light_mut(&mut self) -> Option<&mut Light> {
        match &mut self.kind {
            NodeKind::Light(light) => Some(light),
            _ => None,
        }
    }

    pub fn as_points_mut(&mut self) -> Option<&mut PointCloud> {
        match &mut self.kind {
            NodeKind::Points(cloud) => Some(cloud),
            _ => None,
        }
    }
}

/// A node together with the subtree to attach beneath it
#[derive(Debug, Clone)]
pub struct NodeTree {
    pub node: Node,
    pub children: Vec<NodeTree>,
}

impl NodeTree {
    pub fn new(node: Node) -> Self {
        Self {
            node,
            children: Vec::new(),
        }
    }

    /// Builder pattern: Append a child subtree
    pub fn with_child(mut self, child: impl Into<NodeTree>) -> Self {
        self.children.push(child.into());
        self
    }

    /// Number of nodes in the tree, root included
    pub fn len(&self) -> usize {
        1 + self.children.iter().map(NodeTree::len).sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}

impl From<Node> for NodeTree {
    fn from(node: Node) -> Self {
        NodeTree::new(node)
    }
}
