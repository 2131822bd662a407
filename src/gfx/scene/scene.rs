use cgmath::{Matrix4, SquareMatrix, Vector3, Vector4};
use log::debug;

use crate::error::SceneError;
use crate::gfx::{
    rendering::draw_list::DrawList,
    resources::material::{Color, MaterialHandle},
};

use super::node::{Node, NodeId, NodeKind, NodeTree};

/// Scene graph rooted at a single group node
///
/// Nodes live in an arena and are addressed by [`NodeId`]. They are attached
/// to a parent when inserted and never removed or reparented, so the graph
/// stays a tree.
#[derive(Debug, Clone)]
pub struct Scene {
    nodes: Vec<Node>,
    root: NodeId,
    pub background: Color,
}

impl Scene {
    /// Creates an empty scene with its root group
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::group("scene")],
            root: NodeId(0),
            background: Color::BLACK,
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Adds a node directly under the root
    pub fn add(&mut self, node: Node) -> NodeId {
        self.attach(self.root, node)
    }

    /// Adds a node under `parent`
    pub fn add_child(&mut self, parent: NodeId, node: Node) -> Result<NodeId, SceneError> {
        self.node(parent)?;
        Ok(self.attach(parent, node))
    }

    /// Adds a whole subtree under `parent`, returning the id of its root
    pub fn add_tree(&mut self, parent: NodeId, tree: NodeTree) -> Result<NodeId, SceneError> {
        let id = self.add_child(parent, tree.node)?;
        for child in tree.children {
            self.add_tree(id, child)?;
        }
        Ok(id)
    }

    fn attach(&mut self, parent: NodeId, mut node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        debug!("Adding {} '{}' as {} under {}", node.kind.label(), node.name, id, parent);
        node.parent = Some(parent);
        node.children.clear();
        self.nodes.push(node);
        self.nodes[parent.0].children.push(id);
        id
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    pub fn node(&self, id: NodeId) -> Result<&Node, SceneError> {
        self.get(id).ok_or(SceneError::UnknownNode(id))
    }

    pub fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, SceneError> {
        self.get_mut(id).ok_or(SceneError::UnknownNode(id))
    }

    /// Material handle of a mesh or point node
    pub fn material(&self, id: NodeId) -> Result<MaterialHandle, SceneError> {
        self.node(id)?
            .material()
            .cloned()
            .ok_or(SceneError::MissingMaterial(id))
    }

    /// First node with the given name, in insertion order
    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|n| n.name == name)
            .map(NodeId)
    }

    /// All nodes in insertion order, root first
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// A scene always holds its root
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn children(&self, id: NodeId) -> Result<&[NodeId], SceneError> {
        Ok(self.node(id)?.children())
    }

    /// Parent world matrix times local matrix, walked up to the root
    pub fn world_matrix(&self, id: NodeId) -> Result<Matrix4<f32>, SceneError> {
        let mut matrix = Matrix4::identity();
        let mut current = Some(id);
        while let Some(node_id) = current {
            let node = self.node(node_id)?;
            matrix = node.transform.matrix() * matrix;
            current = node.parent;
        }
        Ok(matrix)
    }

    pub fn world_position(&self, id: NodeId) -> Result<Vector3<f32>, SceneError> {
        let p = self.world_matrix(id)? * Vector4::new(0.0, 0.0, 0.0, 1.0);
        Ok(Vector3::new(p.x, p.y, p.z))
    }

    /// Visits `start` and its descendants depth first, parents before
    /// children. The callback receives each node's world matrix and whether
    /// it and all of its ancestors are visible.
    pub fn traverse<F>(&self, start: NodeId, visit: F) -> Result<(), SceneError>
    where
        F: FnMut(NodeId, &Node, &Matrix4<f32>, bool),
    {
        let node = self.node(start)?;
        let parent_world = match node.parent {
            Some(parent) => self.world_matrix(parent)?,
            None => Matrix4::identity(),
        };
        let parent_visible = self.ancestors_visible(start)?;
        self.walk(start, parent_world, parent_visible, visit);
        Ok(())
    }

    /// Depth-first visit of the whole scene from the root
    pub fn traverse_all<F>(&self, visit: F)
    where
        F: FnMut(NodeId, &Node, &Matrix4<f32>, bool),
    {
        self.walk(self.root(), Matrix4::identity(), true, visit);
    }

    fn walk<F>(&self, start: NodeId, parent_world: Matrix4<f32>, parent_visible: bool, mut visit: F)
    where
        F: FnMut(NodeId, &Node, &Matrix4<f32>, bool),
    {
        let mut stack = vec![(start, parent_world, parent_visible)];
        while let Some((id, parent_world, parent_visible)) = stack.pop() {
            let node = &self.nodes[id.0];
            let world = parent_world * node.transform.matrix();
            let visible = parent_visible && node.visible;
            visit(id, node, &world, visible);
            for child in node.children.iter().rev() {
                stack.push((*child, world, visible));
            }
        }
    }

    fn ancestors_visible(&self, id: NodeId) -> Result<bool, SceneError> {
        let mut current = self.node(id)?.parent;
        while let Some(node_id) = current {
            let node = self.node(node_id)?;
            if !node.visible {
                return Ok(false);
            }
            current = node.parent;
        }
        Ok(true)
    }

    /// Resolves world matrices and material state for rendering
    pub fn draw_list(&self) -> DrawList {
        DrawList::build(self)
    }

    /// Gets statistics about the scene
    pub fn statistics(&self) -> SceneStatistics {
        let mut stats = SceneStatistics::default();
        let mut materials: Vec<MaterialHandle> = Vec::new();

        for node in &self.nodes {
            match &node.kind {
                NodeKind::Mesh(mesh) => {
                    stats.mesh_count += 1;
                    stats.total_vertices += mesh.geometry.vertex_count();
                    stats.total_triangles += mesh.geometry.triangle_count();
                }
                NodeKind::Points(cloud) => stats.total_points += cloud.len(),
                NodeKind::Light(_) => stats.light_count += 1,
                NodeKind::Group | NodeKind::Helper(_) => {}
            }
            if let Some(material) = node.material() {
                if !materials.iter().any(|m| m.ptr_eq(material)) {
                    materials.push(material.clone());
                }
            }
        }

        stats.node_count = self.nodes.len();
        stats.material_count = materials.len();
        stats
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

/// Scene statistics for debugging and UI display
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SceneStatistics {
    pub node_count: usize,
    pub mesh_count: usize,
    pub light_count: usize,
    /// Distinct materials, shared handles counted once
    pub material_count: usize,
    pub total_triangles: usize,
    pub total_vertices: usize,
    pub total_points: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::{
        geometry::GeometryDesc,
        resources::material::Material,
    };
    use std::rc::Rc;

    fn cube_node(name: &str, material: &MaterialHandle) -> Node {
        Node::mesh(name, Rc::new(GeometryDesc::cube(1.0).build()), material.clone())
    }

    #[test]
    fn test_add_child_rejects_unknown_parent() {
        let mut scene = Scene::new();
        let result = scene.add_child(NodeId(42), Node::group("orphan"));
        assert!(matches!(result, Err(SceneError::UnknownNode(NodeId(42)))));
        assert_eq!(scene.len(), 1);
    }

    #[test]
    fn test_world_matrix_composes_parent_transform() {
        let mut scene = Scene::new();
        let group = scene.add(Node::group("group").with_position(0.0, 1.0, 0.0).with_scale(2.0, 2.0, 2.0));
        let material = MaterialHandle::new(Material::basic(Color::WHITE));
        let child = scene
            .add_child(group, cube_node("cube", &material).with_position(1.0, 0.0, 0.0))
            .unwrap();

        let p = scene.world_position(child).unwrap();
        assert_eq!(p, Vector3::new(2.0, 1.0, 0.0));
    }

    #[test]
    fn test_add_tree_preserves_child_order() {
        let mut scene = Scene::new();
        let tree = NodeTree::new(Node::group("group"))
            .with_child(Node::group("a"))
            .with_child(Node::group("b"));
        let root = scene.add_tree(scene.root(), tree).unwrap();
        let names: Vec<_> = scene
            .children(root)
            .unwrap()
            .iter()
            .map(|id| scene.node(*id).unwrap().name.clone())
            .collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(scene.node(root).unwrap().parent(), Some(scene.root()));
    }

    #[test]
    fn test_traverse_propagates_visibility() {
        let mut scene = Scene::new();
        let group = scene.add(Node::group("group").hidden());
        let leaf = scene.add_child(group, Node::group("leaf")).unwrap();

        let mut seen = Vec::new();
        scene
            .traverse(scene.root(), |id, _, _, visible| seen.push((id, visible)))
            .unwrap();
        assert_eq!(seen, vec![(scene.root(), true), (group, false), (leaf, false)]);
    }

    #[test]
    fn test_statistics_counts_shared_material_once() {
        let mut scene = Scene::new();
        let material = MaterialHandle::new(Material::basic(Color::WHITE));
        for name in ["a", "b", "c"] {
            scene.add(cube_node(name, &material));
        }
        let stats = scene.statistics();
        assert_eq!(stats.mesh_count, 3);
        assert_eq!(stats.material_count, 1);
        assert_eq!(stats.total_triangles, 36);
    }

    #[test]
    fn test_find_returns_first_match() {
        let mut scene = Scene::new();
        let first = scene.add(Node::group("cube"));
        scene.add(Node::group("cube"));
        assert_eq!(scene.find("cube"), Some(first));
        assert_eq!(scene.find("missing"), None);
    }

    #[test]
    fn test_traverse_all_matches_traverse_from_root() {
        let mut scene = Scene::new();
        let group = scene.add(Node::group("group").with_position(1.0, 0.0, 0.0));
        scene.add_child(group, Node::group("leaf").hidden()).unwrap();

        let mut from_root = Vec::new();
        scene
            .traverse(scene.root(), |id, _, world, visible| from_root.push((id, *world, visible)))
            .unwrap();
        let mut all = Vec::new();
        scene.traverse_all(|id, _, world, visible| all.push((id, *world, visible)));
        assert_eq!(all, from_root);
        assert_eq!(all.len(), 3);
    }
}
