use log::debug;

use crate::error::SceneError;
use crate::gfx::scene::{NodeId, Scene};

use super::binding::{bindings_for_node, DebugBinding, DebugField};

/// Titled group of bindings, usually one per node
#[derive(Debug, Clone, PartialEq)]
pub struct DebugFolder {
    pub title: String,
    pub bindings: Vec<DebugBinding>,
    pub open: bool,
}

impl DebugFolder {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            bindings: Vec::new(),
            open: true,
        }
    }

    /// Folder with every editable field of `node`
    pub fn for_node(scene: &Scene, node: NodeId, title: &str) -> Result<Self, SceneError> {
        Ok(Self {
            bindings: bindings_for_node(scene, node)?,
            ..Self::new(title)
        })
    }

    /// Builder pattern: Keep only the listed fields, in their folder order
    pub fn only(mut self, fields: &[DebugField]) -> Self {
        self.bindings.retain(|b| fields.contains(&b.field));
        self
    }

    pub fn closed(mut self) -> Self {
        self.open = false;
        self
    }

    pub fn binding(&self, field: DebugField) -> Option<&DebugBinding> {
        self.bindings.iter().find(|b| b.field == field)
    }
}

/// Every folder shown in the debug panel
#[derive(Debug, Clone, PartialEq)]
pub struct DebugPanel {
    pub title: String,
    pub folders: Vec<DebugFolder>,
    pub visible: bool,
}

impl DebugPanel {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            folders: Vec::new(),
            visible: true,
        }
    }

    pub fn add_folder(&mut self, folder: DebugFolder) {
        debug!("Debug folder '{}' with {} controls", folder.title, folder.bindings.len());
        self.folders.push(folder);
    }

    /// Adds a folder for `node` titled after the node's name
    pub fn add_node(&mut self, scene: &Scene, node: NodeId) -> Result<(), SceneError> {
        let title = scene.node(node)?.name.clone();
        self.add_folder(DebugFolder::for_node(scene, node, &title)?);
        Ok(())
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
    }

    pub fn folder(&self, title: &str) -> Option<&DebugFolder> {
        self.folders.iter().find(|f| f.title == title)
    }

    pub fn binding_count(&self) -> usize {
        self.folders.iter().map(|f| f.bindings.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.folders.is_empty()
    }
}

impl Default for DebugPanel {
    fn default() -> Self {
        Self::new("Debug")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::{
        geometry::GeometryDesc,
        resources::material::{Color, Material, MaterialHandle},
        scene::Node,
    };
    use std::rc::Rc;

    #[test]
    fn test_panel_folder_per_node() {
        let mut scene = Scene::new();
        let id = scene.add(Node::mesh(
            "torus",
            Rc::new(GeometryDesc::torus(0.3, 0.2, 16, 32).build()),
            MaterialHandle::new(Material::standard(Color::WHITE, 0.7, 0.2)),
        ));

        let mut panel = DebugPanel::default();
        panel.add_node(&scene, id).unwrap();
        let folder = panel.folder("torus").unwrap();
        assert!(folder.binding(DebugField::Roughness).is_some());
        assert_eq!(panel.binding_count(), folder.bindings.len());
    }

    #[test]
    fn test_only_filters_fields() {
        let mut scene = Scene::new();
        let id = scene.add(Node::group("cube"));
        let folder = DebugFolder::for_node(&scene, id, "cube")
            .unwrap()
            .only(&[DebugField::Visible]);
        assert_eq!(folder.bindings.len(), 1);
    }

    #[test]
    fn test_toggle_visibility() {
        let mut panel = DebugPanel::default();
        panel.toggle();
        assert!(!panel.visible);
    }
}
