//! # Scene Management Module
//!
//! The scene graph: an ownership tree of meshes, point clouds, lights and
//! helpers rooted at a single scene node.
//!
//! ## Key Components
//!
//! - [`Scene`] - Node arena with hierarchical transform composition
//! - [`Node`] - One entity with a transform, visibility flag and payload
//! - [`NodeTree`] - A node plus the subtree to attach under it
//! - [`Transform`] - Position, Euler rotation and scale
//!
//! ## Usage
//!
//! ```
//! use vista::gfx::scene::{Node, Scene};
//!
//! let mut scene = Scene::new();
//! let group = scene.add(Node::group("group").with_position(0.0, 1.0, 0.0));
//! let child = scene.add_child(group, Node::group("child")).unwrap();
//! assert_eq!(scene.world_position(child).unwrap().y, 1.0);
//! ```

pub mod node;
pub mod scene;
pub mod transform;

// Re-export main types
pub use node::{Mesh, Node, NodeId, NodeKind, NodeTree, PointCloud};
pub use scene::{Scene, SceneStatistics};
pub use transform::{Axis, Transform};
