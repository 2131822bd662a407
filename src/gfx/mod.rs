//! # Graphics Module
//!
//! Everything the scene is made of and how it reaches the screen.
//!
//! - **Camera System** ([`camera`]) - Perspective camera and orbit controls
//! - **Geometry** ([`geometry`]) - Procedural primitives and OBJ loading
//! - **Scene Management** ([`scene`]) - Node arena with transform hierarchy
//! - **Resources** ([`resources`]) - Materials, texture slots and GPU uniforms
//! - **Lights and helpers** ([`lights`], [`helpers`]) - Node payloads for light sources and line gizmos
//! - **Rendering** ([`rendering`]) - Draw list extraction, the wgpu forward renderer and a headless renderer
//!
//! ```
//! use std::rc::Rc;
//! use vista::gfx::{
//!     geometry::GeometryDesc,
//!     resources::material::{Color, Material, MaterialHandle},
//!     scene::{Node, Scene},
//! };
//!
//! let mut scene = Scene::new();
//! let material = MaterialHandle::new(Material::basic(Color::from_hex(0xff0000)));
//! scene.add(Node::mesh("cube", Rc::new(GeometryDesc::cube(1.0).build()), material));
//! assert_eq!(scene.draw_list().items.len(), 1);
//! ```

pub mod camera;
pub mod geometry;
pub mod helpers;
pub mod lights;
pub mod rendering;
pub mod resources;
pub mod scene;

// Re-export commonly used types
pub use camera::{OrbitControls, PerspectiveCamera};
pub use rendering::{HeadlessRenderer, RenderEngine, Renderer};
