// src/gfx/resources/mod.rs
//! Materials, textures and GPU resources
//!
//! Materials and texture slots are plain scene data; the GPU-side types here
//! are owned by the render engine.

pub mod global_bindings;
pub mod material;
pub mod texture;
pub mod texture_resource;

// Re-export main types
pub use global_bindings::{GlobalBindings, GlobalsContent};
pub use material::{Color, Material, MaterialHandle, MaterialKind, MaterialSnapshot};
pub use texture::{TextureData, TextureSlot};
pub use texture_resource::DepthTexture;
