//! Core rendering functionality
//!
//! The scene is flattened into a [`DrawList`] each frame. [`RenderEngine`]
//! draws it with wgpu; [`HeadlessRenderer`] records it without a GPU.

pub mod draw_list;
pub mod pipeline_manager;
pub mod render_engine;
pub mod renderer;
pub mod vertex;

// Re-export main types
pub use draw_list::{DrawItem, DrawList, DrawPrimitive, LightingSummary};
pub use pipeline_manager::{PipelineConfig, PipelineManager, VertexLayout};
pub use render_engine::RenderEngine;
pub use renderer::{HeadlessRenderer, RenderStats, Renderer};
