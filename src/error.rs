//! Error types shared across the engine
//!
//! Library code returns these through `Result`; the binary wraps them in
//! `anyhow` at the top level.

use thiserror::Error;

use crate::gfx::{resources::texture::TextureSlot, scene::node::NodeId, scene::transform::Axis};

/// Errors raised by scene graph, update step and debug binding operations
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("node {0} does not exist in this scene")]
    UnknownNode(NodeId),

    #[error("node {node} already has a motion policy driving the {axis:?} axis")]
    PolicyConflict { node: NodeId, axis: Axis },

    #[error("node {0} has no material")]
    MissingMaterial(NodeId),

    #[error("node {node} is not a {expected}")]
    WrongKind { node: NodeId, expected: &'static str },

    #[error("field `{field}` does not accept this value type")]
    FieldType { field: &'static str },

    #[error("material on node {node} has no `{field}` field")]
    MissingField { node: NodeId, field: &'static str },
}

/// Errors raised while loading external assets
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to read asset `{path}`")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("load of `{0}` was dropped before completing")]
    Cancelled(String),

    #[error("failed to parse OBJ file `{path}`")]
    Obj {
        path: String,
        #[source]
        source: tobj::LoadError,
    },

    #[error("asset `{0}` could not be found")]
    NotFound(String),

    #[error("material `{material}` has no {slot:?} slot")]
    UnsupportedSlot { material: String, slot: TextureSlot },
}

/// Errors raised by the GPU renderer
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to create surface")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("no suitable graphics adapter")]
    Adapter(#[from] wgpu::RequestAdapterError),

    #[error("failed to open graphics device")]
    Device(#[from] wgpu::RequestDeviceError),

    #[error("failed to acquire frame")]
    Frame(#[from] wgpu::SurfaceError),

    #[error("failed to build render pipelines: {}", .0.join("; "))]
    Pipeline(Vec<String>),

    #[error("debug panel error: {0}")]
    Ui(String),
}

/// Errors raised while starting the windowed application
#[derive(Debug, Error)]
pub enum AppError {
    #[error("event loop error")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("failed to create window")]
    Window(#[from] winit::error::OsError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("failed to build the scene")]
    Scene(#[from] SceneError),

    #[error("failed to start the asset loader")]
    Loader(#[source] std::io::Error),
}
