// src/lib.rs
//! Vista
//!
//! A small 3D scene playground built on wgpu and winit: a scene graph,
//! frame-driven animation, camera controls and a live debug panel.

pub mod animation;
pub mod app;
pub mod assets;
pub mod cli;
pub mod config;
pub mod debug;
pub mod error;
pub mod gfx;
pub mod input;
pub mod prelude;
pub mod runtime;
pub mod scenes;
pub mod scheduler;
pub mod timing;
pub mod ui;
pub mod wgpu_utils;

// Re-export main types for convenience
pub use app::VistaApp;
pub use config::AppConfig;
pub use runtime::SceneRuntime;
