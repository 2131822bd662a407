// src/wgpu_utils/mod.rs
//! WGPU utility functions and helpers
//!
//! Provides convenient wrappers for the buffers and bind groups the renderer uses.

pub mod binding_types;
pub mod uniform_buffer;

// Re-export main types
pub use uniform_buffer::{StreamBuffer, UniformBuffer};
