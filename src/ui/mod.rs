//! # User Interface Module
//!
//! Dear ImGui overlay for the debug panel.
//!
//! - [`UiManager`] - imgui context, winit platform and wgpu renderer
//! - [`debug_panel`] - draws a [`DebugPanel`](crate::debug::DebugPanel) and collects edits
//! - [`apply_edits`] - writes collected edits into the scene
//!
//! Input the UI wants (a hovered panel, a focused slider) is not forwarded
//! to the camera controls or key bindings.

pub mod manager;
pub mod panel;

pub use manager::UiManager;
pub use panel::{apply_edits, debug_panel, PanelEdit};
