//! Debug binding layer
//!
//! Reflects node, material and light fields into editable controls. Which
//! material fields appear is decided by the material's capability accessors
//! (`as_colored`, `as_metalness_rough`, ...). The imgui rendering of a
//! [`DebugPanel`] lives in [`crate::ui::panel`].

pub mod binding;
pub mod folder;

pub use binding::{bindings_for_node, Control, DebugBinding, DebugField, FieldValue};
pub use folder::{DebugFolder, DebugPanel};
