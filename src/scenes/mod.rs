//! Scene construction
//!
//! [`factory`] builds individual nodes; [`presets`] combines them into the
//! named scenes the binary can open.

pub mod factory;
pub mod presets;

pub use factory::StarField;
pub use presets::{Preset, SceneSetup, UnknownPreset};
