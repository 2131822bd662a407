//! # Vista Prelude
//!
//! Commonly used types for building and driving scenes.
//!
//! ```rust
//! use vista::prelude::*;
//!
//! let loader = ManualLoader::new();
//! let setup = Preset::Basics.build(&loader, &AppConfig::default()).unwrap();
//! let time = ManualTimeSource::new();
//! let mut runtime = SceneRuntime::from_setup(setup, FrameClock::new(time.clone()), (800, 600));
//!
//! runtime.start();
//! time.advance_secs(0.5);
//! runtime.frame().unwrap();
//!
//! let mut renderer = HeadlessRenderer::new(800, 600);
//! let stats = runtime.render(&mut renderer).unwrap();
//! assert!(stats.draw_calls > 0);
//! ```

// Re-export core application types
pub use crate::app::VistaApp;
pub use crate::config::{AppConfig, CameraConfig, ControlsConfig, WindowConfig};
pub use crate::runtime::SceneRuntime;

// Scene graph and factories
pub use crate::gfx::geometry::{GeometryData, GeometryDesc};
pub use crate::gfx::lights::Light;
pub use crate::gfx::resources::material::{Color, Material, MaterialHandle};
pub use crate::gfx::scene::{Axis, Node, NodeId, NodeTree, Scene};
pub use crate::scenes::{factory, Preset, SceneSetup, StarField};

// Frame loop
pub use crate::animation::{Animation, CameraAnimation, Oscillate, PingPong, UpdateStep};
pub use crate::scheduler::{FrameScheduler, FrameTime};
pub use crate::timing::{FrameClock, ManualTimeSource, TimeSource};

// Input, assets and debugging
pub use crate::assets::{AssetLoader, FileLoader, ManualLoader, PendingLoads};
pub use crate::debug::{DebugBinding, DebugField, DebugPanel, FieldValue};
pub use crate::input::{InputState, KeyBindings};

// Rendering boundary
pub use crate::gfx::camera::{OrbitControls, PerspectiveCamera};
pub use crate::gfx::rendering::{HeadlessRenderer, RenderStats, Renderer};

// Errors
pub use crate::error::{AppError, AssetError, RenderError, SceneError};

// Re-export common external dependencies
pub use cgmath::{InnerSpace, Vector3, Zero};
