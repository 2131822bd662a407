//! Asset loading
//!
//! Factories request textures through an [`AssetLoader`] and get the node
//! back immediately. [`PendingLoads`] is polled once per frame and attaches
//! whatever has finished.

pub mod loader;
pub mod pending;

pub use loader::{AssetHandle, AssetLoader, FileLoader, LoadStatus, ManualLoader};
pub use pending::{PendingLoads, PollSummary, TextureTarget};
