//! Per-frame update step
//!
//! Nodes are animated by registering an [`Animation`] against their id in an
//! [`UpdateStep`]. The step runs once per scheduled frame with the frame's
//! timing and the latest [`InputState`](crate::input::InputState).

pub mod policies;
pub mod update;

pub use policies::{Animation, CameraAnimation, Oscillate, PingPong};
pub use update::UpdateStep;
