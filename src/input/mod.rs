//! Input sinks: pointer and viewport state, key bindings

pub mod keyboard;
pub mod state;

pub use keyboard::KeyBindings;
pub use state::InputState;
