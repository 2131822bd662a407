use std::collections::HashMap;

use cgmath::Vector3;
use log::debug;
use winit::keyboard::KeyCode;

use crate::gfx::camera::PerspectiveCamera;

/// Distance one key press moves the camera
pub const DEFAULT_STEP: f32 = 0.5;

/// Maps key codes to fixed camera translations
///
/// Bindings apply once per key event, repeats included, outside the frame
/// step.
#[derive(Debug, Clone)]
pub struct KeyBindings {
    bindings: HashMap<KeyCode, Vector3<f32>>,
}

impl KeyBindings {
    pub fn empty() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }

    /// `W`/`S` move along Z, `A`/`D` and the horizontal arrows along X,
    /// the vertical arrows along Y
    pub fn with_step(step: f32) -> Self {
        Self::empty()
            .bind(KeyCode::KeyW, Vector3::new(0.0, 0.0, -step))
            .bind(KeyCode::KeyS, Vector3::new(0.0, 0.0, step))
            .bind(KeyCode::KeyA, Vector3::new(-step, 0.0, 0.0))
            .bind(KeyCode::KeyD, Vector3::new(step, 0.0, 0.0))
            .bind(KeyCode::ArrowUp, Vector3::new(0.0, step, 0.0))
            .bind(KeyCode::ArrowDown, Vector3::new(0.0, -step, 0.0))
            .bind(KeyCode::ArrowLeft, Vector3::new(-step, 0.0, 0.0))
            .bind(KeyCode::ArrowRight, Vector3::new(step, 0.0, 0.0))
    }

    /// Builder pattern: Bind or rebind one key
    pub fn bind(mut self, code: KeyCode, delta: Vector3<f32>) -> Self {
        self.bindings.insert(code, delta);
        self
    }

    pub fn get(&self, code: KeyCode) -> Option<Vector3<f32>> {
        self.bindings.get(&code).copied()
    }

    /// Moves the camera if `code` is bound, returning the applied delta
    pub fn apply(&self, code: KeyCode, camera: &mut PerspectiveCamera) -> Option<Vector3<f32>> {
        let delta = self.get(code)?;
        camera.translate(delta);
        debug!("{:?} moved camera by {:?}", code, delta);
        Some(delta)
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self::with_step(DEFAULT_STEP)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_each_press_applies_once() {
        let keys = KeyBindings::default();
        let mut camera = PerspectiveCamera::new(75.0, 1.0, 0.1, 100.0).with_position(0.0, 0.0, 3.0);

        keys.apply(KeyCode::KeyW, &mut camera);
        keys.apply(KeyCode::KeyW, &mut camera);
        assert_eq!(camera.position, Vector3::new(0.0, 0.0, 2.0));

        keys.apply(KeyCode::ArrowUp, &mut camera);
        keys.apply(KeyCode::KeyD, &mut camera);
        assert_eq!(camera.position, Vector3::new(0.5, 0.5, 2.0));
        assert_eq!(camera.target, Vector3::new(0.5, 0.5, -1.0));
    }

    #[test]
    fn test_unbound_key_leaves_camera() {
        let keys = KeyBindings::default();
        let mut camera = PerspectiveCamera::new(75.0, 1.0, 0.1, 100.0);
        assert_eq!(keys.apply(KeyCode::KeyQ, &mut camera), None);
        assert_eq!(camera.position, Vector3::new(0.0, 0.0, 0.0));
    }

    #[test]
    fn test_rebinding_overrides_default() {
        let keys = KeyBindings::default().bind(KeyCode::KeyW, Vector3::new(0.0, 2.0, 0.0));
        assert_eq!(keys.get(KeyCode::KeyW), Some(Vector3::new(0.0, 2.0, 0.0)));
    }
}
