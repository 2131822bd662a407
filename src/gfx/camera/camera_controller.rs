use log::debug;
use winit::{
    dpi::PhysicalPosition,
    event::{DeviceEvent, ElementState, KeyEvent, MouseScrollDelta},
    keyboard::{KeyCode, PhysicalKey},
};

use super::orbit_camera::OrbitControls;

/// Translates raw mouse and modifier input into orbit control motion
///
/// Drag rotates, shift-drag pans, the wheel zooms.
pub struct CameraController {
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    is_shift_held: bool,
    is_mouse_pressed: bool,
}

impl CameraController {
    pub fn new(rotate_speed: f32, zoom_speed: f32) -> Self {
        Self {
            rotate_speed,
            zoom_speed,
            pan_speed: 0.01,
            is_shift_held: false,
            is_mouse_pressed: false,
        }
    }

    /// Returns true when the event moved the controls
    pub fn process_events(&mut self, event: &DeviceEvent, controls: &mut OrbitControls) -> bool {
        match event {
            DeviceEvent::Button {
                button: 0, // Left Mouse Button
                state,
            } => {
                self.is_mouse_pressed = *state == ElementState::Pressed;
                false
            }
            DeviceEvent::MouseWheel { delta, .. } => {
                let scroll_amount = -match delta {
                    MouseScrollDelta::LineDelta(_, scroll) => *scroll,
                    MouseScrollDelta::PixelDelta(PhysicalPosition { y: scroll, .. }) => {
                        *scroll as f32
                    }
                };
                controls.zoom(scroll_amount * self.zoom_speed);
                true
            }
            DeviceEvent::MouseMotion { delta } if self.is_mouse_pressed => {
                if self.is_shift_held {
                    controls.pan((
                        -delta.0 as f32 * self.pan_speed,
                        delta.1 as f32 * self.pan_speed,
                    ));
                } else {
                    controls.rotate(-delta.0 as f32 * self.rotate_speed, delta.1 as f32 * self.rotate_speed);
                }
                true
            }
            _ => false,
        }
    }

    /// Tracks the shift modifier
    pub fn process_keyed_events(&mut self, event: &KeyEvent) {
        if let PhysicalKey::Code(KeyCode::ShiftLeft | KeyCode::ShiftRight) = event.physical_key {
            let was_shift_held = self.is_shift_held;
            self.is_shift_held = event.state == ElementState::Pressed;
            if was_shift_held != self.is_shift_held {
                debug!("Shift state changed: {}", self.is_shift_held);
            }
        }
    }

    /// Forgets held buttons, e.g. when the window loses focus
    pub fn release_all(&mut self) {
        self.is_mouse_pressed = false;
        self.is_shift_held = false;
    }

    /// Returns true if currently panning
    pub fn is_panning(&self) -> bool {
        self.is_mouse_pressed && self.is_shift_held
    }

    /// Returns true if currently rotating
    pub fn is_rotating(&self) -> bool {
        self.is_mouse_pressed && !self.is_shift_held
    }
}

impl Default for CameraController {
    fn default() -> Self {
        Self::new(0.005, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{Vector3, Zero};

    #[test]
    fn test_motion_without_button_is_ignored() {
        let mut controller = CameraController::default();
        let mut controls = OrbitControls::new(3.0, 0.0, 0.0, Vector3::zero());
        let moved = controller.process_events(&DeviceEvent::MouseMotion { delta: (10.0, 0.0) }, &mut controls);
        assert!(!moved);
        assert!(!controls.is_moving());
    }

    #[test]
    fn test_drag_rotates() {
        let mut controller = CameraController::default();
        let mut controls = OrbitControls::new(3.0, 0.0, 0.0, Vector3::zero());
        controller.process_events(
            &DeviceEvent::Button {
                button: 0,
                state: ElementState::Pressed,
            },
            &mut controls,
        );
        assert!(controller.is_rotating());
        let moved = controller.process_events(&DeviceEvent::MouseMotion { delta: (10.0, 0.0) }, &mut controls);
        assert!(moved);
        assert!(controls.is_moving());
    }
}
