//! Application configuration
//!
//! Plain structs with defaults; the binary overrides them from CLI flags.

use std::path::PathBuf;

use crate::gfx::camera::{orbit_camera::OrbitCameraBounds, OrbitControls, PerspectiveCamera};
use crate::scenes::Preset;

#[derive(Debug, Clone, PartialEq)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub vsync: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "vista".to_string(),
            width: 800,
            height: 600,
            vsync: true,
        }
    }
}

impl WindowConfig {
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width.max(1);
        self.height = height.max(1);
        self
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    pub fn with_vsync(mut self, vsync: bool) -> Self {
        self.vsync = vsync;
        self
    }

    pub fn aspect(&self) -> f32 {
        self.width.max(1) as f32 / self.height.max(1) as f32
    }
}

/// Perspective camera settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraConfig {
    /// Vertical field of view in degrees
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    /// Overrides the preset's starting position
    pub position: Option<[f32; 3]>,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov: 75.0,
            near: 0.1,
            far: 100.0,
            position: None,
        }
    }
}

impl CameraConfig {
    pub fn with_fov(mut self, fov: f32) -> Self {
        self.fov = fov;
        self
    }

    pub fn with_clip(mut self, near: f32, far: f32) -> Self {
        self.near = near;
        self.far = far;
        self
    }

    pub fn with_position(mut self, x: f32, y: f32, z: f32) -> Self {
        self.position = Some([x, y, z]);
        self
    }

    /// Camera at the configured position, or at `fallback` when none is set
    pub fn build(&self, aspect: f32, fallback: [f32; 3]) -> PerspectiveCamera {
        let [x, y, z] = self.position.unwrap_or(fallback);
        PerspectiveCamera::new(self.fov, aspect, self.near, self.far).with_position(x, y, z)
    }
}

/// Orbit controls and key binding settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlsConfig {
    pub orbit: bool,
    /// Fraction of pending motion applied per frame, `None` for no damping
    pub damping: Option<f32>,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub min_distance: f32,
    /// Camera translation per key press
    pub key_step: f32,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            orbit: true,
            damping: Some(0.1),
            rotate_speed: 0.005,
            zoom_speed: 1.0,
            min_distance: 1.1,
            key_step: 0.5,
        }
    }
}

impl ControlsConfig {
    pub fn without_orbit(mut self) -> Self {
        self.orbit = false;
        self
    }

    pub fn with_damping(mut self, damping: Option<f32>) -> Self {
        self.damping = damping;
        self
    }

    pub fn with_key_step(mut self, step: f32) -> Self {
        self.key_step = step;
        self
    }

    /// Orbit controls around the camera's current target
    pub fn build(&self, camera: &PerspectiveCamera) -> Option<OrbitControls> {
        if !self.orbit {
            return None;
        }
        let bounds = OrbitCameraBounds {
            min_distance: Some(self.min_distance),
            ..Default::default()
        };
        let controls = OrbitControls::from_camera(camera).with_bounds(bounds);
        Some(match self.damping {
            Some(factor) => controls.with_damping(factor),
            None => controls,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub window: WindowConfig,
    pub camera: CameraConfig,
    pub controls: ControlsConfig,
    pub preset: Preset,
    pub debug_panel: bool,
    /// Directory texture paths are resolved against
    pub asset_root: PathBuf,
    pub ui_font_size: f32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            camera: CameraConfig::default(),
            controls: ControlsConfig::default(),
            preset: Preset::Basics,
            debug_panel: true,
            asset_root: PathBuf::from("assets"),
            ui_font_size: 16.0,
        }
    }
}

impl AppConfig {
    pub fn with_preset(mut self, preset: Preset) -> Self {
        self.preset = preset;
        self
    }

    pub fn with_window(mut self, window: WindowConfig) -> Self {
        self.window = window;
        self
    }

    pub fn with_camera(mut self, camera: CameraConfig) -> Self {
        self.camera = camera;
        self
    }

    pub fn with_controls(mut self, controls: ControlsConfig) -> Self {
        self.controls = controls;
        self
    }

    pub fn with_debug_panel(mut self, enabled: bool) -> Self {
        self.debug_panel = enabled;
        self
    }

    pub fn with_asset_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.asset_root = root.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_defaults() {
        let camera = CameraConfig::default().build(2.0, [0.0, 0.0, 3.0]);
        assert_eq!(camera.fovy.0, 75.0);
        assert_eq!(camera.position.z, 3.0);
        assert_eq!(camera.aspect, 2.0);
    }

    #[test]
    fn test_position_override_wins() {
        let camera = CameraConfig::default()
            .with_position(1.0, 2.0, 3.0)
            .build(1.0, [0.0, 0.0, 9.0]);
        assert_eq!(camera.position.x, 1.0);
        assert_eq!(camera.position.z, 3.0);
    }

    #[test]
    fn test_orbit_can_be_disabled() {
        let camera = CameraConfig::default().build(1.0, [0.0, 0.0, 3.0]);
        assert!(ControlsConfig::default().without_orbit().build(&camera).is_none());
        let controls = ControlsConfig::default().build(&camera).unwrap();
        assert!((controls.distance - 3.0).abs() < 1e-5);
    }

    #[test]
    fn test_window_size_never_zero() {
        let window = WindowConfig::default().with_size(0, 0);
        assert_eq!((window.width, window.height), (1, 1));
    }
}
