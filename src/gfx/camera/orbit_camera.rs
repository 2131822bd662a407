use cgmath::*;

use super::perspective::PerspectiveCamera;

/// Orbit camera controls: rotate around a target, zoom and pan
///
/// Input is accumulated by [`rotate`](Self::rotate), [`zoom`](Self::zoom)
/// and [`pan`](Self::pan) and applied to a camera once per frame by
/// [`update`](Self::update). With damping enabled only part of the pending
/// motion is applied each frame so movement eases out.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitControls {
    pub distance: f32,
    pub pitch: f32,
    pub yaw: f32,
    pub target: Vector3<f32>,
    pub bounds: OrbitCameraBounds,
    pub enabled: bool,
    /// Fraction of pending motion applied per frame, `None` applies it all
    pub damping: Option<f32>,
    pending_yaw: f32,
    pending_pitch: f32,
    pending_zoom: f32,
}

impl OrbitControls {
    pub fn new(distance: f32, pitch: f32, yaw: f32, target: Vector3<f32>) -> Self {
        let mut controls = Self {
            distance,
            pitch,
            yaw,
            target,
            bounds: OrbitCameraBounds::default(),
            enabled: true,
            damping: None,
            pending_yaw: 0.0,
            pending_pitch: 0.0,
            pending_zoom: 0.0,
        };
        controls.clamp_to_bounds();
        controls
    }

    /// Derives distance, pitch and yaw from where the camera currently sits
    pub fn from_camera(camera: &PerspectiveCamera) -> Self {
        let offset = camera.position - camera.target;
        let distance = offset.magnitude();
        let (pitch, yaw) = if distance > f32::EPSILON {
            ((offset.y / distance).clamp(-1.0, 1.0).asin(), offset.x.atan2(offset.z))
        } else {
            (0.0, 0.0)
        };
        Self::new(distance, pitch, yaw, camera.target)
    }

    /// Builder pattern: Enable damping with the given factor in `(0, 1]`
    pub fn with_damping(mut self, factor: f32) -> Self {
        self.damping = Some(factor.clamp(f32::EPSILON, 1.0));
        self
    }

    pub fn with_bounds(mut self, bounds: OrbitCameraBounds) -> Self {
        self.bounds = bounds;
        self.clamp_to_bounds();
        self
    }

    pub fn rotate(&mut self, delta_yaw: f32, delta_pitch: f32) {
        if self.enabled {
            self.pending_yaw += delta_yaw;
            self.pending_pitch += delta_pitch;
        }
    }

    /// Positive values move away from the target. Zoom speed scales with
    /// the log of the distance so it feels the same close up and far away.
    pub fn zoom(&mut self, delta: f32) {
        if self.enabled {
            self.pending_zoom += f32::log10(self.distance.max(1.0 + f32::EPSILON)) * delta;
        }
    }

    /// Pans the target relative to the current view direction
    /// delta.0 = horizontal pan (left/right relative to camera view)
    /// delta.1 = vertical pan (up/down relative to camera view)
    pub fn pan(&mut self, delta: (f32, f32)) {
        if !self.enabled {
            return;
        }
        let forward = -self.offset().normalize();
        let right = forward.cross(Vector3::unit_y()).normalize();
        let up = right.cross(forward).normalize();

        // Scale pan movement by distance for consistent feel at all zoom levels
        let pan_scale = self.distance * 0.1;
        self.target += (right * delta.0 + up * delta.1) * pan_scale;
    }

    /// Moves the orbit center together with the camera
    pub fn translate(&mut self, delta: Vector3<f32>) {
        self.target += delta;
    }

    /// True while damped motion is still being applied
    pub fn is_moving(&self) -> bool {
        self.pending_yaw.abs() > 1e-5 || self.pending_pitch.abs() > 1e-5 || self.pending_zoom.abs() > 1e-5
    }

    /// Applies pending motion and writes the resulting pose into `camera`
    pub fn update(&mut self, camera: &mut PerspectiveCamera) {
        let factor = self.damping.unwrap_or(1.0);

        self.yaw += self.pending_yaw * factor;
        self.pitch += self.pending_pitch * factor;
        self.distance += self.pending_zoom * factor;
        self.pending_yaw *= 1.0 - factor;
        self.pending_pitch *= 1.0 - factor;
        self.pending_zoom *= 1.0 - factor;
        self.clamp_to_bounds();

        camera.position = self.eye_position();
        camera.target = self.target;
        camera.up = Vector3::unit_y();
    }

    pub fn eye_position(&self) -> Vector3<f32> {
        self.offset() + self.target
    }

    fn offset(&self) -> Vector3<f32> {
        calculate_cartesian_offset(self.pitch, self.yaw, self.distance)
    }

    fn clamp_to_bounds(&mut self) {
        self.distance = self.distance.clamp(
            self.bounds.min_distance.unwrap_or(f32::EPSILON),
            self.bounds.max_distance.unwrap_or(f32::MAX),
        );
        self.pitch = self.pitch.clamp(self.bounds.min_pitch, self.bounds.max_pitch);
        if let Some(min_yaw) = self.bounds.min_yaw {
            self.yaw = self.yaw.max(min_yaw);
        }
        if let Some(max_yaw) = self.bounds.max_yaw {
            self.yaw = self.yaw.min(max_yaw);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitCameraBounds {
    pub min_distance: Option<f32>,
    pub max_distance: Option<f32>,
    pub min_pitch: f32,
    pub max_pitch: f32,
    pub min_yaw: Option<f32>,
    pub max_yaw: Option<f32>,
}

impl Default for OrbitCameraBounds {
    fn default() -> Self {
        Self {
            min_distance: None,
            max_distance: Some(50.0),
            min_pitch: -std::f32::consts::PI / 2.0 + 1e-3,
            max_pitch: std::f32::consts::PI / 2.0 - 1e-3,
            min_yaw: None,
            max_yaw: None,
        }
    }
}

fn calculate_cartesian_offset(pitch: f32, yaw: f32, distance: f32) -> Vector3<f32> {
    Vector3::new(
        distance * yaw.sin() * pitch.cos(),
        distance * pitch.sin(),
        distance * yaw.cos() * pitch.cos(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vector3<f32>, b: Vector3<f32>) -> bool {
        (a - b).magnitude() < 1e-4
    }

    #[test]
    fn test_from_camera_round_trips_position() {
        let mut camera = PerspectiveCamera::new(75.0, 1.0, 0.1, 100.0).with_position(1.0, 1.0, 2.0);
        let mut controls = OrbitControls::from_camera(&camera);
        controls.update(&mut camera);
        assert!(approx(camera.position, Vector3::new(1.0, 1.0, 2.0)));
    }

    #[test]
    fn test_pitch_stays_within_bounds() {
        let mut camera = PerspectiveCamera::new(75.0, 1.0, 0.1, 100.0).with_position(0.0, 0.0, 3.0);
        let mut controls = OrbitControls::from_camera(&camera);
        controls.rotate(0.0, 10.0);
        controls.update(&mut camera);
        assert!(controls.pitch <= controls.bounds.max_pitch);
        assert!(camera.position.y < 3.0 + 1e-4);
    }

    #[test]
    fn test_zoom_respects_max_distance() {
        let mut camera = PerspectiveCamera::new(75.0, 1.0, 0.1, 100.0).with_position(0.0, 0.0, 3.0);
        let mut controls = OrbitControls::from_camera(&camera).with_bounds(OrbitCameraBounds {
            max_distance: Some(5.0),
            ..Default::default()
        });
        controls.zoom(1000.0);
        controls.update(&mut camera);
        assert_eq!(controls.distance, 5.0);
    }

    #[test]
    fn test_damping_applies_motion_gradually() {
        let mut camera = PerspectiveCamera::new(75.0, 1.0, 0.1, 100.0).with_position(0.0, 0.0, 3.0);
        let mut controls = OrbitControls::from_camera(&camera).with_damping(0.5);
        controls.rotate(1.0, 0.0);
        controls.update(&mut camera);
        assert!((controls.yaw - 0.5).abs() < 1e-6);
        assert!(controls.is_moving());
        controls.update(&mut camera);
        assert!((controls.yaw - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_disabled_controls_ignore_input() {
        let mut controls = OrbitControls::new(3.0, 0.0, 0.0, Vector3::zero());
        controls.enabled = false;
        controls.rotate(1.0, 1.0);
        assert!(!controls.is_moving());
    }
}
