use cgmath::*;

use super::camera_utils::{convert_matrix4_to_array, Camera, CameraUniform, OPENGL_TO_WGPU_MATRIX};

/// Perspective camera looking from `position` at `target`, Y up
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerspectiveCamera {
    pub position: Vector3<f32>,
    pub target: Vector3<f32>,
    pub up: Vector3<f32>,
    /// Vertical field of view
    pub fovy: Deg<f32>,
    pub aspect: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Camera for PerspectiveCamera {
    fn build_view_projection_matrix(&self) -> Matrix4<f32> {
        self.projection_matrix() * self.view_matrix()
    }
}

impl PerspectiveCamera {
    pub fn new(fovy_degrees: f32, aspect: f32, znear: f32, zfar: f32) -> Self {
        Self {
            position: Vector3::zero(),
            target: Vector3::zero(),
            up: Vector3::unit_y(),
            fovy: Deg(fovy_degrees),
            aspect,
            znear,
            zfar,
        }
    }

    /// Builder pattern: Place the camera
    pub fn with_position(mut self, x: f32, y: f32, z: f32) -> Self {
        self.position = Vector3::new(x, y, z);
        self
    }

    pub fn look_at(&mut self, target: Vector3<f32>) {
        self.target = target;
    }

    /// Moves the camera without changing its view direction
    pub fn translate(&mut self, delta: Vector3<f32>) {
        self.position += delta;
        self.target += delta;
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        if aspect.is_finite() && aspect > 0.0 {
            self.aspect = aspect;
        }
    }

    pub fn resize_projection(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.set_aspect(width as f32 / height as f32);
        }
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        let eye = Point3::from_vec(self.position);
        let target = Point3::from_vec(self.target);
        Matrix4::look_at_rh(eye, target, self.up)
    }

    pub fn projection_matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * perspective(self.fovy, self.aspect, self.znear, self.zfar)
    }

    pub fn uniform(&self) -> CameraUniform {
        CameraUniform {
            view_position: [self.position.x, self.position.y, self.position.z, 1.0],
            view_proj: convert_matrix4_to_array(self.build_view_projection_matrix()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate_keeps_direction() {
        let mut camera = PerspectiveCamera::new(75.0, 1.0, 0.1, 100.0).with_position(0.0, 0.0, 3.0);
        let before = camera.target - camera.position;
        camera.translate(Vector3::new(0.5, 0.0, 0.0));
        assert_eq!(camera.position, Vector3::new(0.5, 0.0, 3.0));
        assert_eq!(camera.target - camera.position, before);
    }

    #[test]
    fn test_resize_ignores_zero_height() {
        let mut camera = PerspectiveCamera::new(75.0, 1.5, 0.1, 100.0);
        camera.resize_projection(800, 0);
        assert_eq!(camera.aspect, 1.5);
        camera.resize_projection(800, 400);
        assert_eq!(camera.aspect, 2.0);
    }

    #[test]
    fn test_target_projects_to_screen_center() {
        let camera = PerspectiveCamera::new(75.0, 1.0, 0.1, 100.0).with_position(0.0, 0.0, 3.0);
        let clip = camera.build_view_projection_matrix() * Vector4::new(0.0, 0.0, 0.0, 1.0);
        assert!((clip.x / clip.w).abs() < 1e-6);
        assert!((clip.y / clip.w).abs() < 1e-6);
        let depth = clip.z / clip.w;
        assert!(depth > 0.0 && depth < 1.0);
    }
}
