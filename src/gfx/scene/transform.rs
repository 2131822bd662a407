//! # Node Transforms
//!
//! Position, Euler rotation and scale of a scene node, relative to its parent.
//! Rotations are stored in radians and composed in X, then Y, then Z order.

use cgmath::{Matrix4, Rad, Vector3, Zero};

/// One of the three coordinate axes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Component index into a `Vector3`
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    /// Lowercase axis name, as used in debug labels (`position.x`)
    pub fn name(self) -> &'static str {
        match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        }
    }

    pub fn get(self, v: &Vector3<f32>) -> f32 {
        v[self.index()]
    }

    pub fn set(self, v: &mut Vector3<f32>, value: f32) {
        v[self.index()] = value;
    }
}

/// Local transform of a node
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vector3<f32>,
    /// Euler angles in radians
    pub rotation: Vector3<f32>,
    pub scale: Vector3<f32>,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vector3::zero(),
            rotation: Vector3::zero(),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    pub fn from_position(x: f32, y: f32, z: f32) -> Self {
        Self {
            position: Vector3::new(x, y, z),
            ..Default::default()
        }
    }

    /// Builder pattern: Set Euler rotation in radians
    pub fn with_rotation(mut self, x: f32, y: f32, z: f32) -> Self {
        self.rotation = Vector3::new(x, y, z);
        self
    }

    /// Builder pattern: Set non-uniform scale
    pub fn with_scale(mut self, x: f32, y: f32, z: f32) -> Self {
        self.scale = Vector3::new(x, y, z);
        self
    }

    /// Local matrix. Order matters: T * R * S
    pub fn matrix(&self) -> Matrix4<f32> {
        let r = Matrix4::from_angle_x(Rad(self.rotation.x))
            * Matrix4::from_angle_y(Rad(self.rotation.y))
            * Matrix4::from_angle_z(Rad(self.rotation.z));
        let s = Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z);
        Matrix4::from_translation(self.position) * r * s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{SquareMatrix, Vector4};

    #[test]
    fn test_default_is_identity() {
        assert_eq!(Transform::default().matrix(), Matrix4::identity());
    }

    #[test]
    fn test_translation_applies_after_scale() {
        let t = Transform::from_position(1.0, 2.0, 3.0).with_scale(2.0, 2.0, 2.0);
        let p = t.matrix() * Vector4::new(1.0, 0.0, 0.0, 1.0);
        assert_eq!(p, Vector4::new(3.0, 2.0, 3.0, 1.0));
    }

    #[test]
    fn test_axis_accessors() {
        let mut v = Vector3::new(1.0, 2.0, 3.0);
        Axis::Y.set(&mut v, 5.0);
        assert_eq!(Axis::Y.get(&v), 5.0);
        assert_eq!(Axis::Z.name(), "z");
    }
}
