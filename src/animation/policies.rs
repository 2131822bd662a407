//! Motion policies applied to nodes and the camera each frame

use std::f32::consts::TAU;

use cgmath::Vector3;

use crate::gfx::scene::{Axis, NodeId};

/// Stateless sinusoid: `sin(elapsed * frequency + phase) * amplitude + offset`
///
/// Recomputed from elapsed time on every frame, so repeated frames at the
/// same time give the same value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Oscillate {
    pub axis: Axis,
    pub amplitude: f32,
    pub frequency: f32,
    pub phase: f32,
    pub offset: f32,
}

impl Oscillate {
    pub fn new(axis: Axis, amplitude: f32) -> Self {
        Self {
            axis,
            amplitude,
            frequency: 1.0,
            phase: 0.0,
            offset: 0.0,
        }
    }

    pub fn with_frequency(mut self, frequency: f32) -> Self {
        self.frequency = frequency;
        self
    }

    pub fn with_phase(mut self, phase: f32) -> Self {
        self.phase = phase;
        self
    }

    pub fn with_offset(mut self, offset: f32) -> Self {
        self.offset = offset;
        self
    }

    pub fn value_at(&self, elapsed: f32) -> f32 {
        (elapsed * self.frequency + self.phase).sin() * self.amplitude + self.offset
    }
}

/// Stateful back-and-forth motion between two bounds
///
/// Each frame moves the value by `direction * speed * delta`. Once the value
/// is past a bound the direction points back towards the range, so the value
/// never leaves it by more than one step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PingPong {
    pub axis: Axis,
    pub lower: f32,
    pub upper: f32,
    pub speed: f32,
    /// `1.0` or `-1.0`
    pub direction: f32,
}

impl PingPong {
    pub fn new(axis: Axis, lower: f32, upper: f32, speed: f32) -> Self {
        Self {
            axis,
            lower: lower.min(upper),
            upper: lower.max(upper),
            speed,
            direction: 1.0,
        }
    }

    /// Advances `value` by one frame, returning the new value
    pub fn step(&mut self, value: f32, delta: f32) -> f32 {
        let next = value + self.direction * self.speed * delta;
        if next < self.lower {
            self.direction = 1.0;
        } else if next > self.upper {
            self.direction = -1.0;
        }
        next
    }
}

/// Per-node animation
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Animation {
    /// `rotation += rate * delta` on each axis
    Spin { rate: Vector3<f32> },
    Oscillate(Oscillate),
    PingPong(PingPong),
    /// Circles the origin in the XZ plane; `height` also pins Y when set
    Orbit {
        radius: f32,
        speed: f32,
        height: Option<f32>,
    },
    /// `y = |sin(elapsed * frequency)| * amplitude`
    Bounce { amplitude: f32, frequency: f32 },
    /// Follows `target` across the ground and fades as it rises
    ShadowFollow { target: NodeId, opacity_scale: f32 },
    /// Waves a point cloud: `y = sin(elapsed * frequency + x) * amplitude`
    ParticleWave { amplitude: f32, frequency: f32 },
}

impl Animation {
    pub fn spin(x: f32, y: f32, z: f32) -> Self {
        Animation::Spin {
            rate: Vector3::new(x, y, z),
        }
    }

    pub fn ping_pong(axis: Axis, lower: f32, upper: f32, speed: f32) -> Self {
        Animation::PingPong(PingPong::new(axis, lower, upper, speed))
    }

    /// Position axes this animation writes
    ///
    /// At most one animation may drive a given axis of a node.
    pub fn driven_axes(&self) -> Vec<Axis> {
        match self {
            Animation::Oscillate(o) => vec![o.axis],
            Animation::PingPong(p) => vec![p.axis],
            Animation::Orbit { height: Some(_), .. } => vec![Axis::X, Axis::Y, Axis::Z],
            Animation::Orbit { height: None, .. } => vec![Axis::X, Axis::Z],
            Animation::Bounce { .. } => vec![Axis::Y],
            Animation::ShadowFollow { .. } => vec![Axis::X, Axis::Z],
            Animation::Spin { .. } | Animation::ParticleWave { .. } => Vec::new(),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Animation::Spin { .. } => "spin",
            Animation::Oscillate(_) => "oscillate",
            Animation::PingPong(_) => "ping-pong",
            Animation::Orbit { .. } => "orbit",
            Animation::Bounce { .. } => "bounce",
            Animation::ShadowFollow { .. } => "shadow-follow",
            Animation::ParticleWave { .. } => "particle-wave",
        }
    }
}

/// Camera animations driven by the pointer
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CameraAnimation {
    /// Pointer x sweeps the camera around `target`, pointer y raises it
    PointerOrbit {
        radius: f32,
        height: f32,
        target: Vector3<f32>,
    },
    /// Offsets the camera from where it stood when the animation first ran
    PointerParallax {
        strength: f32,
        origin: Option<Vector3<f32>>,
    },
}

impl CameraAnimation {
    pub fn pointer_orbit(radius: f32, height: f32) -> Self {
        CameraAnimation::PointerOrbit {
            radius,
            height,
            target: Vector3::new(0.0, 0.0, 0.0),
        }
    }

    pub fn parallax(strength: f32) -> Self {
        CameraAnimation::PointerParallax {
            strength,
            origin: None,
        }
    }

    /// Camera position for a pointer reading; `current` is the camera's
    /// position before this frame
    pub fn position_for(&mut self, pointer: (f32, f32), current: Vector3<f32>) -> Vector3<f32> {
        let (px, py) = pointer;
        match self {
            CameraAnimation::PointerOrbit { radius, height, .. } => Vector3::new(
                (px * TAU).sin() * *radius,
                py * *height,
                (px * TAU).cos() * *radius,
            ),
            CameraAnimation::PointerParallax { strength, origin } => {
                let base = *origin.get_or_insert(current);
                Vector3::new(base.x + px * *strength, base.y - py * *strength, base.z)
            }
        }
    }
}
