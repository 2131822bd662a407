use log::debug;

use crate::error::SceneError;
use crate::gfx::{
    camera::PerspectiveCamera,
    scene::{Axis, NodeId, Scene},
};
use crate::input::InputState;
use crate::scheduler::FrameTime;

use super::policies::{Animation, CameraAnimation};

#[derive(Debug, Clone)]
struct Registration {
    node: NodeId,
    animation: Animation,
}

/// Registered animations, applied in registration order once per frame
#[derive(Debug, Clone, Default)]
pub struct UpdateStep {
    registrations: Vec<Registration>,
    camera: Vec<CameraAnimation>,
}

impl UpdateStep {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an animation for `node`
    ///
    /// Fails if another registration already drives one of the same position
    /// axes. Whether the node exists is checked when the step runs.
    pub fn register(&mut self, node: NodeId, animation: Animation) -> Result<(), SceneError> {
        for axis in animation.driven_axes() {
            if self.drives(node, axis) {
                return Err(SceneError::PolicyConflict { node, axis });
            }
        }
        debug!("Registered {} on node {}", animation.label(), node);
        self.registrations.push(Registration { node, animation });
        Ok(())
    }

    pub fn add_camera(&mut self, animation: CameraAnimation) {
        self.camera.push(animation);
    }

    /// Whether a registration already writes `axis` of `node`'s position
    pub fn drives(&self, node: NodeId, axis: Axis) -> bool {
        self.registrations
            .iter()
            .any(|r| r.node == node && r.animation.driven_axes().contains(&axis))
    }

    pub fn len(&self) -> usize {
        self.registrations.len() + self.camera.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Runs one frame of every registered animation
    pub fn apply(
        &mut self,
        scene: &mut Scene,
        camera: &mut PerspectiveCamera,
        time: FrameTime,
        input: &InputState,
    ) -> Result<(), SceneError> {
        let FrameTime { delta, elapsed, .. } = time;

        for registration in &mut self.registrations {
            let id = registration.node;
            match &mut registration.animation {
                Animation::Spin { rate } => {
                    let node = scene.node_mut(id)?;
                    node.transform.rotation += *rate * delta;
                }
                Animation::Oscillate(oscillate) => {
                    let node = scene.node_mut(id)?;
                    oscillate
                        .axis
                        .set(&mut node.transform.position, oscillate.value_at(elapsed));
                }
                Animation::PingPong(ping_pong) => {
                    let node = scene.node_mut(id)?;
                    let position = &mut node.transform.position;
                    let next = ping_pong.step(ping_pong.axis.get(position), delta);
                    ping_pong.axis.set(position, next);
                }
                Animation::Orbit {
                    radius,
                    speed,
                    height,
                } => {
                    let node = scene.node_mut(id)?;
                    let angle = elapsed * *speed;
                    node.transform.position.x = angle.cos() * *radius;
                    node.transform.position.z = angle.sin() * *radius;
                    if let Some(h) = height {
                        node.transform.position.y = *h;
                    }
                }
                Animation::Bounce {
                    amplitude,
                    frequency,
                } => {
                    let node = scene.node_mut(id)?;
                    node.transform.position.y = (elapsed * *frequency).sin().abs() * *amplitude;
                }
                Animation::ShadowFollow {
                    target,
                    opacity_scale,
                } => {
                    let followed = scene.node(*target)?.transform.position;
                    let material = scene.material(id)?;
                    let node = scene.node_mut(id)?;
                    node.transform.position.x = followed.x;
                    node.transform.position.z = followed.z;
                    material.borrow_mut().common.opacity =
                        ((1.0 - followed.y) * *opacity_scale).clamp(0.0, 1.0);
                }
                Animation::ParticleWave {
                    amplitude,
                    frequency,
                } => {
                    let node = scene.node_mut(id)?;
                    let cloud = node.as_points_mut().ok_or(SceneError::WrongKind {
                        node: id,
                        expected: "point cloud",
                    })?;
                    for (current, base) in cloud.positions.iter_mut().zip(&cloud.base) {
                        *current = [
                            base[0],
                            (elapsed * *frequency + base[0]).sin() * *amplitude,
                            base[2],
                        ];
                    }
                }
            }
        }

        for animation in &mut self.camera {
            camera.position = animation.position_for(input.pointer, camera.position);
            if let CameraAnimation::PointerOrbit { target, .. } = animation {
                camera.look_at(*target);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::policies::Oscillate;
    use crate::gfx::{
        geometry::GeometryDesc,
        resources::material::{Color, Material, MaterialHandle},
        scene::{Node, PointCloud},
    };
    use std::rc::Rc;

    fn cube(x: f32) -> Node {
        Node::mesh(
            "cube",
            Rc::new(GeometryDesc::cube(1.0).build()),
            MaterialHandle::new(Material::basic(Color::from_hex(0xff0000))),
        )
        .with_position(x, 0.0, 0.0)
    }

    fn frame(delta: f32, elapsed: f32) -> FrameTime {
        FrameTime {
            delta,
            elapsed,
            frame: 0,
        }
    }

    fn camera() -> PerspectiveCamera {
        PerspectiveCamera::new(75.0, 1.0, 0.1, 100.0).with_position(0.0, 0.0, 3.0)
    }

    #[test]
    fn test_spin_one_second() {
        let mut scene = Scene::new();
        let id = scene.add(cube(10.0));
        let node = scene.node(id).unwrap();
        assert_eq!(node.transform.position, cgmath::Vector3::new(10.0, 0.0, 0.0));
        assert_eq!(node.transform.rotation, cgmath::Vector3::new(0.0, 0.0, 0.0));

        let mut step = UpdateStep::new();
        step.register(id, Animation::spin(1.0, 1.0, 0.0)).unwrap();
        step.apply(&mut scene, &mut camera(), frame(1.0, 1.0), &InputState::default())
            .unwrap();

        let rotation = scene.node(id).unwrap().transform.rotation;
        assert_eq!(rotation.x, 1.0);
        assert_eq!(rotation.y, 1.0);
        assert_eq!(rotation.z, 0.0);
    }

    #[test]
    fn test_oscillate_is_idempotent_for_same_time() {
        let mut scene = Scene::new();
        let id = scene.add(cube(0.0));
        let mut step = UpdateStep::new();
        step.register(id, Animation::Oscillate(Oscillate::new(Axis::Z, 2.0).with_offset(1.0)))
            .unwrap();

        let input = InputState::default();
        let mut cam = camera();
        step.apply(&mut scene, &mut cam, frame(0.016, 0.7), &input).unwrap();
        let first = scene.node(id).unwrap().transform.position.z;
        step.apply(&mut scene, &mut cam, frame(0.0, 0.7), &input).unwrap();
        let second = scene.node(id).unwrap().transform.position.z;

        assert!((first - (0.7f32.sin() * 2.0 + 1.0)).abs() < 1e-6);
        assert_eq!(first, second);
    }

    #[test]
    fn test_second_positional_policy_on_axis_rejected() {
        let mut scene = Scene::new();
        let id = scene.add(cube(0.0));
        let mut step = UpdateStep::new();
        step.register(id, Animation::Oscillate(Oscillate::new(Axis::Z, 1.0)))
            .unwrap();

        let conflict = step.register(id, Animation::ping_pong(Axis::Z, -1.0, 1.0, 1.0));
        assert!(matches!(
            conflict,
            Err(SceneError::PolicyConflict { axis: Axis::Z, .. })
        ));
        assert!(step.register(id, Animation::ping_pong(Axis::X, -1.0, 1.0, 1.0)).is_ok());
        assert!(step.register(id, Animation::spin(1.0, 0.0, 0.0)).is_ok());
        assert_eq!(step.len(), 3);
    }

    #[test]
    fn test_ping_pong_moves_by_speed_times_delta() {
        let mut scene = Scene::new();
        let id = scene.add(cube(0.0));
        let mut step = UpdateStep::new();
        step.register(id, Animation::ping_pong(Axis::Z, -0.5, 0.5, 2.0)).unwrap();

        let input = InputState::default();
        let mut cam = camera();
        step.apply(&mut scene, &mut cam, frame(0.1, 0.1), &input).unwrap();
        assert!((scene.node(id).unwrap().transform.position.z - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_shadow_follows_and_fades() {
        let mut scene = Scene::new();
        let sphere = scene.add(cube(0.0).with_position(1.0, 0.4, -2.0));
        let shadow_material = MaterialHandle::new(Material::basic(Color::BLACK).transparent());
        let shadow = scene.add(Node::mesh(
            "shadow",
            Rc::new(GeometryDesc::plane(1.5, 1.5).build()),
            shadow_material.clone(),
        ));

        let mut step = UpdateStep::new();
        step.register(
            shadow,
            Animation::ShadowFollow {
                target: sphere,
                opacity_scale: 0.3,
            },
        )
        .unwrap();
        step.apply(&mut scene, &mut camera(), frame(0.016, 1.0), &InputState::default())
            .unwrap();

        let position = scene.node(shadow).unwrap().transform.position;
        assert_eq!((position.x, position.z), (1.0, -2.0));
        assert!((shadow_material.borrow().common.opacity - 0.18).abs() < 1e-6);
    }

    #[test]
    fn test_shadow_opacity_clamped() {
        let mut scene = Scene::new();
        let sphere = scene.add(cube(0.0).with_position(0.0, -5.0, 0.0));
        let material = MaterialHandle::new(Material::basic(Color::BLACK).transparent());
        let shadow = scene.add(Node::mesh("shadow", Rc::new(GeometryDesc::plane(1.0, 1.0).build()), material.clone()));

        let mut step = UpdateStep::new();
        step.register(shadow, Animation::ShadowFollow { target: sphere, opacity_scale: 1.0 })
            .unwrap();
        step.apply(&mut scene, &mut camera(), frame(0.0, 0.0), &InputState::default())
            .unwrap();
        assert_eq!(material.borrow().common.opacity, 1.0);
    }

    #[test]
    fn test_missing_node_is_an_error() {
        let mut other = Scene::new();
        other.add(Node::group("a"));
        let stray = other.add(Node::group("b"));

        let mut scene = Scene::new();
        let mut step = UpdateStep::new();
        step.register(stray, Animation::spin(1.0, 0.0, 0.0)).unwrap();
        let result = step.apply(&mut scene, &mut camera(), frame(0.1, 0.1), &InputState::default());
        assert!(matches!(result, Err(SceneError::UnknownNode(id)) if id == stray));
    }

    #[test]
    fn test_particle_wave_uses_base_positions() {
        let mut scene = Scene::new();
        let cloud = PointCloud::new(
            vec![[0.0, 5.0, 1.0], [1.0, 5.0, 2.0]],
            MaterialHandle::new(Material::points(0.02)),
        );
        let id = scene.add(Node::points("particles", cloud));
        let mut step = UpdateStep::new();
        step.register(id, Animation::ParticleWave { amplitude: 1.0, frequency: 1.0 })
            .unwrap();
        step.apply(&mut scene, &mut camera(), frame(0.1, 0.5), &InputState::default())
            .unwrap();

        match &scene.node(id).unwrap().kind {
            crate::gfx::scene::NodeKind::Points(cloud) => {
                assert!((cloud.positions[0][1] - 0.5f32.sin()).abs() < 1e-6);
                assert!((cloud.positions[1][1] - 1.5f32.sin()).abs() < 1e-6);
                assert_eq!(cloud.positions[1][2], 2.0);
                assert_eq!(cloud.base[0][1], 5.0);
            }
            other => panic!("unexpected kind {:?}", other.label()),
        }
    }

    #[test]
    fn test_particle_wave_on_mesh_is_wrong_kind() {
        let mut scene = Scene::new();
        let id = scene.add(cube(0.0));
        let mut step = UpdateStep::new();
        step.register(id, Animation::ParticleWave { amplitude: 1.0, frequency: 1.0 })
            .unwrap();
        let result = step.apply(&mut scene, &mut camera(), frame(0.1, 0.5), &InputState::default());
        assert!(matches!(result, Err(SceneError::WrongKind { .. })));
    }

    #[test]
    fn test_pointer_orbit_camera() {
        let mut scene = Scene::new();
        let mut step = UpdateStep::new();
        step.add_camera(CameraAnimation::pointer_orbit(3.0, 2.0));

        let mut input = InputState::new(800, 600);
        input.on_pointer_move(600.0, 450.0);
        let mut cam = camera();
        step.apply(&mut scene, &mut cam, frame(0.016, 1.0), &input).unwrap();

        // pointer (0.25, 0.25): a quarter turn around the target
        assert!((cam.position.x - 3.0).abs() < 1e-5);
        assert!(cam.position.z.abs() < 1e-5);
        assert!((cam.position.y - 0.5).abs() < 1e-6);
        assert_eq!(cam.target, cgmath::Vector3::new(0.0, 0.0, 0.0));
    }

    #[test]
    fn test_orbit_position_at_elapsed() {
        let mut scene = Scene::new();
        let id = scene.add(cube(0.0).with_position(0.0, 0.7, 0.0));
        let mut step = UpdateStep::new();
        step.register(id, Animation::Orbit { radius: 2.0, speed: 0.5, height: None })
            .unwrap();

        let t = 1.2_f32;
        step.apply(&mut scene, &mut camera(), frame(0.016, t), &InputState::default())
            .unwrap();
        let p = scene.node(id).unwrap().transform.position;
        assert!((p.x - (t * 0.5).cos() * 2.0).abs() < 1e-5);
        assert!((p.z - (t * 0.5).sin() * 2.0).abs() < 1e-5);
        // Y is left alone without a height
        assert_eq!(p.y, 0.7);
    }

    #[test]
    fn test_orbit_with_height_pins_y() {
        let mut scene = Scene::new();
        let id = scene.add(cube(0.0).with_position(0.0, 0.7, 0.0));
        let mut step = UpdateStep::new();
        step.register(id, Animation::Orbit { radius: 1.0, speed: 1.0, height: Some(2.5) })
            .unwrap();

        step.apply(&mut scene, &mut camera(), frame(0.016, 0.0), &InputState::default())
            .unwrap();
        let p = scene.node(id).unwrap().transform.position;
        assert!((p.x - 1.0).abs() < 1e-6);
        assert!(p.z.abs() < 1e-6);
        assert_eq!(p.y, 2.5);
    }

    #[test]
    fn test_bounce_stays_above_ground() {
        let mut scene = Scene::new();
        let id = scene.add(cube(0.0));
        let mut step = UpdateStep::new();
        step.register(id, Animation::Bounce { amplitude: 1.5, frequency: 3.0 })
            .unwrap();

        for t in [0.0_f32, 0.4, 1.3, 2.0] {
            step.apply(&mut scene, &mut camera(), frame(0.016, t), &InputState::default())
                .unwrap();
            let y = scene.node(id).unwrap().transform.position.y;
            assert!((y - (t * 3.0).sin().abs() * 1.5).abs() < 1e-5);
            assert!(y >= 0.0);
        }
    }

    #[test]
    fn test_orbit_and_bounce_share_a_node() {
        let mut scene = Scene::new();
        let id = scene.add(cube(0.0));
        let mut step = UpdateStep::new();
        step.register(id, Animation::Orbit { radius: 1.5, speed: 1.0, height: None })
            .unwrap();
        step.register(id, Animation::Bounce { amplitude: 1.0, frequency: 3.0 })
            .unwrap();

        let t = 0.8_f32;
        step.apply(&mut scene, &mut camera(), frame(0.016, t), &InputState::default())
            .unwrap();
        let p = scene.node(id).unwrap().transform.position;
        assert!((p.x - t.cos() * 1.5).abs() < 1e-5);
        assert!((p.z - t.sin() * 1.5).abs() < 1e-5);
        assert!((p.y - (t * 3.0).sin().abs()).abs() < 1e-5);
    }

    #[test]
    fn test_orbit_with_height_conflicts_with_bounce() {
        let mut scene = Scene::new();
        let id = scene.add(cube(0.0));
        let mut step = UpdateStep::new();
        step.register(id, Animation::Orbit { radius: 1.0, speed: 1.0, height: Some(1.0) })
            .unwrap();
        let result = step.register(id, Animation::Bounce { amplitude: 1.0, frequency: 1.0 });
        assert!(matches!(result, Err(SceneError::PolicyConflict { axis: Axis::Y, .. })));
    }
}
