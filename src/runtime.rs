//! Scene runtime
//!
//! One [`SceneRuntime`] owns everything a running scene touches: the scene
//! graph, camera, clock, input state, update step, pending loads and debug
//! panel. Nothing is global, so runtimes are independent of each other.
//!
//! Per frame, [`SceneRuntime::frame`] polls finished loads, samples the
//! clock once, runs the update step and then the orbit controls. Input
//! arrives between frames through the `on_*` methods.

use log::{debug, info};
use winit::keyboard::KeyCode;

use crate::animation::UpdateStep;
use crate::assets::{PendingLoads, PollSummary};
use crate::config::ControlsConfig;
use crate::debug::DebugPanel;
use crate::error::{RenderError, SceneError};
use crate::gfx::{
    camera::{OrbitControls, PerspectiveCamera},
    rendering::{RenderStats, Renderer},
    scene::Scene,
};
use crate::input::{InputState, KeyBindings};
use crate::scenes::SceneSetup;
use crate::scheduler::{FrameScheduler, FrameTime, SchedulerState};
use crate::timing::FrameClock;

pub struct SceneRuntime {
    pub scene: Scene,
    pub camera: PerspectiveCamera,
    pub controls: Option<OrbitControls>,
    pub input: InputState,
    pub keys: KeyBindings,
    pub debug: DebugPanel,
    update: UpdateStep,
    loads: PendingLoads,
    scheduler: FrameScheduler,
    last_loads: PollSummary,
}

impl SceneRuntime {
    /// Takes over a built scene; the scheduler starts stopped
    pub fn from_setup(setup: SceneSetup, clock: FrameClock, viewport: (u32, u32)) -> Self {
        let SceneSetup {
            scene,
            mut camera,
            controls,
            update,
            loads,
            debug,
            ..
        } = setup;

        let input = InputState::new(viewport.0, viewport.1);
        camera.set_aspect(input.aspect);

        Self {
            scene,
            camera,
            controls,
            input,
            keys: KeyBindings::default(),
            debug,
            update,
            loads,
            scheduler: FrameScheduler::new(clock),
            last_loads: PollSummary::default(),
        }
    }

    /// Builder pattern: Replace the key bindings
    pub fn with_keys(mut self, keys: KeyBindings) -> Self {
        self.keys = keys;
        self
    }

    /// Builder pattern: Key bindings stepping by the configured distance
    pub fn with_controls_config(self, config: &ControlsConfig) -> Self {
        self.with_keys(KeyBindings::with_step(config.key_step))
    }

    pub fn start(&mut self) {
        self.scheduler.start();
    }

    pub fn stop(&mut self) {
        self.scheduler.stop();
    }

    pub fn is_running(&self) -> bool {
        self.scheduler.is_running()
    }

    /// True once a failed frame has stopped the loop for good
    pub fn is_halted(&self) -> bool {
        self.scheduler.state() == SchedulerState::Halted
    }

    pub fn frames(&self) -> u64 {
        self.scheduler.frames()
    }

    pub fn elapsed(&self) -> f32 {
        self.scheduler.clock().elapsed()
    }

    pub fn pending_loads(&self) -> usize {
        self.loads.len()
    }

    /// Outcome of the most recent load poll
    pub fn last_loads(&self) -> PollSummary {
        self.last_loads
    }

    /// Runs one frame
    ///
    /// Returns `Ok(None)` without touching the scene when the runtime is not
    /// running. An error halts the runtime; later calls return `Ok(None)`.
    pub fn frame(&mut self) -> Result<Option<FrameTime>, SceneError> {
        if !self.scheduler.is_running() {
            return Ok(None);
        }

        if !self.loads.is_empty() {
            self.last_loads = self.loads.poll();
            if self.last_loads.applied + self.last_loads.failed > 0 {
                debug!(
                    "Loads: {} applied, {} failed, {} pending",
                    self.last_loads.applied, self.last_loads.failed, self.last_loads.pending
                );
            }
        }

        let Self {
            scene,
            camera,
            controls,
            input,
            update,
            scheduler,
            ..
        } = self;

        scheduler.tick(|time| {
            update.apply(scene, camera, time, input)?;
            if let Some(controls) = controls {
                controls.update(camera);
            }
            Ok(())
        })
    }

    /// Draws the current state of the scene
    pub fn render(&self, renderer: &mut dyn Renderer) -> Result<RenderStats, RenderError> {
        renderer.render(&self.scene, &self.camera)
    }

    pub fn on_pointer_move(&mut self, x: f64, y: f64) {
        self.input.on_pointer_move(x, y);
    }

    /// Propagates a viewport resize to input, camera and renderer
    pub fn on_resize(&mut self, width: u32, height: u32, renderer: &mut dyn Renderer) {
        if width == 0 || height == 0 {
            return;
        }
        let aspect = self.input.on_resize(width, height);
        self.camera.set_aspect(aspect);
        renderer.resize(width, height);
        info!("Viewport {}x{} (aspect {:.3})", width, height, aspect);
    }

    /// Applies a key binding, returning true if the key is bound
    ///
    /// The orbit target moves with the camera so the next controls update
    /// keeps the translation.
    pub fn on_key(&mut self, code: KeyCode) -> bool {
        match self.keys.apply(code, &mut self.camera) {
            Some(delta) => {
                if let Some(controls) = self.controls.as_mut() {
                    controls.translate(delta);
                }
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::{Animation, CameraAnimation};
    use crate::assets::ManualLoader;
    use crate::config::AppConfig;
    use crate::gfx::{
        rendering::HeadlessRenderer,
        resources::{
            material::{Color, Material, MaterialHandle},
            texture::TextureSlot,
        },
        scene::NodeId,
    };
    use crate::scenes::{factory, Preset};
    use crate::timing::ManualTimeSource;

    const EPSILON: f32 = 1e-4;

    fn runtime(setup: SceneSetup) -> (SceneRuntime, ManualTimeSource) {
        let time = ManualTimeSource::new();
        let runtime = SceneRuntime::from_setup(setup, FrameClock::new(time.clone()), (800, 600));
        (runtime, time)
    }

    fn spinning_cube() -> (SceneSetup, NodeId) {
        let camera = PerspectiveCamera::new(75.0, 1.0, 0.1, 100.0).with_position(0.0, 0.0, 3.0);
        let mut setup = SceneSetup::new(camera);
        let cube = setup.scene.add(factory::cube(10.0));
        setup.animate(cube, Animation::spin(1.0, 1.0, 0.0)).unwrap();
        (setup, cube)
    }

    #[test]
    fn test_one_second_of_spin() {
        let (setup, cube) = spinning_cube();
        let (mut runtime, time) = runtime(setup);
        runtime.start();

        for _ in 0..10 {
            time.advance_secs(0.1);
            runtime.frame().unwrap();
        }

        let rotation = runtime.scene.node(cube).unwrap().transform.rotation;
        assert!((rotation.x - 1.0).abs() < EPSILON);
        assert!((rotation.y - 1.0).abs() < EPSILON);
        assert_eq!(rotation.z, 0.0);
        assert_eq!(runtime.scene.node(cube).unwrap().transform.position.x, 10.0);
        assert_eq!(runtime.frames(), 10);
    }

    #[test]
    fn test_stopped_runtime_leaves_scene_alone() {
        let (setup, cube) = spinning_cube();
        let (mut runtime, time) = runtime(setup);

        time.advance_secs(1.0);
        assert_eq!(runtime.frame().unwrap(), None);
        assert_eq!(runtime.scene.node(cube).unwrap().transform.rotation.x, 0.0);

        runtime.start();
        time.advance_secs(0.5);
        runtime.frame().unwrap();
        runtime.stop();
        time.advance_secs(0.5);
        runtime.frame().unwrap();
        assert!((runtime.scene.node(cube).unwrap().transform.rotation.x - 0.5).abs() < EPSILON);
    }

    #[test]
    fn test_update_error_halts_runtime() {
        let camera = PerspectiveCamera::new(75.0, 1.0, 0.1, 100.0);
        let mut setup = SceneSetup::new(camera);
        let cube = setup.scene.add(factory::cube(0.0));
        // Points at a node from another scene
        setup
            .animate(
                cube,
                Animation::ShadowFollow {
                    target: NodeId(99),
                    opacity_scale: 1.0,
                },
            )
            .unwrap();
        let (mut runtime, time) = runtime(setup);
        runtime.start();

        time.advance_secs(0.1);
        assert!(matches!(runtime.frame(), Err(SceneError::UnknownNode(_))));
        assert!(runtime.is_halted());
        time.advance_secs(0.1);
        assert_eq!(runtime.frame().unwrap(), None);
    }

    #[test]
    fn test_runtimes_are_isolated() {
        let (a_setup, a_cube) = spinning_cube();
        let (b_setup, b_cube) = spinning_cube();
        let (mut a, a_time) = runtime(a_setup);
        let (mut b, b_time) = runtime(b_setup);
        a.start();
        b.start();

        a_time.advance_secs(1.0);
        b_time.advance_secs(0.25);
        a.frame().unwrap();
        b.frame().unwrap();
        a.on_pointer_move(800.0, 600.0);

        let a_rot = a.scene.node(a_cube).unwrap().transform.rotation.x;
        let b_rot = b.scene.node(b_cube).unwrap().transform.rotation.x;
        assert!((a_rot - 1.0).abs() < EPSILON);
        assert!((b_rot - 0.25).abs() < EPSILON);
        assert_eq!(a.input.pointer, (0.5, 0.5));
        assert_eq!(b.input.pointer, (0.0, 0.0));
    }

    #[test]
    fn test_loads_land_before_update() {
        let loader = ManualLoader::new();
        let setup = Preset::Textures.build(&loader, &AppConfig::default()).unwrap();
        let door = setup.scene.find("door").unwrap();
        let (mut runtime, time) = runtime(setup);
        runtime.start();

        time.advance_secs(0.016);
        runtime.frame().unwrap();
        assert_eq!(runtime.last_loads().pending, 8);

        loader.complete(factory::textures::DOOR_COLOR, vec![1, 2, 3]);
        loader.fail(factory::textures::DOOR_AO);
        time.advance_secs(0.016);
        runtime.frame().unwrap();

        let summary = runtime.last_loads();
        assert_eq!((summary.applied, summary.failed, summary.pending), (1, 1, 6));
        let material = runtime.scene.material(door).unwrap();
        assert!(material.borrow().texture(TextureSlot::Map).is_some());
        assert!(material.borrow().texture(TextureSlot::AoMap).is_none());
        assert_eq!(runtime.pending_loads(), 6);
    }

    #[test]
    fn test_shared_material_edit_reaches_every_rendered_node() {
        let camera = PerspectiveCamera::new(75.0, 1.0, 0.1, 100.0);
        let mut setup = SceneSetup::new(camera);
        let shared = MaterialHandle::new(Material::standard(Color::WHITE, 0.0, 1.0));
        for node in factory::material_trio(&shared) {
            setup.scene.add(node);
        }
        let (runtime, _) = runtime(setup);

        shared.borrow_mut().common.wireframe = true;
        if let Some(colored) = shared.borrow_mut().as_colored_mut() {
            colored.set_color(Color::new(0.0, 1.0, 0.0));
        }

        let mut renderer = HeadlessRenderer::new(800, 600);
        let stats = runtime.render(&mut renderer).unwrap();
        assert_eq!(stats.draw_calls, 3);
        let frame = renderer.last_frame.unwrap();
        for item in &frame.items {
            let material = item.material.unwrap();
            assert!(material.wireframe);
            assert_eq!(material.color, [0.0, 1.0, 0.0]);
        }
    }

    #[test]
    fn test_resize_reaches_camera_and_renderer() {
        let (setup, _) = spinning_cube();
        let (mut runtime, _) = runtime(setup);
        let mut renderer = HeadlessRenderer::new(800, 600);

        runtime.on_resize(1000, 500, &mut renderer);
        assert_eq!(runtime.camera.aspect, 2.0);
        assert_eq!(renderer.size, (1000, 500));

        runtime.on_resize(0, 500, &mut renderer);
        assert_eq!(renderer.size, (1000, 500));
    }

    #[test]
    fn test_keys_move_camera_and_orbit_target() {
        let loader = ManualLoader::new();
        let setup = Preset::Basics.build(&loader, &AppConfig::default()).unwrap();
        let (mut runtime, time) = runtime(setup);
        runtime.start();
        let before = runtime.camera.position;

        assert!(runtime.on_key(KeyCode::KeyA));
        assert!(!runtime.on_key(KeyCode::KeyQ));
        assert!((runtime.camera.position.x - (before.x - 0.5)).abs() < EPSILON);

        // The controls update keeps the translation
        time.advance_secs(0.016);
        runtime.frame().unwrap();
        assert!((runtime.camera.target.x + 0.5).abs() < EPSILON);
    }

    #[test]
    fn test_pointer_orbit_moves_camera() {
        let camera = PerspectiveCamera::new(75.0, 1.0, 0.1, 100.0).with_position(0.0, 0.0, 3.0);
        let mut setup = SceneSetup::new(camera);
        setup.scene.add(factory::cube(0.0));
        setup.animate_camera(CameraAnimation::pointer_orbit(3.0, 5.0));
        let (mut runtime, time) = runtime(setup);
        runtime.start();

        // A quarter of the viewport right of centre is a quarter turn
        runtime.on_pointer_move(600.0, 300.0);
        time.advance_secs(0.016);
        runtime.frame().unwrap();
        assert!((runtime.camera.position.x - 3.0).abs() < EPSILON);
        assert!(runtime.camera.position.z.abs() < EPSILON);
    }
}
