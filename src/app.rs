use std::sync::Arc;

use log::{error, info};
use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalSize},
    event::{DeviceEvent, DeviceId, ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowAttributes, WindowId},
};

use crate::assets::FileLoader;
use crate::config::AppConfig;
use crate::error::AppError;
use crate::gfx::{
    camera::CameraController,
    rendering::{RenderEngine, Renderer},
};
use crate::runtime::SceneRuntime;
use crate::timing::FrameClock;
use crate::ui::{apply_edits, debug_panel, UiManager};

/// Windowed host for one [`SceneRuntime`]
pub struct VistaApp {
    event_loop: EventLoop<()>,
    state: AppState,
}

struct AppState {
    config: AppConfig,
    runtime: SceneRuntime,
    // Keeps the loader thread alive for the lifetime of the window
    _loader: FileLoader,
    window: Option<Arc<Window>>,
    render_engine: Option<RenderEngine>,
    ui_manager: Option<UiManager>,
    camera_controller: CameraController,
    startup_error: Option<AppError>,
}

impl VistaApp {
    /// Builds the configured preset; the window opens in [`run`](Self::run)
    pub fn new(config: AppConfig) -> Result<Self, AppError> {
        let event_loop = EventLoop::new()?;
        let loader = FileLoader::new(config.asset_root.clone()).map_err(AppError::Loader)?;

        let setup = config.preset.build(&loader, &config)?;
        let viewport = (config.window.width, config.window.height);
        let runtime = SceneRuntime::from_setup(setup, FrameClock::system(), viewport)
            .with_controls_config(&config.controls);
        let camera_controller =
            CameraController::new(config.controls.rotate_speed, config.controls.zoom_speed);

        Ok(Self {
            event_loop,
            state: AppState {
                config,
                runtime,
                _loader: loader,
                window: None,
                render_engine: None,
                ui_manager: None,
                camera_controller,
                startup_error: None,
            },
        })
    }

    pub fn runtime(&self) -> &SceneRuntime {
        &self.state.runtime
    }

    pub fn runtime_mut(&mut self) -> &mut SceneRuntime {
        &mut self.state.runtime
    }

    /// Runs the event loop until the window closes
    pub fn run(self) -> Result<(), AppError> {
        let VistaApp {
            event_loop,
            mut state,
        } = self;
        event_loop.set_control_flow(ControlFlow::Poll);
        event_loop.run_app(&mut state)?;

        match state.startup_error.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl AppState {
    fn init_graphics(&mut self, event_loop: &ActiveEventLoop) -> Result<(), AppError> {
        let window_config = &self.config.window;
        let attributes = WindowAttributes::default()
            .with_title(window_config.title.clone())
            .with_inner_size(LogicalSize::new(window_config.width, window_config.height));
        let window = Arc::new(event_loop.create_window(attributes)?);

        let (width, height) = window.inner_size().into();
        let vsync = window_config.vsync;
        let mut renderer =
            pollster::block_on(RenderEngine::new(window.clone(), width, height, vsync))?;

        let mut ui_manager = UiManager::new(
            renderer.device(),
            renderer.queue(),
            renderer.surface_format(),
            &window,
            self.config.ui_font_size,
        );
        ui_manager.update_display_size(width, height);

        self.runtime.on_resize(width, height, &mut renderer);
        self.runtime.start();
        info!(
            "Running scene '{}' at {}x{}",
            self.config.preset, width, height
        );

        self.window = Some(window);
        self.render_engine = Some(renderer);
        self.ui_manager = Some(ui_manager);
        Ok(())
    }

    fn handle_key(&mut self, event_loop: &ActiveEventLoop, event: &KeyEvent) {
        self.camera_controller.process_keyed_events(event);
        if event.state != ElementState::Pressed {
            return;
        }
        let PhysicalKey::Code(code) = event.physical_key else {
            return;
        };
        match code {
            KeyCode::Escape => event_loop.exit(),
            KeyCode::KeyH if !event.repeat => self.runtime.debug.toggle(),
            // Repeats move the camera again
            code => {
                self.runtime.on_key(code);
            }
        }
    }

    fn redraw(&mut self, window: &Window) {
        let was_running = self.runtime.is_running();
        if self.runtime.frame().is_err() && was_running {
            window.set_title(&format!("{} (stopped)", self.config.window.title));
        }

        let Some(renderer) = self.render_engine.as_mut() else {
            return;
        };
        let runtime = &self.runtime;

        let mut edits = Vec::new();
        let result = match self.ui_manager.as_mut() {
            Some(ui_manager) if runtime.debug.visible => renderer.render_with_overlay(
                &runtime.scene,
                &runtime.camera,
                Some(
                    |device: &wgpu::Device,
                     queue: &wgpu::Queue,
                     encoder: &mut wgpu::CommandEncoder,
                     view: &wgpu::TextureView| {
                        ui_manager.draw(device, queue, encoder, window, view, |ui| {
                            edits = debug_panel(ui, &runtime.debug, &runtime.scene);
                        })
                    },
                ),
            ),
            _ => renderer.render(&runtime.scene, &runtime.camera),
        };
        if let Err(e) = result {
            error!("Render failed: {}", e);
        }

        apply_edits(&mut self.runtime.scene, &edits);
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.init_graphics(event_loop) {
            error!("{}", e);
            self.startup_error = Some(e);
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        let Some(window) = self.window.clone() else {
            return;
        };

        // The panel gets first pick of input
        if let Some(ui_manager) = self.ui_manager.as_mut() {
            if ui_manager.handle_input(&window, window_id, &event) {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::KeyboardInput { event, .. } => self.handle_key(event_loop, &event),
            WindowEvent::CursorMoved { position, .. } => {
                self.runtime.on_pointer_move(position.x, position.y);
            }
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                if let Some(renderer) = self.render_engine.as_mut() {
                    self.runtime.on_resize(width, height, renderer);
                }
                if let Some(ui_manager) = self.ui_manager.as_mut() {
                    ui_manager.update_display_size(width, height);
                }
            }
            WindowEvent::Focused(false) => self.camera_controller.release_all(),
            WindowEvent::RedrawRequested => self.redraw(&window),
            _ => (),
        }
    }

    fn device_event(&mut self, _event_loop: &ActiveEventLoop, _device_id: DeviceId, event: DeviceEvent) {
        if self
            .ui_manager
            .as_ref()
            .is_some_and(UiManager::wants_input)
        {
            return;
        }
        if let Some(controls) = self.runtime.controls.as_mut() {
            self.camera_controller.process_events(&event, controls);
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = self.window.as_ref() {
            window.request_redraw();
        }
    }
}
