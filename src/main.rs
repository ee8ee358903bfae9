use std::process::ExitCode;
use std::sync::Arc;
use std::time::Instant;

use rand::rngs::ThreadRng;
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{CursorGrabMode, Window, WindowId};

use deskscape::{
    AppConfig, DeskScene, GpuContext, InputHandler, SceneError, SceneRenderer, TextureLoader,
    TextureStore,
};

struct Running {
    window: Arc<Window>,
    gpu: GpuContext,
    scene: DeskScene,
    renderer: SceneRenderer,
    input: InputHandler,
    rng: ThreadRng,
    last_frame: Instant,
}

impl Running {
    fn start(event_loop: &ActiveEventLoop, config: &AppConfig) -> Result<Self, SceneError> {
        let attrs = Window::default_attributes()
            .with_title(&config.title)
            .with_inner_size(winit::dpi::LogicalSize::new(config.width, config.height));
        let window = Arc::new(event_loop.create_window(attrs)?);

        if let Err(err) = window
            .set_cursor_grab(CursorGrabMode::Confined)
            .or_else(|_| window.set_cursor_grab(CursorGrabMode::Locked))
        {
            log::warn!("could not grab the cursor: {err}");
        }
        window.set_cursor_visible(false);

        let gpu = GpuContext::new(window.clone())?;

        let mut textures = TextureStore::new();
        let scene = DeskScene::build(
            config,
            &mut TextureLoader::new(&gpu, &mut textures, &config.texture_dir),
        )?;
        let renderer = SceneRenderer::new(&gpu, textures, &scene, config.clear_color)?;

        Ok(Self {
            window,
            gpu,
            scene,
            renderer,
            input: InputHandler::new(),
            rng: rand::rng(),
            last_frame: Instant::now(),
        })
    }

    /// Returns false when the app should stop.
    fn redraw(&mut self) -> bool {
        let now = Instant::now();
        let dt = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;

        self.input.apply(&mut self.scene.camera, dt);
        self.scene.animate(dt, &mut self.rng);

        match self.renderer.render(&self.gpu, &self.scene) {
            Ok(()) => {}
            Err(err @ (wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated)) => {
                log::warn!("{err}; reconfiguring surface");
                self.gpu.reconfigure();
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("GPU out of memory");
                return false;
            }
            Err(err) => log::warn!("skipping frame: {err}"),
        }

        self.window.request_redraw();
        true
    }
}

struct DeskApp {
    config: AppConfig,
    running: Option<Running>,
    error: Option<SceneError>,
}

impl ApplicationHandler for DeskApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.running.is_some() {
            return;
        }
        match Running::start(event_loop, &self.config) {
            Ok(running) => {
                running.window.request_redraw();
                self.running = Some(running);
            }
            Err(err) => {
                self.error = Some(err);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let Some(running) = &mut self.running else {
            return;
        };

        running.input.handle_event(&event);
        if running.input.exit_requested() {
            event_loop.exit();
            return;
        }

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => running.gpu.resize(size.width, size.height),
            WindowEvent::RedrawRequested => {
                if !running.redraw() {
                    event_loop.exit();
                }
            }
            _ => {}
        }
    }
}

fn run(config: AppConfig) -> Result<(), SceneError> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = DeskApp {
        config,
        running: None,
        error: None,
    };
    event_loop.run_app(&mut app)?;

    match app.error {
        Some(err) => Err(err),
        None => {
            log::info!("shutting down");
            Ok(())
        }
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(err) = run(AppConfig::from_env()) {
        log::error!("{err}");
        let mut source = std::error::Error::source(&err);
        while let Some(cause) = source {
            log::error!("  caused by: {cause}");
            source = std::error::Error::source(cause);
        }
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
