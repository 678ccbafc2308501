//! Application event loop.
//!
//! [`run`] opens a window for one sketch and drives its [`SketchRunner`]:
//!
//! 1. create the window and GPU context, then run the sketch's setup
//! 2. forward every surface resize to `resize`
//! 3. call `render` on each redraw, requesting the next one while animating
//! 4. translate cursor and button input into [`PointerEvent`]s
//! 5. `unload` when the window closes
//!
//! A failing setup or frame stops the loop and is returned from [`run`].
//! [`export`] renders a single frame headlessly and writes it as PNG.

use std::{path::Path, sync::Arc};

use anyhow::Context as _;
use cgmath::Vector2;
use instant::Instant;
use winit::{
    application::ApplicationHandler,
    dpi::{PhysicalPosition, PhysicalSize},
    event::{ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{Key, NamedKey},
    window::Window,
};

use crate::{
    camera::pixel_to_ndc,
    clock::SurfaceParams,
    context::Context,
    render::GpuRenderer,
    settings::SketchSettings,
    sketch::{Pointer, PointerEvent, SketchRunner, SketchSetup},
    sketches::SketchEntry,
};

/// Largest window edge; bigger print sizes are shown scaled down.
const MAX_WINDOW_EDGE: u32 = 1024;

/// Window size for a sketch, fitted into [`MAX_WINDOW_EDGE`] with the
/// sketch's aspect ratio.
pub fn window_size(settings: &SketchSettings) -> (u32, u32) {
    let (width, height) = settings.pixel_size((MAX_WINDOW_EDGE, MAX_WINDOW_EDGE));
    let longest = width.max(height).max(1);
    if longest <= MAX_WINDOW_EDGE {
        return (width.max(1), height.max(1));
    }
    let scale = MAX_WINDOW_EDGE as f32 / longest as f32;
    (
        ((width as f32 * scale).round() as u32).max(1),
        ((height as f32 * scale).round() as u32).max(1),
    )
}

pub struct App {
    async_runtime: tokio::runtime::Runtime,
    settings: SketchSettings,
    setup: SketchSetup,
    seed: Option<u64>,
    window: Option<Arc<Window>>,
    runner: Option<SketchRunner<GpuRenderer>>,
    last_time: Instant,
    cursor: PhysicalPosition<f64>,
    failure: Option<anyhow::Error>,
}

impl App {
    fn new(entry: SketchEntry, seed: Option<u64>) -> anyhow::Result<Self> {
        Ok(Self {
            async_runtime: tokio::runtime::Runtime::new()?,
            settings: entry.settings,
            setup: entry.setup,
            seed,
            window: None,
            runner: None,
            last_time: Instant::now(),
            cursor: PhysicalPosition::new(0.0, 0.0),
            failure: None,
        })
    }

    fn init(&mut self, window: Arc<Window>) -> anyhow::Result<()> {
        let ctx = self
            .async_runtime
            .block_on(Context::new(window.clone(), self.settings.attributes))
            .context("cannot create the main context")?;
        let mut runner = SketchRunner::setup(
            GpuRenderer::new(ctx),
            self.settings.clone(),
            self.setup,
            self.seed,
        )?;
        let size = window.inner_size();
        if size.width > 0 && size.height > 0 {
            runner.resize(SurfaceParams::new(size.width, size.height))?;
        }
        log::info!(
            "running '{}' (seed {}), RUST_LOG controls verbosity",
            self.settings.name,
            runner.seed()
        );
        self.runner = Some(runner);
        self.last_time = Instant::now();
        window.request_redraw();
        Ok(())
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: anyhow::Error) {
        log::error!("stopping the frame loop: {:#}", error);
        self.failure = Some(error);
        self.shutdown(event_loop);
    }

    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(mut runner) = self.runner.take() {
            if let Err(e) = runner.unload() {
                log::warn!("{:#}", e);
            }
        }
        event_loop.exit();
    }

    fn pointer(&self, size: PhysicalSize<u32>) -> Pointer {
        Pointer {
            pixel: Vector2::new(self.cursor.x as f32, self.cursor.y as f32),
            ndc: pixel_to_ndc(self.cursor.x, self.cursor.y, size.width, size.height),
        }
    }

    fn redraw(&mut self) -> anyhow::Result<()> {
        let dt = self.last_time.elapsed();
        self.last_time = Instant::now();
        let animate = self.settings.is_animated();
        if let Some(runner) = self.runner.as_mut() {
            runner.render(dt.as_secs_f32())?;
        }
        if animate {
            if let Some(window) = &self.window {
                window.request_redraw();
            }
        }
        Ok(())
    }

    fn handle_pointer(&mut self, event: PointerEvent) -> anyhow::Result<()> {
        let Some(runner) = self.runner.as_mut() else {
            return Ok(());
        };
        runner.pointer(event)?;
        // Static sketches only redraw on demand.
        if !self.settings.is_animated() {
            if let Some(window) = &self.window {
                window.request_redraw();
            }
        }
        Ok(())
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        let (width, height) = window_size(&self.settings);
        let window_attributes = Window::default_attributes()
            .with_title(self.settings.name)
            .with_inner_size(PhysicalSize::new(width, height));
        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                return self.fail(event_loop, anyhow::anyhow!("cannot create a window: {}", e));
            }
        };
        self.window = Some(window.clone());
        if let Err(e) = self.init(window) {
            self.fail(event_loop, e);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let Some(window) = self.window.clone() else {
            return;
        };
        let size = window.inner_size();
        let result = match event {
            WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        logical_key: Key::Named(NamedKey::Escape),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => {
                self.shutdown(event_loop);
                Ok(())
            }
            WindowEvent::Resized(size) => match self.runner.as_mut() {
                Some(runner) if size.width > 0 && size.height > 0 => {
                    window.request_redraw();
                    runner.resize(SurfaceParams::new(size.width, size.height))
                }
                _ => Ok(()),
            },
            WindowEvent::RedrawRequested => self.redraw(),
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = position;
                self.handle_pointer(PointerEvent::Moved(self.pointer(size)))
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                let pointer = self.pointer(size);
                if state.is_pressed() {
                    self.handle_pointer(PointerEvent::Pressed(pointer))
                } else {
                    self.handle_pointer(PointerEvent::Released(pointer))
                        .and_then(|_| self.handle_pointer(PointerEvent::Clicked(pointer)))
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(p) => (p.y / 100.0) as f32,
                };
                // Scrolling up zooms in.
                self.handle_pointer(PointerEvent::Wheel(-lines))
            }
            _ => Ok(()),
        };
        if let Err(e) = result {
            self.fail(event_loop, e);
        }
    }
}

/// Open a window for `entry` and run it until closed or a frame fails.
pub fn run(entry: SketchEntry, seed: Option<u64>) -> anyhow::Result<()> {
    if let Err(e) = env_logger::try_init() {
        println!("Warning: Could not initialize logger: {}", e);
    };

    let event_loop = EventLoop::new()?;
    let mut app = App::new(entry, seed)?;
    event_loop.run_app(&mut app)?;

    match app.failure.take() {
        Some(error) => Err(error),
        None => Ok(()),
    }
}

/// Render the first frame of `entry` at its full pixel size and save it as PNG.
pub fn export(entry: SketchEntry, seed: Option<u64>, path: &Path) -> anyhow::Result<()> {
    if let Err(e) = env_logger::try_init() {
        println!("Warning: Could not initialize logger: {}", e);
    };

    let runtime = tokio::runtime::Runtime::new()?;
    let (width, height) = entry.settings.pixel_size((MAX_WINDOW_EDGE, MAX_WINDOW_EDGE));
    let renderer = runtime.block_on(GpuRenderer::headless(
        width,
        height,
        entry.settings.attributes,
    ))?;
    let mut runner = SketchRunner::setup(renderer, entry.settings, entry.setup, seed)?;
    runner.resize(SurfaceParams::new(width, height))?;
    runner.render(0.0)?;

    let (renderer, sketch) = runner.parts_mut();
    let image = runtime.block_on(renderer.capture(sketch.scene(), sketch.camera()))?;
    image
        .save(path)
        .with_context(|| format!("cannot write {}", path.display()))?;
    log::info!(
        "exported {}x{} frame of '{}' (seed {}) to {}",
        width,
        height,
        runner.settings().name,
        runner.seed(),
        path.display()
    );
    runner.unload()
}
