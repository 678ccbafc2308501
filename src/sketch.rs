//! The sketch lifecycle.
//!
//! A sketch is built once by a [`SketchSetup`] function and then driven by a
//! [`SketchRunner`]:
//!
//! 1. `setup` builds the scene, camera and materials from a [`SketchContext`]
//! 2. `resize` is called whenever the surface changes size
//! 3. `render` is called once per frame and submits exactly one frame
//! 4. `unload` is called once at teardown and releases everything
//!
//! Pointer input reaches the sketch between frames through [`Sketch::pointer`].
//! The rendering backend is handed to every call instead of living in a
//! global, so sketches can run against the GPU or against a test double.

use anyhow::{Context as _, ensure};
use cgmath::Vector2;

use crate::{
    camera::Camera,
    clock::{FrameClock, FrameParams, SurfaceParams},
    color::Color,
    data_structures::scene_graph::Scene,
    random::Random,
    settings::SketchSettings,
};

/// What a sketch draws with.
pub trait Backend {
    fn set_clear_color(&mut self, color: Color);
    fn clear_color(&self) -> Color;

    /// Resize the drawing surface to the viewport times its pixel ratio.
    fn set_size(&mut self, surface: &SurfaceParams);

    /// Draw `scene` from `camera` as one complete frame.
    fn render(&mut self, scene: &Scene, camera: &Camera) -> anyhow::Result<()>;

    /// Release every resource uploaded on behalf of the sketch.
    fn dispose(&mut self);
}

/// A pointer position in both pixel (top-left origin) and NDC form.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pointer {
    pub pixel: Vector2<f32>,
    pub ndc: Vector2<f32>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerEvent {
    Moved(Pointer),
    Pressed(Pointer),
    Released(Pointer),
    /// Primary button released over the surface.
    Clicked(Pointer),
    /// Scroll in lines; positive moves away from the target.
    Wheel(f32),
}

/// Everything a setup function may use. The backend is only borrowed for the
/// duration of setup.
pub struct SketchContext<'a> {
    pub backend: &'a mut dyn Backend,
    pub settings: &'a SketchSettings,
    pub random: Random,
}

pub trait Sketch {
    /// Apply a new viewport; must be idempotent for identical parameters.
    fn resize(&mut self, backend: &mut dyn Backend, surface: &SurfaceParams) -> anyhow::Result<()>;

    /// Update time-varying state and submit one frame.
    fn render(&mut self, backend: &mut dyn Backend, frame: &FrameParams) -> anyhow::Result<()>;

    /// Drop the scene and every in-flight animation.
    fn unload(&mut self, backend: &mut dyn Backend);

    fn pointer(&mut self, _backend: &mut dyn Backend, _event: &PointerEvent) -> anyhow::Result<()> {
        Ok(())
    }

    fn scene(&self) -> &Scene;

    fn camera(&self) -> &Camera;
}

/// Builds a sketch. Errors here are fatal: the runner never resizes or
/// renders a sketch whose setup failed.
pub type SketchSetup = fn(SketchContext<'_>) -> anyhow::Result<Box<dyn Sketch>>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lifecycle {
    Running,
    Unloaded,
}

/// Owns a backend and one sketch and enforces the call order.
pub struct SketchRunner<B: Backend> {
    backend: B,
    settings: SketchSettings,
    sketch: Box<dyn Sketch>,
    clock: FrameClock,
    lifecycle: Lifecycle,
    seed: u64,
    surface: Option<SurfaceParams>,
}

impl<B: Backend> SketchRunner<B> {
    /// Validate `settings` and run `setup`. `seed` overrides the settings' seed.
    pub fn setup(
        mut backend: B,
        settings: SketchSettings,
        setup: SketchSetup,
        seed: Option<u64>,
    ) -> anyhow::Result<Self> {
        settings
            .validate()
            .with_context(|| format!("invalid settings for sketch '{}'", settings.name))?;
        let random = match seed.or(settings.seed) {
            Some(seed) => Random::new(seed),
            None => Random::from_entropy(),
        };
        let seed = random.seed();
        log::info!("setting up sketch '{}' with seed {}", settings.name, seed);

        let sketch = setup(SketchContext {
            backend: &mut backend,
            settings: &settings,
            random,
        })
        .with_context(|| format!("setup of sketch '{}' failed", settings.name))?;
        log::debug!(
            "sketch '{}' ready: {} meshes, {} materials",
            settings.name,
            sketch.scene().mesh_count(),
            sketch.scene().material_count()
        );

        Ok(Self {
            backend,
            clock: FrameClock::new(settings.duration, settings.looping),
            settings,
            sketch,
            lifecycle: Lifecycle::Running,
            seed,
            surface: None,
        })
    }

    fn ensure_running(&self, call: &str) -> anyhow::Result<()> {
        ensure!(
            self.lifecycle == Lifecycle::Running,
            "{} called on sketch '{}' after unload",
            call,
            self.settings.name
        );
        Ok(())
    }

    pub fn resize(&mut self, surface: SurfaceParams) -> anyhow::Result<()> {
        self.ensure_running("resize")?;
        log::debug!(
            "resize '{}' to {}x{} @{}",
            self.settings.name,
            surface.viewport_width,
            surface.viewport_height,
            surface.pixel_ratio
        );
        self.surface = Some(surface);
        self.sketch.resize(&mut self.backend, &surface)
    }

    /// Advance the clock by `delta` seconds and render one frame.
    pub fn render(&mut self, delta: f32) -> anyhow::Result<FrameParams> {
        self.ensure_running("render")?;
        let frame = self.clock.advance(delta);
        self.sketch.render(&mut self.backend, &frame)?;
        Ok(frame)
    }

    pub fn pointer(&mut self, event: PointerEvent) -> anyhow::Result<()> {
        self.ensure_running("pointer")?;
        self.sketch.pointer(&mut self.backend, &event)
    }

    pub fn unload(&mut self) -> anyhow::Result<()> {
        self.ensure_running("unload")?;
        self.sketch.unload(&mut self.backend);
        self.lifecycle = Lifecycle::Unloaded;
        log::info!("unloaded sketch '{}'", self.settings.name);
        Ok(())
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn settings(&self) -> &SketchSettings {
        &self.settings
    }

    pub fn surface(&self) -> Option<SurfaceParams> {
        self.surface
    }

    pub fn time(&self) -> f32 {
        self.clock.time()
    }

    pub fn sketch(&self) -> &dyn Sketch {
        self.sketch.as_ref()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Borrow the backend mutably next to the sketch, e.g. to capture its scene.
    pub fn parts_mut(&mut self) -> (&mut B, &dyn Sketch) {
        (&mut self.backend, self.sketch.as_ref())
    }
}

impl<B: Backend> Drop for SketchRunner<B> {
    fn drop(&mut self) {
        if self.lifecycle == Lifecycle::Running {
            self.sketch.unload(&mut self.backend);
            self.lifecycle = Lifecycle::Unloaded;
        }
    }
}
