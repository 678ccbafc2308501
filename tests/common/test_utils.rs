#![allow(dead_code)]

use sketch_ngin::{
    camera::Camera,
    clock::{FrameParams, SurfaceParams},
    color::Color,
    data_structures::scene_graph::Scene,
    settings::SketchSettings,
    sketch::{Backend, Sketch, SketchContext},
};

/// A [`Backend`] that draws nothing and remembers what it was asked to do.
#[derive(Debug)]
pub(crate) struct RecordingBackend {
    clear_color: Color,
    pub(crate) size: Option<SurfaceParams>,
    pub(crate) frames: u32,
    pub(crate) disposals: u32,
    /// Mesh count of the last rendered scene.
    pub(crate) last_meshes: usize,
    pub(crate) last_batches: usize,
    pub(crate) last_camera: Option<Camera>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self {
            clear_color: Color::BLACK,
            size: None,
            frames: 0,
            disposals: 0,
            last_meshes: 0,
            last_batches: 0,
            last_camera: None,
        }
    }
}

impl Default for RecordingBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl Backend for RecordingBackend {
    fn set_clear_color(&mut self, color: Color) {
        self.clear_color = color;
    }

    fn clear_color(&self) -> Color {
        self.clear_color
    }

    fn set_size(&mut self, surface: &SurfaceParams) {
        self.size = Some(*surface);
    }

    fn render(&mut self, scene: &Scene, camera: &Camera) -> anyhow::Result<()> {
        self.frames += 1;
        self.last_meshes = scene.mesh_count();
        self.last_batches = scene.batches().len();
        self.last_camera = Some(camera.clone());
        Ok(())
    }

    fn dispose(&mut self) {
        self.disposals += 1;
    }
}

/// Counts lifecycle calls; optionally fails in `render`.
pub(crate) struct CountingSketch {
    scene: Scene,
    camera: Camera,
    pub(crate) resizes: u32,
    pub(crate) renders: u32,
    pub(crate) fail_render: bool,
    pub(crate) last_frame: Option<FrameParams>,
}

impl CountingSketch {
    pub fn new() -> Self {
        Self {
            scene: Scene::new(),
            camera: Camera::orthographic(1.0),
            resizes: 0,
            renders: 0,
            fail_render: false,
            last_frame: None,
        }
    }
}

impl Sketch for CountingSketch {
    fn resize(&mut self, backend: &mut dyn Backend, surface: &SurfaceParams) -> anyhow::Result<()> {
        self.resizes += 1;
        backend.set_size(surface);
        self.camera
            .resize(surface.viewport_width, surface.viewport_height);
        Ok(())
    }

    fn render(&mut self, backend: &mut dyn Backend, frame: &FrameParams) -> anyhow::Result<()> {
        self.renders += 1;
        self.last_frame = Some(*frame);
        anyhow::ensure!(!self.fail_render, "frame {} failed", frame.frame);
        backend.render(&self.scene, &self.camera)
    }

    fn unload(&mut self, backend: &mut dyn Backend) {
        self.scene.clear();
        backend.dispose();
    }

    fn scene(&self) -> &Scene {
        &self.scene
    }

    fn camera(&self) -> &Camera {
        &self.camera
    }
}

pub(crate) fn counting_setup(ctx: SketchContext<'_>) -> anyhow::Result<Box<dyn Sketch>> {
    ctx.backend.set_clear_color(Color::WHITE);
    Ok(Box::new(CountingSketch::new()))
}

pub(crate) fn failing_render_setup(ctx: SketchContext<'_>) -> anyhow::Result<Box<dyn Sketch>> {
    let _ = ctx;
    let mut sketch = CountingSketch::new();
    sketch.fail_render = true;
    Ok(Box::new(sketch))
}

pub(crate) fn failing_setup(_: SketchContext<'_>) -> anyhow::Result<Box<dyn Sketch>> {
    anyhow::bail!("no backend for this sketch")
}

pub(crate) fn test_settings(name: &'static str) -> SketchSettings {
    SketchSettings {
        name,
        seed: Some(42),
        ..Default::default()
    }
}

pub(crate) fn assert_close(a: f32, b: f32, epsilon: f32) {
    assert!((a - b).abs() <= epsilon, "{} != {} (epsilon {})", a, b, epsilon);
}
