//! The concrete sketches and the registry the runner looks them up in.
//!
//! Every sketch module exposes the same four items:
//!
//! - `Config`: counts and constants, with the values the sketch ships with
//! - `settings()`: its [`SketchSettings`]
//! - `build(&Config, &mut Random)`: the scene, without touching a backend
//! - `setup`: the [`SketchSetup`] the runner calls
//!
//! Keeping `build` backend-free lets the procedural parts be checked without
//! a GPU.

use anyhow::bail;

use crate::{
    camera::{Camera, OrbitControls},
    clock::{FrameParams, SurfaceParams},
    color::{Color, Swatch},
    data_structures::scene_graph::{MaterialId, Scene},
    random::Random,
    settings::SketchSettings,
    sketch::{Backend, PointerEvent, Sketch, SketchSetup},
};

pub mod advanced;
pub mod advanced_shader;
pub mod convex_shader;
pub mod cube_city;
pub mod cube_grid;
pub mod cube_stack;
pub mod gradient_forest;
pub mod interactive;
pub mod random_wireframe;
pub mod shader_cube;
pub mod shader_sphere;
pub mod sphere;

/// A runnable sketch: its settings and the function that builds it.
#[derive(Clone)]
pub struct SketchEntry {
    pub name: &'static str,
    pub settings: SketchSettings,
    pub setup: SketchSetup,
}

impl SketchEntry {
    pub fn new(settings: SketchSettings, setup: SketchSetup) -> Self {
        Self {
            name: settings.name,
            settings,
            setup,
        }
    }
}

pub fn registry() -> Vec<SketchEntry> {
    vec![
        SketchEntry::new(sphere::settings(), sphere::setup),
        SketchEntry::new(random_wireframe::settings(), random_wireframe::setup),
        SketchEntry::new(advanced::settings(), advanced::setup),
        SketchEntry::new(advanced_shader::settings(), advanced_shader::setup),
        SketchEntry::new(shader_sphere::settings(), shader_sphere::setup),
        SketchEntry::new(convex_shader::settings(), convex_shader::setup),
        SketchEntry::new(gradient_forest::settings(), gradient_forest::setup),
        SketchEntry::new(cube_grid::settings(), cube_grid::setup),
        SketchEntry::new(shader_cube::settings(), shader_cube::setup),
        SketchEntry::new(cube_stack::settings(), cube_stack::setup),
        SketchEntry::new(cube_city::settings(), cube_city::setup),
        SketchEntry::new(interactive::settings(), interactive::setup),
    ]
}

pub fn find(name: &str) -> anyhow::Result<SketchEntry> {
    let entries = registry();
    let names: Vec<&str> = entries.iter().map(|e| e.name).collect();
    match entries.into_iter().find(|e| e.name == name) {
        Some(entry) => Ok(entry),
        None => bail!("no sketch named '{}', choose one of: {}", name, names.join(", ")),
    }
}

pub(crate) fn pick_color(random: &mut Random, palette: &[Swatch]) -> anyhow::Result<Color> {
    Ok(random.pick(palette)?.color())
}

/// Per-side box materials: `wall` on the four sides, `cap` on top and bottom.
pub(crate) fn capped_box(wall: MaterialId, cap: MaterialId) -> Vec<MaterialId> {
    vec![wall, wall, cap, cap, wall, wall]
}

/// Write the frame time into every material's `time` uniform.
pub fn set_time(scene: &mut Scene, time: f32) {
    for (_, material) in scene.materials_mut() {
        material.time = time;
    }
}

pub type FrameHook = Box<dyn FnMut(&mut Scene, &FrameParams) -> anyhow::Result<()>>;

/// A scene, its camera and the per-frame update that most sketches consist of.
pub struct Stage {
    pub scene: Scene,
    pub camera: Camera,
    pub controls: Option<OrbitControls>,
    pub background: Color,
    on_frame: Option<FrameHook>,
    viewport: Option<SurfaceParams>,
}

impl Stage {
    pub fn new(scene: Scene, camera: Camera, background: Color) -> Self {
        Self {
            scene,
            camera,
            controls: None,
            background,
            on_frame: None,
            viewport: None,
        }
    }

    pub fn with_controls(mut self) -> Self {
        self.controls = Some(OrbitControls::new());
        self
    }

    /// Run `hook` on the scene at the start of every frame.
    pub fn on_frame(
        mut self,
        hook: impl FnMut(&mut Scene, &FrameParams) -> anyhow::Result<()> + 'static,
    ) -> Self {
        self.on_frame = Some(Box::new(hook));
        self
    }

    pub fn viewport(&self) -> Option<SurfaceParams> {
        self.viewport
    }

    /// Hand the stage to the runner after applying its clear color.
    pub fn install(self, backend: &mut dyn Backend) -> anyhow::Result<Box<dyn Sketch>> {
        backend.set_clear_color(self.background);
        log::debug!(
            "stage ready: {} meshes, {} materials",
            self.scene.mesh_count(),
            self.scene.material_count()
        );
        Ok(Box::new(self))
    }
}

impl Sketch for Stage {
    fn resize(&mut self, backend: &mut dyn Backend, surface: &SurfaceParams) -> anyhow::Result<()> {
        backend.set_size(surface);
        self.camera
            .resize(surface.viewport_width, surface.viewport_height);
        self.viewport = Some(*surface);
        Ok(())
    }

    fn render(&mut self, backend: &mut dyn Backend, frame: &FrameParams) -> anyhow::Result<()> {
        if let Some(hook) = self.on_frame.as_mut() {
            hook(&mut self.scene, frame)?;
        }
        if let Some(controls) = self.controls.as_mut() {
            controls.update(&mut self.camera);
        }
        backend.render(&self.scene, &self.camera)
    }

    fn unload(&mut self, backend: &mut dyn Backend) {
        self.on_frame = None;
        self.scene.clear();
        backend.dispose();
    }

    fn pointer(&mut self, _backend: &mut dyn Backend, event: &PointerEvent) -> anyhow::Result<()> {
        let Some(controls) = self.controls.as_mut() else {
            return Ok(());
        };
        match event {
            PointerEvent::Pressed(p) => controls.pointer_down(p.pixel),
            PointerEvent::Released(_) => controls.pointer_up(),
            PointerEvent::Moved(p) => {
                let height = self.viewport.map(|v| v.viewport_height).unwrap_or(1);
                controls.pointer_move(p.pixel, height);
            }
            PointerEvent::Wheel(delta) => controls.wheel(*delta),
            PointerEvent::Clicked(_) => (),
        }
        Ok(())
    }

    fn scene(&self) -> &Scene {
        &self.scene
    }

    fn camera(&self) -> &Camera {
        &self.camera
    }
}
