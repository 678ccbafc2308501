//! Boxes sprout wherever the pointer crosses the ground and sink back a
//! second later. Clicking swaps the paper and re-inks every live box.

use cgmath::{Point3, Vector3};

use crate::{
    camera::{Camera, Plane},
    clock::{FrameParams, SurfaceParams},
    color::{Color, PAPER_COLORS, RISO_COLORS},
    data_structures::{
        geometry::Geometry,
        instance::Instance,
        material::Material,
        scene_graph::{GeometryId, MaterialId, MeshId, Scene},
    },
    interactive::{SpawnField, SpawnTiming},
    random::Random,
    settings::SketchSettings,
    sketch::{Backend, PointerEvent, Sketch, SketchContext},
    sketches::{Stage, capped_box, pick_color},
};

#[derive(Clone, Debug)]
pub struct Config {
    pub power: (f32, f32),
    pub zoom: f32,
    pub timing: SpawnTiming,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            power: (1.0, 10.0),
            zoom: 4.0,
            timing: SpawnTiming::default(),
        }
    }
}

pub fn settings() -> SketchSettings {
    SketchSettings {
        name: "interactive",
        animate: true,
        ..Default::default()
    }
}

pub struct Interactive {
    stage: Stage,
    field: SpawnField,
    random: Random,
    config: Config,
    ground: Plane,
    unit: GeometryId,
}

impl Interactive {
    pub fn field(&self) -> &SpawnField {
        &self.field
    }

    pub fn background(&self) -> Color {
        self.stage.background
    }

    /// Gradient walls with paper caps. Boxes may be mirrored on x or z, which
    /// flips their winding, so nothing is culled.
    fn materials(&mut self) -> anyhow::Result<Vec<MaterialId>> {
        let background = self.stage.background;
        let color = pick_color(&mut self.random, RISO_COLORS)?;
        let power = self.random.range(self.config.power.0, self.config.power.1);
        let scene = &mut self.stage.scene;
        let wall =
            scene.add_material(Material::gradient(color, background, power).double_sided());
        let cap = scene.add_material(Material::basic(background).double_sided());
        Ok(capped_box(wall, cap))
    }

    /// Start a growing box on the ground below `point`.
    pub fn spawn_at(&mut self, point: Point3<f32>) -> anyhow::Result<MeshId> {
        let materials = self.materials()?;
        let spike = |random: &mut Random| random.standard_gaussian() * random.standard_gaussian();
        let scale = Vector3::new(
            spike(&mut self.random),
            spike(&mut self.random).abs(),
            spike(&mut self.random),
        );
        let local = Instance::from(Vector3::new(point.x, 0.0, point.z)).with_scale(scale);
        let mesh = self.stage.scene.add_mesh(self.unit, materials, local)?;
        self.field.spawn(&mut self.stage.scene, mesh, scale.y);
        log::trace!(
            "spawned {:?} at ({:.2}, {:.2}), {} live",
            mesh,
            point.x,
            point.z,
            self.field.live()
        );
        Ok(mesh)
    }

    /// New paper, new inks for every live box. Heights are left alone.
    pub fn recolor(&mut self, backend: &mut dyn Backend) -> anyhow::Result<()> {
        self.stage.background = pick_color(&mut self.random, PAPER_COLORS)?;
        backend.set_clear_color(self.stage.background);
        let live: Vec<MeshId> = self.field.spawns().iter().map(|s| s.mesh).collect();
        for mesh in live {
            let materials = self.materials()?;
            self.stage.scene.set_material(mesh, materials)?;
        }
        let dropped = self.stage.scene.prune_materials();
        log::debug!("recolored {} boxes, dropped {} materials", self.field.live(), dropped);
        Ok(())
    }
}

pub fn build(config: &Config, random: &mut Random) -> anyhow::Result<Interactive> {
    let background = pick_color(random, PAPER_COLORS)?;
    let mut scene = Scene::new();
    let mut unit = Geometry::unit_box();
    unit.translate(Vector3::new(0.0, 0.5, 0.0));
    let unit = scene.add_geometry(unit);

    Ok(Interactive {
        stage: Stage::new(scene, Camera::orthographic(config.zoom), background),
        field: SpawnField::new(config.timing),
        random: random.fork(),
        config: config.clone(),
        ground: Plane::ground(),
        unit,
    })
}

pub fn setup(ctx: SketchContext<'_>) -> anyhow::Result<Box<dyn Sketch>> {
    let SketchContext {
        backend,
        mut random,
        ..
    } = ctx;
    let sketch = build(&Config::default(), &mut random)?;
    backend.set_clear_color(sketch.background());
    Ok(Box::new(sketch))
}

impl Sketch for Interactive {
    fn resize(&mut self, backend: &mut dyn Backend, surface: &SurfaceParams) -> anyhow::Result<()> {
        self.stage.resize(backend, surface)
    }

    fn render(&mut self, backend: &mut dyn Backend, frame: &FrameParams) -> anyhow::Result<()> {
        // Every spawn owns its two materials.
        if self.field.update(&mut self.stage.scene, frame.time) > 0 {
            let dropped = self.stage.scene.prune_materials();
            log::trace!(
                "dropped {} materials, {} left",
                dropped,
                self.stage.scene.material_count()
            );
        }
        self.stage.render(backend, frame)
    }

    fn unload(&mut self, backend: &mut dyn Backend) {
        let cancelled = self.field.cancel_all(&mut self.stage.scene);
        log::debug!("cancelled {} in-flight spawns", cancelled);
        self.stage.unload(backend);
    }

    fn pointer(&mut self, backend: &mut dyn Backend, event: &PointerEvent) -> anyhow::Result<()> {
        match event {
            PointerEvent::Moved(pointer) => {
                let hit = self
                    .stage
                    .camera
                    .ray_from_ndc(pointer.ndc)
                    .and_then(|ray| ray.intersect_plane(&self.ground));
                if let Some(point) = hit {
                    self.spawn_at(point)?;
                }
                Ok(())
            }
            PointerEvent::Clicked(_) => self.recolor(backend),
            _ => Ok(()),
        }
    }

    fn scene(&self) -> &Scene {
        &self.stage.scene
    }

    fn camera(&self) -> &Camera {
        &self.stage.camera
    }
}
