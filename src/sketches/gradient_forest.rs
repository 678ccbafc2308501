//! Isometric boxes standing in a disc, each side fading from paper to ink.

use cgmath::Vector3;

use crate::{
    camera::Camera,
    color::{PAPER_COLORS, RISO_COLORS},
    data_structures::{
        geometry::Geometry, instance::Instance, material::Material, scene_graph::Scene,
    },
    random::Random,
    settings::SketchSettings,
    sketch::{Sketch, SketchContext},
    sketches::{Stage, capped_box, pick_color},
};

#[derive(Clone, Debug)]
pub struct Config {
    pub count: usize,
    /// Boxes are placed uniformly inside a disc of this radius.
    pub spread: f32,
    pub power: (f32, f32),
    pub zoom: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            count: 40,
            spread: 1.0,
            power: (1.0, 20.0),
            zoom: 2.0,
        }
    }
}

pub fn settings() -> SketchSettings {
    SketchSettings {
        name: "gradient-forest",
        animate: true,
        ..Default::default()
    }
}

pub fn build(config: &Config, random: &mut Random) -> anyhow::Result<Stage> {
    let background = pick_color(random, PAPER_COLORS)?;
    let mut scene = Scene::new();

    let mut unit = Geometry::unit_box();
    unit.translate(Vector3::new(0.0, 0.5, 0.0));
    let unit = scene.add_geometry(unit);
    let paper = scene.add_material(Material::basic(background));

    for _ in 0..config.count {
        let color = pick_color(random, RISO_COLORS)?;
        let power = random.range(config.power.0, config.power.1);
        let ink = scene.add_material(Material::gradient(color, background, power).double_sided());

        let center = random.inside_circle(config.spread);
        let size = (random.standard_gaussian() + random.standard_gaussian()).abs() * 0.25;
        let x = size * random.gaussian(0.0, 1.0).abs();
        let z = size * random.gaussian(0.0, 1.0).abs();
        let y = size * random.gaussian(0.0, 1.0).abs();
        let local = Instance::from(Vector3::new(center.x, -0.5, center.y))
            .with_scale(Vector3::new(x, y, z));
        scene.add_mesh(unit, capped_box(ink, paper), local)?;
    }

    Ok(Stage::new(scene, Camera::orthographic(config.zoom), background).with_controls())
}

pub fn setup(ctx: SketchContext<'_>) -> anyhow::Result<Box<dyn Sketch>> {
    let SketchContext {
        backend,
        mut random,
        ..
    } = ctx;
    build(&Config::default(), &mut random)?.install(backend)
}
