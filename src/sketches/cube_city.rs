//! A hundred one-ink towers clustered around the origin.

use cgmath::Vector3;

use crate::{
    camera::Camera,
    color::{PAPER_COLORS, RISO_COLORS},
    data_structures::{
        geometry::Geometry, instance::Instance, material::Material, scene_graph::Scene,
    },
    random::Random,
    settings::{Dimensions, SketchSettings},
    sketch::{Sketch, SketchContext},
    sketches::{Stage, capped_box, pick_color},
};

#[derive(Clone, Debug)]
pub struct Config {
    pub count: usize,
    pub power: (f32, f32),
    pub zoom: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            count: 100,
            power: (1.0, 20.0),
            zoom: 4.0,
        }
    }
}

pub fn settings() -> SketchSettings {
    SketchSettings {
        name: "cube-city",
        dimensions: Dimensions::Pixels(2048, 2048),
        ..Default::default()
    }
}

/// Product of two standard normals: heavy-tailed, mostly near zero.
fn spike(random: &mut Random) -> f32 {
    random.standard_gaussian() * random.standard_gaussian()
}

pub fn build(config: &Config, random: &mut Random) -> anyhow::Result<Stage> {
    let background = pick_color(random, PAPER_COLORS)?;
    let mut scene = Scene::new();

    let mut tower = Geometry::unit_box();
    tower.translate(Vector3::new(0.0, 0.5, 0.0));
    let tower = scene.add_geometry(tower);
    let color = pick_color(random, RISO_COLORS)?;
    let paper = scene.add_material(Material::basic(background));

    for _ in 0..config.count {
        let position = Vector3::new(spike(random), -1.0, spike(random));
        let power = random.range(config.power.0, config.power.1);
        let ink = scene.add_material(Material::gradient(color, background, power));
        let scale = Vector3::new(
            spike(random).abs(),
            spike(random).abs(),
            spike(random).abs(),
        );
        let local = Instance::from(position).with_scale(scale);
        scene.add_mesh(tower, capped_box(ink, paper), local)?;
    }

    Ok(Stage::new(scene, Camera::orthographic(config.zoom), background))
}

pub fn setup(ctx: SketchContext<'_>) -> anyhow::Result<Box<dyn Sketch>> {
    let SketchContext {
        backend,
        mut random,
        ..
    } = ctx;
    build(&Config::default(), &mut random)?.install(backend)
}
