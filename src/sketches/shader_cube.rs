//! Fifty open-topped boxes nested inside each other, alternating white and
//! black gradients.

use cgmath::Vector3;

use crate::{
    camera::Camera,
    color::{Color, PAPER_COLORS},
    data_structures::{
        geometry::{BoxSide, Geometry},
        instance::Instance,
        material::Material,
        scene_graph::Scene,
    },
    random::Random,
    settings::{Dimensions, SketchSettings},
    sketch::{Sketch, SketchContext},
    sketches::{Stage, pick_color},
};

#[derive(Clone, Debug)]
pub struct Config {
    pub count: usize,
    /// Exponent applied to the normalized index; higher packs more boxes
    /// near the small end.
    pub falloff: f32,
    pub colors: Vec<Color>,
    pub power: (f32, f32),
    pub zoom: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            count: 50,
            falloff: 15.0,
            colors: vec![Color::WHITE, Color::BLACK],
            power: (1.0, 20.0),
            zoom: 1.0,
        }
    }
}

pub fn settings() -> SketchSettings {
    SketchSettings {
        name: "shader-cube",
        dimensions: Dimensions::Pixels(2048, 2048),
        animate: true,
        ..Default::default()
    }
}

pub fn build(config: &Config, random: &mut Random) -> anyhow::Result<Stage> {
    anyhow::ensure!(!config.colors.is_empty(), "shader-cube needs at least one color");
    let background = pick_color(random, PAPER_COLORS)?;
    let mut scene = Scene::new();

    let mut open_box = Geometry::unit_box();
    open_box.remove_group(BoxSide::PositiveY as usize);
    let open_box = scene.add_geometry(open_box);

    for i in 0..config.count {
        let color = config.colors[i % config.colors.len()];
        let power = random.range(config.power.0, config.power.1);
        let material =
            scene.add_material(Material::gradient(color, background, power).double_sided());

        let v = ((i + 1) as f32 / config.count as f32).powf(config.falloff);
        let mut local = Instance::from(Vector3::new(0.0, 1.0 - v, 0.0));
        local.set_scalar(v);
        scene.add_mesh(open_box, material, local)?;
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
