//! Twenty open-topped boxes nested inside each other, cycling through a
//! shuffled ink palette.

use crate::{
    camera::Camera,
    color::{PAPER_COLORS, RISO_COLORS},
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
    pub falloff: f32,
    pub power: (f32, f32),
    /// Sink the stack by half a unit and paint the outermost box in the
    /// background color, so only the inner boxes show.
    pub masking: bool,
    pub zoom: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            count: 20,
            falloff: 5.0,
            power: (1.0, 20.0),
            masking: false,
            zoom: 1.0,
        }
    }
}

pub fn settings() -> SketchSettings {
    SketchSettings {
        name: "cube-stack",
        dimensions: Dimensions::Pixels(2048, 2048),
        ..Default::default()
    }
}

pub fn build(config: &Config, random: &mut Random) -> anyhow::Result<Stage> {
    let background = pick_color(random, PAPER_COLORS)?;
    let inks = random.shuffle(RISO_COLORS);
    let mut scene = Scene::new();

    let mut open_box = Geometry::unit_box();
    open_box.remove_group(BoxSide::PositiveY as usize);
    let open_box = scene.add_geometry(open_box);

    for i in 0..config.count {
        let color = inks[i % inks.len()].color();
        let power = random.range(config.power.0, config.power.1);
        let mut material = Material::gradient(color, background, power).double_sided();

        let v = ((i + 1) as f32 / config.count as f32).powf(config.falloff);
        let mut local = Instance::new();
        local.set_scalar(v);
        if config.masking {
            local.position.y -= 0.5;
            if i == config.count - 1 {
                material.set_uniform("color", background)?;
            }
        }
        let material = scene.add_material(material);
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
