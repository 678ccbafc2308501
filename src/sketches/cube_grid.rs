//! A 10x10 city block of flat-inked columns, sized for letter paper.

use cgmath::Vector3;

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
    settings::{Dimensions, PaperOrientation, PaperSize, SketchSettings},
    sketch::{Sketch, SketchContext},
    sketches::{Stage, pick_color},
};

#[derive(Clone, Debug)]
pub struct Config {
    pub grid_size: u32,
    /// Mean and deviation of the column heights.
    pub height: (f32, f32),
    pub floor: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            grid_size: 10,
            height: (1.0, 5.0),
            floor: -7.0,
        }
    }
}

pub fn settings() -> SketchSettings {
    SketchSettings {
        name: "cube-grid",
        dimensions: Dimensions::Paper(PaperSize::Letter, PaperOrientation::Portrait),
        pixels_per_inch: 300.0,
        ..Default::default()
    }
}

pub fn build(config: &Config, random: &mut Random) -> anyhow::Result<Stage> {
    let background = pick_color(random, PAPER_COLORS)?;
    let mut scene = Scene::new();

    let mut column = Geometry::unit_box();
    column.translate(Vector3::new(0.0, 0.5, 0.0));
    let column = scene.add_geometry(column);
    let top = scene.add_material(Material::basic(background));

    let mid = config.grid_size as f32 / 2.0;
    for y in 0..config.grid_size {
        for x in 0..config.grid_size {
            let ink = scene.add_material(Material::basic(pick_color(random, RISO_COLORS)?));
            let mut sides = vec![ink; 6];
            sides[BoxSide::PositiveY as usize] = top;

            let height = random.gaussian(config.height.0, config.height.1).abs();
            let local = Instance::from(Vector3::new(x as f32 - mid, config.floor, y as f32 - mid))
                .with_scale(Vector3::new(1.0, height, 1.0));
            scene.add_mesh(column, sides, local)?;
        }
    }

    let zoom = config.grid_size as f32 * 1.25;
    Ok(Stage::new(scene, Camera::orthographic(zoom), background))
}

pub fn setup(ctx: SketchContext<'_>) -> anyhow::Result<Box<dyn Sketch>> {
    let SketchContext {
        backend,
        mut random,
        ..
    } = ctx;
    build(&Config::default(), &mut random)?.install(backend)
}
