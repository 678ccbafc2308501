//! A grid twisted about the y axis by 3D noise, drawn as a sparse quad
//! wireframe with randomly turned tori on the vertices.

use std::f32::consts::FRAC_PI_2;

use crate::{
    camera::Camera,
    color::{PAPER_COLORS, RISO_COLORS},
    data_structures::{geometry::Geometry, material::Material, scene_graph::Scene},
    procedural::{
        Axis, Displace, DisplaceMode, EdgeMode, NoiseField, Orientation, TubeWireframe, scatter,
    },
    random::Random,
    settings::{Dimensions, SketchSettings},
    sketch::{Sketch, SketchContext},
    sketches::{Stage, pick_color},
};

#[derive(Clone, Debug)]
pub struct Config {
    pub size: f32,
    pub segments: u32,
    pub displace: Displace,
    pub wireframe: TubeWireframe,
    /// An edge is kept when a standard normal sample exceeds this.
    pub edge_threshold: f32,
    pub join_scale: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            size: 2.0,
            segments: 15,
            displace: Displace {
                field: NoiseField::Volumetric,
                frequency: 0.75,
                amplitude: 0.5 * FRAC_PI_2,
                mode: DisplaceMode::Rotate(Axis::Y),
            },
            wireframe: TubeWireframe {
                thickness: 0.0045,
                radius_segments: 4,
                length_segments: 1,
                mode: EdgeMode::Quad,
            },
            edge_threshold: -0.5,
            join_scale: 0.025,
        }
    }
}

pub fn settings() -> SketchSettings {
    SketchSettings {
        name: "advanced",
        dimensions: Dimensions::Pixels(1024, 1024),
        ..Default::default()
    }
}

pub fn build(config: &Config, random: &mut Random) -> anyhow::Result<Stage> {
    let background = pick_color(random, PAPER_COLORS)?;
    let color = pick_color(random, RISO_COLORS)?;

    let mut grid = Geometry::plane(config.size, config.size, config.segments, config.segments);
    config.displace.apply(&mut grid, random);

    let threshold = config.edge_threshold;
    let tubes = config
        .wireframe
        .build_filtered(&grid, |_| random.standard_gaussian() > threshold);

    let mut scene = Scene::new();
    let ink = scene.add_material(Material::basic(color));
    let tubes = scene.add_geometry(tubes);
    scene.add_mesh(tubes, ink, Default::default())?;

    let join = scene.add_geometry(Geometry::torus(0.75, 0.2, 8, 4));
    for instance in scatter(&grid, config.join_scale, Orientation::Random, random)? {
        scene.add_mesh(join, ink, instance)?;
    }

    let camera = Camera::perspective(50.0, 0.01, 100.0).at(2.0, 2.0, -2.0);
    Ok(Stage::new(scene, camera, background))
}

pub fn setup(ctx: SketchContext<'_>) -> anyhow::Result<Box<dyn Sketch>> {
    let SketchContext {
        backend,
        mut random,
        ..
    } = ctx;
    build(&Config::default(), &mut random)?.install(backend)
}
