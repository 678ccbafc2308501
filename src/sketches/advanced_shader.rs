//! A flat quad wireframe whose tubes ripple along z with animated 4D noise.
//!
//! The noise is looked up at each tube ring's source edge point, so every
//! tube moves as one piece instead of twisting around itself.

use crate::{
    camera::Camera,
    color::{PAPER_COLORS, RISO_COLORS},
    data_structures::{geometry::Geometry, material::Material, scene_graph::Scene},
    procedural::{EdgeMode, TubeWireframe},
    random::Random,
    settings::SketchSettings,
    shading::{DisplaceAlong, NoiseDisplacement, NoiseSource},
    sketch::{Sketch, SketchContext},
    sketches::{Stage, pick_color, set_time},
};

#[derive(Clone, Debug)]
pub struct Config {
    pub size: f32,
    pub segments: u32,
    pub wireframe: TubeWireframe,
    pub displacement: NoiseDisplacement,
    pub opacity: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            size: 4.0,
            segments: 15,
            wireframe: TubeWireframe {
                thickness: 0.01,
                radius_segments: 3,
                length_segments: 3,
                mode: EdgeMode::Quad,
            },
            displacement: NoiseDisplacement {
                frequency: 0.5,
                speed: 0.5,
                amplitude: 1.0,
                unsigned: false,
                along: DisplaceAlong::AxisZ,
                source: NoiseSource::BasePosition,
            },
            opacity: 1.0,
        }
    }
}

pub fn settings() -> SketchSettings {
    SketchSettings {
        name: "advanced-shader",
        animate: true,
        ..Default::default()
    }
}

pub fn build(config: &Config, random: &mut Random) -> anyhow::Result<Stage> {
    let background = pick_color(random, PAPER_COLORS)?;
    let color = pick_color(random, RISO_COLORS)?;

    let grid = Geometry::plane(config.size, config.size, config.segments, config.segments);
    let mut scene = Scene::new();
    let tubes = scene.add_geometry(config.wireframe.build(&grid));
    let material = scene.add_material(
        Material::noise_displace(color, config.displacement).transparent(config.opacity),
    );
    scene.add_mesh(tubes, material, Default::default())?;

    let camera = Camera::perspective(60.0, 0.01, 100.0).at(2.0, 2.0, -4.0);
    Ok(Stage::new(scene, camera, background)
        .with_controls()
        .on_frame(|scene, frame| {
            set_time(scene, frame.time);
            Ok(())
        }))
}

pub fn setup(ctx: SketchContext<'_>) -> anyhow::Result<Box<dyn Sketch>> {
    let SketchContext {
        backend,
        mut random,
        ..
    } = ctx;
    build(&Config::default(), &mut random)?.install(backend)
}
