//! A wireframe sphere breathing outwards along its normals.

use crate::{
    camera::Camera,
    color::Color,
    data_structures::{geometry::Geometry, material::Material, scene_graph::Scene},
    random::Random,
    settings::SketchSettings,
    shading::{DisplaceAlong, NoiseDisplacement, NoiseSource},
    sketch::{Sketch, SketchContext},
    sketches::{Stage, set_time},
};

#[derive(Clone, Debug)]
pub struct Config {
    pub radius: f32,
    pub segments: u32,
    pub color: Color,
    pub background: Color,
    pub displacement: NoiseDisplacement,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            radius: 1.0,
            segments: 32,
            color: Color::rgb(1.0, 99.0 / 255.0, 71.0 / 255.0),
            background: Color::rgb(1.0, 192.0 / 255.0, 203.0 / 255.0),
            displacement: NoiseDisplacement {
                unsigned: true,
                along: DisplaceAlong::Normal,
                source: NoiseSource::Position,
                ..Default::default()
            },
        }
    }
}

pub fn settings() -> SketchSettings {
    SketchSettings {
        name: "shader-sphere",
        animate: true,
        ..Default::default()
    }
}

pub fn build(config: &Config, _random: &mut Random) -> anyhow::Result<Stage> {
    let mut scene = Scene::new();
    let sphere = scene.add_geometry(Geometry::uv_sphere(
        config.radius,
        config.segments,
        config.segments,
    ));
    let material =
        scene.add_material(Material::noise_displace(config.color, config.displacement).wireframe());
    scene.add_mesh(sphere, material, Default::default())?;

    let camera = Camera::perspective(45.0, 0.01, 100.0).at(2.0, 2.0, -4.0);
    Ok(Stage::new(scene, camera, config.background)
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
