//! A black wireframe icosahedron with a small torus on every vertex, spun
//! half a turn per loop.

use std::f32::consts::PI;

use cgmath::{Quaternion, Rad, Rotation3, Vector3, Zero};

use crate::{
    camera::Camera,
    color::Color,
    data_structures::{geometry::Geometry, material::Material, scene_graph::Scene},
    procedural::{Orientation, scatter},
    random::Random,
    settings::{Dimensions, SketchSettings},
    sketch::{Sketch, SketchContext},
    sketches::Stage,
};

#[derive(Clone, Debug)]
pub struct Config {
    pub radius: f32,
    pub detail: u32,
    pub join_scale: f32,
    /// Turns of the scene root per loop, in half turns.
    pub spin: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            radius: 1.0,
            detail: 1,
            join_scale: 0.025,
            spin: 1.0,
        }
    }
}

pub fn settings() -> SketchSettings {
    SketchSettings {
        name: "sphere",
        dimensions: Dimensions::Pixels(1024, 1024),
        animate: true,
        duration: Some(5.0),
        ..Default::default()
    }
}

pub fn build(config: &Config, random: &mut Random) -> anyhow::Result<Stage> {
    let mut scene = Scene::new();
    let base = Geometry::icosahedron(config.radius, config.detail);
    let ink = scene.add_material(Material::basic(Color::BLACK));
    let wire = scene.add_material(Material::basic(Color::BLACK).wireframe());

    let joins = scatter(
        &base,
        config.join_scale,
        Orientation::LookAt(Vector3::zero()),
        random,
    )?;
    let body = scene.add_geometry(base);
    scene.add_mesh(body, wire, Default::default())?;

    let join = scene.add_geometry(Geometry::torus(1.5, 0.25, 8, 8));
    for instance in joins {
        scene.add_mesh(join, ink, instance)?;
    }

    let spin = config.spin;
    let camera = Camera::perspective(60.0, 0.01, 100.0).at(1.0, 1.0, -3.0);
    Ok(Stage::new(scene, camera, Color::hsl(0.0, 0.0, 0.95))
        .with_controls()
        .on_frame(move |scene, frame| {
            scene.root.rotation = Quaternion::from_angle_y(Rad(frame.playhead * PI * spin));
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
