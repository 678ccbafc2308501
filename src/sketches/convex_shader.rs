//! The convex hull of a handful of random points, one ink per face.

use crate::{
    camera::Camera,
    color::{PAPER_COLORS, RISO_COLORS},
    data_structures::{geometry::Geometry, material::Material, scene_graph::Scene},
    random::Random,
    settings::SketchSettings,
    sketch::{Sketch, SketchContext},
    sketches::{Stage, pick_color, set_time},
};

#[derive(Clone, Debug)]
pub struct Config {
    pub points: usize,
    pub radius: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            points: 15,
            radius: 1.0,
        }
    }
}

pub fn settings() -> SketchSettings {
    SketchSettings {
        name: "convex-shader",
        animate: true,
        ..Default::default()
    }
}

/// Centered hull with flat, randomly inked faces.
pub fn hull(config: &Config, random: &mut Random) -> anyhow::Result<Geometry> {
    let points: Vec<_> = (0..config.points)
        .map(|_| random.inside_sphere(config.radius))
        .collect();
    let mut hull = Geometry::convex_hull(&points)?;
    hull.center();
    let mut hull = hull.to_non_indexed();
    let inks = (0..hull.triangle_count())
        .map(|_| pick_color(random, RISO_COLORS).map(|c| c.to_array()))
        .collect::<anyhow::Result<Vec<_>>>()?;
    hull.set_face_colors(|face| inks[face]);
    Ok(hull)
}

pub fn build(config: &Config, random: &mut Random) -> anyhow::Result<Stage> {
    let background = pick_color(random, PAPER_COLORS)?;
    let mut scene = Scene::new();
    let body = scene.add_geometry(hull(config, random)?);
    let material = scene.add_material(Material::vertex_colors().double_sided());
    scene.add_mesh(body, material, Default::default())?;

    let camera = Camera::perspective(45.0, 0.01, 100.0).at(2.0, 2.0, -4.0);
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
