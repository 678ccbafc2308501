use sketch_ngin::{
    clock::SurfaceParams,
    data_structures::{material::Uniform, scene_graph::MaterialSlot},
    random::Random,
    sketch::{PointerEvent, SketchRunner},
    sketches::{self, advanced, convex_shader, cube_grid, cube_stack, random_wireframe, shader_cube},
};

use crate::common::test_utils::RecordingBackend;

mod common;

#[test]
fn every_sketch_runs_its_lifecycle() -> anyhow::Result<()> {
    let entries = sketches::registry();
    assert_eq!(entries.len(), 12);
    for entry in entries {
        let mut runner =
            SketchRunner::setup(RecordingBackend::new(), entry.settings, entry.setup, Some(7))?;
        runner.resize(SurfaceParams::new(640, 480))?;
        runner.pointer(PointerEvent::Wheel(1.0))?;
        for _ in 0..3 {
            runner.render(1.0 / 24.0)?;
        }
        assert_eq!(runner.backend().frames, 3, "{}", entry.name);
        if entry.name != "interactive" {
            assert!(runner.backend().last_meshes > 0, "{} drew nothing", entry.name);
        }
        runner.unload()?;
        assert_eq!(runner.backend().disposals, 1, "{}", entry.name);
        assert_eq!(runner.sketch().scene().mesh_count(), 0, "{}", entry.name);
    }
    Ok(())
}

#[test]
fn sketch_names_are_unique() {
    let mut names: Vec<&str> = sketches::registry().iter().map(|e| e.name).collect();
    let count = names.len();
    names.sort();
    names.dedup();
    assert_eq!(names.len(), count);
}

#[test]
fn unknown_sketches_list_the_choices() {
    let message = match sketches::find("teapot") {
        Ok(_) => panic!("there is no teapot sketch"),
        Err(e) => e.to_string(),
    };
    assert!(message.contains("teapot"));
    assert!(message.contains("cube-city"));
    assert!(sketches::find("cube-city").is_ok());
}

#[test]
fn cube_grid_prints_on_letter_paper() {
    assert_eq!(cube_grid::settings().pixel_size((1, 1)), (2550, 3300));
}

#[test]
fn cube_grid_fills_its_grid() -> anyhow::Result<()> {
    let stage = cube_grid::build(&cube_grid::Config::default(), &mut Random::new(7))?;
    assert_eq!(stage.scene.mesh_count(), 100);
    for (_, node) in stage.scene.meshes() {
        assert_eq!(node.local.position.y, -7.0);
        assert!(node.local.scale.y >= 0.0);
    }
    Ok(())
}

#[test]
fn builds_are_reproducible() -> anyhow::Result<()> {
    let config = random_wireframe::Config::default();
    let a = random_wireframe::build(&config, &mut Random::new(3))?;
    let b = random_wireframe::build(&config, &mut Random::new(3))?;
    assert_eq!(a.background, b.background);
    assert_eq!(a.scene.mesh_count(), b.scene.mesh_count());
    for ((_, x), (_, y)) in a.scene.meshes().zip(b.scene.meshes()) {
        assert_eq!(x.local, y.local);
    }
    Ok(())
}

#[test]
fn advanced_keeps_a_subset_of_edges() -> anyhow::Result<()> {
    let config = advanced::Config::default();
    let stage = advanced::build(&config, &mut Random::new(11))?;
    let every = advanced::Config {
        edge_threshold: f32::NEG_INFINITY,
        ..config
    };
    let full = advanced::build(&every, &mut Random::new(11))?;
    let tube_vertices = |stage: &sketches::Stage| {
        let (_, node) = stage.scene.meshes().next().expect("tube mesh comes first");
        stage
            .scene
            .geometry(node.geometry)
            .map(|g| g.vertex_count())
            .unwrap_or(0)
    };
    assert!(tube_vertices(&stage) < tube_vertices(&full));
    assert!(tube_vertices(&stage) > 0);
    Ok(())
}

#[test]
fn convex_hull_faces_are_flat_colored() -> anyhow::Result<()> {
    let hull = convex_shader::hull(&convex_shader::Config::default(), &mut Random::new(5))?;
    let colors = hull.colors.as_ref().expect("hull faces are inked");
    for triangle in hull.indices.chunks_exact(3) {
        let first = colors[triangle[0] as usize];
        assert!(triangle.iter().all(|&i| colors[i as usize] == first));
    }
    Ok(())
}

#[test]
fn shader_cube_has_no_lid() -> anyhow::Result<()> {
    let stage = shader_cube::build(&shader_cube::Config::default(), &mut Random::new(2))?;
    let (_, node) = stage.scene.meshes().next().expect("cubes were added");
    let geometry = stage.scene.geometry(node.geometry).expect("shared geometry");
    assert_eq!(geometry.groups.len(), 5);
    Ok(())
}

#[test]
fn cube_stack_nests_inner_boxes() -> anyhow::Result<()> {
    let stage = cube_stack::build(&cube_stack::Config::default(), &mut Random::new(2))?;
    let sizes: Vec<f32> = stage.scene.meshes().map(|(_, n)| n.local.scale.x).collect();
    assert_eq!(sizes.len(), 20);
    assert!(sizes.windows(2).all(|pair| pair[0] < pair[1]));
    assert_eq!(sizes[19], 1.0);
    Ok(())
}

#[test]
fn masked_stack_hides_its_outer_box() -> anyhow::Result<()> {
    let config = cube_stack::Config {
        masking: true,
        ..Default::default()
    };
    let stage = cube_stack::build(&config, &mut Random::new(2))?;
    let (_, outer) = stage.scene.meshes().last().expect("twenty boxes");
    assert_eq!(outer.local.position.y, -0.5);
    let material = match &outer.material {
        MaterialSlot::Single(id) => stage.scene.material(*id).expect("stored"),
        MaterialSlot::PerGroup(_) => panic!("stack boxes use one material"),
    };
    assert_eq!(material.uniform("color"), Some(Uniform::Color(stage.background)));
    Ok(())
}
