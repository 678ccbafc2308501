use sketch_ngin::{
    clock::SurfaceParams,
    color::Color,
    data_structures::{
        geometry::Geometry, instance::Instance, material::Material, scene_graph::Scene,
    },
    interactive::{Phase, Spawn, SpawnField, SpawnTiming},
    sketch::{Pointer, PointerEvent, SketchRunner},
    sketches::interactive,
};

use crate::common::test_utils::{RecordingBackend, assert_close};

mod common;

fn one_box(scene: &mut Scene) -> anyhow::Result<sketch_ngin::data_structures::scene_graph::MeshId> {
    let geometry = scene.add_geometry(Geometry::unit_box());
    let ink = scene.add_material(Material::basic(Color::BLACK));
    scene.add_mesh(geometry, ink, Instance::new())
}

fn center() -> Pointer {
    Pointer {
        pixel: [400.0, 300.0].into(),
        ndc: [0.0, 0.0].into(),
    }
}

#[test]
fn spawn_grows_then_shrinks_then_is_removed() -> anyhow::Result<()> {
    let mut scene = Scene::new();
    let mesh = one_box(&mut scene)?;
    let timing = SpawnTiming::default();
    let mut spawn = Spawn::new(mesh, 2.0);

    assert_close(spawn.update(10.0, &timing), timing.rest_scale, 1e-6);
    assert_eq!(spawn.phase(), Phase::Growing);

    let mid = spawn.update(10.5, &timing);
    assert!(mid > timing.rest_scale && mid < 2.0, "{}", mid);
    assert_eq!(spawn.phase(), Phase::Growing);

    assert_close(spawn.update(11.0, &timing), 2.0, 1e-5);
    assert_eq!(spawn.phase(), Phase::Shrinking);

    let falling = spawn.update(11.5, &timing);
    assert!(falling < 2.0 && falling > timing.rest_scale, "{}", falling);

    assert_close(spawn.update(12.0, &timing), timing.rest_scale, 1e-6);
    assert_eq!(spawn.phase(), Phase::Removed);

    // Removed is terminal.
    spawn.update(13.0, &timing);
    assert_eq!(spawn.phase(), Phase::Removed);
    Ok(())
}

#[test]
fn long_frames_skip_straight_to_removed() -> anyhow::Result<()> {
    let mut scene = Scene::new();
    let mesh = one_box(&mut scene)?;
    let timing = SpawnTiming::default();
    let mut spawn = Spawn::new(mesh, 1.0);
    spawn.update(0.0, &timing);
    spawn.update(5.0, &timing);
    assert_eq!(spawn.phase(), Phase::Removed);
    Ok(())
}

#[test]
fn spawns_keep_their_own_clocks() -> anyhow::Result<()> {
    let mut scene = Scene::new();
    let first = one_box(&mut scene)?;
    let second = one_box(&mut scene)?;
    let mut field = SpawnField::new(SpawnTiming::default());

    field.spawn(&mut scene, first, 1.0);
    field.update(&mut scene, 0.0);
    field.spawn(&mut scene, second, 1.0);
    field.update(&mut scene, 1.5);
    assert_eq!(field.live(), 2);
    assert_eq!(field.spawns()[0].phase(), Phase::Shrinking);
    assert_eq!(field.spawns()[1].phase(), Phase::Growing);

    assert_eq!(field.update(&mut scene, 2.0), 1);
    assert!(scene.mesh(first).is_none());
    assert!(scene.mesh(second).is_some());
    assert_eq!(field.update(&mut scene, 3.5), 1);
    assert_eq!(field.live(), 0);
    assert_eq!(scene.mesh_count(), 0);
    Ok(())
}

#[test]
fn new_spawns_start_flat() -> anyhow::Result<()> {
    let mut scene = Scene::new();
    let mesh = one_box(&mut scene)?;
    let mut field = SpawnField::new(SpawnTiming::default());
    field.spawn(&mut scene, mesh, 3.0);
    let node = scene.mesh(mesh).expect("spawned mesh");
    assert_close(node.local.scale.y, field.timing.rest_scale, 1e-9);
    Ok(())
}

#[test]
fn cancelling_detaches_every_spawn() -> anyhow::Result<()> {
    let mut scene = Scene::new();
    let mut field = SpawnField::new(SpawnTiming::default());
    for _ in 0..4 {
        let mesh = one_box(&mut scene)?;
        field.spawn(&mut scene, mesh, 1.0);
    }
    field.update(&mut scene, 0.2);
    assert_eq!(field.cancel_all(&mut scene), 4);
    assert_eq!(field.live(), 0);
    assert_eq!(scene.mesh_count(), 0);
    Ok(())
}

fn running() -> anyhow::Result<SketchRunner<RecordingBackend>> {
    let mut runner = SketchRunner::setup(
        RecordingBackend::new(),
        interactive::settings(),
        interactive::setup,
        Some(42),
    )?;
    runner.resize(SurfaceParams::new(800, 600))?;
    Ok(runner)
}

#[test]
fn pointer_spawns_a_box_that_decays() -> anyhow::Result<()> {
    let mut runner = running()?;
    runner.pointer(PointerEvent::Moved(center()))?;
    runner.render(0.0)?;
    assert_eq!(runner.sketch().scene().mesh_count(), 1);
    assert_eq!(runner.backend().last_meshes, 1);

    runner.render(1.0)?;
    assert_eq!(runner.sketch().scene().mesh_count(), 1);
    runner.render(1.01)?;
    assert_eq!(runner.sketch().scene().mesh_count(), 0);
    assert_eq!(runner.backend().last_meshes, 0);
    Ok(())
}

#[test]
fn removed_spawns_release_their_materials() -> anyhow::Result<()> {
    let mut runner = running()?;
    let before = runner.sketch().scene().material_count();
    for _ in 0..50 {
        runner.pointer(PointerEvent::Moved(center()))?;
    }
    assert_eq!(runner.sketch().scene().material_count(), before + 100);

    runner.render(0.0)?;
    runner.render(1.0)?;
    assert_eq!(runner.sketch().scene().material_count(), before + 100);
    runner.render(1.01)?;
    assert_eq!(runner.sketch().scene().mesh_count(), 0);
    assert_eq!(runner.sketch().scene().material_count(), before);
    Ok(())
}

#[test]
fn spawned_box_sits_under_the_pointer() -> anyhow::Result<()> {
    let mut runner = running()?;
    runner.pointer(PointerEvent::Moved(center()))?;
    let scene = runner.sketch().scene();
    let (_, node) = scene.meshes().next().expect("one spawn");
    assert!(node.local.position.x.abs() < 1e-2);
    assert!(node.local.position.z.abs() < 1e-2);
    assert_eq!(node.local.position.y, 0.0);
    Ok(())
}

#[test]
fn recoloring_keeps_heights() -> anyhow::Result<()> {
    let mut runner = running()?;
    runner.pointer(PointerEvent::Moved(center()))?;
    runner.render(0.0)?;
    runner.render(0.5)?;
    let before = runner
        .sketch()
        .scene()
        .meshes()
        .map(|(_, node)| node.local.scale)
        .next()
        .expect("one spawn");

    runner.pointer(PointerEvent::Clicked(center()))?;
    let scene = runner.sketch().scene();
    let (_, node) = scene.meshes().next().expect("still one spawn");
    assert_eq!(node.local.scale, before);
    // One wall and one cap material for the single live box.
    assert_eq!(scene.material_count(), 2);
    Ok(())
}

#[test]
fn unload_cancels_in_flight_spawns() -> anyhow::Result<()> {
    let mut runner = running()?;
    runner.pointer(PointerEvent::Moved(center()))?;
    runner.render(0.0)?;
    runner.pointer(PointerEvent::Moved(center()))?;
    runner.unload()?;
    assert_eq!(runner.sketch().scene().mesh_count(), 0);
    assert_eq!(runner.backend().disposals, 1);
    Ok(())
}
