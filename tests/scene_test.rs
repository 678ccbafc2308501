use sketch_ngin::{
    InnerSpace, Vector3,
    color::Color,
    data_structures::{
        geometry::{BoxSide, Geometry},
        instance::Instance,
        material::Material,
        scene_graph::Scene,
    },
};

use crate::common::test_utils::assert_close;

mod common;

#[test]
fn plane_grid_has_expected_topology() {
    let plane = Geometry::plane(2.0, 2.0, 15, 15);
    assert_eq!(plane.vertex_count(), 256);
    assert_eq!(plane.triangle_count(), 15 * 15 * 2);
    assert!(plane.positions.iter().all(|p| p[2] == 0.0));
    let (lo, hi) = plane.bounding_box().expect("non-empty");
    for (value, expected) in [(lo.x, -1.0), (lo.y, -1.0), (hi.x, 1.0), (hi.y, 1.0)] {
        assert_close(value, expected, 1e-5);
    }
}

#[test]
fn box_has_one_group_per_side() {
    let cube = Geometry::unit_box();
    assert_eq!(cube.groups.len(), 6);
    assert_eq!(cube.vertex_count(), 24);
    assert_eq!(cube.indices.len(), 36);
    for (side, group) in cube.groups.iter().enumerate() {
        assert_eq!(group.material_index, side);
        assert_eq!(group.count, 6);
    }
    // The +y group faces up.
    let top = cube.groups[BoxSide::PositiveY as usize];
    for &i in &cube.indices[top.start as usize..(top.start + top.count) as usize] {
        assert_eq!(cube.normals[i as usize], [0.0, 1.0, 0.0]);
        assert_close(cube.positions[i as usize][1], 0.5, 1e-6);
    }
}

#[test]
fn removing_a_group_keeps_the_rest_contiguous() {
    let mut open = Geometry::unit_box();
    open.remove_group(BoxSide::PositiveY as usize);
    assert_eq!(open.groups.len(), 5);
    assert_eq!(open.indices.len(), 30);
    let mut next = 0;
    for group in &open.groups {
        assert_ne!(group.material_index, BoxSide::PositiveY as usize);
        assert_eq!(group.start, next);
        next += group.count;
    }
}

#[test]
fn icosahedron_welds_shared_corners() {
    let base = Geometry::icosahedron(1.0, 0);
    assert_eq!(base.vertex_count(), 12);
    assert_eq!(base.triangle_count(), 20);
    assert_eq!(base.edges().len(), 30);
    let detailed = Geometry::icosahedron(2.0, 1);
    assert_eq!(detailed.vertex_count(), 42);
    for p in &detailed.positions {
        assert_close(Vector3::from(*p).magnitude(), 2.0, 1e-4);
    }
}

#[test]
fn hull_faces_point_outwards() -> anyhow::Result<()> {
    let mut corners = Vec::new();
    for x in [-1.0, 1.0] {
        for y in [-1.0, 1.0] {
            for z in [-1.0, 1.0] {
                corners.push(Vector3::new(x, y, z));
            }
        }
    }
    let hull = Geometry::convex_hull(&corners)?;
    assert!(hull.triangle_count() >= 12);
    for [a, b, c] in hull.triangles() {
        let center = (hull.position(a) + hull.position(b) + hull.position(c)) / 3.0;
        let normal = Vector3::from(hull.normals[a as usize]);
        assert!(normal.dot(center) > 0.0, "{:?} at {:?}", normal, center);
    }
    Ok(())
}

#[test]
fn degenerate_hulls_are_rejected() {
    let too_few = [Vector3::new(0.0, 0.0, 0.0), Vector3::unit_x(), Vector3::unit_y()];
    assert!(Geometry::convex_hull(&too_few).is_err());
    let collinear = [
        Vector3::new(0.0, 0.0, 0.0),
        Vector3::new(1.0, 0.0, 0.0),
        Vector3::new(2.0, 0.0, 0.0),
        Vector3::new(3.0, 0.0, 0.0),
    ];
    assert!(Geometry::convex_hull(&collinear).is_err());
}

#[test]
fn face_colors_are_flat_on_unshared_vertices() {
    let mut faces = Geometry::icosahedron(1.0, 0).to_non_indexed();
    assert_eq!(faces.vertex_count(), 60);
    faces.set_face_colors(|face| [face as f32 / 20.0, 0.0, 0.0]);
    let colors = faces.colors.as_ref().expect("colors were set");
    for (face, triangle) in faces.indices.chunks_exact(3).enumerate() {
        for &i in triangle {
            assert_eq!(colors[i as usize], [face as f32 / 20.0, 0.0, 0.0]);
        }
    }
}

#[test]
fn merging_pads_optional_attributes() {
    let mut merged = Geometry::plane(1.0, 1.0, 1, 1);
    let mut tube = Geometry::open_cylinder(0.1, 1.0, 3, 1);
    tube.base_positions = Some(vec![[0.0, 1.0, 0.0]; tube.vertex_count()]);
    merged.merge(&tube);
    let bases = merged.base_positions.as_ref().expect("merged base positions");
    assert_eq!(bases.len(), merged.vertex_count());
    assert_eq!(bases[0], [0.0, 0.0, 0.0]);
    assert_eq!(bases[4], [0.0, 1.0, 0.0]);
    assert_eq!(merged.indices.len(), 6 + tube.indices.len());
    assert!(merged.indices.iter().all(|&i| (i as usize) < merged.vertex_count()));
}

#[test]
fn meshes_need_known_materials() {
    let mut other = Scene::new();
    let foreign = other.add_material(Material::basic(Color::BLACK));

    let mut scene = Scene::new();
    let geometry = scene.add_geometry(Geometry::unit_box());
    assert!(scene.add_mesh(geometry, foreign, Instance::new()).is_err());

    let wall = scene.add_material(Material::basic(Color::BLACK));
    assert!(scene.add_mesh(geometry, vec![wall; 5], Instance::new()).is_err());
    assert!(scene.add_mesh(geometry, vec![wall; 6], Instance::new()).is_ok());
}

#[test]
fn shared_meshes_batch_into_one_draw() -> anyhow::Result<()> {
    let mut scene = Scene::new();
    let geometry = scene.add_geometry(Geometry::unit_box());
    let ink = scene.add_material(Material::basic(Color::BLACK));
    for x in 0..3 {
        scene.add_mesh(geometry, ink, Instance::from(Vector3::new(x as f32, 0.0, 0.0)))?;
    }
    let batches = scene.batches();
    assert_eq!(batches.len(), 1);
    assert_eq!(batches[0].instances.len(), 3);
    assert_eq!(batches[0].group, None);
    Ok(())
}

#[test]
fn per_group_materials_draw_each_side() -> anyhow::Result<()> {
    let mut scene = Scene::new();
    let geometry = scene.add_geometry(Geometry::unit_box());
    let wall = scene.add_material(Material::basic(Color::BLACK));
    let cap = scene.add_material(Material::basic(Color::WHITE));
    let sides = vec![wall, wall, cap, cap, wall, wall];
    scene.add_mesh(geometry, sides.clone(), Instance::new())?;
    scene.add_mesh(geometry, sides, Instance::new())?;
    let batches = scene.batches();
    assert_eq!(batches.len(), 6);
    assert!(batches.iter().all(|b| b.instances.len() == 2));
    assert_eq!(batches.iter().filter(|b| b.material == cap).count(), 2);
    Ok(())
}

#[test]
fn transparent_batches_draw_last() -> anyhow::Result<()> {
    let mut scene = Scene::new();
    let geometry = scene.add_geometry(Geometry::plane(1.0, 1.0, 1, 1));
    let glass = scene.add_material(Material::basic(Color::WHITE).transparent(0.5));
    let ink = scene.add_material(Material::basic(Color::BLACK));
    scene.add_mesh(geometry, glass, Instance::new())?;
    scene.add_mesh(geometry, ink, Instance::new())?;
    let batches = scene.batches();
    assert_eq!(batches.len(), 2);
    assert!(!batches[0].transparent);
    assert!(batches[1].transparent);
    assert_eq!(batches[1].material, glass);
    Ok(())
}

#[test]
fn hidden_and_removed_meshes_are_not_drawn() -> anyhow::Result<()> {
    let mut scene = Scene::new();
    let geometry = scene.add_geometry(Geometry::unit_box());
    let ink = scene.add_material(Material::basic(Color::BLACK));
    let hidden = scene.add_mesh(geometry, ink, Instance::new())?;
    let removed = scene.add_mesh(geometry, ink, Instance::new())?;
    scene.add_mesh(geometry, ink, Instance::new())?;
    if let Some(node) = scene.mesh_mut(hidden) {
        node.visible = false;
    }
    assert!(scene.remove_mesh(removed).is_some());
    assert_eq!(scene.mesh_count(), 2);
    assert_eq!(scene.batches()[0].instances.len(), 1);
    Ok(())
}

#[test]
fn unused_materials_are_pruned() -> anyhow::Result<()> {
    let mut scene = Scene::new();
    let geometry = scene.add_geometry(Geometry::unit_box());
    let old = scene.add_material(Material::basic(Color::BLACK));
    let new = scene.add_material(Material::basic(Color::WHITE));
    let mesh = scene.add_mesh(geometry, old, Instance::new())?;
    scene.set_material(mesh, new)?;
    assert_eq!(scene.prune_materials(), 1);
    assert!(scene.material(old).is_none());
    assert!(scene.material(new).is_some());
    Ok(())
}

#[test]
fn root_transform_applies_to_every_mesh() -> anyhow::Result<()> {
    let mut scene = Scene::new();
    let geometry = scene.add_geometry(Geometry::unit_box());
    let ink = scene.add_material(Material::basic(Color::BLACK));
    let mesh = scene.add_mesh(geometry, ink, Instance::from(Vector3::new(1.0, 0.0, 0.0)))?;
    scene.root =
        Instance::from(Vector3::new(0.0, 2.0, 0.0)).with_scale(Vector3::new(2.0, 2.0, 2.0));
    let world = scene.world_transform(mesh).expect("mesh exists");
    assert_eq!(world.position, Vector3::new(2.0, 2.0, 0.0));
    assert_eq!(world.scale, Vector3::new(2.0, 2.0, 2.0));
    Ok(())
}

#[test]
fn editing_geometry_bumps_its_version() {
    let mut scene = Scene::new();
    let geometry = scene.add_geometry(Geometry::unit_box());
    assert_eq!(scene.geometry_version(geometry), Some(0));
    if let Some(g) = scene.geometry_mut(geometry) {
        g.translate(Vector3::unit_x());
    }
    assert_eq!(scene.geometry_version(geometry), Some(1));
    scene.clear();
    assert_eq!(scene.geometry_version(geometry), None);
    assert_eq!(scene.material_count(), 0);
}
