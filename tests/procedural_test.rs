use std::f32::consts::FRAC_PI_2;

use sketch_ngin::{
    InnerSpace, Vector3,
    data_structures::geometry::Geometry,
    procedural::{
        Axis, Displace, DisplaceMode, EdgeMode, NoiseField, Orientation, TubeWireframe, scatter,
        scatter_points,
    },
    random::Random,
};

use crate::common::test_utils::assert_close;

mod common;

fn planar() -> Displace {
    Displace {
        field: NoiseField::Planar,
        frequency: 0.75,
        amplitude: 0.5,
        mode: DisplaceMode::Offset(Axis::Z),
    }
}

fn displaced_plane(seed: u64) -> Geometry {
    let mut plane = Geometry::plane(2.0, 2.0, 15, 15);
    planar().apply(&mut plane, &Random::new(seed));
    plane
}

#[test]
fn displaced_plane_is_reproducible() {
    let a = displaced_plane(11);
    let b = displaced_plane(11);
    assert_eq!(a.positions.len(), 16 * 16);
    assert_eq!(a.positions, b.positions);
    assert_eq!(a.normals, b.normals);
}

#[test]
fn seeds_change_the_field() {
    assert_ne!(displaced_plane(11).positions, displaced_plane(12).positions);
}

#[test]
fn offsets_stay_within_amplitude() {
    let flat = Geometry::plane(2.0, 2.0, 15, 15);
    let mut bent = flat.clone();
    let largest = planar().apply(&mut bent, &Random::new(5));
    assert!(largest <= 0.5 + 1e-6);
    for (before, after) in flat.positions.iter().zip(&bent.positions) {
        assert_eq!(before[0], after[0]);
        assert_eq!(before[1], after[1]);
        assert!((after[2] - before[2]).abs() <= 0.5 + 1e-6);
    }
}

#[test]
fn rotation_keeps_distance_to_axis() {
    let flat = Geometry::plane(2.0, 2.0, 15, 15);
    let mut twisted = flat.clone();
    let twist = Displace {
        field: NoiseField::Volumetric,
        frequency: 0.75,
        amplitude: 0.5 * FRAC_PI_2,
        mode: DisplaceMode::Rotate(Axis::Y),
    };
    let largest = twist.apply(&mut twisted, &Random::new(5));
    assert!(largest <= 0.5 * FRAC_PI_2 + 1e-6);
    for (before, after) in flat.positions.iter().zip(&twisted.positions) {
        let radius = |p: &[f32; 3]| (p[0] * p[0] + p[2] * p[2]).sqrt();
        assert_close(after[1], before[1], 1e-5);
        assert_close(radius(after), radius(before), 1e-5);
    }
}

#[test]
fn displacement_recomputes_normals() {
    let mut plane = displaced_plane(3);
    let normals = plane.normals.clone();
    plane.compute_vertex_normals();
    assert_eq!(plane.normals, normals);
    for n in &plane.normals {
        assert_close(Vector3::from(*n).magnitude(), 1.0, 1e-5);
    }
}

#[test]
fn one_marker_per_vertex() -> anyhow::Result<()> {
    let base = Geometry::icosahedron(1.0, 1);
    let mut random = Random::new(1);
    let markers = scatter(&base, 0.025, Orientation::Random, &mut random)?;
    assert_eq!(markers.len(), base.positions.len());
    let radius = base.bounding_radius();
    for marker in &markers {
        assert!(marker.scale.x < radius);
        assert_eq!(marker.scale.x, marker.scale.y);
        assert_eq!(marker.scale.y, marker.scale.z);
        assert_close(marker.rotation.magnitude(), 1.0, 1e-4);
    }
    Ok(())
}

#[test]
fn markers_face_their_target() -> anyhow::Result<()> {
    let base = Geometry::icosahedron(1.0, 0);
    let mut random = Random::new(1);
    let origin = Vector3::new(0.0, 0.0, 0.0);
    for marker in scatter(&base, 0.1, Orientation::LookAt(origin), &mut random)? {
        let facing = marker.rotation * Vector3::unit_z();
        let wanted = (origin - marker.position).normalize();
        assert!(facing.dot(wanted) > 0.999, "{:?} vs {:?}", facing, wanted);
    }
    Ok(())
}

#[test]
fn oversized_markers_are_rejected() {
    let base = Geometry::plane(2.0, 2.0, 1, 1);
    let mut random = Random::new(1);
    assert!(scatter(&base, 5.0, Orientation::Identity, &mut random).is_err());
    assert!(scatter(&base, 0.0, Orientation::Identity, &mut random).is_err());
}

#[test]
fn scattering_points_keeps_their_count() {
    let mut random = Random::new(9);
    let points: Vec<_> = (0..37).map(|_| random.inside_sphere(2.0)).collect();
    let markers = scatter_points(&points, 0.2, Orientation::Identity, &mut random);
    assert_eq!(markers.len(), 37);
    for (marker, point) in markers.iter().zip(&points) {
        assert_eq!(marker.position, *point);
    }
}

fn tubes(mode: EdgeMode) -> TubeWireframe {
    TubeWireframe {
        thickness: 0.01,
        radius_segments: 4,
        length_segments: 1,
        mode,
    }
}

#[test]
fn edge_modes_select_different_edges() {
    let grid = Geometry::plane(1.0, 1.0, 2, 2);
    assert_eq!(tubes(EdgeMode::Triangle).candidate_edges(&grid).len(), 16);
    assert_eq!(tubes(EdgeMode::Quad).candidate_edges(&grid).len(), 12);
    assert_eq!(tubes(EdgeMode::CrossHatch).candidate_edges(&grid).len(), 20);
}

#[test]
fn displaced_grids_keep_their_quads() {
    // 15x15 cells: 2 * 15 * 16 sides, plus two diagonals per cell when hatched.
    for seed in 0..8 {
        let grid = displaced_plane(seed);
        assert_eq!(tubes(EdgeMode::Quad).candidate_edges(&grid).len(), 480);
        assert_eq!(tubes(EdgeMode::CrossHatch).candidate_edges(&grid).len(), 930);
    }
}

#[test]
fn quads_are_found_even_when_the_diagonal_is_short() {
    let mut cell = Geometry::plane(1.0, 1.0, 1, 1);
    // Drag one corner far out so the splitting diagonal is the shortest side.
    cell.positions[0] = [-5.0, 0.5, 0.0];
    let mut edges = tubes(EdgeMode::Quad).candidate_edges(&cell);
    edges.sort();
    assert_eq!(edges, vec![[0, 1], [0, 2], [1, 3], [2, 3]]);

    let hatched = tubes(EdgeMode::CrossHatch).candidate_edges(&cell);
    assert!(hatched.contains(&[1, 2]));
    assert!(hatched.contains(&[0, 3]));
    assert_eq!(hatched.len(), 6);
}

#[test]
fn predicate_runs_once_per_edge() {
    let grid = Geometry::plane(2.0, 2.0, 15, 15);
    let wireframe = tubes(EdgeMode::Quad);
    let candidates = wireframe.candidate_edges(&grid).len();
    let mut calls = Vec::new();
    let mut random = Random::new(4);
    let geometry = wireframe.build_filtered(&grid, |edge| {
        calls.push(edge.index);
        random.standard_gaussian() > -0.5
    });
    assert_eq!(calls, (0..candidates).collect::<Vec<_>>());
    assert!(!geometry.positions.is_empty());
}

#[test]
fn tubes_carry_their_edge_positions() {
    let grid = Geometry::plane(1.0, 1.0, 2, 2);
    let geometry = tubes(EdgeMode::Quad).build(&grid);
    // 12 edges, each an open cylinder with 2 rings of 5 vertices.
    assert_eq!(geometry.positions.len(), 12 * 10);
    let bases = geometry.base_positions.as_ref().expect("tubes record base positions");
    assert_eq!(bases.len(), geometry.positions.len());
    for (position, base) in geometry.positions.iter().zip(bases) {
        assert_eq!(base[2], 0.0);
        let offset = Vector3::from(*position) - Vector3::from(*base);
        assert!(offset.magnitude() <= 0.01 + 1e-5);
    }
}

#[test]
fn rejecting_every_edge_yields_nothing() {
    let grid = Geometry::plane(1.0, 1.0, 2, 2);
    let geometry = tubes(EdgeMode::Triangle).build_filtered(&grid, |_| false);
    assert!(geometry.positions.is_empty());
    assert!(geometry.indices.is_empty());
}
