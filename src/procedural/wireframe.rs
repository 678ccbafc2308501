use std::collections::BTreeMap;

use cgmath::{InnerSpace, Quaternion, Vector3};

use crate::data_structures::geometry::Geometry;

/// Which edges of a triangle mesh become tubes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EdgeMode {
    /// Every unique triangle edge.
    #[default]
    Triangle,
    /// Skip the diagonal that splits a quad into two triangles.
    Quad,
    /// Quad edges plus both diagonals of every quad.
    CrossHatch,
}

/// An edge offered to the inclusion predicate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Edge {
    /// Position in the candidate list, stable for a given geometry and mode.
    pub index: usize,
    pub from: Vector3<f32>,
    pub to: Vector3<f32>,
}

/// Build parameters of a tube wireframe.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TubeWireframe {
    /// Tube radius.
    pub thickness: f32,
    pub radius_segments: u32,
    pub length_segments: u32,
    pub mode: EdgeMode,
}

impl Default for TubeWireframe {
    fn default() -> Self {
        Self {
            thickness: 0.01,
            radius_segments: 4,
            length_segments: 1,
            mode: EdgeMode::Triangle,
        }
    }
}

impl TubeWireframe {
    /// Candidate edges for the configured mode, as vertex-index pairs.
    pub fn candidate_edges(&self, geometry: &Geometry) -> Vec<[u32; 2]> {
        if self.mode == EdgeMode::Triangle {
            return geometry.edges();
        }
        let diagonals = quad_diagonals(geometry);
        let mut edges: Vec<[u32; 2]> = geometry
            .edges()
            .into_iter()
            .filter(|e| !diagonals.contains_key(e))
            .collect();
        if self.mode == EdgeMode::CrossHatch {
            for (diagonal, opposite) in &diagonals {
                edges.push(*diagonal);
                edges.push(*opposite);
            }
        }
        edges
    }

    /// Tubes along every candidate edge.
    pub fn build(&self, geometry: &Geometry) -> Geometry {
        self.build_filtered(geometry, |_| true)
    }

    /// Tubes along the candidate edges `keep` accepts. `keep` is called exactly
    /// once per candidate edge, in candidate order.
    pub fn build_filtered(
        &self,
        geometry: &Geometry,
        mut keep: impl FnMut(&Edge) -> bool,
    ) -> Geometry {
        let mut wireframe = Geometry {
            base_positions: Some(Vec::new()),
            ..Default::default()
        };
        let mut kept = 0;
        for (index, [a, b]) in self.candidate_edges(geometry).into_iter().enumerate() {
            let edge = Edge {
                index,
                from: geometry.position(a),
                to: geometry.position(b),
            };
            if !keep(&edge) {
                continue;
            }
            kept += 1;
            wireframe.merge(&self.tube(edge.from, edge.to));
        }
        log::debug!(
            "tube wireframe: {} edges, {} vertices",
            kept,
            wireframe.positions.len()
        );
        wireframe
    }

    /// An open tube from `from` to `to`. Each ring's base position is the
    /// point on the edge it surrounds.
    fn tube(&self, from: Vector3<f32>, to: Vector3<f32>) -> Geometry {
        let axis = to - from;
        let length = axis.magnitude();
        let mut tube = Geometry::open_cylinder(
            self.thickness,
            length,
            self.radius_segments,
            self.length_segments,
        );
        if length <= f32::EPSILON {
            tube.base_positions = Some(vec![from.into(); tube.positions.len()]);
            tube.translate(from);
            return tube;
        }
        let rotation =
            Quaternion::from_arc(Vector3::unit_y(), axis / length, Some(Vector3::unit_x()));
        let mut bases = Vec::with_capacity(tube.positions.len());
        for (position, normal) in tube.positions.iter_mut().zip(tube.normals.iter_mut()) {
            let local = Vector3::from(*position);
            let t = local.y / length;
            *position = (from + rotation * local).into();
            *normal = (rotation * Vector3::from(*normal)).into();
            bases.push((from + axis * t).into());
        }
        tube.base_positions = Some(bases);
        tube
    }
}

/// Quads are consecutive triangle pairs sharing one edge, the layout every
/// grid builder emits. Pairing by index keeps the result independent of where
/// displacement has moved the vertices. Maps each diagonal to the edge joining
/// the two opposite corners, ordered so iteration is reproducible.
fn quad_diagonals(geometry: &Geometry) -> BTreeMap<[u32; 2], [u32; 2]> {
    let triangles: Vec<[u32; 3]> = geometry.triangles().collect();
    let mut diagonals = BTreeMap::new();
    let mut i = 0;
    while i + 1 < triangles.len() {
        match split_quad(triangles[i], triangles[i + 1]) {
            Some((diagonal, opposite)) => {
                diagonals.insert(diagonal, opposite);
                i += 2;
            }
            None => i += 1,
        }
    }
    diagonals
}

fn split_quad(first: [u32; 3], second: [u32; 3]) -> Option<([u32; 2], [u32; 2])> {
    let common: Vec<u32> = first.into_iter().filter(|v| second.contains(v)).collect();
    let &[p, q] = common.as_slice() else {
        return None;
    };
    let corner = |t: [u32; 3]| t.into_iter().find(|v| *v != p && *v != q);
    let (x, y) = (corner(first)?, corner(second)?);
    Some(([p.min(q), p.max(q)], [x.min(y), x.max(y)]))
}
