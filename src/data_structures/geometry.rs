//! Indexed triangle geometry and the primitive builders sketches start from.
//!
//! Builders follow the usual right-handed, y-up conventions: planes lie in XY
//! facing +z, UV `v = 1` is the top edge, and boxes carry one material group
//! per side in +x, -x, +y, -y, +z, -z order.

use std::{
    collections::{HashMap, HashSet},
    f32::consts::{PI, TAU},
};

use anyhow::ensure;
use cgmath::{InnerSpace, Vector3, Zero};

/// A contiguous range of indices drawn with one material.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Group {
    pub start: u32,
    pub count: u32,
    pub material_index: usize,
}

/// Box side, in material-group order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoxSide {
    PositiveX = 0,
    NegativeX = 1,
    PositiveY = 2,
    NegativeY = 3,
    PositiveZ = 4,
    NegativeZ = 5,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Geometry {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub colors: Option<Vec<[f32; 3]>>,
    /// Undisplaced source position of each vertex, consumed by noise shaders.
    pub base_positions: Option<Vec<[f32; 3]>>,
    pub indices: Vec<u32>,
    pub groups: Vec<Group>,
}

fn v3(p: [f32; 3]) -> Vector3<f32> {
    Vector3::new(p[0], p[1], p[2])
}

impl Geometry {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }

    pub fn position(&self, index: u32) -> Vector3<f32> {
        v3(self.positions[index as usize])
    }

    /// A plane in XY facing +z, centered on the origin.
    pub fn plane(width: f32, height: f32, width_segments: u32, height_segments: u32) -> Self {
        let grid_x = width_segments.max(1);
        let grid_y = height_segments.max(1);
        let segment_width = width / grid_x as f32;
        let segment_height = height / grid_y as f32;
        let mut geometry = Geometry::default();

        for iy in 0..=grid_y {
            let y = iy as f32 * segment_height - height / 2.0;
            for ix in 0..=grid_x {
                let x = ix as f32 * segment_width - width / 2.0;
                geometry.positions.push([x, -y, 0.0]);
                geometry.normals.push([0.0, 0.0, 1.0]);
                geometry
                    .uvs
                    .push([ix as f32 / grid_x as f32, 1.0 - iy as f32 / grid_y as f32]);
            }
        }
        geometry.indices = grid_indices(0, grid_x, grid_y);
        geometry
    }

    /// An axis-aligned box centered on the origin with one group per side.
    pub fn cuboid(
        width: f32,
        height: f32,
        depth: f32,
        width_segments: u32,
        height_segments: u32,
        depth_segments: u32,
    ) -> Self {
        let (ws, hs, ds) = (
            width_segments.max(1),
            height_segments.max(1),
            depth_segments.max(1),
        );
        let mut geometry = Geometry::default();
        // (u, v, w axes, u direction, v direction, extent along u, v, w, segments u, v)
        let sides: [(usize, usize, usize, f32, f32, f32, f32, f32, u32, u32); 6] = [
            (2, 1, 0, -1.0, -1.0, depth, height, width, ds, hs),
            (2, 1, 0, 1.0, -1.0, depth, height, -width, ds, hs),
            (0, 2, 1, 1.0, 1.0, width, depth, height, ws, ds),
            (0, 2, 1, 1.0, -1.0, width, depth, -height, ws, ds),
            (0, 1, 2, 1.0, -1.0, width, height, depth, ws, hs),
            (0, 1, 2, -1.0, -1.0, width, height, -depth, ws, hs),
        ];
        for (material_index, (u, v, w, udir, vdir, su, sv, sw, gx, gy)) in
            sides.into_iter().enumerate()
        {
            let start = geometry.indices.len() as u32;
            let offset = geometry.positions.len() as u32;
            for iy in 0..=gy {
                let y = iy as f32 * sv / gy as f32 - sv / 2.0;
                for ix in 0..=gx {
                    let x = ix as f32 * su / gx as f32 - su / 2.0;
                    let mut position = [0.0; 3];
                    position[u] = x * udir;
                    position[v] = y * vdir;
                    position[w] = sw / 2.0;
                    let mut normal = [0.0; 3];
                    normal[w] = if sw > 0.0 { 1.0 } else { -1.0 };
                    geometry.positions.push(position);
                    geometry.normals.push(normal);
                    geometry
                        .uvs
                        .push([ix as f32 / gx as f32, 1.0 - iy as f32 / gy as f32]);
                }
            }
            geometry.indices.extend(grid_indices(offset, gx, gy));
            geometry.groups.push(Group {
                start,
                count: geometry.indices.len() as u32 - start,
                material_index,
            });
        }
        geometry
    }

    /// A unit-segment box, the shape most sketches instance.
    pub fn unit_box() -> Self {
        Self::cuboid(1.0, 1.0, 1.0, 1, 1, 1)
    }

    pub fn uv_sphere(radius: f32, width_segments: u32, height_segments: u32) -> Self {
        let ws = width_segments.max(3);
        let hs = height_segments.max(2);
        let mut geometry = Geometry::default();
        let mut grid = Vec::with_capacity(hs as usize + 1);

        for iy in 0..=hs {
            let v = iy as f32 / hs as f32;
            let mut row = Vec::with_capacity(ws as usize + 1);
            for ix in 0..=ws {
                let u = ix as f32 / ws as f32;
                let position = Vector3::new(
                    -radius * (u * TAU).cos() * (v * PI).sin(),
                    radius * (v * PI).cos(),
                    radius * (u * TAU).sin() * (v * PI).sin(),
                );
                let normal = if position.magnitude2() > 0.0 {
                    position.normalize()
                } else {
                    Vector3::unit_y()
                };
                row.push(geometry.positions.len() as u32);
                geometry.positions.push(position.into());
                geometry.normals.push(normal.into());
                geometry.uvs.push([u, 1.0 - v]);
            }
            grid.push(row);
        }

        for iy in 0..hs as usize {
            for ix in 0..ws as usize {
                let a = grid[iy][ix + 1];
                let b = grid[iy][ix];
                let c = grid[iy + 1][ix];
                let d = grid[iy + 1][ix + 1];
                if iy != 0 {
                    geometry.indices.extend([a, b, d]);
                }
                if iy != hs as usize - 1 {
                    geometry.indices.extend([b, c, d]);
                }
            }
        }
        geometry
    }

    /// A subdivided icosahedron projected onto a sphere. Shared corners are
    /// merged so every edge appears once.
    pub fn icosahedron(radius: f32, detail: u32) -> Self {
        let t = (1.0 + 5f32.sqrt()) / 2.0;
        let corners = [
            [-1.0, t, 0.0],
            [1.0, t, 0.0],
            [-1.0, -t, 0.0],
            [1.0, -t, 0.0],
            [0.0, -1.0, t],
            [0.0, 1.0, t],
            [0.0, -1.0, -t],
            [0.0, 1.0, -t],
            [t, 0.0, -1.0],
            [t, 0.0, 1.0],
            [-t, 0.0, -1.0],
            [-t, 0.0, 1.0],
        ];
        let faces: [[usize; 3]; 20] = [
            [0, 11, 5],
            [0, 5, 1],
            [0, 1, 7],
            [0, 7, 10],
            [0, 10, 11],
            [1, 5, 9],
            [5, 11, 4],
            [11, 10, 2],
            [10, 7, 6],
            [7, 1, 8],
            [3, 9, 4],
            [3, 4, 2],
            [3, 2, 6],
            [3, 6, 8],
            [3, 8, 9],
            [4, 9, 5],
            [2, 4, 11],
            [6, 2, 10],
            [8, 6, 7],
            [9, 8, 1],
        ];

        let mut geometry = Geometry::default();
        let mut welded: HashMap<[i64; 3], u32> = HashMap::new();
        let mut vertex = |p: Vector3<f32>, geometry: &mut Geometry| -> u32 {
            let n = p.normalize();
            let key = [
                (n.x * 1e5).round() as i64,
                (n.y * 1e5).round() as i64,
                (n.z * 1e5).round() as i64,
            ];
            *welded.entry(key).or_insert_with(|| {
                let u = n.z.atan2(-n.x) / TAU + 0.5;
                let v = n.y.clamp(-1.0, 1.0).asin() / PI + 0.5;
                geometry.positions.push((n * radius).into());
                geometry.normals.push(n.into());
                geometry.uvs.push([u, v]);
                geometry.positions.len() as u32 - 1
            })
        };

        let cols = detail as usize + 1;
        for face in faces {
            let [a, b, c] = face.map(|i| v3(corners[i]));
            // rows[i][j]: j-th point on the i-th row from edge ab towards c
            let mut rows: Vec<Vec<Vector3<f32>>> = Vec::with_capacity(cols + 1);
            for i in 0..=cols {
                let aj = a + (c - a) * (i as f32 / cols as f32);
                let bj = b + (c - b) * (i as f32 / cols as f32);
                let count = cols - i;
                let row = (0..=count)
                    .map(|j| {
                        if count == 0 {
                            aj
                        } else {
                            aj + (bj - aj) * (j as f32 / count as f32)
                        }
                    })
                    .collect();
                rows.push(row);
            }
            for i in 0..cols {
                for j in 0..(2 * (cols - i) - 1) {
                    let k = j / 2;
                    let triangle = if j % 2 == 0 {
                        [rows[i][k + 1], rows[i + 1][k], rows[i][k]]
                    } else {
                        [rows[i][k + 1], rows[i + 1][k + 1], rows[i + 1][k]]
                    };
                    for p in triangle {
                        let index = vertex(p, &mut geometry);
                        geometry.indices.push(index);
                    }
                }
            }
        }
        geometry
    }

    pub fn torus(radius: f32, tube: f32, radial_segments: u32, tubular_segments: u32) -> Self {
        let radial = radial_segments.max(2);
        let tubular = tubular_segments.max(3);
        let mut geometry = Geometry::default();

        for j in 0..=radial {
            for i in 0..=tubular {
                let u = i as f32 / tubular as f32 * TAU;
                let v = j as f32 / radial as f32 * TAU;
                let position = Vector3::new(
                    (radius + tube * v.cos()) * u.cos(),
                    (radius + tube * v.cos()) * u.sin(),
                    tube * v.sin(),
                );
                let center = Vector3::new(radius * u.cos(), radius * u.sin(), 0.0);
                geometry.positions.push(position.into());
                geometry.normals.push((position - center).normalize().into());
                geometry
                    .uvs
                    .push([i as f32 / tubular as f32, j as f32 / radial as f32]);
            }
        }

        for j in 1..=radial {
            for i in 1..=tubular {
                let a = (tubular + 1) * j + i - 1;
                let b = (tubular + 1) * (j - 1) + i - 1;
                let c = (tubular + 1) * (j - 1) + i;
                let d = (tubular + 1) * j + i;
                geometry.indices.extend([a, b, d, b, c, d]);
            }
        }
        geometry
    }

    /// Open-ended cylinder along +y from `0` to `height`, used as a tube segment.
    pub fn open_cylinder(
        radius: f32,
        height: f32,
        radial_segments: u32,
        height_segments: u32,
    ) -> Self {
        let radial = radial_segments.max(3);
        let rows = height_segments.max(1);
        let mut geometry = Geometry::default();
        for iy in 0..=rows {
            let v = iy as f32 / rows as f32;
            for ix in 0..=radial {
                let u = ix as f32 / radial as f32;
                let theta = u * TAU;
                let (sin, cos) = theta.sin_cos();
                geometry
                    .positions
                    .push([radius * sin, v * height, radius * cos]);
                geometry.normals.push([sin, 0.0, cos]);
                geometry.uvs.push([u, v]);
            }
        }
        for iy in 0..rows {
            for ix in 0..radial {
                let a = iy * (radial + 1) + ix;
                let b = (iy + 1) * (radial + 1) + ix;
                let c = (iy + 1) * (radial + 1) + ix + 1;
                let d = iy * (radial + 1) + ix + 1;
                geometry.indices.extend([a, d, b, b, d, c]);
            }
        }
        geometry
    }

    /// Convex hull of a point set with flat per-face normals.
    ///
    /// Every hull face becomes three unshared vertices, so per-face attributes
    /// such as colors can be assigned with [`Geometry::set_face_colors`].
    pub fn convex_hull(points: &[Vector3<f32>]) -> anyhow::Result<Self> {
        ensure!(
            points.len() >= 4,
            "a convex hull needs at least four points, got {}",
            points.len()
        );
        let centroid = points.iter().fold(Vector3::zero(), |acc, p| acc + *p) / points.len() as f32;
        let scale = points
            .iter()
            .map(|p| (*p - centroid).magnitude())
            .fold(0.0f32, f32::max)
            .max(f32::EPSILON);
        let epsilon = 1e-5 * scale;

        let mut geometry = Geometry::default();
        let n = points.len();
        for i in 0..n {
            for j in (i + 1)..n {
                for k in (j + 1)..n {
                    let (a, b, c) = (points[i], points[j], points[k]);
                    let normal = (b - a).cross(c - a);
                    if normal.magnitude2() <= epsilon * epsilon {
                        continue;
                    }
                    let normal = normal.normalize();
                    let offsets = points
                        .iter()
                        .enumerate()
                        .filter(|(m, _)| *m != i && *m != j && *m != k)
                        .map(|(_, p)| normal.dot(*p - a));
                    let (mut above, mut below) = (false, false);
                    for d in offsets {
                        above |= d > epsilon;
                        below |= d < -epsilon;
                    }
                    if above && below {
                        continue;
                    }
                    // Orient the face away from the rest of the set.
                    let (b, c, normal) = if above { (c, b, -normal) } else { (b, c, normal) };
                    for p in [a, b, c] {
                        geometry.indices.push(geometry.positions.len() as u32);
                        geometry.positions.push(p.into());
                        geometry.normals.push(normal.into());
                        geometry.uvs.push([0.0, 0.0]);
                    }
                }
            }
        }
        ensure!(
            !geometry.indices.is_empty(),
            "all {} points are collinear, no hull",
            points.len()
        );
        Ok(geometry)
    }

    pub fn translate(&mut self, offset: Vector3<f32>) -> &mut Self {
        for p in self.positions.iter_mut() {
            *p = (v3(*p) + offset).into();
        }
        self
    }

    /// Axis-aligned bounds as `(min, max)`, `None` when empty.
    pub fn bounding_box(&self) -> Option<(Vector3<f32>, Vector3<f32>)> {
        let first = v3(*self.positions.first()?);
        Some(self.positions.iter().fold((first, first), |(lo, hi), p| {
            (
                Vector3::new(lo.x.min(p[0]), lo.y.min(p[1]), lo.z.min(p[2])),
                Vector3::new(hi.x.max(p[0]), hi.y.max(p[1]), hi.z.max(p[2])),
            )
        }))
    }

    /// Move the bounding-box center to the origin.
    pub fn center(&mut self) -> &mut Self {
        if let Some((lo, hi)) = self.bounding_box() {
            self.translate(-(lo + hi) / 2.0);
        }
        self
    }

    /// Largest distance of a vertex from the origin.
    pub fn bounding_radius(&self) -> f32 {
        self.positions
            .iter()
            .map(|p| v3(*p).magnitude())
            .fold(0.0, f32::max)
    }

    /// Area-weighted smooth normals from the current positions.
    pub fn compute_vertex_normals(&mut self) -> &mut Self {
        let mut normals = vec![Vector3::zero(); self.positions.len()];
        for [a, b, c] in self.triangles().collect::<Vec<_>>() {
            let (pa, pb, pc) = (self.position(a), self.position(b), self.position(c));
            let face = (pc - pb).cross(pa - pb);
            for i in [a, b, c] {
                normals[i as usize] += face;
            }
        }
        self.normals = normals
            .into_iter()
            .map(|n| {
                if n.magnitude2() > 0.0 {
                    n.normalize().into()
                } else {
                    [0.0, 0.0, 1.0]
                }
            })
            .collect();
        self
    }

    /// Drop the triangles of one material group, e.g. the top of a box.
    pub fn remove_group(&mut self, material_index: usize) -> &mut Self {
        let mut indices = Vec::with_capacity(self.indices.len());
        let mut groups = Vec::with_capacity(self.groups.len());
        for group in &self.groups {
            if group.material_index == material_index {
                continue;
            }
            let range = group.start as usize..(group.start + group.count) as usize;
            groups.push(Group {
                start: indices.len() as u32,
                count: group.count,
                material_index: group.material_index,
            });
            indices.extend_from_slice(&self.indices[range]);
        }
        self.indices = indices;
        self.groups = groups;
        self
    }

    /// Expand shared vertices so every triangle owns its three corners.
    pub fn to_non_indexed(&self) -> Self {
        let pick3 = |src: &Vec<[f32; 3]>| -> Vec<[f32; 3]> {
            self.indices.iter().map(|&i| src[i as usize]).collect()
        };
        Geometry {
            positions: pick3(&self.positions),
            normals: pick3(&self.normals),
            uvs: self.indices.iter().map(|&i| self.uvs[i as usize]).collect(),
            colors: self.colors.as_ref().map(|c| pick3(c)),
            base_positions: self.base_positions.as_ref().map(|b| pick3(b)),
            indices: (0..self.indices.len() as u32).collect(),
            groups: self.groups.clone(),
        }
    }

    /// Assign one color per triangle. Shared vertices take the last face's color,
    /// so call on non-indexed geometry for flat faces.
    pub fn set_face_colors(&mut self, mut color_of: impl FnMut(usize) -> [f32; 3]) -> &mut Self {
        let mut colors = vec![[1.0; 3]; self.positions.len()];
        for (face, triangle) in self.indices.chunks_exact(3).enumerate() {
            let color = color_of(face);
            for &i in triangle {
                colors[i as usize] = color;
            }
        }
        self.colors = Some(colors);
        self
    }

    /// Unique undirected edges in first-seen order.
    pub fn edges(&self) -> Vec<[u32; 2]> {
        let mut seen = HashSet::new();
        let mut edges = Vec::new();
        for [a, b, c] in self.triangles() {
            for (from, to) in [(a, b), (b, c), (c, a)] {
                let key = (from.min(to), from.max(to));
                if seen.insert(key) {
                    edges.push([key.0, key.1]);
                }
            }
        }
        edges
    }

    /// Index list for drawing the unique edges as a line list.
    pub fn line_indices(&self) -> Vec<u32> {
        self.edges().into_iter().flatten().collect()
    }

    /// Append `other`, offsetting its indices. Groups of `other` are dropped.
    pub fn merge(&mut self, other: &Geometry) -> &mut Self {
        let offset = self.positions.len() as u32;
        let had = self.positions.len();
        self.positions.extend_from_slice(&other.positions);
        self.normals.extend_from_slice(&other.normals);
        self.uvs.extend_from_slice(&other.uvs);
        merge_optional(&mut self.colors, &other.colors, had, other.positions.len());
        merge_optional(
            &mut self.base_positions,
            &other.base_positions,
            had,
            other.positions.len(),
        );
        self.indices
            .extend(other.indices.iter().map(|i| i + offset));
        self
    }
}

fn merge_optional(
    into: &mut Option<Vec<[f32; 3]>>,
    from: &Option<Vec<[f32; 3]>>,
    existing: usize,
    added: usize,
) {
    match (into.as_mut(), from) {
        (Some(values), Some(more)) => values.extend_from_slice(more),
        (Some(values), None) => values.extend(std::iter::repeat_n([0.0; 3], added)),
        (None, Some(more)) => {
            let mut values = vec![[0.0; 3]; existing];
            values.extend_from_slice(more);
            *into = Some(values);
        }
        (None, None) => (),
    }
}

fn grid_indices(offset: u32, grid_x: u32, grid_y: u32) -> Vec<u32> {
    let row = grid_x + 1;
    let mut indices = Vec::with_capacity((grid_x * grid_y * 6) as usize);
    for iy in 0..grid_y {
        for ix in 0..grid_x {
            let a = offset + ix + row * iy;
            let b = offset + ix + row * (iy + 1);
            let c = offset + (ix + 1) + row * (iy + 1);
            let d = offset + (ix + 1) + row * iy;
            indices.extend([a, b, d, b, c, d]);
        }
    }
    indices
}
