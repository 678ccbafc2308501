use cgmath::{Quaternion, Rad, Rotation3, Vector3};

use crate::{data_structures::geometry::Geometry, random::Random};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub fn unit(&self) -> Vector3<f32> {
        match self {
            Axis::X => Vector3::unit_x(),
            Axis::Y => Vector3::unit_y(),
            Axis::Z => Vector3::unit_z(),
        }
    }
}

/// Where the noise field is sampled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoiseField {
    /// 2D noise at `(x, y)`, for flat grids.
    Planar,
    /// 3D noise at `(x, y, z)`.
    Volumetric,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DisplaceMode {
    /// Move the vertex along the axis by `noise * amplitude`.
    Offset(Axis),
    /// Rotate the vertex about the axis by `noise * amplitude` radians.
    Rotate(Axis),
}

/// Noise displacement of every vertex of a geometry.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Displace {
    pub field: NoiseField,
    pub frequency: f32,
    pub amplitude: f32,
    pub mode: DisplaceMode,
}

impl Displace {
    /// Noise value times amplitude at one position.
    pub fn sample(&self, random: &Random, p: Vector3<f32>) -> f32 {
        match self.field {
            NoiseField::Planar => random.noise2d(p.x, p.y, self.frequency, self.amplitude),
            NoiseField::Volumetric => {
                random.noise3d(p.x, p.y, p.z, self.frequency, self.amplitude)
            }
        }
    }

    /// Displace in place and recompute normals. Returns the largest absolute
    /// sampled displacement, which never exceeds `amplitude`.
    pub fn apply(&self, geometry: &mut Geometry, random: &Random) -> f32 {
        let mut largest = 0.0f32;
        for position in geometry.positions.iter_mut() {
            let p = Vector3::from(*position);
            let d = self.sample(random, p);
            largest = largest.max(d.abs());
            let moved = match self.mode {
                DisplaceMode::Offset(axis) => p + axis.unit() * d,
                DisplaceMode::Rotate(axis) => Quaternion::from_axis_angle(axis.unit(), Rad(d)) * p,
            };
            *position = moved.into();
        }
        geometry.compute_vertex_normals();
        log::debug!(
            "displaced {} vertices, largest offset {:.4}",
            geometry.positions.len(),
            largest
        );
        largest
    }
}
