use anyhow::ensure;
use cgmath::Vector3;

use crate::{
    data_structures::{geometry::Geometry, instance::Instance},
    random::Random,
};

/// How scattered markers are turned.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Orientation {
    /// Local +z faces this point.
    LookAt(Vector3<f32>),
    /// Uniformly random rotation per marker.
    Random,
    /// No rotation.
    Identity,
}

/// One uniformly scaled, oriented marker transform per point.
pub fn scatter_points(
    points: &[Vector3<f32>],
    scale: f32,
    orientation: Orientation,
    random: &mut Random,
) -> Vec<Instance> {
    points
        .iter()
        .map(|point| {
            let mut instance = Instance::from(*point);
            instance.set_scalar(scale);
            match orientation {
                Orientation::LookAt(target) => instance.look_at(target),
                Orientation::Random => instance.rotation = random.quaternion(),
                Orientation::Identity => (),
            }
            instance
        })
        .collect()
}

/// Markers at every vertex of `base`. The marker scale must be positive and
/// smaller than the base's bounding radius.
pub fn scatter(
    base: &Geometry,
    scale: f32,
    orientation: Orientation,
    random: &mut Random,
) -> anyhow::Result<Vec<Instance>> {
    let radius = base.bounding_radius();
    ensure!(
        scale > 0.0 && scale < radius,
        "marker scale {} must lie in (0, {}) for this base geometry",
        scale,
        radius
    );
    let points: Vec<Vector3<f32>> = base.positions.iter().map(|p| Vector3::from(*p)).collect();
    Ok(scatter_points(&points, scale, orientation, random))
}
