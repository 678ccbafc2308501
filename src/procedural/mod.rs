//! Procedural mesh generation.
//!
//! Helpers that derive new geometry from a base geometry: noise-driven vertex
//! displacement, tube wireframes along retained edges and marker scattering.
//! They run on the CPU against plain [`Geometry`](crate::data_structures::geometry::Geometry)
//! values and take the sketch's [`Random`](crate::random::Random), so the
//! same seed always yields the same mesh.

pub mod displace;
pub mod scatter;
pub mod wireframe;

pub use displace::{Axis, Displace, DisplaceMode, NoiseField};
pub use scatter::{Orientation, scatter, scatter_points};
pub use wireframe::{Edge, EdgeMode, TubeWireframe};
