//! Scene data: what gets drawn, independent of how.
//!
//! - `geometry` holds indexed triangle meshes and their primitive builders
//! - `instance` holds per-mesh transforms and their GPU form
//! - `material` describes shading and raster state
//! - `scene_graph` ties geometry, materials and transforms together
//! - `texture` wraps the GPU render targets
//! - `vertex` defines the vertex buffer layouts

pub mod geometry;
pub mod instance;
pub mod material;
pub mod scene_graph;
pub mod texture;
pub mod vertex;
