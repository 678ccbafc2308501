//! Render pipelines.
//!
//! Every sketch draws through one shader; pipelines only differ in raster
//! state (culling, topology, blending, sample count), see [`basic::PipelineKey`].

pub mod basic;
