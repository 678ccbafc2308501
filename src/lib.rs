//! sketch-ngin
//!
//! Seeded generative-art sketches on a small instancing wgpu renderer. A
//! sketch builds a scene once, is resized whenever its surface changes,
//! renders one frame per tick and releases everything on unload; the
//! [`sketch::SketchRunner`] enforces that order for any [`sketch::Backend`].
//!
//! High-level modules
//! - `sketch`: the lifecycle contract, the backend seam and the runner
//! - `settings` / `clock`: sketch configuration and frame timing
//! - `camera`: perspective and orthographic cameras, picking rays, orbit controls
//! - `random` / `noise` / `color` / `easing`: seeded sampling, simplex noise, palettes, tweens
//! - `data_structures`: geometry, instances, materials and the scene graph
//! - `procedural`: noise displacement, tube wireframes, instance scattering
//! - `shading`: the gradient and noise-displacement shader and its CPU reference
//! - `interactive`: the spawn/decay state machine for pointer-driven meshes
//! - `context` / `render` / `pipelines`: the wgpu backend
//! - `flow`: the windowed runner and PNG export
//! - `sketches`: the bundled sketches and their registry

pub mod camera;
pub mod clock;
pub mod color;
pub mod context;
pub mod data_structures;
pub mod easing;
pub mod flow;
pub mod interactive;
pub mod noise;
pub mod pipelines;
pub mod procedural;
pub mod random;
pub mod render;
pub mod settings;
pub mod shading;
pub mod sketch;
pub mod sketches;

// Re-exports commonly used types for convenience in downstream code.
pub use cgmath::*;
