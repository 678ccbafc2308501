//! Seeded simplex noise in two, three and four dimensions.
//!
//! Every sampler returns values in `[-1, 1]`. The seed is drawn from the
//! caller's random source, so a fixed seed reproduces the field.

use noise_functions::{Noise, OpenSimplex2s};
use rand::Rng;

/// An OpenSimplex2s field offset by a per-sketch seed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SimplexNoise {
    seed: i32,
}

impl SimplexNoise {
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self { seed: rng.r#gen() }
    }

    pub fn seed(&self) -> i32 {
        self.seed
    }

    pub fn noise2(&self, x: f32, y: f32) -> f32 {
        OpenSimplex2s.add_seed(self.seed).sample2([x, y]).clamp(-1.0, 1.0)
    }

    pub fn noise3(&self, x: f32, y: f32, z: f32) -> f32 {
        OpenSimplex2s.add_seed(self.seed).sample3([x, y, z]).clamp(-1.0, 1.0)
    }

    pub fn noise4(&self, x: f32, y: f32, z: f32, w: f32) -> f32 {
        OpenSimplex2s
            .add_seed(self.seed)
            .sample4([x, y, z, w])
            .clamp(-1.0, 1.0)
    }
}
