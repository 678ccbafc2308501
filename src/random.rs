//! Seedable random source shared by a sketch.
//!
//! All sampling in a sketch goes through one [`Random`], so fixing its seed
//! reproduces every color pick, placement and noise field of a run.

use std::f32::consts::TAU;

use anyhow::ensure;
use cgmath::{Quaternion, Vector2, Vector3};
use rand::{Rng as _, SeedableRng, seq::SliceRandom};

use crate::noise::SimplexNoise;

pub use rand_xoshiro::Xoshiro256StarStar as Rng;

/// A seeded random source with the sampling helpers sketches rely on.
#[derive(Clone, Debug)]
pub struct Random {
    seed: u64,
    rng: Rng,
    noise: SimplexNoise,
    // Second sample of the last polar gaussian draw.
    next_gaussian: Option<f32>,
}

impl Random {
    pub fn new(seed: u64) -> Self {
        let mut rng = Rng::seed_from_u64(seed);
        let noise = SimplexNoise::new(&mut rng);
        Self {
            seed,
            rng,
            noise,
            next_gaussian: None,
        }
    }

    /// A source seeded from the operating system's entropy.
    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Restart the sequence (and the noise field) from `seed`.
    pub fn set_seed(&mut self, seed: u64) {
        *self = Self::new(seed);
    }

    /// Derive an independent source whose seed is drawn from this one.
    pub fn fork(&mut self) -> Self {
        let seed = self.rng.r#gen();
        Self::new(seed)
    }

    /// Uniform sample in `[0, 1)`.
    pub fn value(&mut self) -> f32 {
        self.rng.r#gen::<f32>()
    }

    pub fn range(&mut self, min: f32, max: f32) -> f32 {
        min + (max - min) * self.value()
    }

    /// Uniform integer in `[min, max)`.
    pub fn range_floor(&mut self, min: i32, max: i32) -> i32 {
        self.range(min as f32, max as f32).floor() as i32
    }

    pub fn chance(&mut self, probability: f32) -> bool {
        self.value() < probability
    }

    /// Uniformly random element. An empty slice is a configuration error.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> anyhow::Result<&'a T> {
        ensure!(!items.is_empty(), "cannot pick from an empty set");
        let index = (self.value() * items.len() as f32) as usize;
        Ok(&items[index.min(items.len() - 1)])
    }

    /// A shuffled copy of `items`.
    pub fn shuffle<T: Clone>(&mut self, items: &[T]) -> Vec<T> {
        let mut shuffled = items.to_vec();
        shuffled.shuffle(&mut self.rng);
        shuffled
    }

    /// Normal sample with the given mean and standard deviation (Marsaglia polar method).
    pub fn gaussian(&mut self, mean: f32, standard_deviation: f32) -> f32 {
        if let Some(next) = self.next_gaussian.take() {
            return mean + standard_deviation * next;
        }
        let (x1, x2, w) = loop {
            let x1 = self.value() * 2.0 - 1.0;
            let x2 = self.value() * 2.0 - 1.0;
            let w = x1 * x1 + x2 * x2;
            if w > 0.0 && w < 1.0 {
                break (x1, x2, w);
            }
        };
        let scale = (-2.0 * w.ln() / w).sqrt();
        self.next_gaussian = Some(x2 * scale);
        mean + standard_deviation * x1 * scale
    }

    /// Standard normal sample.
    pub fn standard_gaussian(&mut self) -> f32 {
        self.gaussian(0.0, 1.0)
    }

    pub fn on_circle(&mut self, radius: f32) -> Vector2<f32> {
        let theta = self.value() * TAU;
        Vector2::new(radius * theta.cos(), radius * theta.sin())
    }

    /// Uniformly distributed point within the disc of `radius`.
    pub fn inside_circle(&mut self, radius: f32) -> Vector2<f32> {
        let direction = self.on_circle(1.0);
        let r = radius * self.value().sqrt();
        direction * r
    }

    pub fn on_sphere(&mut self, radius: f32) -> Vector3<f32> {
        let phi = self.value() * TAU;
        let theta = (self.value() * 2.0 - 1.0).acos();
        Vector3::new(
            radius * theta.sin() * phi.cos(),
            radius * theta.sin() * phi.sin(),
            radius * theta.cos(),
        )
    }

    /// Uniformly distributed point within the ball of `radius`.
    pub fn inside_sphere(&mut self, radius: f32) -> Vector3<f32> {
        let direction = self.on_sphere(1.0);
        let r = radius * self.value().cbrt();
        direction * r
    }

    /// Uniformly distributed unit quaternion.
    pub fn quaternion(&mut self) -> Quaternion<f32> {
        let u1 = self.value();
        let sq1 = (1.0 - u1).sqrt();
        let sq2 = u1.sqrt();
        let theta1 = TAU * self.value();
        let theta2 = TAU * self.value();
        Quaternion::new(
            theta2.cos() * sq2,
            theta1.sin() * sq1,
            theta1.cos() * sq1,
            theta2.sin() * sq2,
        )
    }

    pub fn noise2d(&self, x: f32, y: f32, frequency: f32, amplitude: f32) -> f32 {
        amplitude * self.noise.noise2(x * frequency, y * frequency)
    }

    pub fn noise3d(&self, x: f32, y: f32, z: f32, frequency: f32, amplitude: f32) -> f32 {
        amplitude * self.noise.noise3(x * frequency, y * frequency, z * frequency)
    }

    pub fn noise4d(&self, x: f32, y: f32, z: f32, w: f32, frequency: f32, amplitude: f32) -> f32 {
        amplitude
            * self
                .noise
                .noise4(x * frequency, y * frequency, z * frequency, w * frequency)
    }
}

impl Default for Random {
    fn default() -> Self {
        Self::from_entropy()
    }
}
