//! Gradient and noise shading.
//!
//! The sketch shader runs these two effects on the GPU. The gradient curve
//! here is the shader's curve exactly. The noise displacement applies the
//! shader's formula to the seeded field of [`crate::noise`], while the shader
//! samples its own unseeded simplex noise, so baked and animated fields share
//! their amplitude and frequency but not their values.

use cgmath::{InnerSpace, Vector3};

use crate::{color::Color, noise::SimplexNoise};

/// WGSL source of the one shader every sketch pipeline is built from.
pub const SKETCH_SHADER: &str = include_str!("shaders/sketch.wgsl");

/// Interpolation factor of the power-curve gradient: `u^(power * u)`.
///
/// `u` is clamped to `[0, 1]`; `gradient_factor(0, p) == 0` and
/// `gradient_factor(1, p) == 1` for every positive `power`. Between them the
/// curve dips to `e^(-power / e)` at `u = 1/e` and rises monotonically after.
pub fn gradient_factor(u: f32, power: f32) -> f32 {
    let u = u.clamp(0.0, 1.0);
    if u <= 0.0 {
        return 0.0;
    }
    u.powf(power * u)
}

/// Mix from `background` (at `u = 0`) to `color` (at `u = 1`) along the curve.
pub fn gradient_color(u: f32, power: f32, background: Color, color: Color) -> Color {
    background.mix(&color, gradient_factor(u, power))
}

/// Direction a noise displacement pushes vertices in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DisplaceAlong {
    Normal,
    AxisZ,
}

/// Which attribute seeds the noise lookup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoiseSource {
    Position,
    BasePosition,
}

/// Parameters of `noise4D(source * frequency, time * speed) * amplitude`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NoiseDisplacement {
    pub frequency: f32,
    pub speed: f32,
    pub amplitude: f32,
    /// Remap noise from `[-1, 1]` to `[0, 1]` before scaling.
    pub unsigned: bool,
    pub along: DisplaceAlong,
    pub source: NoiseSource,
}

impl Default for NoiseDisplacement {
    fn default() -> Self {
        Self {
            frequency: 1.0,
            speed: 1.0,
            amplitude: 1.0,
            unsigned: false,
            along: DisplaceAlong::Normal,
            source: NoiseSource::Position,
        }
    }
}

impl NoiseDisplacement {
    /// Signed displacement magnitude for one vertex; never exceeds `amplitude`
    /// in absolute value.
    pub fn offset(&self, noise: &SimplexNoise, source: Vector3<f32>, time: f32) -> f32 {
        let p = source * self.frequency;
        let n = noise.noise4(p.x, p.y, p.z, time * self.speed).clamp(-1.0, 1.0);
        let n = if self.unsigned { n * 0.5 + 0.5 } else { n };
        n * self.amplitude
    }

    /// Displaced position of one vertex.
    pub fn displace(
        &self,
        noise: &SimplexNoise,
        position: Vector3<f32>,
        normal: Vector3<f32>,
        base_position: Vector3<f32>,
        time: f32,
    ) -> Vector3<f32> {
        let source = match self.source {
            NoiseSource::Position => position,
            NoiseSource::BasePosition => base_position,
        };
        let offset = self.offset(noise, source, time);
        let direction = match self.along {
            DisplaceAlong::Normal if normal.magnitude2() > 0.0 => normal.normalize(),
            DisplaceAlong::Normal => Vector3::new(0.0, 0.0, 0.0),
            DisplaceAlong::AxisZ => Vector3::unit_z(),
        };
        position + direction * offset
    }
}
