//! Material descriptors.
//!
//! A [`Material`] is plain data: which shading effect to run, its uniforms and
//! the raster state (culling, wireframe, blending). The renderer turns it into
//! a [`MaterialUniform`] and picks a pipeline from its raster state.

use anyhow::bail;

use crate::{color::Color, shading::NoiseDisplacement};

/// Which faces are rasterized.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Side {
    #[default]
    Front,
    Double,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Shading {
    /// Flat color.
    Basic { color: Color },
    /// `mix(background, color, pow(v, power * v))` along the UV `v` axis.
    Gradient {
        color: Color,
        background: Color,
        power: f32,
    },
    /// Per-vertex colors, unlit.
    VertexColors,
    /// Flat color on geometry displaced by animated 4D noise.
    NoiseDisplace {
        color: Color,
        displacement: NoiseDisplacement,
    },
}

/// A uniform value addressed by name.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Uniform {
    Float(f32),
    Color(Color),
}

impl From<f32> for Uniform {
    fn from(value: f32) -> Self {
        Uniform::Float(value)
    }
}

impl From<Color> for Uniform {
    fn from(value: Color) -> Self {
        Uniform::Color(value)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    pub shading: Shading,
    pub side: Side,
    /// Draw the unique edges as lines instead of filled triangles.
    pub wireframe: bool,
    pub transparent: bool,
    pub opacity: f32,
    pub time: f32,
}

impl Material {
    fn with_shading(shading: Shading) -> Self {
        Self {
            shading,
            side: Side::Front,
            wireframe: false,
            transparent: false,
            opacity: 1.0,
            time: 0.0,
        }
    }

    pub fn basic(color: Color) -> Self {
        Self::with_shading(Shading::Basic { color })
    }

    pub fn gradient(color: Color, background: Color, power: f32) -> Self {
        Self::with_shading(Shading::Gradient {
            color,
            background,
            power,
        })
    }

    pub fn vertex_colors() -> Self {
        Self::with_shading(Shading::VertexColors)
    }

    pub fn noise_displace(color: Color, displacement: NoiseDisplacement) -> Self {
        Self::with_shading(Shading::NoiseDisplace {
            color,
            displacement,
        })
    }

    pub fn double_sided(mut self) -> Self {
        self.side = Side::Double;
        self
    }

    pub fn wireframe(mut self) -> Self {
        self.wireframe = true;
        self
    }

    pub fn transparent(mut self, opacity: f32) -> Self {
        self.transparent = true;
        self.opacity = opacity;
        self
    }

    /// Set a uniform by its shader name: `color`, `background`, `power`,
    /// `time`, `opacity`, `frequency`, `speed` or `amplitude`.
    pub fn set_uniform(&mut self, name: &str, value: impl Into<Uniform>) -> anyhow::Result<()> {
        let value = value.into();
        match (name, value) {
            ("time", Uniform::Float(v)) => self.time = v,
            ("opacity", Uniform::Float(v)) => self.opacity = v,
            ("color", Uniform::Color(c)) => match &mut self.shading {
                Shading::Basic { color }
                | Shading::Gradient { color, .. }
                | Shading::NoiseDisplace { color, .. } => *color = c,
                Shading::VertexColors => bail!("vertex-color materials have no 'color' uniform"),
            },
            ("background", Uniform::Color(c)) => match &mut self.shading {
                Shading::Gradient { background, .. } => *background = c,
                _ => bail!("only gradient materials have a 'background' uniform"),
            },
            ("power", Uniform::Float(v)) => match &mut self.shading {
                Shading::Gradient { power, .. } => *power = v,
                _ => bail!("only gradient materials have a 'power' uniform"),
            },
            ("frequency" | "speed" | "amplitude", Uniform::Float(v)) => match &mut self.shading {
                Shading::NoiseDisplace { displacement, .. } => match name {
                    "frequency" => displacement.frequency = v,
                    "speed" => displacement.speed = v,
                    _ => displacement.amplitude = v,
                },
                _ => bail!("only noise materials have a '{}' uniform", name),
            },
            (name, value) => bail!("no uniform '{}' accepting {:?}", name, value),
        }
        Ok(())
    }

    pub fn uniform(&self, name: &str) -> Option<Uniform> {
        let value = match (name, &self.shading) {
            ("time", _) => Uniform::Float(self.time),
            ("opacity", _) => Uniform::Float(self.opacity),
            ("color", Shading::Basic { color })
            | ("color", Shading::Gradient { color, .. })
            | ("color", Shading::NoiseDisplace { color, .. }) => Uniform::Color(*color),
            ("background", Shading::Gradient { background, .. }) => Uniform::Color(*background),
            ("power", Shading::Gradient { power, .. }) => Uniform::Float(*power),
            ("frequency", Shading::NoiseDisplace { displacement, .. }) => {
                Uniform::Float(displacement.frequency)
            }
            ("speed", Shading::NoiseDisplace { displacement, .. }) => {
                Uniform::Float(displacement.speed)
            }
            ("amplitude", Shading::NoiseDisplace { displacement, .. }) => {
                Uniform::Float(displacement.amplitude)
            }
            _ => return None,
        };
        Some(value)
    }

    pub fn to_uniform(&self) -> MaterialUniform {
        let mut uniform = MaterialUniform {
            color: [1.0, 1.0, 1.0, self.opacity],
            background: [0.0, 0.0, 0.0, 1.0],
            params: [0.0, self.time, 0.0, 0.0],
            noise: [0.0; 4],
        };
        let with_alpha = |c: &Color| [c.r, c.g, c.b, self.opacity];
        match &self.shading {
            Shading::Basic { color } => {
                uniform.color = with_alpha(color);
                uniform.params[2] = MaterialUniform::KIND_BASIC;
            }
            Shading::Gradient {
                color,
                background,
                power,
            } => {
                uniform.color = with_alpha(color);
                uniform.background = [background.r, background.g, background.b, 1.0];
                uniform.params[0] = *power;
                uniform.params[2] = MaterialUniform::KIND_GRADIENT;
            }
            Shading::VertexColors => uniform.params[2] = MaterialUniform::KIND_VERTEX_COLORS,
            Shading::NoiseDisplace {
                color,
                displacement,
            } => {
                use crate::shading::{DisplaceAlong, NoiseSource};
                uniform.color = with_alpha(color);
                uniform.params[2] = MaterialUniform::KIND_NOISE;
                uniform.params[3] = match displacement.along {
                    DisplaceAlong::Normal => 0.0,
                    DisplaceAlong::AxisZ => 1.0,
                };
                let mut flags = 0.0;
                if displacement.unsigned {
                    flags += 1.0;
                }
                if displacement.source == NoiseSource::BasePosition {
                    flags += 2.0;
                }
                uniform.noise = [
                    displacement.frequency,
                    displacement.speed,
                    displacement.amplitude,
                    flags,
                ];
            }
        }
        uniform
    }
}

/// Material data as laid out in the shader's `Material` uniform block.
///
/// `params` = (power, time, kind, displace-along); `noise` = (frequency,
/// speed, amplitude, flags) where flag bit 0 remaps noise to `[0, 1]` and bit 1
/// reads the base position.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MaterialUniform {
    pub color: [f32; 4],
    pub background: [f32; 4],
    pub params: [f32; 4],
    pub noise: [f32; 4],
}

impl MaterialUniform {
    pub const KIND_BASIC: f32 = 0.0;
    pub const KIND_GRADIENT: f32 = 1.0;
    pub const KIND_VERTEX_COLORS: f32 = 2.0;
    pub const KIND_NOISE: f32 = 3.0;
}
