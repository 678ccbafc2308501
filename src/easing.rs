//! Easing curves on `t ∈ [0, 1]`.

pub fn linear(t: f32) -> f32 {
    t.clamp(0.0, 1.0)
}

pub fn ease_out_expo(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t >= 1.0 { 1.0 } else { 1.0 - 2f32.powf(-10.0 * t) }
}

pub fn ease_in_expo(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t <= 0.0 { 0.0 } else { 2f32.powf(10.0 * (t - 1.0)) }
}

pub fn ease_in_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        let f = -2.0 * t + 2.0;
        1.0 - f * f * f / 2.0
    }
}

/// Named easing curve, so tween descriptions stay plain data.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Easing {
    Linear,
    ExpoOut,
    ExpoIn,
    CubicInOut,
}

impl Easing {
    pub fn apply(&self, t: f32) -> f32 {
        match self {
            Easing::Linear => linear(t),
            Easing::ExpoOut => ease_out_expo(t),
            Easing::ExpoIn => ease_in_expo(t),
            Easing::CubicInOut => ease_in_out_cubic(t),
        }
    }
}
