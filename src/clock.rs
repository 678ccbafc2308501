//! Frame timing handed to `render`.

/// Per-frame timing.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameParams {
    /// Seconds since the sketch started, never decreasing.
    pub time: f32,
    /// Seconds since the previous frame.
    pub delta: f32,
    /// Position in `[0, 1]` within `duration`; `0` without one.
    pub playhead: f32,
    pub frame: u64,
    pub duration: Option<f32>,
}

/// Viewport handed to `resize`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceParams {
    pub pixel_ratio: f32,
    pub viewport_width: u32,
    pub viewport_height: u32,
}

impl SurfaceParams {
    pub fn new(viewport_width: u32, viewport_height: u32) -> Self {
        Self {
            pixel_ratio: 1.0,
            viewport_width,
            viewport_height,
        }
    }

    pub fn aspect(&self) -> f32 {
        self.viewport_width.max(1) as f32 / self.viewport_height.max(1) as f32
    }
}

/// Accumulates frame deltas into [`FrameParams`].
#[derive(Clone, Debug)]
pub struct FrameClock {
    time: f32,
    frame: u64,
    duration: Option<f32>,
    looping: bool,
}

impl FrameClock {
    pub fn new(duration: Option<f32>, looping: bool) -> Self {
        Self {
            time: 0.0,
            frame: 0,
            duration,
            looping,
        }
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    /// Advance by `delta` seconds. Negative or non-finite deltas count as zero.
    pub fn advance(&mut self, delta: f32) -> FrameParams {
        let delta = if delta.is_finite() { delta.max(0.0) } else { 0.0 };
        self.time += delta;
        let params = FrameParams {
            time: self.time,
            delta,
            playhead: self.playhead(),
            frame: self.frame,
            duration: self.duration,
        };
        self.frame += 1;
        params
    }

    pub fn playhead(&self) -> f32 {
        match self.duration {
            Some(duration) if duration > 0.0 => {
                if self.looping {
                    (self.time % duration) / duration
                } else {
                    (self.time / duration).min(1.0)
                }
            }
            _ => 0.0,
        }
    }
}
