//! Sketch configuration.
//!
//! Each sketch declares a [`SketchSettings`] next to its setup function. The
//! runner reads it to size the surface, decide whether to animate and seed
//! the shared random source.

use anyhow::{bail, ensure};

/// Physical paper formats, in inches (portrait).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PaperSize {
    Letter,
    Legal,
    Tabloid,
    A3,
    A4,
    A5,
    Postcard,
}

impl PaperSize {
    pub fn inches(&self) -> (f32, f32) {
        const MM: f32 = 1.0 / 25.4;
        match self {
            PaperSize::Letter => (8.5, 11.0),
            PaperSize::Legal => (8.5, 14.0),
            PaperSize::Tabloid => (11.0, 17.0),
            PaperSize::A3 => (297.0 * MM, 420.0 * MM),
            PaperSize::A4 => (210.0 * MM, 297.0 * MM),
            PaperSize::A5 => (148.0 * MM, 210.0 * MM),
            PaperSize::Postcard => (4.0, 6.0),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PaperOrientation {
    #[default]
    Portrait,
    Landscape,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Dimensions {
    /// Fill whatever surface the runner provides.
    #[default]
    Window,
    Pixels(u32, u32),
    Paper(PaperSize, PaperOrientation),
}

/// The kind of drawing context a sketch asks for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ContextKind {
    Canvas2d,
    #[default]
    Gpu,
}

/// Backend creation flags.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Attributes {
    /// 4x multisampling.
    pub antialias: bool,
}

impl Default for Attributes {
    fn default() -> Self {
        Self { antialias: true }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SketchSettings {
    pub name: &'static str,
    pub dimensions: Dimensions,
    pub context: ContextKind,
    pub attributes: Attributes,
    /// Render every frame instead of once per resize.
    pub animate: bool,
    /// Loop length in seconds, drives the playhead.
    pub duration: Option<f32>,
    /// Restart the playhead at 0 after `duration`.
    pub looping: bool,
    pub fps: u32,
    pub pixels_per_inch: f32,
    /// Fixed seed; a random one is drawn when unset.
    pub seed: Option<u64>,
}

impl Default for SketchSettings {
    fn default() -> Self {
        Self {
            name: "sketch",
            dimensions: Dimensions::Window,
            context: ContextKind::Gpu,
            attributes: Attributes::default(),
            animate: false,
            duration: None,
            looping: true,
            fps: 24,
            pixels_per_inch: 72.0,
            seed: None,
        }
    }
}

impl SketchSettings {
    /// A duration implies animation.
    pub fn is_animated(&self) -> bool {
        self.animate || self.duration.is_some()
    }

    /// Reject configurations no sketch can run with.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.context != ContextKind::Gpu {
            bail!(
                "sketch '{}' asks for a {:?} context, only GPU contexts are supported",
                self.name,
                self.context
            );
        }
        if let Some(duration) = self.duration {
            ensure!(
                duration > 0.0 && duration.is_finite(),
                "duration must be positive, got {}",
                duration
            );
        }
        ensure!(self.fps > 0, "fps must be positive");
        ensure!(
            self.pixels_per_inch > 0.0,
            "pixels_per_inch must be positive, got {}",
            self.pixels_per_inch
        );
        if let Dimensions::Pixels(w, h) = self.dimensions {
            ensure!(w > 0 && h > 0, "dimensions must be non-zero, got {}x{}", w, h);
        }
        Ok(())
    }

    /// Output size in pixels; `Window` sketches take the surface's size.
    pub fn pixel_size(&self, surface: (u32, u32)) -> (u32, u32) {
        match self.dimensions {
            Dimensions::Window => surface,
            Dimensions::Pixels(w, h) => (w, h),
            Dimensions::Paper(paper, orientation) => {
                let (w, h) = paper.inches();
                let (w, h) = match orientation {
                    PaperOrientation::Portrait => (w, h),
                    PaperOrientation::Landscape => (h, w),
                };
                (
                    (w * self.pixels_per_inch).round() as u32,
                    (h * self.pixels_per_inch).round() as u32,
                )
            }
        }
    }
}
