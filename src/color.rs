//! Colors and palettes.
//!
//! Sketch colors are authored in sRGB (hex strings, CSS-style names or HSL) and
//! converted to linear space only when they are handed to the GPU.

use anyhow::{Context as _, bail};

/// An sRGB color with components in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rgb`, `#rrggbb` or one of the few named colors the sketches use.
    pub fn parse(value: &str) -> anyhow::Result<Self> {
        let value = value.trim();
        if let Some(named) = Self::named(value) {
            return Ok(named);
        }
        let hex = value
            .strip_prefix('#')
            .with_context(|| format!("'{}' is neither a hex color nor a known name", value))?;
        let expanded: String = match hex.len() {
            3 => hex.chars().flat_map(|c| [c, c]).collect(),
            6 => hex.to_string(),
            _ => bail!("hex color '{}' must have 3 or 6 digits", value),
        };
        let channel = |i: usize| -> anyhow::Result<f32> {
            let byte = u8::from_str_radix(&expanded[i..i + 2], 16)
                .with_context(|| format!("invalid hex digits in '{}'", value))?;
            Ok(byte as f32 / 255.0)
        };
        Ok(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    fn named(name: &str) -> Option<Self> {
        let color = match name.to_ascii_lowercase().as_str() {
            "black" => Self::BLACK,
            "white" => Self::WHITE,
            "pink" => Self::rgb(1.0, 192.0 / 255.0, 203.0 / 255.0),
            "tomato" => Self::rgb(1.0, 99.0 / 255.0, 71.0 / 255.0),
            _ => return None,
        };
        Some(color)
    }

    /// Build a color from hue (degrees), saturation and lightness (both `[0, 1]`).
    pub fn hsl(hue: f32, saturation: f32, lightness: f32) -> Self {
        let h = hue.rem_euclid(360.0) / 360.0;
        if saturation <= 0.0 {
            return Self::rgb(lightness, lightness, lightness);
        }
        let q = if lightness < 0.5 {
            lightness * (1.0 + saturation)
        } else {
            lightness + saturation - lightness * saturation
        };
        let p = 2.0 * lightness - q;
        let hue_to_rgb = |mut t: f32| {
            if t < 0.0 {
                t += 1.0;
            }
            if t > 1.0 {
                t -= 1.0;
            }
            if t < 1.0 / 6.0 {
                p + (q - p) * 6.0 * t
            } else if t < 0.5 {
                q
            } else if t < 2.0 / 3.0 {
                p + (q - p) * (2.0 / 3.0 - t) * 6.0
            } else {
                p
            }
        };
        Self::rgb(
            hue_to_rgb(h + 1.0 / 3.0),
            hue_to_rgb(h),
            hue_to_rgb(h - 1.0 / 3.0),
        )
    }

    /// Component-wise linear interpolation, `t = 0` yields `self`.
    pub fn mix(&self, other: &Color, t: f32) -> Color {
        Color::rgb(
            self.r + (other.r - self.r) * t,
            self.g + (other.g - self.g) * t,
            self.b + (other.b - self.b) * t,
        )
    }

    pub fn to_linear(&self) -> [f32; 3] {
        let convert = |c: f32| {
            if c <= 0.04045 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        };
        [convert(self.r), convert(self.g), convert(self.b)]
    }

    pub fn to_array(&self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

impl From<Color> for wgpu::Color {
    fn from(color: Color) -> Self {
        let [r, g, b] = color.to_linear();
        wgpu::Color {
            r: r as f64,
            g: g as f64,
            b: b as f64,
            a: 1.0,
        }
    }
}

/// A named ink or paper color.
#[derive(Clone, Copy, Debug)]
pub struct Swatch {
    pub name: &'static str,
    pub hex: &'static str,
}

impl Swatch {
    pub fn color(&self) -> Color {
        // Palette data is static and validated by the palette tests.
        Color::parse(self.hex).unwrap_or(Color::BLACK)
    }
}

/// Risograph ink colors.
pub const RISO_COLORS: &[Swatch] = &[
    Swatch { name: "Black", hex: "#000000" },
    Swatch { name: "Burgundy", hex: "#914e72" },
    Swatch { name: "Blue", hex: "#0078bf" },
    Swatch { name: "Green", hex: "#00a95c" },
    Swatch { name: "Medium Blue", hex: "#3255a4" },
    Swatch { name: "Bright Red", hex: "#f15060" },
    Swatch { name: "Risofederal Blue", hex: "#3d5588" },
    Swatch { name: "Purple", hex: "#765ba7" },
    Swatch { name: "Teal", hex: "#00838a" },
    Swatch { name: "Flat Gold", hex: "#bb8b41" },
    Swatch { name: "Hunter Green", hex: "#407060" },
    Swatch { name: "Red", hex: "#ff665e" },
    Swatch { name: "Brown", hex: "#925f52" },
    Swatch { name: "Yellow", hex: "#ffe800" },
    Swatch { name: "Marine Red", hex: "#d2515e" },
    Swatch { name: "Orange", hex: "#ff6c2f" },
    Swatch { name: "Fluorescent Pink", hex: "#ff48b0" },
    Swatch { name: "Light Gray", hex: "#88898a" },
    Swatch { name: "Metallic Gold", hex: "#ac936e" },
    Swatch { name: "Crimson", hex: "#e45d50" },
    Swatch { name: "Fluorescent Orange", hex: "#ff7477" },
    Swatch { name: "Cornflower", hex: "#62a8e5" },
    Swatch { name: "Sky Blue", hex: "#4982cf" },
    Swatch { name: "Sea Blue", hex: "#0074a2" },
    Swatch { name: "Lake", hex: "#235ba8" },
    Swatch { name: "Indigo", hex: "#484d7a" },
    Swatch { name: "Midnight", hex: "#435060" },
    Swatch { name: "Mist", hex: "#d5e4c0" },
    Swatch { name: "Granite", hex: "#a5aaa8" },
    Swatch { name: "Charcoal", hex: "#70747c" },
    Swatch { name: "Smoky Teal", hex: "#5f8289" },
    Swatch { name: "Steel", hex: "#375e77" },
    Swatch { name: "Slate", hex: "#5e695e" },
    Swatch { name: "Turquoise", hex: "#00aa93" },
    Swatch { name: "Emerald", hex: "#19975d" },
    Swatch { name: "Grass", hex: "#397e58" },
    Swatch { name: "Forest", hex: "#516e5a" },
    Swatch { name: "Spruce", hex: "#4a635d" },
    Swatch { name: "Moss", hex: "#68724d" },
    Swatch { name: "Sea Foam", hex: "#62c2b1" },
    Swatch { name: "Kelly Green", hex: "#67b346" },
    Swatch { name: "Light Teal", hex: "#009da5" },
    Swatch { name: "Ivy", hex: "#169b62" },
    Swatch { name: "Pine", hex: "#237e74" },
    Swatch { name: "Lagoon", hex: "#2f6165" },
    Swatch { name: "Violet", hex: "#9d7ad2" },
    Swatch { name: "Orchid", hex: "#aa60bf" },
    Swatch { name: "Plum", hex: "#845991" },
    Swatch { name: "Raisin", hex: "#775d7a" },
    Swatch { name: "Grape", hex: "#6c5d80" },
    Swatch { name: "Scarlet", hex: "#f65058" },
    Swatch { name: "Tomato", hex: "#d2515e" },
    Swatch { name: "Cranberry", hex: "#d1517a" },
    Swatch { name: "Maroon", hex: "#9e4c6e" },
    Swatch { name: "Brick", hex: "#a75154" },
    Swatch { name: "Bright Olive Green", hex: "#b49f29" },
    Swatch { name: "Sunflower", hex: "#ffb511" },
    Swatch { name: "Melon", hex: "#ffae3b" },
    Swatch { name: "Apricot", hex: "#f6a04d" },
    Swatch { name: "Paprika", hex: "#ee7f4b" },
    Swatch { name: "Pumpkin", hex: "#ff6f4c" },
    Swatch { name: "Bright Gold", hex: "#ba8032" },
    Swatch { name: "Copper", hex: "#bd6439" },
    Swatch { name: "Mahogany", hex: "#8e595a" },
    Swatch { name: "Bisque", hex: "#f2cdcf" },
    Swatch { name: "Bubble Gum", hex: "#f984ca" },
    Swatch { name: "Light Mauve", hex: "#e6b5c9" },
    Swatch { name: "Dark Mauve", hex: "#bd8ca6" },
    Swatch { name: "Wine", hex: "#914e72" },
    Swatch { name: "Gray", hex: "#928d88" },
    Swatch { name: "Coral", hex: "#ff8e91" },
    Swatch { name: "White", hex: "#ffffff" },
    Swatch { name: "Aqua", hex: "#5ec8e5" },
    Swatch { name: "Mint", hex: "#82d8d5" },
    Swatch { name: "Fluorescent Yellow", hex: "#ffe916" },
    Swatch { name: "Fluorescent Red", hex: "#ff4c65" },
    Swatch { name: "Fluorescent Green", hex: "#44d62c" },
];

/// Uncoated and colored paper stocks, used as backgrounds.
pub const PAPER_COLORS: &[Swatch] = &[
    Swatch { name: "Natural", hex: "#f4efe1" },
    Swatch { name: "Bright White", hex: "#f6f6f2" },
    Swatch { name: "Cream", hex: "#f6ecd2" },
    Swatch { name: "Ivory", hex: "#f3ecd9" },
    Swatch { name: "Newsprint", hex: "#e9e4d6" },
    Swatch { name: "Kraft", hex: "#c8a97e" },
    Swatch { name: "Pale Pink", hex: "#f5d9d5" },
    Swatch { name: "Blush", hex: "#f0c9c0" },
    Swatch { name: "Canary", hex: "#f7e7a1" },
    Swatch { name: "Lemon", hex: "#f7eb8f" },
    Swatch { name: "Sky", hex: "#cfe2ea" },
    Swatch { name: "Powder Blue", hex: "#bfd5e3" },
    Swatch { name: "Mint Green", hex: "#d4e8d4" },
    Swatch { name: "Sage", hex: "#c8d3b9" },
    Swatch { name: "Lavender", hex: "#ddd3e6" },
    Swatch { name: "Peach", hex: "#f7d6b9" },
    Swatch { name: "Stone", hex: "#d8d3c8" },
    Swatch { name: "Silver Gray", hex: "#cfcfcb" },
    Swatch { name: "Charcoal", hex: "#3f3f3d" },
    Swatch { name: "Midnight Black", hex: "#1e1e1f" },
];
