//! Label color derivation.
//!
//! Colors are never stored with labels. Every label gets a slot on the hue
//! wheel from its position in the label set, so the mapping is recomputed
//! whenever the set changes.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::constants::palette;
use crate::model::LabelSet;

/// An RGB color with 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Color drawn for labels missing from the color map.
    pub const fn neutral() -> Self {
        let [r, g, b] = palette::NEUTRAL;
        Self { r, g, b }
    }

    /// CSS hex notation, e.g. `#ff8000`.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Fixed saturation and lightness shared by all label colors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    pub saturation: f32,
    pub lightness: f32,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            saturation: palette::SATURATION,
            lightness: palette::LIGHTNESS,
        }
    }
}

/// Convert HSL to RGB.
///
/// # Arguments
/// * `h` - Hue in degrees (0-360)
/// * `s` - Saturation (0.0-1.0)
/// * `l` - Lightness (0.0-1.0)
///
/// # Returns
/// RGB tuple with values in range 0.0-1.0
pub fn hsl_to_rgb(h: f32, s: f32, l: f32) -> (f32, f32, f32) {
    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = l - c / 2.0;

    let (r, g, b) = if h < 60.0 {
        (c, x, 0.0)
    } else if h < 120.0 {
        (x, c, 0.0)
    } else if h < 180.0 {
        (0.0, c, x)
    } else if h < 240.0 {
        (0.0, x, c)
    } else if h < 300.0 {
        (x, 0.0, c)
    } else {
        (c, 0.0, x)
    };

    (r + m, g + m, b + m)
}

fn channel(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Hue in degrees for the label at `index` of `total`, spread evenly around
/// the wheel. Distinct for every index below `total`; `None` when `total == 0`.
pub fn unique_hue(index: usize, total: usize) -> Option<f32> {
    if total == 0 {
        return None;
    }
    Some((index % total) as f32 / total as f32 * 360.0)
}

/// Color for the label at `index` in a set of `total` labels.
///
/// `total == 0` has no slots and yields the neutral color. Colors are
/// quantized to 8 bits per channel, so with the default palette they stop
/// being pairwise distinct past roughly 1200 labels; use [`unique_hue`] to
/// tell labels apart beyond that.
pub fn unique_color(index: usize, total: usize, palette: &Palette) -> Color {
    let Some(hue) = unique_hue(index, total) else {
        return Color::neutral();
    };
    let (r, g, b) = hsl_to_rgb(hue, palette.saturation, palette.lightness);
    Color::rgb(channel(r), channel(g), channel(b))
}

/// Label name to color lookup for one label set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColorMap {
    colors: HashMap<String, Color>,
}

impl ColorMap {
    /// Derive colors for every label in the set.
    pub fn from_labels(labels: &LabelSet, palette: &Palette) -> Self {
        let total = labels.len();
        let colors = labels
            .iter()
            .enumerate()
            .map(|(i, label)| (label.to_string(), unique_color(i, total, palette)))
            .collect();
        Self { colors }
    }

    /// Color for `label`, or the neutral color if the label is unknown.
    pub fn color_for(&self, label: &str) -> Color {
        self.colors.get(label).copied().unwrap_or_else(Color::neutral)
    }

    pub fn get(&self, label: &str) -> Option<Color> {
        self.colors.get(label).copied()
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}
