use serde::{Deserialize, Serialize};

/// Packed ARGB color with one byte per channel, alpha in the top byte.
///
/// The wire representation (settings snapshots, JSON presets) is the raw
/// `u32`, matching how hosts typically store colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(pub u32);

impl Color {
    pub const TRANSPARENT: Color = Color(0x0000_0000);
    pub const BLACK: Color = Color(0xFF00_0000);
    pub const WHITE: Color = Color(0xFFFF_FFFF);

    /// Builds a color from individual channel values.
    pub fn argb(a: u8, r: u8, g: u8, b: u8) -> Self {
        Color((a as u32) << 24 | (r as u32) << 16 | (g as u32) << 8 | b as u32)
    }

    pub fn alpha(self) -> u8 {
        (self.0 >> 24) as u8
    }

    pub fn red(self) -> u8 {
        (self.0 >> 16) as u8
    }

    pub fn green(self) -> u8 {
        (self.0 >> 8) as u8
    }

    pub fn blue(self) -> u8 {
        self.0 as u8
    }

    /// Component-wise linear interpolation in RGB space. `t` is clamped to
    /// `[0, 1]` and every channel stays within the valid 8-bit range.
    pub fn lerp(self, other: Color, t: f32) -> Color {
        let t = t.clamp(0.0, 1.0);
        let channel = |a: u8, b: u8| -> u8 {
            let value = a as f32 + (b as f32 - a as f32) * t;
            value.round().clamp(0.0, 255.0) as u8
        };
        Color::argb(
            channel(self.alpha(), other.alpha()),
            channel(self.red(), other.red()),
            channel(self.green(), other.green()),
            channel(self.blue(), other.blue()),
        )
    }

    /// WCAG relative luminance of the color, alpha ignored.
    pub fn relative_luminance(self) -> f32 {
        fn linearise(channel: u8) -> f32 {
            let c = channel as f32 / 255.0;
            if c <= 0.039_28 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        }
        0.2126 * linearise(self.red())
            + 0.7152 * linearise(self.green())
            + 0.0722 * linearise(self.blue())
    }
}

/// WCAG contrast ratio between two colors, always >= 1.
pub fn contrast_ratio(a: Color, b: Color) -> f32 {
    let la = a.relative_luminance();
    let lb = b.relative_luminance();
    let (lighter, darker) = if la >= lb { (la, lb) } else { (lb, la) };
    (lighter + 0.05) / (darker + 0.05)
}

/// Adjusts `color` until it reaches `min_ratio` contrast against
/// `background`, moving away from the background: colors are lightened over a
/// dark background and darkened over a light one.
///
/// A short binary search on the blend amount finds the smallest adjustment
/// that satisfies the ratio, so the hue shifts as little as possible. If even
/// the full blend cannot reach the ratio the fully blended color is returned.
pub fn ensure_contrast(color: Color, background: Color, min_ratio: f32) -> Color {
    if contrast_ratio(color, background) >= min_ratio {
        return color;
    }

    let anchor = if background.relative_luminance() < 0.5 {
        Color::WHITE
    } else {
        Color::BLACK
    };

    let mut low = 0.0_f32;
    let mut high = 1.0_f32;
    let mut best = color.lerp(anchor, 1.0);
    for _ in 0..12 {
        let mid = (low + high) * 0.5;
        let candidate = color.lerp(anchor, mid);
        if contrast_ratio(candidate, background) >= min_ratio {
            best = candidate;
            high = mid;
        } else {
            low = mid;
        }
    }
    best
}
