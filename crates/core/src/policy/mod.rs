use crate::color::{self, Color};
use crate::config::RendererConfig;
use crate::error::{PulseVizError, Result};

/// Minimum contrast ratio the album-art color must reach against both the
/// dark and the light reference before it is allowed onto the paint.
pub const MIN_CONTRAST_RATIO: f32 = 2.0;

/// The color source currently authoritative for the paint.
///
/// Precedence is fixed: accent beats everything, album art beats the lava
/// lamp, the lava lamp beats the static base color. Encoding the outcome as
/// a tagged enum keeps the decision in one place instead of scattering
/// flag checks whose order silently matters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSource {
    Accent,
    AlbumArt,
    LavaLamp,
    Static,
}

/// Resolves the active color source for a config snapshot and the currently
/// cached album color.
pub fn resolve(config: &RendererConfig, album_color: Option<Color>) -> ColorSource {
    if config.accent_color_enabled {
        ColorSource::Accent
    } else if config.auto_color {
        // Auto color force-disables the lava lamp even when both are set;
        // without a usable album color it degrades to the static fallback.
        if album_color.is_some() {
            ColorSource::AlbumArt
        } else {
            ColorSource::Static
        }
    } else if config.lava_lamp_enabled {
        ColorSource::LavaLamp
    } else {
        ColorSource::Static
    }
}

/// The non-animated color for the resolved source. [`ColorSource::LavaLamp`]
/// has no static value of its own; callers use this as the color to restore
/// when the animator stops, so it falls through to the same precedence with
/// the lamp ignored.
pub fn static_color(config: &RendererConfig, album_color: Option<Color>) -> Color {
    match resolve(config, album_color) {
        ColorSource::Accent => config.accent_color,
        ColorSource::AlbumArt => album_color.unwrap_or(config.base_color),
        ColorSource::LavaLamp | ColorSource::Static => config.base_color,
    }
}

/// Derives one paint-ready color from an album-art palette.
///
/// The first palette entry is adjusted in two sequential passes so it keeps
/// an acceptable contrast first against a dark surface, then against a light
/// one. Non-colorized media clears the cached color (`None` sentinel); a
/// colorized claim with an empty palette is a [`PulseVizError::ColorResolution`].
pub fn derive_album_color(colorized_media: bool, palette: &[Color]) -> Result<Option<Color>> {
    if !colorized_media {
        return Ok(None);
    }
    let Some(&candidate) = palette.first() else {
        return Err(PulseVizError::ColorResolution(
            "colorized media supplied an empty palette",
        ));
    };
    let against_dark = color::ensure_contrast(candidate, Color::BLACK, MIN_CONTRAST_RATIO);
    let against_light = color::ensure_contrast(against_dark, Color::WHITE, MIN_CONTRAST_RATIO);
    Ok(Some(against_light))
}
