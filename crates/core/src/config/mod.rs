use serde::{Deserialize, Serialize};

use crate::animator;
use crate::color::Color;
use crate::error::{PulseVizError, Result};
use crate::layout::MIN_UNITS;

/// One atomic snapshot of every tunable the renderer reads.
///
/// The host re-pulls all values on each settings-change notification and
/// hands the whole snapshot to [`crate::SolidLineRenderer::apply_config`];
/// nothing is cached beyond the snapshot currently applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    /// Number of bars, one per frequency bin.
    pub units: usize,
    /// Integer scale applied to dB magnitude before converting it to a pixel
    /// extension length.
    pub fuzz_factor: i32,
    /// Alpha of the white multiply overlay that fades trailing bar edges.
    pub fade_opacity: u8,
    /// Static paint color when no other source wins.
    pub base_color: Color,
    /// Host accent color, authoritative when `accent_color_enabled`.
    pub accent_color: Color,
    pub accent_color_enabled: bool,
    /// Derive the paint color from album art when available.
    pub auto_color: bool,
    pub lava_lamp_enabled: bool,
    pub lava_lamp_from: Color,
    pub lava_lamp_to: Color,
    /// Duration of one lava-lamp leg in milliseconds.
    pub lava_lamp_duration_ms: u32,
    pub smoothing_enabled: bool,
    /// Anchor vertical bars on the left edge instead of the right.
    pub left_in_landscape: bool,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            units: 64,
            fuzz_factor: 5,
            fade_opacity: 200,
            base_color: Color::WHITE,
            accent_color: Color(0xFF44_8AFF),
            accent_color_enabled: false,
            auto_color: false,
            lava_lamp_enabled: true,
            lava_lamp_from: Color(0xFFFF_8080),
            lava_lamp_to: Color(0xFF80_80FF),
            lava_lamp_duration_ms: animator::DEFAULT_DURATION_MS,
            smoothing_enabled: false,
            left_in_landscape: false,
        }
    }
}

impl RendererConfig {
    /// Returns a copy with every value forced into its usable range:
    /// the unit count is clamped to at least [`MIN_UNITS`], negative fuzz
    /// factors become zero and the lava lamp is forced off while auto color
    /// is on. Out-of-range inputs are reported via tracing, never as errors.
    pub fn sanitized(&self) -> Self {
        let mut config = self.clone();
        if config.units < MIN_UNITS {
            tracing::warn!(units = config.units, "clamping unit count to minimum");
            config.units = MIN_UNITS;
        }
        if config.fuzz_factor < 0 {
            tracing::warn!(fuzz_factor = config.fuzz_factor, "clamping fuzz factor to zero");
            config.fuzz_factor = 0;
        }
        if config.auto_color {
            config.lava_lamp_enabled = false;
        }
        config
    }

    /// Parses a snapshot from a JSON document. Missing fields take their
    /// defaults; a malformed document is an [`PulseVizError::InvalidConfiguration`].
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|err| PulseVizError::invalid_config(format!("bad config JSON: {err}")))
    }

    /// Serialises the snapshot as pretty-printed JSON.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// The white overlay color used for the fade pass.
    pub fn fade_color(&self) -> Color {
        Color::argb(self.fade_opacity, 255, 255, 255)
    }
}
