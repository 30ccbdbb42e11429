use crate::animator::{ColorAnimator, ColorEvent};
use crate::color::Color;
use crate::config::RendererConfig;
use crate::error::Result;
use crate::policy::{self, ColorSource};
use crate::render::{self, DrawCommand, RenderSurface};
use crate::spectrum::SpectrumAnimator;

/// The complete spectrum-to-geometry engine behind one visualizer surface.
///
/// Owns the shared points buffer (through [`SpectrumAnimator`]), the lava
/// lamp [`ColorAnimator`] and the current paint color, and implements every
/// boundary call the host issues. All methods run on the host's single
/// scheduler thread; the host drives `tick` then `draw` once per refresh
/// cycle and coalesces the redraws `tick` requests.
///
/// Recoverable conditions (malformed frames, empty palettes) are logged and
/// absorbed here; boundary calls never fail.
#[derive(Debug)]
pub struct SolidLineRenderer {
    config: RendererConfig,
    spectrum: SpectrumAnimator,
    lava_lamp: ColorAnimator,
    paint_color: Color,
    fade_color: Color,
    /// Color derived from the current album art, `None` when unset.
    album_color: Option<Color>,
    /// Last album color pushed to the host controller cache; consulted as a
    /// tie-break fallback when a new config snapshot arrives before art.
    last_color: Option<Color>,
    stream_valid: bool,
    width: f32,
    height: f32,
    needs_redraw: bool,
}

impl SolidLineRenderer {
    /// Builds a renderer from a config snapshot. The snapshot is sanitized
    /// first, so construction only fails on conditions sanitizing cannot
    /// repair; every later boundary call is infallible.
    pub fn new(config: RendererConfig) -> Result<Self> {
        let config = config.sanitized();
        let spectrum = SpectrumAnimator::new(
            0.0,
            0.0,
            config.units,
            config.left_in_landscape,
            config.smoothing_enabled,
            config.fuzz_factor,
        )?;
        let mut lava_lamp = ColorAnimator::new();
        lava_lamp.set_animation_colors(config.lava_lamp_from, config.lava_lamp_to);
        lava_lamp.set_animation_time(config.lava_lamp_duration_ms);
        let paint_color = policy::static_color(&config, None);
        let fade_color = config.fade_color();
        Ok(Self {
            config,
            spectrum,
            lava_lamp,
            paint_color,
            fade_color,
            album_color: None,
            last_color: None,
            stream_valid: false,
            width: 0.0,
            height: 0.0,
            needs_redraw: false,
        })
    }

    /// Surface geometry changed. Degenerate sizes are ignored, matching the
    /// host view which reports zero dimensions before its first layout.
    pub fn on_size_changed(&mut self, width: f32, height: f32) {
        if width <= 0.0 || height <= 0.0 {
            return;
        }
        self.width = width;
        self.height = height;
        if let Err(err) = self.spectrum.resize(width, height) {
            tracing::error!(%err, "layout recomputation failed");
            return;
        }
        self.needs_redraw = true;
    }

    /// Flips which edge vertical bars anchor on; re-runs the layout path.
    pub fn set_left_in_landscape(&mut self, left_in_landscape: bool) {
        if self.config.left_in_landscape == left_in_landscape {
            return;
        }
        self.config.left_in_landscape = left_in_landscape;
        self.reconfigure_spectrum();
        self.needs_redraw = true;
    }

    /// Upstream audio analysis validity toggled. Validity recomputes the
    /// layout and resumes the lava lamp if it is still the active source;
    /// invalidation stops the lamp so no cycles are spent on invisible
    /// output.
    pub fn on_stream_analyzed(&mut self, is_valid: bool) {
        self.stream_valid = is_valid;
        if is_valid {
            self.on_size_changed(self.width, self.height);
            if self.active_source() == ColorSource::LavaLamp {
                let event = self.lava_lamp.start();
                self.handle_color_event(event);
            }
        } else {
            let event = self.lava_lamp.stop();
            self.handle_color_event(event);
        }
    }

    /// Consumes one raw FFT frame. A frame too short for the configured
    /// unit count is skipped; the previous geometry keeps animating.
    pub fn on_fft_update(&mut self, frame: &[u8]) {
        if let Err(err) = self.spectrum.process_frame(frame) {
            tracing::warn!(%err, "skipping FFT frame");
        }
    }

    /// Album-art color ingestion. A failed derivation (empty palette on
    /// colorized media) clears the cached color instead of failing.
    pub fn set_colors(&mut self, colorized_media: bool, palette: &[Color]) {
        self.album_color = match policy::derive_album_color(colorized_media, palette) {
            Ok(color) => color,
            Err(err) => {
                tracing::warn!(%err, "treating media as uncolorized");
                None
            }
        };
        if self.config.auto_color && !self.config.lava_lamp_enabled {
            self.paint_color = self.album_color.unwrap_or(self.config.base_color);
            self.last_color = self.album_color;
            self.needs_redraw = true;
        }
    }

    /// Replaces the configuration snapshot atomically and re-derives all
    /// dependent state: buffers are reallocated on unit-count or smoothing
    /// changes, the lava lamp is reconfigured and started or stopped per
    /// the precedence rules, and the paint color is re-resolved.
    pub fn apply_config(&mut self, new_config: RendererConfig) {
        let config = new_config.sanitized();
        let buffers_stale = config.units != self.config.units
            || config.smoothing_enabled != self.config.smoothing_enabled
            || config.left_in_landscape != self.config.left_in_landscape;
        self.config = config;

        if buffers_stale {
            self.reconfigure_spectrum();
        }
        self.spectrum.set_fuzz_factor(self.config.fuzz_factor);
        self.fade_color = self.config.fade_color();
        self.lava_lamp
            .set_animation_colors(self.config.lava_lamp_from, self.config.lava_lamp_to);
        self.lava_lamp
            .set_animation_time(self.config.lava_lamp_duration_ms);

        if self.active_source() == ColorSource::LavaLamp && self.stream_valid {
            let event = self.lava_lamp.start();
            self.handle_color_event(event);
        } else {
            let event = self.lava_lamp.stop();
            self.handle_color_event(event);
            self.paint_color = policy::static_color(&self.config, self.cached_album_color());
        }
        self.needs_redraw = true;
    }

    /// Advances all animations by `delta_ms`. Returns whether the points
    /// buffer or the paint color changed, i.e. whether the host should
    /// schedule a redraw.
    pub fn tick(&mut self, delta_ms: f32) -> bool {
        let bars_moved = self.spectrum.tick(delta_ms);
        let event = self.lava_lamp.tick(delta_ms);
        self.handle_color_event(event);
        let redraw = bars_moved || self.needs_redraw;
        self.needs_redraw = false;
        redraw
    }

    /// Issues this frame's boundary draw: one batched line draw plus the
    /// fade overlay.
    pub fn draw<S: RenderSurface>(&self, surface: &mut S) {
        render::submit(
            surface,
            &DrawCommand {
                points: self.spectrum.points(),
                color: self.paint_color,
                stroke_width: self.spectrum.stroke_width(),
                fade_color: self.fade_color,
            },
        );
    }

    /// Releases everything the renderer drives. The host drops the value
    /// afterwards; the explicit call exists so the lava lamp and the per-bar
    /// drivers stop emitting before teardown completes.
    pub fn destroy(&mut self) {
        let event = self.lava_lamp.stop();
        self.handle_color_event(event);
        self.stream_valid = false;
        tracing::debug!("solid line renderer destroyed");
    }

    /// The color source currently authoritative per the precedence table.
    pub fn active_source(&self) -> ColorSource {
        policy::resolve(&self.config, self.cached_album_color())
    }

    pub fn paint_color(&self) -> Color {
        self.paint_color
    }

    /// The cached "last resolved color" the host controller would hold.
    pub fn last_resolved_color(&self) -> Option<Color> {
        self.last_color
    }

    pub fn points(&self) -> &[f32] {
        self.spectrum.points()
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    pub fn is_lava_lamp_running(&self) -> bool {
        self.lava_lamp.is_running()
    }

    fn cached_album_color(&self) -> Option<Color> {
        self.album_color.or(self.last_color)
    }

    fn reconfigure_spectrum(&mut self) {
        if let Err(err) = self.spectrum.reconfigure(
            self.config.units,
            self.config.left_in_landscape,
            self.config.smoothing_enabled,
        ) {
            tracing::error!(%err, "spectrum reconfiguration failed");
        }
    }

    fn handle_color_event(&mut self, event: Option<ColorEvent>) {
        match event {
            Some(ColorEvent::Started(color)) | Some(ColorEvent::ColorChanged(color)) => {
                self.paint_color = if self.config.accent_color_enabled {
                    self.config.accent_color
                } else {
                    color
                };
                self.needs_redraw = true;
            }
            Some(ColorEvent::Stopped(_)) => {
                self.paint_color =
                    policy::static_color(&self.config, self.cached_album_color());
                self.needs_redraw = true;
            }
            None => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::CollectingSurface;
    use crate::spectrum::{BAR_ANIMATION_MS, FRAME_HEADER_BYTES};

    fn frame(units: usize, re: u8, im: u8) -> Vec<u8> {
        let mut bytes = vec![0u8; units * 2 + FRAME_HEADER_BYTES];
        for i in 0..units {
            bytes[i * 2 + FRAME_HEADER_BYTES] = re;
            bytes[i * 2 + FRAME_HEADER_BYTES + 1] = im;
        }
        bytes
    }

    fn renderer(config: RendererConfig) -> SolidLineRenderer {
        let mut renderer = SolidLineRenderer::new(config).unwrap();
        renderer.on_size_changed(640.0, 96.0);
        renderer
    }

    #[test]
    fn accent_outranks_every_other_source() {
        let config = RendererConfig {
            accent_color_enabled: true,
            auto_color: true,
            lava_lamp_enabled: true,
            ..Default::default()
        };
        let mut renderer = renderer(config.clone());
        renderer.on_stream_analyzed(true);

        assert_eq!(renderer.active_source(), ColorSource::Accent);
        assert_eq!(renderer.paint_color(), config.accent_color);
        assert!(!renderer.is_lava_lamp_running());
    }

    #[test]
    fn stream_validity_gates_the_lava_lamp() {
        // Default config leaves the lava lamp as the active source.
        let mut renderer = renderer(RendererConfig::default());
        assert!(!renderer.is_lava_lamp_running());

        renderer.on_stream_analyzed(true);
        assert!(renderer.is_lava_lamp_running());

        renderer.on_stream_analyzed(false);
        assert!(!renderer.is_lava_lamp_running());
        assert_eq!(renderer.paint_color(), renderer.config().base_color);

        renderer.on_stream_analyzed(true);
        assert!(renderer.is_lava_lamp_running());
    }

    #[test]
    fn lava_ticks_move_the_paint_between_endpoints() {
        let mut renderer = renderer(RendererConfig::default());
        renderer.on_stream_analyzed(true);

        assert!(renderer.tick(2_500.0));
        let color = renderer.paint_color();
        let from = renderer.config().lava_lamp_from;
        let to = renderer.config().lava_lamp_to;
        let within = |c: u8, a: u8, b: u8| c >= a.min(b) && c <= a.max(b);
        assert!(within(color.red(), from.red(), to.red()));
        assert!(within(color.blue(), from.blue(), to.blue()));
    }

    #[test]
    fn unit_count_change_reallocates_and_cancels() {
        let mut renderer = renderer(RendererConfig::default());
        renderer.on_stream_analyzed(true);
        renderer.on_fft_update(&frame(64, 9, 9));
        assert_eq!(renderer.points().len(), 256);

        renderer.apply_config(RendererConfig {
            units: 32,
            ..RendererConfig::default()
        });
        assert_eq!(renderer.points().len(), 128);
        // Freshly laid out bars rest at the baseline before the next draw.
        for i in 0..32 {
            assert_eq!(renderer.points()[i * 4 + 1], 96.0);
        }
    }

    #[test]
    fn malformed_frames_are_skipped_without_losing_geometry() {
        let mut renderer = renderer(RendererConfig::default());
        renderer.on_fft_update(&frame(64, 6, 0));
        renderer.tick(BAR_ANIMATION_MS);
        let before = renderer.points().to_vec();

        renderer.on_fft_update(&[0u8; 3]);
        renderer.tick(BAR_ANIMATION_MS);
        assert_eq!(renderer.points(), &before[..]);
    }

    #[test]
    fn album_art_colors_the_paint_in_auto_mode() {
        let config = RendererConfig {
            auto_color: true,
            ..Default::default()
        };
        let mut renderer = renderer(config);

        renderer.set_colors(true, &[Color(0xFF20_6040)]);
        assert_eq!(renderer.active_source(), ColorSource::AlbumArt);
        let painted = renderer.paint_color();
        assert_ne!(painted, renderer.config().base_color);
        assert_eq!(renderer.last_resolved_color(), Some(painted));

        renderer.set_colors(false, &[]);
        assert_eq!(renderer.paint_color(), renderer.config().base_color);
    }

    #[test]
    fn empty_palette_on_colorized_media_clears_the_album_color() {
        let config = RendererConfig {
            auto_color: true,
            ..Default::default()
        };
        let mut renderer = renderer(config);
        renderer.set_colors(true, &[]);
        assert_eq!(renderer.paint_color(), renderer.config().base_color);
    }

    #[test]
    fn disabling_the_lava_lamp_restores_the_static_color() {
        let mut renderer = renderer(RendererConfig::default());
        renderer.on_stream_analyzed(true);
        renderer.tick(1_000.0);
        assert!(renderer.is_lava_lamp_running());

        renderer.apply_config(RendererConfig {
            lava_lamp_enabled: false,
            ..RendererConfig::default()
        });
        assert!(!renderer.is_lava_lamp_running());
        assert_eq!(renderer.paint_color(), renderer.config().base_color);
    }

    #[test]
    fn size_change_is_idempotent() {
        let mut renderer = renderer(RendererConfig::default());
        renderer.on_size_changed(800.0, 120.0);
        let first = renderer.points().to_vec();
        renderer.on_size_changed(800.0, 120.0);
        assert_eq!(renderer.points(), &first[..]);
    }

    #[test]
    fn degenerate_sizes_are_ignored() {
        let mut renderer = renderer(RendererConfig::default());
        let before = renderer.points().to_vec();
        renderer.on_size_changed(0.0, 0.0);
        assert_eq!(renderer.points(), &before[..]);
    }

    #[test]
    fn draw_issues_lines_then_overlay() {
        let mut renderer = renderer(RendererConfig::default());
        renderer.on_fft_update(&frame(64, 4, 3));
        renderer.tick(BAR_ANIMATION_MS);

        let mut surface = CollectingSurface::new();
        renderer.draw(&mut surface);
        let batch = surface.last_batch().unwrap();
        assert_eq!(batch.points.len(), 256);
        assert!(batch.stroke_width > 0.0);
        assert_eq!(surface.overlays.len(), 1);
        assert_eq!(surface.overlays[0].alpha(), 200);
    }

    #[test]
    fn destroy_stops_the_lava_lamp() {
        let mut renderer = renderer(RendererConfig::default());
        renderer.on_stream_analyzed(true);
        assert!(renderer.is_lava_lamp_running());

        renderer.destroy();
        assert!(!renderer.is_lava_lamp_running());
        assert!(renderer.lava_lamp.tick(16.0).is_none());
    }

    #[test]
    fn left_anchor_flip_relayouts_vertical_bars() {
        let mut renderer = SolidLineRenderer::new(RendererConfig::default()).unwrap();
        renderer.on_size_changed(96.0, 640.0);
        assert_eq!(renderer.points()[0], 96.0);

        renderer.set_left_in_landscape(true);
        assert_eq!(renderer.points()[0], 0.0);
    }
}
