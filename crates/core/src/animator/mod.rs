use crate::color::Color;

/// Lifecycle and tick notifications emitted by [`ColorAnimator`].
///
/// The animator is advanced cooperatively by the owner's scheduler tick, so
/// notifications are returned as plain values instead of being dispatched
/// through registered listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorEvent {
    /// Emitted exactly once when the animation starts, carrying the first
    /// color that will be painted.
    Started(Color),
    /// Emitted on every tick while running.
    ColorChanged(Color),
    /// Emitted exactly once when the animation stops, carrying the last color
    /// reached so the caller can restore a non-animated paint color.
    Stopped(Color),
}

/// Time-driven ping-pong interpolation between two colors.
///
/// The phase travels `from -> to -> from -> ...` continuously, one leg per
/// configured duration, so the hue cycles without a hard reset flash. Phase
/// is stored in `[0, 2)` and folded into a triangle wave when sampling.
#[derive(Debug, Clone)]
pub struct ColorAnimator {
    from: Color,
    to: Color,
    duration_ms: f32,
    phase: f32,
    running: bool,
}

pub const DEFAULT_DURATION_MS: u32 = 10_000;

impl Default for ColorAnimator {
    fn default() -> Self {
        Self::new()
    }
}

impl ColorAnimator {
    pub fn new() -> Self {
        Self {
            from: Color::WHITE,
            to: Color::WHITE,
            duration_ms: DEFAULT_DURATION_MS as f32,
            phase: 0.0,
            running: false,
        }
    }

    /// Replaces the animation endpoints. Safe to call while running; the
    /// current phase is preserved so the color snaps onto the new gradient at
    /// the same progress instead of restarting.
    pub fn set_animation_colors(&mut self, from: Color, to: Color) {
        self.from = from;
        self.to = to;
    }

    /// Sets the duration of one leg (`from` to `to`) in milliseconds.
    /// Takes effect immediately; phase is preserved.
    pub fn set_animation_time(&mut self, duration_ms: u32) {
        self.duration_ms = (duration_ms.max(1)) as f32;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// The color at the current phase.
    pub fn current_color(&self) -> Color {
        let t = if self.phase <= 1.0 {
            self.phase
        } else {
            2.0 - self.phase
        };
        self.from.lerp(self.to, t)
    }

    /// Begins looping from the `from` endpoint. No-op while already running.
    #[must_use]
    pub fn start(&mut self) -> Option<ColorEvent> {
        if self.running {
            return None;
        }
        self.running = true;
        self.phase = 0.0;
        Some(ColorEvent::Started(self.current_color()))
    }

    /// Halts ticking. No-op while already stopped.
    #[must_use]
    pub fn stop(&mut self) -> Option<ColorEvent> {
        if !self.running {
            return None;
        }
        self.running = false;
        Some(ColorEvent::Stopped(self.current_color()))
    }

    /// Advances the animation by `delta_ms` and reports the new color.
    /// Returns `None` while stopped; pending ticks are simply discarded.
    #[must_use]
    pub fn tick(&mut self, delta_ms: f32) -> Option<ColorEvent> {
        if !self.running || delta_ms <= 0.0 {
            return None;
        }
        self.phase = (self.phase + delta_ms / self.duration_ms) % 2.0;
        Some(ColorEvent::ColorChanged(self.current_color()))
    }
}
