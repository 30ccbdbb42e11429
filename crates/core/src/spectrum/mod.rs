use crate::error::{PulseVizError, Result};
use crate::layout::BarLayout;
use crate::smoothing::MovingAverage;

/// Leading bytes of an FFT frame that carry no bin data.
pub const FRAME_HEADER_BYTES: usize = 2;

/// Duration of one bar's interpolation towards a new target. Short enough
/// that a fresh frame usually lands before the previous leg settles.
pub const BAR_ANIMATION_MS: f32 = 128.0;

/// One bar's in-flight interpolation, advanced by [`SpectrumAnimator::tick`].
///
/// Plain value state instead of a callback per bar: the driver at index `i`
/// always writes `points[layout.animated_index(i)]`, so replacing it on
/// frame arrival discards any pending movement with no ghost updates.
#[derive(Debug, Clone, Copy, Default)]
struct BarDriver {
    from: f32,
    target: f32,
    elapsed_ms: f32,
    active: bool,
}

impl BarDriver {
    fn restart(current: f32, target: f32) -> Self {
        Self {
            from: current,
            target,
            elapsed_ms: 0.0,
            active: true,
        }
    }
}

/// Translates raw FFT frames into per-bar animated geometry.
///
/// Owns the shared points buffer (4 floats per bar) together with one
/// animation driver per bar. Every incoming frame computes a dB magnitude
/// per bin, optionally smooths it, and restarts that bar's driver from its
/// current endpoint towards the new target; `tick` then advances all active
/// drivers each scheduler cycle. The buffer always holds renderable
/// segments, including mid-animation.
#[derive(Debug)]
pub struct SpectrumAnimator {
    width: f32,
    height: f32,
    layout: BarLayout,
    points: Vec<f32>,
    drivers: Vec<BarDriver>,
    averages: Option<Vec<MovingAverage>>,
    fuzz_factor: f32,
}

impl SpectrumAnimator {
    pub fn new(
        width: f32,
        height: f32,
        units: usize,
        left_in_landscape: bool,
        smoothing_enabled: bool,
        fuzz_factor: i32,
    ) -> Result<Self> {
        let mut points = Vec::new();
        let layout = BarLayout::compute(width, height, units, left_in_landscape, &mut points)?;
        Ok(Self {
            width,
            height,
            layout,
            points,
            drivers: vec![BarDriver::default(); units],
            averages: smoothing_enabled.then(|| vec![MovingAverage::new(); units]),
            fuzz_factor: fuzz_factor as f32,
        })
    }

    pub fn points(&self) -> &[f32] {
        &self.points
    }

    pub fn stroke_width(&self) -> f32 {
        self.layout.stroke_width()
    }

    pub fn layout(&self) -> &BarLayout {
        &self.layout
    }

    pub fn units(&self) -> usize {
        self.layout.units()
    }

    pub fn set_fuzz_factor(&mut self, fuzz_factor: i32) {
        self.fuzz_factor = fuzz_factor as f32;
    }

    /// Recomputes the layout for a new surface size, keeping the current
    /// unit count and anchoring. All in-flight animations are cancelled and
    /// every bar snaps back to its baseline.
    pub fn resize(&mut self, width: f32, height: f32) -> Result<()> {
        self.width = width;
        self.height = height;
        self.relayout()
    }

    /// Rebuilds buffers for a new unit count, anchor side or smoothing
    /// setting. The points buffer is reallocated to `4 * units` and the
    /// moving-average set is reconstructed from scratch.
    pub fn reconfigure(
        &mut self,
        units: usize,
        left_in_landscape: bool,
        smoothing_enabled: bool,
    ) -> Result<()> {
        self.layout = BarLayout::compute(
            self.width,
            self.height,
            units,
            left_in_landscape,
            &mut self.points,
        )?;
        self.drivers = vec![BarDriver::default(); units];
        self.averages = smoothing_enabled.then(|| vec![MovingAverage::new(); units]);
        Ok(())
    }

    fn relayout(&mut self) -> Result<()> {
        self.layout = BarLayout::compute(
            self.width,
            self.height,
            self.layout.units(),
            self.layout.left_in_landscape(),
            &mut self.points,
        )?;
        for driver in &mut self.drivers {
            *driver = BarDriver::default();
        }
        Ok(())
    }

    /// Consumes one FFT frame and retargets every bar.
    ///
    /// The frame is `[hdr, hdr, re0, im0, re1, im1, ...]` with signed 8-bit
    /// samples. A frame too short for the configured unit count fails with
    /// [`PulseVizError::MalformedFrame`] before any bar is touched, so the
    /// previous geometry survives intact.
    pub fn process_frame(&mut self, frame: &[u8]) -> Result<()> {
        let units = self.layout.units();
        let required = units * 2 + FRAME_HEADER_BYTES;
        if frame.len() < required {
            return Err(PulseVizError::MalformedFrame {
                units,
                required,
                actual: frame.len(),
            });
        }

        for i in 0..units {
            let re = frame[i * 2 + FRAME_HEADER_BYTES] as i8 as i32;
            let im = frame[i * 2 + FRAME_HEADER_BYTES + 1] as i8 as i32;
            let magnitude = (re * re + im * im) as f32;
            // Truncation, not rounding: animation smoothness is sensitive to
            // off-by-one dB jitter.
            let mut db_value = if magnitude > 0.0 {
                (10.0 * magnitude.log10()) as i32
            } else {
                0
            };
            if let Some(averages) = &mut self.averages {
                db_value = averages[i].average(db_value);
            }
            let extension = db_value as f32 * self.fuzz_factor;
            let target = self.layout.extension_target(extension);
            let current = self.points[self.layout.animated_index(i)];
            self.drivers[i] = BarDriver::restart(current, target);
        }
        Ok(())
    }

    /// Advances all active bar animations by `delta_ms`, writing the points
    /// buffer. Returns whether anything moved, i.e. whether a redraw is
    /// worthwhile.
    pub fn tick(&mut self, delta_ms: f32) -> bool {
        if delta_ms <= 0.0 {
            return false;
        }
        let mut changed = false;
        for (i, driver) in self.drivers.iter_mut().enumerate() {
            if !driver.active {
                continue;
            }
            driver.elapsed_ms += delta_ms;
            let t = (driver.elapsed_ms / BAR_ANIMATION_MS).min(1.0);
            self.points[self.layout.animated_index(i)] =
                driver.from + (driver.target - driver.from) * t;
            if t >= 1.0 {
                driver.active = false;
            }
            changed = true;
        }
        changed
    }

    /// True while at least one bar is still interpolating.
    pub fn is_animating(&self) -> bool {
        self.drivers.iter().any(|driver| driver.active)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame_with_bins(units: usize, re: u8, im: u8) -> Vec<u8> {
        let mut frame = vec![0u8; units * 2 + FRAME_HEADER_BYTES];
        for i in 0..units {
            frame[i * 2 + FRAME_HEADER_BYTES] = re;
            frame[i * 2 + FRAME_HEADER_BYTES + 1] = im;
        }
        frame
    }

    fn horizontal(units: usize) -> SpectrumAnimator {
        SpectrumAnimator::new(640.0, 96.0, units, false, false, 5).unwrap()
    }

    #[test]
    fn silence_retracts_every_bar_to_baseline() {
        let mut animator = horizontal(8);
        animator
            .process_frame(&frame_with_bins(8, 0, 0))
            .unwrap();
        assert!(animator.tick(BAR_ANIMATION_MS));

        for i in 0..8 {
            assert_eq!(animator.points()[i * 4 + 1], 96.0);
            assert_eq!(animator.points()[i * 4 + 3], 96.0);
        }
        assert!(!animator.is_animating());
    }

    #[test]
    fn db_conversion_truncates_towards_zero() {
        // re=3, im=0 -> magnitude 9 -> 10 * log10(9) = 9.54, truncated to 9.
        // With the default fuzz factor of 5 the bar extends 45 px upward.
        let mut animator = horizontal(4);
        animator.process_frame(&frame_with_bins(4, 3, 0)).unwrap();
        animator.tick(BAR_ANIMATION_MS);
        for i in 0..4 {
            assert_eq!(animator.points()[i * 4 + 1], 96.0 - 45.0);
        }
    }

    #[test]
    fn negative_samples_square_like_positive_ones() {
        let mut plus = horizontal(2);
        let mut minus = horizontal(2);
        plus.process_frame(&frame_with_bins(2, 3, 4)).unwrap();
        minus
            .process_frame(&frame_with_bins(2, (-3i8) as u8, (-4i8) as u8))
            .unwrap();
        plus.tick(BAR_ANIMATION_MS);
        minus.tick(BAR_ANIMATION_MS);
        assert_eq!(plus.points(), minus.points());
    }

    #[test]
    fn short_frame_is_rejected_and_geometry_survives() {
        let mut animator = horizontal(8);
        animator.process_frame(&frame_with_bins(8, 5, 0)).unwrap();
        animator.tick(BAR_ANIMATION_MS);
        let before = animator.points().to_vec();

        let err = animator.process_frame(&[0u8; 7]).unwrap_err();
        assert!(matches!(
            err,
            PulseVizError::MalformedFrame {
                units: 8,
                required: 18,
                actual: 7
            }
        ));
        animator.tick(BAR_ANIMATION_MS);
        assert_eq!(animator.points(), &before[..]);
    }

    #[test]
    fn new_frame_cancels_in_flight_animation() {
        let mut animator = horizontal(2);
        animator.process_frame(&frame_with_bins(2, 10, 0)).unwrap();
        animator.tick(BAR_ANIMATION_MS / 2.0);
        let midway = animator.points()[1];
        assert!(midway < 96.0 && midway > animator.layout().extension_target(100.0));

        // Retarget to silence from the midway position, not from the old target.
        animator.process_frame(&frame_with_bins(2, 0, 0)).unwrap();
        animator.tick(BAR_ANIMATION_MS / 2.0);
        let resumed = animator.points()[1];
        assert!(resumed > midway);
        animator.tick(BAR_ANIMATION_MS);
        assert_eq!(animator.points()[1], 96.0);
    }

    #[test]
    fn reconfigure_reallocates_points_and_cancels_animations() {
        let mut animator = horizontal(64);
        animator.process_frame(&frame_with_bins(64, 9, 9)).unwrap();
        assert!(animator.is_animating());

        animator.reconfigure(32, false, false).unwrap();
        assert_eq!(animator.points().len(), 128);
        assert!(!animator.is_animating());
        for i in 0..32 {
            assert_eq!(animator.points()[i * 4 + 1], 96.0);
        }
    }

    #[test]
    fn vertical_left_anchor_extends_towards_larger_x() {
        let mut animator = SpectrumAnimator::new(96.0, 640.0, 4, true, false, 5).unwrap();
        animator.process_frame(&frame_with_bins(4, 3, 0)).unwrap();
        animator.tick(BAR_ANIMATION_MS);
        for i in 0..4 {
            assert_eq!(animator.points()[i * 4], 45.0);
            assert_eq!(animator.points()[i * 4 + 2], 0.0);
        }
    }

    #[test]
    fn smoothing_is_applied_per_bar() {
        let mut smoothed = SpectrumAnimator::new(640.0, 96.0, 2, false, true, 5).unwrap();
        // First sample through a half-filled window of length two reads as
        // half the raw value: db 9 -> smoothed 5 (rounded) -> 25 px.
        smoothed.process_frame(&frame_with_bins(2, 3, 0)).unwrap();
        smoothed.tick(BAR_ANIMATION_MS);
        assert_eq!(smoothed.points()[1], 96.0 - 25.0);

        // Second identical sample converges on the raw value.
        smoothed.process_frame(&frame_with_bins(2, 3, 0)).unwrap();
        smoothed.tick(BAR_ANIMATION_MS);
        assert_eq!(smoothed.points()[1], 96.0 - 45.0);
    }

    #[test]
    fn resize_snaps_bars_back_to_baseline() {
        let mut animator = horizontal(4);
        animator.process_frame(&frame_with_bins(4, 12, 0)).unwrap();
        animator.tick(BAR_ANIMATION_MS);

        animator.resize(640.0, 128.0).unwrap();
        for i in 0..4 {
            assert_eq!(animator.points()[i * 4 + 1], 128.0);
        }
        assert!(!animator.is_animating());
    }
}
