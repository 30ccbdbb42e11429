use std::collections::VecDeque;

/// Number of recent samples the moving average considers. Two frames is
/// enough to take the edge off frame-to-frame dB jitter without making the
/// bars feel sluggish.
const WINDOW_LENGTH: usize = 2;

/// Windowed moving average over recent per-bar dB values.
///
/// One instance exists per bar while smoothing is enabled; the whole set is
/// rebuilt whenever the unit count changes. The deque stores each sample's
/// contribution (`sample / window`) so evicting the oldest entry is a single
/// subtraction.
#[derive(Debug, Clone, Default)]
pub struct MovingAverage {
    window: VecDeque<f32>,
    average: f32,
}

impl MovingAverage {
    pub fn new() -> Self {
        Self {
            window: VecDeque::with_capacity(WINDOW_LENGTH),
            average: 0.0,
        }
    }

    /// Feeds one dB sample and returns the smoothed value.
    ///
    /// Until the window fills up the result ramps towards the input;
    /// afterwards it is the rounded mean of the last `WINDOW_LENGTH` samples,
    /// so constant input converges to itself within the window length and the
    /// output never leaves the min/max range of the retained samples.
    pub fn average(&mut self, db_value: i32) -> i32 {
        if self.window.len() >= WINDOW_LENGTH {
            if let Some(oldest) = self.window.pop_front() {
                self.average -= oldest;
            }
        }
        let contribution = db_value as f32 / WINDOW_LENGTH as f32;
        self.average += contribution;
        self.window.push_back(contribution);
        self.average.round() as i32
    }
}
