use crate::error::{PulseVizError, Result};

/// Fewest bars the spacing correction can handle without dividing by zero.
/// The renderer clamps configured unit counts up to this before laying out.
pub const MIN_UNITS: usize = 2;

/// Fraction of each cell occupied by the bar stroke; the rest is spacing.
const BAR_FILL_RATIO: f32 = 8.0 / 9.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// Geometry derived from one `(width, height, units, anchor)` tuple.
///
/// [`BarLayout::compute`] is a pure function of its inputs: it fills the
/// shared points buffer with degenerate zero-length segments resting at the
/// baseline and returns the layout metadata the animators need. Bars only
/// gain length once an animation driver moves their free endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct BarLayout {
    width: f32,
    height: f32,
    units: usize,
    orientation: Orientation,
    left_in_landscape: bool,
    stroke_width: f32,
}

impl BarLayout {
    /// Lays out `units` bars over a `width` x `height` surface, resizing and
    /// rewriting `points` (4 floats per bar: `x0, y0, x1, y1`).
    ///
    /// A surface taller than wide gets vertical bars anchored on the left or
    /// right edge per `left_in_landscape`; otherwise bars rise from the
    /// bottom edge. Cell spacing is widened by `units / (units - 1)` so the
    /// last bar's trailing edge lands exactly on the surface bound.
    pub fn compute(
        width: f32,
        height: f32,
        units: usize,
        left_in_landscape: bool,
        points: &mut Vec<f32>,
    ) -> Result<Self> {
        if units < MIN_UNITS {
            return Err(PulseVizError::invalid_config(format!(
                "unit count {units} is below the minimum of {MIN_UNITS}"
            )));
        }

        points.clear();
        points.resize(units * 4, 0.0);

        let units_f = units as f32;
        let orientation = if height > width {
            Orientation::Vertical
        } else {
            Orientation::Horizontal
        };

        let span = match orientation {
            Orientation::Horizontal => width,
            Orientation::Vertical => height,
        };
        let cell = span / units_f;
        let stroke_width = cell * BAR_FILL_RATIO;
        let bar_unit = stroke_width + (cell - stroke_width) * units_f / (units_f - 1.0);

        for i in 0..units {
            let center = i as f32 * bar_unit + stroke_width / 2.0;
            match orientation {
                Orientation::Horizontal => {
                    points[i * 4] = center;
                    points[i * 4 + 2] = center;
                    points[i * 4 + 1] = height;
                    points[i * 4 + 3] = height;
                }
                Orientation::Vertical => {
                    let anchor = if left_in_landscape { 0.0 } else { width };
                    points[i * 4 + 1] = center;
                    points[i * 4 + 3] = center;
                    points[i * 4] = anchor;
                    points[i * 4 + 2] = anchor;
                }
            }
        }

        Ok(Self {
            width,
            height,
            units,
            orientation,
            left_in_landscape,
            stroke_width,
        })
    }

    pub fn units(&self) -> usize {
        self.units
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn left_in_landscape(&self) -> bool {
        self.left_in_landscape
    }

    pub fn stroke_width(&self) -> f32 {
        self.stroke_width
    }

    /// The resting coordinate a zero-magnitude bar retracts to.
    pub fn baseline(&self) -> f32 {
        match self.orientation {
            Orientation::Horizontal => self.height,
            Orientation::Vertical => {
                if self.left_in_landscape {
                    0.0
                } else {
                    self.width
                }
            }
        }
    }

    /// Index into the points buffer of the one coordinate that animates for
    /// bar `i`: `x0` for vertical bars, `y0` for horizontal ones. The paired
    /// endpoint stays pinned at the baseline.
    pub fn animated_index(&self, bar: usize) -> usize {
        match self.orientation {
            Orientation::Vertical => bar * 4,
            Orientation::Horizontal => bar * 4 + 1,
        }
    }

    /// Target coordinate for a bar extending `extension` pixels from its
    /// baseline. Left-anchored vertical bars grow towards larger x, the
    /// other anchors grow by shrinking the coordinate.
    pub fn extension_target(&self, extension: f32) -> f32 {
        match self.orientation {
            Orientation::Vertical if self.left_in_landscape => extension,
            _ => self.baseline() - extension,
        }
    }
}
