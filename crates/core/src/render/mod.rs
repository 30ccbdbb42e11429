use crate::color::Color;

/// Everything one frame needs from the renderer, borrowed for the duration
/// of the draw call.
#[derive(Debug, Clone, Copy)]
pub struct DrawCommand<'a> {
    /// Shared points buffer, 4 floats (`x0, y0, x1, y1`) per bar.
    pub points: &'a [f32],
    pub color: Color,
    pub stroke_width: f32,
    /// Full-surface overlay blended with multiply compositing to fade
    /// trailing bar edges.
    pub fade_color: Color,
}

/// Host drawing surface boundary. Implementations draw; they never mutate
/// renderer state.
pub trait RenderSurface {
    /// One batched multi-segment line draw.
    fn draw_lines(&mut self, points: &[f32], color: Color, stroke_width: f32);
    /// Full-surface fill blended with multiply compositing.
    fn fill_multiply(&mut self, color: Color);
}

/// Issues the per-frame boundary calls in their fixed order: the batched
/// line draw first, the translucency overlay second.
pub fn submit<S: RenderSurface>(surface: &mut S, command: &DrawCommand<'_>) {
    surface.draw_lines(command.points, command.color, command.stroke_width);
    surface.fill_multiply(command.fade_color);
}

/// Surface that records every call it receives. Used by the demo app and by
/// tests to observe the draw stream without a real canvas.
#[derive(Debug, Default)]
pub struct CollectingSurface {
    pub line_batches: Vec<LineBatch>,
    pub overlays: Vec<Color>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineBatch {
    pub points: Vec<f32>,
    pub color: Color,
    pub stroke_width: f32,
}

impl CollectingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_batch(&self) -> Option<&LineBatch> {
        self.line_batches.last()
    }
}

impl RenderSurface for CollectingSurface {
    fn draw_lines(&mut self, points: &[f32], color: Color, stroke_width: f32) {
        self.line_batches.push(LineBatch {
            points: points.to_vec(),
            color,
            stroke_width,
        });
    }

    fn fill_multiply(&mut self, color: Color) {
        self.overlays.push(color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submit_draws_lines_before_the_overlay() {
        let mut surface = CollectingSurface::new();
        let points = [1.0, 2.0, 3.0, 4.0];
        let command = DrawCommand {
            points: &points,
            color: Color::WHITE,
            stroke_width: 8.0,
            fade_color: Color::argb(200, 255, 255, 255),
        };

        submit(&mut surface, &command);

        assert_eq!(surface.line_batches.len(), 1);
        assert_eq!(surface.overlays.len(), 1);
        let batch = surface.last_batch().unwrap();
        assert_eq!(batch.points, points.to_vec());
        assert_eq!(batch.stroke_width, 8.0);
        assert_eq!(surface.overlays[0].alpha(), 200);
    }
}
