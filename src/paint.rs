use crate::math::Vec2;
use crate::palette::Rgba;

/// Immediate-mode drawing primitives in logical pixels.
pub(crate) trait Painter {
    /// Full-width horizontal line at row `y` on the background layer.
    fn hline(&mut self, y: f32, color: Rgba);
    fn fill_circle(&mut self, center: Vec2, diameter: f32, color: Rgba);
    /// Ring centred on the circle edge, `weight` wide.
    fn stroke_circle(&mut self, center: Vec2, diameter: f32, weight: f32, color: Rgba);
    fn polyline(&mut self, points: &[Vec2], weight: f32, color: Rgba);
}

#[cfg(test)]
pub(crate) mod recording {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    pub(crate) enum Op {
        HLine {
            y: f32,
            color: Rgba,
        },
        Fill {
            center: Vec2,
            diameter: f32,
            color: Rgba,
        },
        Stroke {
            center: Vec2,
            diameter: f32,
            weight: f32,
            color: Rgba,
        },
        Poly {
            points: Vec<Vec2>,
            weight: f32,
            color: Rgba,
        },
    }

    #[derive(Default)]
    pub(crate) struct RecordingPainter {
        pub(crate) ops: Vec<Op>,
    }

    impl RecordingPainter {
        pub(crate) fn polylines(&self) -> impl Iterator<Item = &Vec<Vec2>> {
            self.ops.iter().filter_map(|op| match op {
                Op::Poly { points, .. } => Some(points),
                _ => None,
            })
        }

        pub(crate) fn count_hlines(&self) -> usize {
            self.ops.iter().filter(|op| matches!(op, Op::HLine { .. })).count()
        }
    }

    impl Painter for RecordingPainter {
        fn hline(&mut self, y: f32, color: Rgba) {
            self.ops.push(Op::HLine { y, color });
        }
        fn fill_circle(&mut self, center: Vec2, diameter: f32, color: Rgba) {
            self.ops.push(Op::Fill {
                center,
                diameter,
                color,
            });
        }
        fn stroke_circle(&mut self, center: Vec2, diameter: f32, weight: f32, color: Rgba) {
            self.ops.push(Op::Stroke {
                center,
                diameter,
                weight,
                color,
            });
        }
        fn polyline(&mut self, points: &[Vec2], weight: f32, color: Rgba) {
            self.ops.push(Op::Poly {
                points: points.to_vec(),
                weight,
                color,
            });
        }
    }
}
