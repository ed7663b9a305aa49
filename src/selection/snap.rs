//! Snapping a seed to the strongest nearby edge.
//!
//! Magnitudes in a square window around the cursor are weighted by
//! `1 / (1 + distance)` so a strong edge close by beats a slightly stronger
//! one farther away.

use crate::selection::boundary::Point;
use crate::selection::gradient::GradientField;
use crate::selection::source::PixelSource;

/// Precomputed `1 / (1 + distance)` over a `side`×`side` window.
#[derive(Clone, Debug, PartialEq)]
pub struct DistanceWeights {
    side: usize,
    weights: Vec<f32>,
}

impl DistanceWeights {
    pub fn new(side: usize) -> Self {
        let radius = (side / 2) as f32;
        let mut weights = Vec::with_capacity(side * side);
        for i in 0..side {
            for j in 0..side {
                let dy = i as f32 - radius;
                let dx = j as f32 - radius;
                weights.push(1.0 / (1.0 + (dx * dx + dy * dy).sqrt()));
            }
        }
        Self { side, weights }
    }

    pub fn side(&self) -> usize {
        self.side
    }

    /// Weight at window offset (dx, dy) from the top-left corner.
    pub fn get(&self, dx: usize, dy: usize) -> f32 {
        if dx >= self.side || dy >= self.side {
            return 0.0;
        }
        self.weights[dy * self.side + dx]
    }
}

/// Position of the highest distance-weighted magnitude around `cursor`.
///
/// The cursor is clamped to the image. With no gradient in reach the clamped
/// cursor is returned; ties keep the first pixel in raster order.
pub fn find_max_gradient<S: PixelSource>(
    field: &mut GradientField<S>,
    cursor: Point,
    weights: &DistanceWeights,
) -> Point {
    let (width, height) = (field.width() as i32, field.height() as i32);
    let center = cursor.clamped(field.width(), field.height());
    let radius = (weights.side() / 2) as i32;

    // Window origin before clipping, so weights stay centered on the cursor
    let sx = center.x - radius;
    let sy = center.y - radius;
    let x1 = sx.clamp(0, width);
    let y1 = sy.clamp(0, height);
    let x2 = (center.x + radius).clamp(0, width);
    let y2 = (center.y + radius).clamp(0, height);

    let mut best = center;
    let mut max_gradient = 0.0f32;

    for y in y1..y2 {
        for x in x1..x2 {
            let magnitude = field.sample(x, y).magnitude as f32;
            let g = magnitude * weights.get((x - sx) as usize, (y - sy) as usize);
            if g > max_gradient {
                max_gradient = g;
                best = Point::new(x, y);
            }
        }
    }

    best
}
