//! Filling a closed boundary into a selection mask.
//!
//! Polylines are joined head to tail into one ring, which is closed back to
//! its first point implicitly. A pixel is selected when its centre lies
//! inside the ring under the even-odd rule.

use crate::selection::boundary::Point;
use crate::selection::mask::SelectionMask;

/// Join polylines into one ring, dropping consecutive duplicates.
pub fn ring<'a, I>(polylines: I) -> Vec<Point>
where
    I: IntoIterator<Item = &'a [Point]>,
{
    let mut ring: Vec<Point> = Vec::new();
    for polyline in polylines {
        for &p in polyline {
            if ring.last() != Some(&p) {
                ring.push(p);
            }
        }
    }
    // The implicit closing edge already covers this
    if ring.len() > 1 && ring.first() == ring.last() {
        ring.pop();
    }
    ring
}

/// Rasterize closed polylines into a `width`×`height` mask.
///
/// # Arguments
/// * `polylines` - Point runs in ring order
/// * `width` - Mask width
/// * `height` - Mask height
///
/// # Returns
/// Mask with 255 inside the ring, 0 elsewhere. Rings with fewer than three
/// distinct points enclose nothing.
pub fn scan_convert<'a, I>(polylines: I, width: usize, height: usize) -> SelectionMask
where
    I: IntoIterator<Item = &'a [Point]>,
{
    let mut mask = SelectionMask::new(width, height);
    let ring = ring(polylines);
    if ring.len() < 3 {
        return mask;
    }

    let mut crossings: Vec<f64> = Vec::new();
    for y in 0..height {
        let yc = y as f64 + 0.5;
        crossings.clear();

        for (i, &p0) in ring.iter().enumerate() {
            let p1 = ring[(i + 1) % ring.len()];
            let (y0, y1) = (p0.y as f64, p1.y as f64);
            if (y0 <= yc) == (y1 <= yc) {
                continue;
            }
            let t = (yc - y0) / (y1 - y0);
            crossings.push(p0.x as f64 + t * (p1.x - p0.x) as f64);
        }

        crossings.sort_by(|a, b| a.total_cmp(b));
        for span in crossings.chunks_exact(2) {
            // Pixels whose centre x + 0.5 falls in [span[0], span[1])
            let first = (span[0] - 0.5).ceil().max(0.0) as usize;
            let last = ((span[1] - 0.5).ceil().max(0.0) as usize).min(width);
            for x in first..last {
                mask.set(x, y, 255);
            }
        }
    }

    mask
}
