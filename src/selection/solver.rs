//! Windowed single-sweep shortest path search.
//!
//! Given a seed and a target, the search covers the bounding box of the two
//! points grown by a margin on the side away from the seed, so the seed
//! always sits in a corner of the window. Cells are visited in raster order
//! walking away from that corner. Each cell looks at the (up to four)
//! neighbors already visited, keeps the cheapest as its back-link, then
//! offers itself as a cheaper route to those same neighbors.
//!
//! This is not a full Dijkstra: a single sweep with local relaxation can miss
//! the global optimum in adversarial fields, but it is bounded and fast
//! enough to run on every pointer motion.

use crate::config::ScissorsOptions;
use crate::selection::boundary::Point;
use crate::selection::cost::{link_cost, LinkClass, MOVES};
use crate::selection::gradient::GradientField;
use crate::selection::source::PixelSource;

/// Link code marking the seed cell.
pub const SEED_POINT: u8 = 9;

/// Largest cumulative cost that fits in a cell.
pub const MAX_COST: u32 = 0x00ff_ffff;

/// Cumulative cost (24 bits) and back-link code (8 bits) packed in one word.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct DpCell(u32);

impl DpCell {
    /// Never visited.
    pub const UNREACHED: DpCell = DpCell(0);
    /// Path origin: zero cost, seed link.
    pub const SEED: DpCell = DpCell(SEED_POINT as u32);

    pub fn new(cost: u32, link: u8) -> Self {
        DpCell((cost.min(MAX_COST) << 8) | link as u32)
    }

    pub fn cost(self) -> u32 {
        self.0 >> 8
    }

    pub fn link(self) -> u8 {
        (self.0 & 0xff) as u8
    }

    pub fn is_seed(self) -> bool {
        self.link() == SEED_POINT
    }

    pub fn raw(self) -> u32 {
        self.0
    }
}

/// Half-open pixel rectangle `[x1, x2) × [y1, y2)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchWindow {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl SearchWindow {
    /// Window for a segment from `start` (seed) to `end` inside a
    /// `width`×`height` image.
    ///
    /// The bounding box of both points is grown by `extend_by` of its size plus
    /// `fixed` pixels, only on the sides away from the seed, and clipped to
    /// the image.
    pub fn for_segment(
        start: Point,
        end: Point,
        width: usize,
        height: usize,
        extend_by: f32,
        fixed: i32,
    ) -> Self {
        let (w, h) = (width as i32, height as i32);
        let start = start.clamped(width, height);
        let end = end.clamped(width, height);

        let mut x1 = start.x.min(end.x);
        let mut y1 = start.y.min(end.y);
        let mut x2 = start.x.max(end.x) + 1;
        let mut y2 = start.y.max(end.y) + 1;

        let ewidth = ((x2 - x1) as f32 * extend_by) as i32 + fixed;
        let eheight = ((y2 - y1) as f32 * extend_by) as i32 + fixed;

        if end.x >= start.x {
            x2 += ewidth.clamp(0, (w - x2).max(0));
        } else {
            x1 -= ewidth.clamp(0, x1.max(0));
        }
        if end.y >= start.y {
            y2 += eheight.clamp(0, (h - y2).max(0));
        } else {
            y1 -= eheight.clamp(0, y1.max(0));
        }

        Self { x1, y1, x2, y2 }
    }

    /// Window built from options.
    pub fn with_options(
        start: Point,
        end: Point,
        width: usize,
        height: usize,
        options: &ScissorsOptions,
    ) -> Self {
        Self::for_segment(
            start,
            end,
            width,
            height,
            options.extend_by,
            options.fixed_margin,
        )
    }

    pub fn width(&self) -> usize {
        (self.x2 - self.x1).max(0) as usize
    }

    pub fn height(&self) -> usize {
        (self.y2 - self.y1).max(0) as usize
    }

    pub fn area(&self) -> usize {
        self.width() * self.height()
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x1 && p.x < self.x2 && p.y >= self.y1 && p.y < self.y2
    }
}

/// Dynamic programming buffer covering one search window.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DpBuffer {
    window: SearchWindow,
    cells: Vec<DpCell>,
}

impl DpBuffer {
    pub fn new(window: SearchWindow) -> Self {
        Self {
            window,
            cells: vec![DpCell::UNREACHED; window.area()],
        }
    }

    pub fn window(&self) -> SearchWindow {
        self.window
    }

    /// Cell at image coordinates, `None` outside the window.
    pub fn get(&self, p: Point) -> Option<DpCell> {
        self.index(p).map(|i| self.cells[i])
    }

    pub fn cells(&self) -> &[DpCell] {
        &self.cells
    }

    fn set(&mut self, p: Point, cell: DpCell) {
        if let Some(i) = self.index(p) {
            self.cells[i] = cell;
        }
    }

    fn cost_at(&self, p: Point) -> u32 {
        self.get(p).map(DpCell::cost).unwrap_or(MAX_COST)
    }

    fn index(&self, p: Point) -> Option<usize> {
        if !self.window.contains(p) {
            return None;
        }
        let w = self.window.width();
        Some((p.y - self.window.y1) as usize * w + (p.x - self.window.x1) as usize)
    }
}

/// Reverse of a link code.
#[inline]
pub fn opposite_link(code: u8) -> u8 {
    if code > 3 {
        code - 4
    } else {
        code + 4
    }
}

/// Fill a DP buffer with back-links towards `seed`, which must be a corner
/// of `window`.
pub fn find_optimal_path<S: PixelSource>(
    field: &mut GradientField<S>,
    window: SearchWindow,
    seed: Point,
) -> DpBuffer {
    let mut buf = DpBuffer::new(window);
    let (width, height) = (window.width(), window.height());

    // Sweep away from the seed corner
    let dirx: i32 = if seed.x == window.x1 { 1 } else { -1 };
    let diry: i32 = if seed.y == window.y1 { 1 } else { -1 };
    let linkdir = dirx * diry;

    for i in 0..height {
        for j in 0..width {
            let here = Point::new(seed.x + j as i32 * dirx, seed.y + i as i32 * diry);

            // Already visited neighbors, as link codes from `here`
            let mut codes = [0u8; 4];
            let mut count = 0;
            if j > 0 {
                codes[count] = if dirx == 1 { 4 } else { 0 };
                count += 1;
            }
            if i > 0 {
                codes[count] = if diry == 1 { 5 } else { 1 };
                count += 1;

                let back_diag = if linkdir == 1 { 3 } else { 2 };
                if j > 0 {
                    codes[count] = if diry == 1 { back_diag + 4 } else { back_diag };
                    count += 1;
                }
                let fwd_diag = if linkdir == 1 { 2 } else { 3 };
                if j != width - 1 {
                    codes[count] = if diry == 1 { fwd_diag + 4 } else { fwd_diag };
                    count += 1;
                }
            }

            if count == 0 {
                if i == 0 && j == 0 {
                    buf.set(here, DpCell::SEED);
                }
                continue;
            }

            // Lowest code wins ties
            let codes = &mut codes[..count];
            codes.sort_unstable();

            let here_sample = field.sample(here.x, here.y);
            let mut link_costs = [0u32; 4];
            let mut pixel_costs = [0u32; 4];
            let mut best: Option<(usize, u32)> = None;

            for (n, &code) in codes.iter().enumerate() {
                let (dx, dy) = MOVES[code as usize];
                let neighbor = Point::new(here.x + dx, here.y + dy);
                let neighbor_sample = field.sample(neighbor.x, neighbor.y);

                link_costs[n] = link_cost(here_sample, neighbor_sample, LinkClass::from_code(code));
                pixel_costs[n] = buf.cost_at(neighbor);
                let cumulative = pixel_costs[n] + link_costs[n];

                if best.map_or(true, |(_, c)| cumulative < c) {
                    best = Some((n, cumulative));
                }
            }

            let Some((best_n, best_cost)) = best else {
                continue;
            };
            buf.set(here, DpCell::new(best_cost, codes[best_n]));

            // Offer this cell as a shortcut to the other neighbors
            for (n, &code) in codes.iter().enumerate() {
                if n == best_n {
                    continue;
                }
                let new_cost = link_costs[n] + best_cost;
                if pixel_costs[n] > new_cost {
                    let (dx, dy) = MOVES[code as usize];
                    let neighbor = Point::new(here.x + dx, here.y + dy);
                    buf.set(neighbor, DpCell::new(new_cost, opposite_link(code)));
                }
            }
        }
    }

    buf
}
