//! Curves and the boundary they form.
//!
//! A [`Curve`] joins two vertices with a traced pixel path. The path is
//! stored end-to-start, as the tracer produces it. A [`Boundary`] is the
//! ordered list of curves built while placing seeds. Once the last vertex
//! snaps back onto the first one it is `connected` and can be filled.

use serde::{Deserialize, Serialize};

/// Integer pixel coordinate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Clamp into `[0, width-1] × [0, height-1]`.
    pub fn clamped(self, width: usize, height: usize) -> Self {
        let max_x = (width as i32 - 1).max(0);
        let max_y = (height as i32 - 1).max(0);
        Self {
            x: self.x.clamp(0, max_x),
            y: self.y.clamp(0, max_y),
        }
    }

    pub fn distance_sq(self, other: Point) -> i64 {
        let dx = (self.x - other.x) as i64;
        let dy = (self.y - other.y) as i64;
        dx * dx + dy * dy
    }

    /// True when `other` lies strictly inside a circle of `radius` around `self`.
    pub fn within(self, other: Point, radius: i32) -> bool {
        self.distance_sq(other) < (radius as i64) * (radius as i64)
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

/// Segment between two vertices.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Curve {
    pub start: Point,
    pub end: Point,
    /// Traced pixels from `end` back to `start`, both included.
    pub points: Vec<Point>,
}

impl Curve {
    /// Curve with no traced points yet.
    pub fn new(start: Point, end: Point) -> Self {
        Self {
            start,
            end,
            points: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Index of the first traced point within `radius` of `p`.
    pub fn hit(&self, p: Point, radius: i32) -> Option<usize> {
        self.points.iter().position(|q| q.within(p, radius))
    }
}

/// Curves touching a vertex handle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VertexHit {
    /// Curve that starts at the vertex.
    pub outgoing: Option<usize>,
    /// Curve that ends at the vertex.
    pub incoming: Option<usize>,
    /// Number of curve endpoints found, at most 2.
    pub count: usize,
}

impl VertexHit {
    /// A vertex shared by two curves, the only kind that can be dragged.
    pub fn is_shared(&self) -> bool {
        self.count > 1
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Boundary {
    curves: Vec<Curve>,
    connected: bool,
}

impl Boundary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn curves(&self) -> &[Curve] {
        &self.curves
    }

    pub fn curve(&self, index: usize) -> Option<&Curve> {
        self.curves.get(index)
    }

    pub fn curve_mut(&mut self, index: usize) -> Option<&mut Curve> {
        self.curves.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.curves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn set_connected(&mut self, connected: bool) {
        self.connected = connected;
    }

    /// Start of the first curve.
    pub fn first_vertex(&self) -> Option<Point> {
        self.curves.first().map(|c| c.start)
    }

    /// Append a curve, returning its index.
    pub fn push(&mut self, curve: Curve) -> usize {
        self.curves.push(curve);
        self.curves.len() - 1
    }

    pub fn clear(&mut self) {
        self.curves.clear();
        self.connected = false;
    }

    /// Find the curves with an endpoint on the handle at `p`.
    ///
    /// Each curve is checked at its start first; a curve contributes at most
    /// once and the scan stops after two hits.
    pub fn vertex_at(&self, p: Point, halfwidth: i32) -> VertexHit {
        let mut hit = VertexHit::default();
        for (i, curve) in self.curves.iter().enumerate() {
            if hit.count >= 2 {
                break;
            }
            if curve.start.within(p, halfwidth) {
                hit.outgoing = Some(i);
                hit.count += 1;
            } else if curve.end.within(p, halfwidth) {
                hit.incoming = Some(i);
                hit.count += 1;
            }
        }
        hit
    }

    /// First curve with a traced point near `p`, with the index of that point.
    pub fn curve_at(&self, p: Point, halfwidth: i32) -> Option<(usize, usize)> {
        self.curves
            .iter()
            .enumerate()
            .find_map(|(i, curve)| curve.hit(p, halfwidth).map(|k| (i, k)))
    }

    /// Split curve `index` at `at`.
    ///
    /// The existing curve now ends at `at`; a new curve from `at` to the old
    /// end is inserted right after it. Neither curve is retraced here.
    ///
    /// # Returns
    /// `(outgoing, incoming)`: the index of the new curve and of the
    /// shortened one, or `None` if `index` is out of range.
    pub fn split(&mut self, index: usize, at: Point) -> Option<(usize, usize)> {
        let curve = self.curves.get_mut(index)?;
        let new_curve = Curve::new(at, curve.end);
        curve.end = at;
        self.curves.insert(index + 1, new_curve);
        Some((index + 1, index))
    }

    /// Polylines in the order a ring-walk needs them: last curve first,
    /// each one already running end to start.
    pub fn polylines(&self) -> impl Iterator<Item = &[Point]> {
        self.curves.iter().rev().map(|c| c.points.as_slice())
    }

    /// Curves short enough to draw; longer ones are reported and skipped.
    pub fn drawable(&self, max_points: usize) -> Vec<&Curve> {
        self.curves
            .iter()
            .enumerate()
            .filter_map(|(i, curve)| {
                if curve.len() > max_points {
                    log::warn!(
                        "curve {i} has {} points, over the limit of {max_points}; not drawn",
                        curve.len()
                    );
                    None
                } else {
                    Some(curve)
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(start: Point, end: Point) -> Curve {
        // Horizontal or vertical only, end to start
        let mut c = Curve::new(start, end);
        let steps = (end.x - start.x).abs().max((end.y - start.y).abs());
        let (sx, sy) = ((start.x - end.x).signum(), (start.y - end.y).signum());
        for k in 0..=steps {
            c.points.push(Point::new(end.x + k * sx, end.y + k * sy));
        }
        c
    }

    fn open_chain() -> Boundary {
        let mut b = Boundary::new();
        b.push(line(Point::new(0, 0), Point::new(10, 0)));
        b.push(line(Point::new(10, 0), Point::new(10, 10)));
        b
    }

    #[test]
    fn test_point_clamp() {
        assert_eq!(Point::new(-3, 50).clamped(10, 20), Point::new(0, 19));
        assert_eq!(Point::new(4, 4).clamped(10, 20), Point::new(4, 4));
    }

    #[test]
    fn test_within_is_strict() {
        let p = Point::new(0, 0);
        assert!(p.within(Point::new(3, 0), 4));
        assert!(!p.within(Point::new(4, 0), 4));
    }

    #[test]
    fn test_shared_vertex_found_on_two_curves() {
        let b = open_chain();
        let hit = b.vertex_at(Point::new(11, 1), 4);
        assert!(hit.is_shared());
        assert_eq!(hit.incoming, Some(0));
        assert_eq!(hit.outgoing, Some(1));
    }

    #[test]
    fn test_chain_ends_are_not_shared() {
        let b = open_chain();
        let first = b.vertex_at(Point::new(0, 0), 4);
        assert_eq!(first.count, 1);
        assert!(!first.is_shared());
        assert_eq!(b.vertex_at(Point::new(30, 30), 4).count, 0);
    }

    #[test]
    fn test_curve_hit_returns_point_index() {
        let b = open_chain();
        // Curve 0 runs end to start: (10,0), (9,0), (8,0) is the first in range
        assert_eq!(b.curve_at(Point::new(5, 1), 4), Some((0, 2)));
        assert_eq!(b.curve_at(Point::new(5, 6), 4), None);
    }

    #[test]
    fn test_split_inserts_after() {
        let mut b = open_chain();
        let (outgoing, incoming) = b.split(0, Point::new(5, 0)).unwrap();
        assert_eq!((outgoing, incoming), (1, 0));
        assert_eq!(b.len(), 3);
        assert_eq!(b.curves()[0].end, Point::new(5, 0));
        assert_eq!(b.curves()[1].start, Point::new(5, 0));
        assert_eq!(b.curves()[1].end, Point::new(10, 0));
        assert_eq!(b.curves()[2].start, Point::new(10, 0));
        assert!(b.split(9, Point::new(0, 0)).is_none());
    }

    #[test]
    fn test_polylines_reverse_curve_order() {
        let b = open_chain();
        let firsts: Vec<Point> = b.polylines().map(|p| p[0]).collect();
        assert_eq!(firsts, vec![Point::new(10, 10), Point::new(10, 0)]);
    }

    #[test]
    fn test_long_curves_not_drawable() {
        let b = open_chain();
        assert_eq!(b.drawable(2048).len(), 2);
        assert_eq!(b.drawable(5).len(), 0);
    }
}
