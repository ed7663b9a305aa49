//! Turning solver back-links into pixel paths.

use crate::config::ScissorsOptions;
use crate::selection::boundary::Point;
use crate::selection::cost::MOVES;
use crate::selection::gradient::GradientField;
use crate::selection::solver::{find_optimal_path, DpBuffer, SearchWindow};
use crate::selection::source::PixelSource;

/// Follow back-links from `end` until the seed cell.
///
/// # Returns
/// Points from `end` to the seed, both included. The walk gives up after
/// one step per window cell, which only happens if the links form a cycle.
pub fn plot_pixels(buf: &DpBuffer, end: Point) -> Vec<Point> {
    let max_steps = buf.window().area();
    let mut points = Vec::new();
    let mut p = end;

    loop {
        let Some(cell) = buf.get(p) else {
            log::warn!("trace left the search window at ({}, {})", p.x, p.y);
            break;
        };
        points.push(p);

        if cell.is_seed() {
            break;
        }
        if points.len() > max_steps {
            log::warn!(
                "trace from ({}, {}) did not reach the seed in {max_steps} steps",
                end.x,
                end.y
            );
            break;
        }

        let Some(&(dx, dy)) = MOVES.get(cell.link() as usize) else {
            log::warn!("invalid link {} at ({}, {})", cell.link(), p.x, p.y);
            break;
        };
        p = Point::new(p.x + dx, p.y + dy);
    }

    points
}

/// Axis-aligned segments need no search.
///
/// # Returns
/// Points from `end` to `start` inclusive when the two share a row or a
/// column, otherwise `None`.
pub fn straight_run(start: Point, end: Point) -> Option<Vec<Point>> {
    if start.x != end.x && start.y != end.y {
        return None;
    }

    let dx = (start.x - end.x).signum();
    let dy = (start.y - end.y).signum();
    let steps = (start.x - end.x).abs().max((start.y - end.y).abs());

    Some(
        (0..=steps)
            .map(|k| Point::new(end.x + k * dx, end.y + k * dy))
            .collect(),
    )
}

/// Trace the cheapest path from `start` to `end`.
///
/// Endpoints are clamped to the image first.
///
/// # Returns
/// Points from `end` back to `start`.
pub fn calculate_curve<S: PixelSource>(
    field: &mut GradientField<S>,
    start: Point,
    end: Point,
    options: &ScissorsOptions,
) -> Vec<Point> {
    let (width, height) = (field.width(), field.height());
    let start = start.clamped(width, height);
    let end = end.clamped(width, height);

    if let Some(points) = straight_run(start, end) {
        return points;
    }

    let window = SearchWindow::with_options(start, end, width, height, options);
    let buf = find_optimal_path(field, window, start);
    plot_pixels(&buf, end)
}
