// Outline extraction module
// Traces the external borders of an edge map and compresses them to their corners

use footsize_common::{Outline, PixelPoint};
use image::GrayImage;
use imageproc::contours::{find_contours, BorderType, Contour};
use log::debug;

/// Find the outermost outlines in a binary edge map.
/// Hole borders, and anything nested inside a hole, are not reported.
pub fn extract_outlines(edge_map: &GrayImage) -> Vec<Outline> {
    let contours: Vec<Contour<i32>> = find_contours(edge_map);
    let traced = contours.len();

    let outlines: Vec<Outline> = contours
        .into_iter()
        .filter(|c| c.border_type == BorderType::Outer && c.parent.is_none())
        .map(|c| {
            let points: Vec<PixelPoint> = c
                .points
                .iter()
                .map(|p| PixelPoint::new(p.x, p.y))
                .collect();
            Outline::new(compress_chain(&points))
        })
        .collect();

    debug!(
        "traced {} borders, kept {} external outlines",
        traced,
        outlines.len()
    );

    outlines
}

/// Drop the interior points of straight runs (horizontal, vertical or
/// diagonal) of a closed chain, keeping only the points where the
/// direction changes.
fn compress_chain(points: &[PixelPoint]) -> Vec<PixelPoint> {
    let n = points.len();
    if n < 3 {
        return points.to_vec();
    }

    let step = |from: PixelPoint, to: PixelPoint| ((to.x - from.x).signum(), (to.y - from.y).signum());

    let corners: Vec<PixelPoint> = (0..n)
        .filter(|&i| {
            let prev = points[(i + n - 1) % n];
            let next = points[(i + 1) % n];
            step(prev, points[i]) != step(points[i], next)
        })
        .map(|i| points[i])
        .collect();

    if corners.is_empty() {
        points.to_vec()
    } else {
        corners
    }
}
