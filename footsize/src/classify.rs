// Object classification module
// Largest outline is the reference object, largest of the rest is the foot

use anyhow::{bail, ensure, Result};
use footsize_common::Outline;
use imageproc::geometry::contour_area;
use imageproc::point::Point;
use log::debug;

/// The two outlines the measurement is taken from
#[derive(Debug, Clone, Copy)]
pub struct Classified<'a> {
    pub reference_index: usize,
    pub reference: &'a Outline,
    pub foot_index: usize,
    pub foot: &'a Outline,
}

/// Index of the outline enclosing the largest area.
/// On ties the first one encountered wins.
pub fn select_reference(outlines: &[Outline]) -> Result<usize> {
    match largest_outline(outlines, None) {
        Some((index, area)) => {
            debug!("reference object: outline {} (area {:.1}px²)", index, area);
            Ok(index)
        }
        None => bail!("no outlines found in edge map"),
    }
}

/// Index of the largest-area outline other than the reference.
///
/// The reference is excluded by position, so an outline that happens to
/// have the same points as the reference still competes.
pub fn select_foot(outlines: &[Outline], reference_index: usize) -> Result<usize> {
    ensure!(
        reference_index < outlines.len(),
        "reference index {} out of range for {} outlines",
        reference_index,
        outlines.len()
    );

    match largest_outline(outlines, Some(reference_index)) {
        Some((index, area)) => {
            debug!("foot: outline {} (area {:.1}px²)", index, area);
            Ok(index)
        }
        None => bail!(
            "need at least two outlines (reference object and foot), found {}",
            outlines.len()
        ),
    }
}

/// Pick the reference object and the foot out of the extracted outlines
pub fn classify(outlines: &[Outline]) -> Result<Classified<'_>> {
    let reference_index = select_reference(outlines)?;
    let foot_index = select_foot(outlines, reference_index)?;

    Ok(Classified {
        reference_index,
        reference: &outlines[reference_index],
        foot_index,
        foot: &outlines[foot_index],
    })
}

/// Enclosed polygon area in square pixels, orientation ignored
pub fn outline_area(outline: &Outline) -> f64 {
    let points: Vec<Point<i32>> = outline.points.iter().map(|p| Point::new(p.x, p.y)).collect();
    contour_area(&points)
}

fn largest_outline(outlines: &[Outline], skip: Option<usize>) -> Option<(usize, f64)> {
    let mut best: Option<(usize, f64)> = None;

    for (index, outline) in outlines.iter().enumerate() {
        if Some(index) == skip {
            continue;
        }
        let area = outline_area(outline);
        // strict comparison keeps the first maximum
        match best {
            Some((_, best_area)) if area <= best_area => {}
            _ => best = Some((index, area)),
        }
    }

    best
}
