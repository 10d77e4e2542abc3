// Debug overlay
// Draws the extracted outlines and the chosen bounding boxes over the photograph

use anyhow::{Context, Result};
use footsize_common::{BoundingBox, Outline};
use image::{DynamicImage, Rgb, RgbImage};
use imageproc::drawing::{draw_hollow_rect_mut, draw_line_segment_mut};
use imageproc::rect::Rect;
use log::info;
use std::path::Path;

use crate::classify::Classified;

const OUTLINE_COLOR: Rgb<u8> = Rgb([128, 128, 128]);
const REFERENCE_COLOR: Rgb<u8> = Rgb([0, 0, 255]);
const FOOT_COLOR: Rgb<u8> = Rgb([0, 255, 0]);

/// Save the photograph annotated with every outline (gray), the reference
/// object's box (blue) and the foot's box (green)
pub fn save_overlay(
    image: &DynamicImage,
    outlines: &[Outline],
    classified: &Classified<'_>,
    path: &Path,
) -> Result<()> {
    let canvas = draw_overlay(image, outlines, classified);
    canvas
        .save(path)
        .with_context(|| format!("failed to save debug overlay {}", path.display()))?;
    info!("saved debug overlay to {}", path.display());
    Ok(())
}

fn draw_overlay(image: &DynamicImage, outlines: &[Outline], classified: &Classified<'_>) -> RgbImage {
    let mut canvas = image.to_rgb8();

    for outline in outlines {
        let n = outline.points.len();
        for i in 0..n {
            let p1 = outline.points[i];
            let p2 = outline.points[(i + 1) % n];
            draw_line_segment_mut(
                &mut canvas,
                (p1.x as f32, p1.y as f32),
                (p2.x as f32, p2.y as f32),
                OUTLINE_COLOR,
            );
        }
    }

    if let Some(bbox) = classified.reference.bounding_box() {
        draw_box(&mut canvas, &bbox, REFERENCE_COLOR);
    }
    if let Some(bbox) = classified.foot.bounding_box() {
        draw_box(&mut canvas, &bbox, FOOT_COLOR);
    }

    canvas
}

/// Two pixel wide box just outside the bounding box
fn draw_box(canvas: &mut RgbImage, bbox: &BoundingBox, color: Rgb<u8>) {
    for grow in 1..=2 {
        let rect = Rect::at(bbox.x - grow, bbox.y - grow)
            .of_size(bbox.width + 2 * grow as u32, bbox.height + 2 * grow as u32);
        draw_hollow_rect_mut(canvas, rect, color);
    }
}
