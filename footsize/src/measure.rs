// Measurement module
// Converts the foot's bounding box from pixels to centimeters using the reference object

use anyhow::{bail, Context, Result};
use footsize_common::{BoundingBox, FootMeasurement, Outline, ReferenceObject, ScaleFactors};
use log::debug;

/// Centimeters per pixel on each axis, from the reference object's box.
/// The two axes are independent; a non-square box gives different factors.
pub fn scale_factors(reference_box: &BoundingBox, reference: &ReferenceObject) -> Result<ScaleFactors> {
    if reference_box.is_degenerate() {
        bail!(
            "reference outline has a degenerate bounding box ({})",
            reference_box
        );
    }

    Ok(ScaleFactors {
        width_cm_per_px: reference.width_cm / reference_box.width as f64,
        height_cm_per_px: reference.height_cm / reference_box.height as f64,
    })
}

/// Real-world width and height of the foot outline's bounding box
pub fn measure(
    foot: &Outline,
    reference_outline: &Outline,
    reference: &ReferenceObject,
) -> Result<FootMeasurement> {
    let reference_box = reference_outline
        .bounding_box()
        .context("reference outline has no points")?;
    let foot_box = foot.bounding_box().context("foot outline has no points")?;
    debug!("reference box: {}", reference_box);
    debug!("foot box: {}", foot_box);

    let scale = scale_factors(&reference_box, reference)?;
    debug!(
        "scale: {:.5} cm/px (width), {:.5} cm/px (height)",
        scale.width_cm_per_px, scale.height_cm_per_px
    );

    Ok(FootMeasurement {
        width_cm: foot_box.width as f64 * scale.width_cm_per_px,
        height_cm: foot_box.height as f64 * scale.height_cm_per_px,
    })
}
