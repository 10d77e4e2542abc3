// Image preprocessing module
// Turns the photograph into a binary edge map: grayscale, Gaussian blur, Canny

use anyhow::{Context, Result};
use footsize_common::{BlurConfig, CannyConfig};
use image::{DynamicImage, GrayImage, Luma};
use imageproc::{edges::canny, filter::separable_filter_equal};
use log::debug;
use std::path::Path;

/// Load the photograph from disk
pub fn load_image(path: &Path) -> Result<DynamicImage> {
    let img = image::open(path)
        .with_context(|| format!("failed to open image {}", path.display()))?;
    debug!("loaded {} ({}x{})", path.display(), img.width(), img.height());
    Ok(img)
}

/// Produce the binary edge map (255 on edges, 0 elsewhere)
pub fn preprocess(image: &DynamicImage, blur: &BlurConfig, edges: &CannyConfig) -> GrayImage {
    let gray = image.to_luma8();

    // Square Gaussian kernel applied as two 1D passes
    let kernel = gaussian_kernel(blur.kernel_size, blur.effective_sigma());
    let blurred: GrayImage = separable_filter_equal::<Luma<u8>, f32>(&gray, &kernel);
    debug!(
        "blurred with {}x{} kernel, sigma {:.2}",
        blur.kernel_size,
        blur.kernel_size,
        blur.effective_sigma()
    );

    let edge_map = canny(&blurred, edges.low_threshold, edges.high_threshold);
    debug!(
        "canny ({}, {}): {} edge pixels",
        edges.low_threshold,
        edges.high_threshold,
        edge_map.pixels().filter(|p| p[0] > 0).count()
    );

    edge_map
}

/// Normalized 1D Gaussian of `size` taps centered on the middle tap
fn gaussian_kernel(size: u32, sigma: f32) -> Vec<f32> {
    let radius = (size / 2) as i32;
    let denom = 2.0 * sigma * sigma;

    let mut kernel: Vec<f32> = (-radius..=radius)
        .map(|i| {
            let d = i as f32;
            (-(d * d) / denom).exp()
        })
        .collect();

    let sum: f32 = kernel.iter().sum();
    for k in &mut kernel {
        *k /= sum;
    }
    kernel
}
