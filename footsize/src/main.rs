use anyhow::Result;
use clap::Parser;
use footsize_common::{FootMeasurement, PipelineConfig};
use log::info;
use std::path::{Path, PathBuf};

mod classify;
mod config;
mod measure;
mod outlines;
mod overlay;
mod preprocess;

use config::ConfigOverrides;

/// Measure a foot photographed next to a reference object of known size
#[derive(Parser, Debug)]
#[command(name = "footsize")]
#[command(about = "Estimate foot width and height from a photo with a reference object", long_about = None)]
struct Args {
    /// Input image file path
    #[arg(short, long, default_value = "foot-bottom.jpg")]
    input: PathBuf,

    /// JSON file with pipeline settings
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Reference object width in centimeters
    #[arg(long)]
    reference_width: Option<f64>,

    /// Reference object height in centimeters
    #[arg(long)]
    reference_height: Option<f64>,

    /// Gaussian blur kernel size (odd)
    #[arg(long)]
    blur_kernel: Option<u32>,

    /// Canny low threshold
    #[arg(long)]
    canny_low: Option<f32>,

    /// Canny high threshold
    #[arg(long)]
    canny_high: Option<f32>,

    /// Save an annotated copy of the input to this path
    #[arg(short, long)]
    debug: Option<PathBuf>,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            reference_width_cm: self.reference_width,
            reference_height_cm: self.reference_height,
            blur_kernel: self.blur_kernel,
            canny_low: self.canny_low,
            canny_high: self.canny_high,
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = config::resolve(args.config.as_deref(), &args.overrides())?;
    let measurement = run(&args.input, &config, args.debug.as_deref())?;

    println!("{}", result_line(&measurement));
    Ok(())
}

/// One pass over one image: edges, outlines, classification, measurement
fn run(input: &Path, config: &PipelineConfig, debug_path: Option<&Path>) -> Result<FootMeasurement> {
    // Step 1: Edge map
    let image = preprocess::load_image(input)?;
    let edge_map = preprocess::preprocess(&image, &config.blur, &config.canny);

    // Step 2: External outlines
    let outlines = outlines::extract_outlines(&edge_map);
    info!("found {} outline(s) in {}", outlines.len(), input.display());

    // Step 3: Reference object and foot
    let classified = classify::classify(&outlines)?;
    info!(
        "reference object is outline {}, foot is outline {}",
        classified.reference_index, classified.foot_index
    );

    // Step 4: Scale the foot's box
    let measurement = measure::measure(classified.foot, classified.reference, &config.reference)?;
    info!(
        "reference {} -> foot {:.3} x {:.3} cm",
        config.reference, measurement.width_cm, measurement.height_cm
    );

    if let Some(path) = debug_path {
        overlay::save_overlay(&image, &outlines, &classified, path)?;
    }

    Ok(measurement)
}

fn result_line(measurement: &FootMeasurement) -> String {
    format!("Foot dimensions: {}", measurement)
}

#[cfg(test)]
mod tests {
    use super::*;
    use footsize_common::ReferenceObject;
    use image::{GrayImage, Luma, Rgb, RgbImage};
    use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut};
    use imageproc::rect::Rect;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("footsize-{}-{}", std::process::id(), name))
    }

    #[test]
    fn test_synthetic_edge_map() {
        let mut edges = GrayImage::new(200, 200);
        draw_hollow_rect_mut(&mut edges, Rect::at(20, 20).of_size(50, 50), Luma([255]));
        draw_hollow_rect_mut(&mut edges, Rect::at(110, 60).of_size(30, 80), Luma([255]));

        let outlines = outlines::extract_outlines(&edges);
        assert_eq!(outlines.len(), 2);

        let classified = classify::classify(&outlines).unwrap();
        let m = measure::measure(classified.foot, classified.reference, &ReferenceObject::default()).unwrap();

        assert!((m.width_cm - 2.4).abs() < 1e-9);
        assert!((m.height_cm - 6.4).abs() < 1e-9);
        assert_eq!(
            result_line(&m),
            "Foot dimensions: 2.40 cm (width) x 6.40 cm (height)"
        );
    }

    #[test]
    fn test_result_line_keeps_trailing_zeros() {
        let m = FootMeasurement {
            width_cm: 4.0,
            height_cm: 10.0,
        };
        assert_eq!(
            result_line(&m),
            "Foot dimensions: 4.00 cm (width) x 10.00 cm (height)"
        );
    }

    #[test]
    fn test_photo_end_to_end() {
        let mut photo = RgbImage::from_pixel(300, 300, Rgb([235, 235, 235]));
        draw_filled_rect_mut(&mut photo, Rect::at(20, 20).of_size(100, 100), Rgb([20, 20, 20]));
        draw_filled_rect_mut(&mut photo, Rect::at(170, 100).of_size(60, 160), Rgb([90, 60, 50]));

        let input = temp_path("photo.png");
        let overlay = temp_path("photo-overlay.png");
        photo.save(&input).unwrap();

        let m = run(&input, &PipelineConfig::default(), Some(overlay.as_path())).unwrap();
        assert!(overlay.exists());
        std::fs::remove_file(&input).ok();
        std::fs::remove_file(&overlay).ok();

        assert!((m.width_cm - 2.4).abs() < 0.25, "width {}", m.width_cm);
        assert!((m.height_cm - 6.4).abs() < 0.25, "height {}", m.height_cm);
    }

    #[test]
    fn test_single_outline_edge_map_fails() {
        let mut edges = GrayImage::new(120, 120);
        draw_hollow_rect_mut(&mut edges, Rect::at(30, 30).of_size(50, 50), Luma([255]));

        let outlines = outlines::extract_outlines(&edges);
        assert_eq!(outlines.len(), 1);

        let err = classify::classify(&outlines).unwrap_err();
        assert!(err.to_string().contains("at least two outlines"));
    }

    #[test]
    fn test_missing_input_fails() {
        let err = run(Path::new("missing-foot.jpg"), &PipelineConfig::default(), None).unwrap_err();
        assert!(err.to_string().contains("missing-foot.jpg"));
    }

    #[test]
    fn test_args_default_to_original_input() {
        let args = Args::parse_from(["footsize"]);
        assert_eq!(args.input, PathBuf::from("foot-bottom.jpg"));
        assert!(args.config.is_none());

        let args = Args::parse_from(["footsize", "--reference-width", "8.56", "--canny-low", "30"]);
        let overrides = args.overrides();
        assert_eq!(overrides.reference_width_cm, Some(8.56));
        assert_eq!(overrides.canny_low, Some(30.0));
        assert_eq!(overrides.blur_kernel, None);
    }
}
