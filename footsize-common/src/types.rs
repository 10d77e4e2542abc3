use serde::{Deserialize, Serialize};
use std::fmt;

/// 2D point in pixel coordinates (x grows right, y grows down)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PixelPoint {
    pub x: i32,
    pub y: i32,
}

impl PixelPoint {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Closed outline traced on an edge map, stored as its ordered boundary points
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Outline {
    pub points: Vec<PixelPoint>,
}

impl Outline {
    pub fn new(points: Vec<PixelPoint>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Axis-aligned bounding box, `None` for an outline without points
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        BoundingBox::from_points(&self.points)
    }
}

/// Axis-aligned rectangle in pixels.
///
/// Width and height count pixels inclusively, so a box around a single
/// point is 1×1 and a box spanning x = 10..=59 is 50 pixels wide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl BoundingBox {
    pub fn from_points(points: &[PixelPoint]) -> Option<Self> {
        let first = points.first()?;

        let (mut min_x, mut min_y) = (first.x, first.y);
        let (mut max_x, mut max_y) = (first.x, first.y);
        for pt in &points[1..] {
            min_x = min_x.min(pt.x);
            min_y = min_y.min(pt.y);
            max_x = max_x.max(pt.x);
            max_y = max_y.max(pt.y);
        }

        Some(Self {
            x: min_x,
            y: min_y,
            width: (max_x - min_x) as u32 + 1,
            height: (max_y - min_y) as u32 + 1,
        })
    }

    /// Boxes built by `from_points` are at least 1×1, so only a
    /// hand-built box can be degenerate
    pub fn is_degenerate(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{} px at ({}, {})", self.width, self.height, self.x, self.y)
    }
}

/// Physical size of the reference object photographed next to the foot
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferenceObject {
    pub width_cm: f64,
    pub height_cm: f64,
}

impl Default for ReferenceObject {
    /// 4 cm square tile
    fn default() -> Self {
        Self {
            width_cm: 4.0,
            height_cm: 4.0,
        }
    }
}

impl fmt::Display for ReferenceObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}×{} cm", self.width_cm, self.height_cm)
    }
}

/// Centimeters per pixel along each image axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaleFactors {
    pub width_cm_per_px: f64,
    pub height_cm_per_px: f64,
}

/// Real-world size of the foot's bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FootMeasurement {
    pub width_cm: f64,
    pub height_cm: f64,
}

impl fmt::Display for FootMeasurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.2} cm (width) x {:.2} cm (height)",
            self.width_cm, self.height_cm
        )
    }
}

/// Largest accepted blur kernel side
pub const MAX_BLUR_KERNEL: u32 = 255;

/// Gaussian blur applied before edge detection
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlurConfig {
    /// Side of the square kernel, odd and at most `MAX_BLUR_KERNEL`
    pub kernel_size: u32,
    /// Standard deviation; 0 derives it from `kernel_size`
    pub sigma: f32,
}

impl BlurConfig {
    /// Sigma actually used for blurring.
    ///
    /// A zero sigma is derived from the kernel size with the usual
    /// `0.3 * ((ksize - 1) * 0.5 - 1) + 0.8` rule (7 -> 1.4).
    pub fn effective_sigma(&self) -> f32 {
        if self.sigma > 0.0 {
            return self.sigma;
        }
        0.3 * ((self.kernel_size as f32 - 1.0) * 0.5 - 1.0) + 0.8
    }
}

impl Default for BlurConfig {
    fn default() -> Self {
        Self {
            kernel_size: 7,
            sigma: 0.0,
        }
    }
}

/// Canny hysteresis thresholds on gradient magnitude
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CannyConfig {
    pub low_threshold: f32,
    pub high_threshold: f32,
}

impl Default for CannyConfig {
    fn default() -> Self {
        Self {
            low_threshold: 50.0,
            high_threshold: 150.0,
        }
    }
}

/// Every tunable of the measuring pipeline. Missing sections in a
/// config file fall back to their defaults.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub reference: ReferenceObject,
    pub blur: BlurConfig,
    pub canny: CannyConfig,
}

impl PipelineConfig {
    /// Check the values the pipeline cannot work with
    pub fn validate(&self) -> Result<(), String> {
        let r = &self.reference;
        if !(r.width_cm.is_finite() && r.width_cm > 0.0) {
            return Err(format!("reference width must be positive, got {}", r.width_cm));
        }
        if !(r.height_cm.is_finite() && r.height_cm > 0.0) {
            return Err(format!("reference height must be positive, got {}", r.height_cm));
        }

        if self.blur.kernel_size == 0 || self.blur.kernel_size % 2 == 0 {
            return Err(format!(
                "blur kernel size must be odd, got {}",
                self.blur.kernel_size
            ));
        }
        if self.blur.kernel_size > MAX_BLUR_KERNEL {
            return Err(format!(
                "blur kernel size must be at most {}, got {}",
                MAX_BLUR_KERNEL, self.blur.kernel_size
            ));
        }
        if !(self.blur.sigma >= 0.0) {
            return Err(format!("blur sigma must not be negative, got {}", self.blur.sigma));
        }

        let c = &self.canny;
        if !(c.low_threshold.is_finite() && c.low_threshold > 0.0) {
            return Err(format!("canny low threshold must be positive, got {}", c.low_threshold));
        }
        if !c.high_threshold.is_finite() {
            return Err(format!("canny high threshold must be finite, got {}", c.high_threshold));
        }
        if c.low_threshold > c.high_threshold {
            return Err(format!(
                "canny low threshold {} exceeds high threshold {}",
                c.low_threshold, c.high_threshold
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect_outline(x: i32, y: i32, w: i32, h: i32) -> Outline {
        Outline::new(vec![
            PixelPoint::new(x, y),
            PixelPoint::new(x, y + h - 1),
            PixelPoint::new(x + w - 1, y + h - 1),
            PixelPoint::new(x + w - 1, y),
        ])
    }

    #[test]
    fn test_bounding_box_is_inclusive() {
        let bbox = rect_outline(10, 20, 30, 80).bounding_box().unwrap();
        assert_eq!(
            bbox,
            BoundingBox {
                x: 10,
                y: 20,
                width: 30,
                height: 80
            }
        );

        let single = Outline::new(vec![PixelPoint::new(3, 4)]);
        let bbox = single.bounding_box().unwrap();
        assert_eq!((bbox.width, bbox.height), (1, 1));
        assert!(!bbox.is_degenerate());

        assert!(Outline::default().bounding_box().is_none());
    }

    #[test]
    fn test_measurement_display_has_two_decimals() {
        let m = FootMeasurement {
            width_cm: 4.0,
            height_cm: 26.456,
        };
        assert_eq!(m.to_string(), "4.00 cm (width) x 26.46 cm (height)");
    }

    #[test]
    fn test_effective_sigma() {
        assert!((BlurConfig::default().effective_sigma() - 1.4).abs() < 1e-6);
        let explicit = BlurConfig {
            kernel_size: 7,
            sigma: 2.5,
        };
        assert_eq!(explicit.effective_sigma(), 2.5);
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = PipelineConfig::default();
        assert_eq!(config.reference.width_cm, 4.0);
        assert_eq!(config.reference.height_cm, 4.0);
        assert_eq!(config.blur.kernel_size, 7);
        assert_eq!(config.canny.low_threshold, 50.0);
        assert_eq!(config.canny.high_threshold, 150.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = PipelineConfig::default();
        config.reference.width_cm = 0.0;
        assert!(config.validate().is_err());

        let mut config = PipelineConfig::default();
        config.reference.height_cm = f64::NAN;
        assert!(config.validate().is_err());

        let mut config = PipelineConfig::default();
        config.blur.kernel_size = 6;
        assert!(config.validate().is_err());

        let mut config = PipelineConfig::default();
        config.blur.sigma = -1.0;
        assert!(config.validate().is_err());

        let mut config = PipelineConfig::default();
        config.canny.low_threshold = 200.0;
        let err = config.validate().unwrap_err();
        assert!(err.contains("exceeds"));
    }

    #[test]
    fn test_validate_caps_kernel_size() {
        let mut config = PipelineConfig::default();
        config.blur.kernel_size = MAX_BLUR_KERNEL;
        assert!(config.validate().is_ok());

        config.blur.kernel_size = 100_001;
        let err = config.validate().unwrap_err();
        assert!(err.contains("at most"));
    }

    #[test]
    fn test_validate_rejects_non_finite_thresholds() {
        let mut config = PipelineConfig::default();
        config.canny.high_threshold = f32::NAN;
        assert!(config.validate().is_err());

        let mut config = PipelineConfig::default();
        config.canny.high_threshold = f32::INFINITY;
        assert!(config.validate().is_err());

        let mut config = PipelineConfig::default();
        config.canny.low_threshold = f32::NAN;
        assert!(config.validate().is_err());
    }
}
