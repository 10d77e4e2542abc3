// Configuration loading
// Defaults, then an optional JSON file, then command line overrides

use anyhow::{anyhow, Context, Result};
use footsize_common::PipelineConfig;
use std::fs;
use std::path::Path;

/// Values given on the command line; `None` keeps what the config already has
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfigOverrides {
    pub reference_width_cm: Option<f64>,
    pub reference_height_cm: Option<f64>,
    pub blur_kernel: Option<u32>,
    pub canny_low: Option<f32>,
    pub canny_high: Option<f32>,
}

impl ConfigOverrides {
    pub fn apply(&self, config: &mut PipelineConfig) {
        if let Some(w) = self.reference_width_cm {
            config.reference.width_cm = w;
        }
        if let Some(h) = self.reference_height_cm {
            config.reference.height_cm = h;
        }
        if let Some(k) = self.blur_kernel {
            config.blur.kernel_size = k;
        }
        if let Some(low) = self.canny_low {
            config.canny.low_threshold = low;
        }
        if let Some(high) = self.canny_high {
            config.canny.high_threshold = high;
        }
    }
}

/// Read a `PipelineConfig` from a JSON file. Sections left out keep their defaults.
pub fn load_config(path: &Path) -> Result<PipelineConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    serde_json::from_str(&data)
        .with_context(|| format!("failed to parse config {}", path.display()))
}

/// Build the effective configuration and check it
pub fn resolve(path: Option<&Path>, overrides: &ConfigOverrides) -> Result<PipelineConfig> {
    let mut config = match path {
        Some(path) => load_config(path)?,
        None => PipelineConfig::default(),
    };
    overrides.apply(&mut config);

    config
        .validate()
        .map_err(|reason| anyhow!("invalid configuration: {}", reason))?;
    Ok(config)
}
