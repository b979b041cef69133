//! Sampler configuration

use cloudsampler_core::{Error, Result};
use cloudsampler_io::XyzWriteOptions;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration shared by every sample a [`crate::PointCloudSource`] computes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplerConfig {
    /// Keep per-point colors in grid samples
    pub carry_colors: bool,
    /// Reduce voxel buckets on the rayon pool
    pub parallel: bool,
    /// Layout of written sample files
    pub output: XyzWriteOptions,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            carry_colors: true,
            parallel: true,
            output: XyzWriteOptions::default(),
        }
    }
}

impl SamplerConfig {
    /// Load a configuration from a JSON file; missing fields take defaults
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let config_error = |message: String| Error::Config {
            path: path.to_path_buf(),
            message,
        };

        let text = std::fs::read_to_string(path).map_err(|e| config_error(e.to_string()))?;
        serde_json::from_str(&text).map_err(|e| config_error(e.to_string()))
    }
}
