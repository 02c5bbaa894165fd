//! Configuration of the demo tool.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::builder::Keypoint;
use crate::detector::OrientationParams;

#[derive(Debug, Deserialize)]
pub struct DemoConfig {
    /// Grayscale input image.
    pub input: PathBuf,
    /// Keypoint to analyse.
    pub keypoint: Keypoint,
    #[serde(default)]
    pub params: OrientationParams,
    #[serde(default)]
    pub output: DemoOutputConfig,
}

/// Output destinations; absent entries are skipped.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DemoOutputConfig {
    /// Histogram dump of the a-contrario path.
    pub histogram_txt: Option<PathBuf>,
    /// Contributing-pixel count of the a-contrario histogram.
    pub pixel_count_txt: Option<PathBuf>,
    /// Mode report of the a-contrario path.
    pub modes_txt: Option<PathBuf>,
    /// Histogram dump of the peak path.
    pub peaks_histogram_txt: Option<PathBuf>,
    /// Peak report of the peak path.
    pub peaks_txt: Option<PathBuf>,
    /// Combined JSON report.
    pub report_json: Option<PathBuf>,
}

pub fn load_config(path: &Path) -> Result<DemoConfig, String> {
    let data = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    serde_json::from_str(&data)
        .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
}
