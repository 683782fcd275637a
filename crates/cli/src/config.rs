use std::fs;
use std::path::{Path, PathBuf};

use facemerge_core::merging::domain::merge_thresholds::MergeThresholds;
use serde::{Deserialize, Serialize};

/// Merge thresholds as stored on disk. Missing keys take the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdConfig {
    pub distance: f64,
    pub encoding: f64,
    pub intersect: f64,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        let defaults = MergeThresholds::default();
        Self {
            distance: defaults.distance,
            encoding: defaults.encoding,
            intersect: defaults.intersect,
        }
    }
}

impl ThresholdConfig {
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("FaceMerge").join("thresholds.json"))
    }

    /// Reads `path` when given; otherwise the per-user config file if it
    /// exists; otherwise the built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, Box<dyn std::error::Error>> {
        match path {
            Some(p) => Self::read(p),
            None => match Self::default_path().filter(|p| p.exists()) {
                Some(p) => Self::read(&p),
                None => Ok(Self::default()),
            },
        }
    }

    fn read(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let json = fs::read_to_string(path)
            .map_err(|e| format!("failed to read config {}: {e}", path.display()))?;
        let config = serde_json::from_str(&json)
            .map_err(|e| format!("invalid config {}: {e}", path.display()))?;
        log::debug!("loaded thresholds from {}", path.display());
        Ok(config)
    }

    pub fn with_overrides(
        mut self,
        distance: Option<f64>,
        encoding: Option<f64>,
        intersect: Option<f64>,
    ) -> Self {
        if let Some(d) = distance {
            self.distance = d;
        }
        if let Some(e) = encoding {
            self.encoding = e;
        }
        if let Some(i) = intersect {
            self.intersect = i;
        }
        self
    }

    pub fn validate(&self) -> Result<(), Box<dyn std::error::Error>> {
        if !(self.distance.is_finite() && self.distance > 0.0) {
            return Err(format!(
                "Distance threshold must be positive, got {}",
                self.distance
            )
            .into());
        }
        if !(self.encoding.is_finite() && self.encoding > 0.0) {
            return Err(format!(
                "Encoding threshold must be positive, got {}",
                self.encoding
            )
            .into());
        }
        if !(0.0..=1.0).contains(&self.intersect) {
            return Err(format!(
                "Intersect threshold must be between 0.0 and 1.0, got {}",
                self.intersect
            )
            .into());
        }
        Ok(())
    }

    pub fn to_thresholds(&self) -> MergeThresholds {
        MergeThresholds::new(self.distance, self.encoding, self.intersect)
    }
}
