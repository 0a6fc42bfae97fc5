/// Runtime configuration
///
/// Resolved once at start-up and passed into the workflow. Every field has a
/// default, so a missing or partial config file is fine.
use serde::{Deserialize, Serialize};
use std::ops::Range;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{ScanError, ScanResult};

/// Environment variable pointing at an alternative config file
pub const CONFIG_ENV_VAR: &str = "POULTRY_SCAN_CONFIG";

/// Delay window before a simulated classification completes
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct DelayWindow {
    /// Inclusive lower bound in milliseconds
    pub min: u64,
    /// Exclusive upper bound in milliseconds
    pub max: u64,
}

impl Default for DelayWindow {
    fn default() -> Self {
        Self { min: 2000, max: 4000 }
    }
}

impl DelayWindow {
    pub fn range(&self) -> Range<Duration> {
        Duration::from_millis(self.min)..Duration::from_millis(self.max)
    }
}

/// Confidence range of the simulated classifier
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct ConfidenceRange {
    pub min: f32,
    pub max: f32,
}

impl Default for ConfidenceRange {
    fn default() -> Self {
        Self { min: 0.70, max: 1.0 }
    }
}

impl ConfidenceRange {
    pub fn range(&self) -> Range<f32> {
        self.min..self.max
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ScanConfig {
    pub classify_delay_ms: DelayWindow,
    pub confidence: ConfidenceRange,
    /// Where previews are cached; `<cache_dir>/poultry-scan/previews` if unset
    pub preview_dir: Option<PathBuf>,
    /// Longest edge of a preview thumbnail in pixels
    pub thumbnail_size: u32,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            classify_delay_ms: DelayWindow::default(),
            confidence: ConfidenceRange::default(),
            preview_dir: None,
            thumbnail_size: 256,
        }
    }
}

impl ScanConfig {
    /// Parse a config from JSON without validating it
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load and validate the config file at `path`.
    /// A missing file yields the defaults.
    pub fn load(path: &Path) -> ScanResult<Self> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ScanError::ConfigRead {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let config = Self::from_json(&contents).map_err(|source| ScanError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;

        tracing::info!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Config file location: `$POULTRY_SCAN_CONFIG`, otherwise
    /// `<config_dir>/poultry-scan/config.json`
    pub fn resolve_path(override_path: Option<PathBuf>) -> Option<PathBuf> {
        if let Some(path) = override_path.filter(|p| !p.as_os_str().is_empty()) {
            return Some(path);
        }

        let mut path = dirs::config_dir()?;
        path.push("poultry-scan");
        path.push("config.json");
        Some(path)
    }

    pub fn validate(&self) -> ScanResult<()> {
        let delay = self.classify_delay_ms;
        if delay.min > delay.max {
            return Err(ScanError::InvalidConfig(format!(
                "classify_delay_ms.min ({}) must not exceed classify_delay_ms.max ({})",
                delay.min, delay.max
            )));
        }

        let confidence = self.confidence;
        let in_unit = |v: f32| (0.0..=1.0).contains(&v);
        if !in_unit(confidence.min) || !in_unit(confidence.max) || confidence.min > confidence.max {
            return Err(ScanError::InvalidConfig(format!(
                "confidence range [{}, {}) must lie within [0, 1] with min <= max",
                confidence.min, confidence.max
            )));
        }

        if self.thumbnail_size == 0 {
            return Err(ScanError::InvalidConfig(
                "thumbnail_size must be positive".into(),
            ));
        }

        Ok(())
    }
}
