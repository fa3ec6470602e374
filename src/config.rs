//! Analysis configuration
//!
//! Settings can come from a TOML file; any field left out takes its default,
//! and command-line flags override whatever the file says.
//!
//! # Example txpar.toml
//!
//! ```toml
//! title = "bank-transfer, 16 threads"
//! workers = 4
//!
//! [timeline]
//! scale = 1000
//! min_x = 0
//! max_x = 500
//! shift_x = 120
//! max_y = 16
//! ```

use crate::error::TraceError;
use crate::timeline::{Scale, DEFAULT_SCALE};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Root configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Chart title passed through to the output
    pub title: String,

    /// Threads used to compute slots (1 = sequential)
    pub workers: usize,

    pub timeline: TimelineConfig,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            title: "Timeline".to_string(),
            workers: 1,
            timeline: TimelineConfig::default(),
        }
    }
}

/// Timeline axis settings, in scaled units unless noted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineConfig {
    /// Raw timestamp units per x unit
    pub scale: u64,
    pub min_x: i64,
    pub max_x: i64,
    pub shift_x: i64,
    /// Highest lane the chart reserves room for
    pub max_y: i64,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            scale: DEFAULT_SCALE,
            min_x: 0,
            max_x: 1000,
            shift_x: 0,
            max_y: 16,
        }
    }
}

impl TimelineConfig {
    pub fn scale(&self) -> Scale {
        Scale {
            scale: self.scale,
            shift_x: self.shift_x,
        }
    }
}

impl AnalysisConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        Self::from_toml_str(&content).with_context(|| format!("In {}", path.display()))
    }

    /// Load configuration from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).context("Failed to parse TOML")?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the analysis cannot run with
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.workers == 0 {
            return Err(TraceError::InvalidConfig(
                "workers must be >= 1".to_string(),
            ));
        }
        if self.timeline.scale == 0 {
            return Err(TraceError::InvalidConfig(
                "timeline.scale must be >= 1".to_string(),
            ));
        }
        if self.timeline.min_x > self.timeline.max_x {
            return Err(TraceError::InvalidConfig(format!(
                "timeline.min_x ({}) exceeds timeline.max_x ({})",
                self.timeline.min_x, self.timeline.max_x
            )));
        }
        Ok(())
    }
}
