//! JSON output format for analysis results
//!
//! Every document shares one envelope (`version`, `format`, `title`, load
//! counters); the analysis sections are present only for the subcommand that
//! produced them.

use crate::distribution::Distribution;
use crate::loader::LoadStats;
use crate::series::ParallelismReport;
use crate::timeline::Timeline;
use serde::Serialize;

/// Format identifier written into every document
pub const FORMAT_NAME: &str = "txpar-json-v1";

/// Timeline section with the lane budget the chart reserves
#[derive(Debug, Clone, Serialize)]
pub struct JsonTimeline {
    pub max_y: i64,
    pub lanes: usize,
    #[serde(flatten)]
    pub timeline: Timeline,
}

/// Root JSON output structure
#[derive(Debug, Clone, Serialize)]
pub struct JsonOutput {
    /// Crate version that produced the document
    pub version: String,
    /// Format name
    pub format: String,
    pub title: String,
    pub load: LoadStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parallelism: Option<ParallelismReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distribution: Option<Distribution>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeline: Option<JsonTimeline>,
}

impl JsonOutput {
    /// Create an envelope with no analysis sections
    pub fn new(title: impl Into<String>, load: LoadStats) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            format: FORMAT_NAME.to_string(),
            title: title.into(),
            load,
            parallelism: None,
            distribution: None,
            timeline: None,
        }
    }

    pub fn with_parallelism(mut self, report: ParallelismReport) -> Self {
        self.parallelism = Some(report);
        self
    }

    pub fn with_distribution(mut self, distribution: Distribution) -> Self {
        self.distribution = Some(distribution);
        self
    }

    pub fn with_timeline(mut self, timeline: Timeline, max_y: i64) -> Self {
        self.timeline = Some(JsonTimeline {
            max_y,
            lanes: timeline.lane_count(),
            timeline,
        });
        self
    }

    /// Serialize as pretty-printed JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
