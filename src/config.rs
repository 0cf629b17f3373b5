use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::analytics::heatmap::{HeatmapSpec, RateThresholds};
use crate::analytics::summary::SummaryOptions;

// ---------------------------------------------------------------------------
// Analytics configuration
// ---------------------------------------------------------------------------

/// Tunables for the table view and the dashboard aggregates.
///
/// Every field has a default, so a config file only needs the keys it
/// changes:
///
/// ```json
/// { "page_size": 25, "summary": { "high_confidence_threshold": 0.9 } }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    /// Rows per table page.
    pub page_size: usize,
    /// How many page-number links to offer around the current page.
    pub page_window: usize,
    /// Buckets for the confidence distribution over `[0, 1]`.
    pub confidence_buckets: usize,
    /// Buckets for field histograms.
    pub histogram_buckets: usize,
    pub summary: SummaryOptions,
    pub heatmap: HeatmapSpec,
    pub rate_thresholds: RateThresholds,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            page_size: 15,
            page_window: 5,
            confidence_buckets: 10,
            histogram_buckets: 10,
            summary: SummaryOptions::default(),
            heatmap: HeatmapSpec::default(),
            rate_thresholds: RateThresholds::default(),
        }
    }
}

impl AnalyticsConfig {
    /// Read a JSON config file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Read `path` if given, otherwise fall back to the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => {
                let config = Self::load(p)?;
                log::info!("Loaded config from {}", p.display());
                Ok(config)
            }
            None => Ok(Self::default()),
        }
    }
}
