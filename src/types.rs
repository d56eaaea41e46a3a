use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::traversal::{FocusedElement, TraversalSummary};

/// Output format for CLI results
#[derive(Clone, Copy, Debug, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// JSON format for programmatic consumption
    Json,
    /// Human-readable simple format
    Simple,
}

/// Browser viewport dimensions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewportSize {
    /// Viewport width in pixels
    pub width: u32,
    /// Viewport height in pixels
    pub height: u32,
}

impl ViewportSize {
    /// Parse viewport size from "WIDTHxHEIGHT" format (e.g., "1920x1080")
    pub fn parse(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split('x').collect();
        if parts.len() != 2 {
            anyhow::bail!("Viewport must be in WIDTHxHEIGHT format (e.g., 1920x1080)");
        }
        let width = parts[0]
            .parse::<u32>()
            .map_err(|_| anyhow::anyhow!("Invalid viewport width: {}", parts[0]))?;
        let height = parts[1]
            .parse::<u32>()
            .map_err(|_| anyhow::anyhow!("Invalid viewport height: {}", parts[1]))?;
        Ok(ViewportSize { width, height })
    }
}

/// Result of one focus-order discovery run
#[derive(Debug, Serialize, Deserialize)]
pub struct FocusOrderReport {
    /// Page that was traversed
    pub url: String,
    /// Browser type (Firefox, Chrome)
    pub browser: String,
    /// Marker attribute used as the visited flag
    pub marker_attribute: String,
    /// Step accounting for the traversal itself
    pub traversal: TraversalSummary,
    /// Elements carrying the visited marker, queried after the run
    pub marked_elements: Vec<FocusedElement>,
    /// When the run finished
    pub finished_at: chrono::DateTime<chrono::Utc>,
}

/// A hover trigger whose hovering changed the page's visible-element count
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HoverImpact {
    /// Short description of the trigger element
    pub trigger: FocusedElement,
    /// Visible elements added (positive) or removed (negative)
    pub delta: i64,
}

/// Result of the hover-impact scan
#[derive(Debug, Serialize, Deserialize)]
pub struct HoverReport {
    pub url: String,
    /// Trigger elements subjected to hovering
    pub triggers: usize,
    /// Triggers whose hover failed (skipped, not fatal)
    pub skipped: usize,
    /// Count of triggers with a nonzero impact
    pub impact_count: usize,
    /// Per-trigger impacts, present when itemization was requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub impacts: Option<Vec<HoverImpact>>,
}

/// Page statistics extracted from a WAVE scan response
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct WaveStatistics {
    #[serde(default)]
    pub page_title: String,
    #[serde(default)]
    pub page_url: String,
    #[serde(default)]
    pub time: Option<f64>,
    #[serde(default)]
    pub credits_remaining: Option<i64>,
    #[serde(default)]
    pub all_item_count: Option<i64>,
    #[serde(default)]
    pub total_elements: Option<i64>,
}

/// Result of a remote WAVE scan
#[derive(Debug, Serialize, Deserialize)]
pub struct WaveReport {
    pub url: String,
    /// WAVE report type (1-4)
    pub report_type: u8,
    /// True when the scan could not produce a usable result
    #[serde(default)]
    pub prevented: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Violation categories kept after pruning (error, contrast, alert)
    pub categories: serde_json::Value,
    pub statistics: WaveStatistics,
}

/// Result of an injected ASLint run
#[derive(Debug, Serialize, Deserialize)]
pub struct AslintReport {
    pub url: String,
    #[serde(default)]
    pub prevented: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Rule results, with passed and skipped rules removed
    pub rules: serde_json::Value,
}

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;
