//! Remote scan client for the WebAIM WAVE API.
//!
//! One GET against `wave.webaim.org/api/request`; the response is pruned
//! to the violation categories (error, contrast, alert) and optionally
//! filtered to a rule whitelist before being reported.

use anyhow::{Context, Result};
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::types::{WaveReport, WaveStatistics};

const WAVE_ENDPOINT: &str = "https://wave.webaim.org/api/request";

/// Categories WAVE reports that are not violations
const PRUNED_CATEGORIES: [&str; 3] = ["feature", "structure", "aria"];

/// Categories that may carry rule violations
const VIOLATION_CATEGORIES: [&str; 3] = ["error", "contrast", "alert"];

pub struct WaveOptions {
    /// WAVE report type (1-4)
    pub report_type: u8,
    /// API key; without one the service rejects the request
    pub key: Option<String>,
    /// When nonempty, keep only these rule IDs
    pub rules: Vec<String>,
}

/// Build the API request URL for a page scan.
pub fn request_url(page_url: &str, options: &WaveOptions) -> Result<Url> {
    let mut url = Url::parse(WAVE_ENDPOINT).context("Invalid WAVE endpoint")?;
    {
        let mut query = url.query_pairs_mut();
        if let Some(key) = &options.key {
            query.append_pair("key", key);
        }
        query.append_pair("url", page_url);
        query.append_pair("reporttype", &options.report_type.to_string());
    }
    Ok(url)
}

/// Run a WAVE scan of `page_url`.
///
/// Network and parse failures do not propagate; they produce a report
/// marked `prevented` with the error message, matching the best-effort
/// contract of the other scanners.
pub async fn scan(page_url: &str, options: &WaveOptions) -> Result<WaveReport> {
    anyhow::ensure!(
        (1..=4).contains(&options.report_type),
        "WAVE report type must be 1-4, got {}",
        options.report_type
    );
    if options.key.is_none() {
        warn!("No WAVE API key provided; the service will likely reject the request");
    }

    let url = request_url(page_url, options)?;
    debug!("Requesting WAVE scan: {}", url.path());

    let mut report = WaveReport {
        url: page_url.to_string(),
        report_type: options.report_type,
        prevented: false,
        error: None,
        categories: Value::Null,
        statistics: WaveStatistics::default(),
    };

    let body = match fetch(url).await {
        Ok(body) => body,
        Err(e) => {
            report.prevented = true;
            report.error = Some(e.to_string());
            return Ok(report);
        }
    };

    match serde_json::from_str::<Value>(&body) {
        Ok(mut result) => {
            if let Some(categories) = result.get_mut("categories") {
                prune_categories(categories);
                if !options.rules.is_empty() {
                    filter_rules(categories, &options.rules);
                }
                report.categories = categories.take();
            }
            report.statistics = extract_statistics(&result);
        }
        Err(e) => {
            warn!("WAVE response was not JSON: {}", e);
            report.prevented = true;
            report.error = Some(format!("Malformed WAVE response: {}", e));
        }
    }
    Ok(report)
}

async fn fetch(url: Url) -> Result<String> {
    let response = reqwest::Client::new()
        .get(url)
        .timeout(std::time::Duration::from_secs(60))
        .send()
        .await
        .context("WAVE request failed")?;
    let status = response.status();
    anyhow::ensure!(status.is_success(), "WAVE returned HTTP {}", status);
    response.text().await.context("WAVE response unreadable")
}

/// Drop the non-violation categories from a WAVE `categories` object.
pub fn prune_categories(categories: &mut Value) {
    if let Some(map) = categories.as_object_mut() {
        for name in PRUNED_CATEGORIES {
            map.remove(name);
        }
    }
}

/// Keep only whitelisted rule items, decrementing category violation
/// counts by the counts of the removed rules.
pub fn filter_rules(categories: &mut Value, rules: &[String]) {
    for category_name in VIOLATION_CATEGORIES {
        let Some(category) = categories.get_mut(category_name) else {
            continue;
        };
        let removed: i64 = {
            let Some(items) = category.get_mut("items").and_then(|i| i.as_object_mut()) else {
                continue;
            };
            let doomed: Vec<String> = items
                .keys()
                .filter(|rule_id| !rules.contains(rule_id))
                .cloned()
                .collect();
            let mut removed = 0;
            for rule_id in doomed {
                if let Some(item) = items.remove(&rule_id) {
                    removed += item.get("count").and_then(|c| c.as_i64()).unwrap_or(0);
                }
            }
            removed
        };
        if removed > 0
            && let Some(count) = category.get("count").and_then(|c| c.as_i64())
        {
            category["count"] = Value::from(count - removed);
        }
    }
}

/// Pull the page statistics WAVE attaches to every response.
pub fn extract_statistics(result: &Value) -> WaveStatistics {
    let Some(statistics) = result.get("statistics") else {
        return WaveStatistics::default();
    };
    WaveStatistics {
        page_title: statistics
            .get("pagetitle")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string(),
        page_url: statistics
            .get("pageurl")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string(),
        time: statistics.get("time").and_then(|v| v.as_f64()),
        credits_remaining: statistics.get("creditsremaining").and_then(|v| v.as_i64()),
        all_item_count: statistics.get("allitemcount").and_then(|v| v.as_i64()),
        total_elements: statistics.get("totalelements").and_then(|v| v.as_i64()),
    }
}
