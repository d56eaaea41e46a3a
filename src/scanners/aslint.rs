//! Injected-bundle runner for the ASLint ruleset.
//!
//! Injects the ASLint bundle plus a runner script into the page, waits
//! for the runner to publish its JSON result into a `#aslintResult`
//! node, and prunes rules that passed or were skipped.

use anyhow::{Context, Result};
use serde_json::Value;
use std::path::Path;
use tracing::{debug, warn};

use crate::types::AslintReport;
use crate::webdriver::Browser;

/// Element the runner script fills with the JSON result
const RESULT_SELECTOR: &str = "#aslintResult";

pub struct AslintOptions {
    /// CSP nonce to attach to the injected script elements
    pub nonce: Option<String>,
    /// How long to wait for the in-page result
    pub timeout: std::time::Duration,
}

/// Run ASLint inside an already-loaded page.
///
/// Injection failures and result timeouts mark the report `prevented`
/// instead of propagating; the scan is best-effort by contract.
pub async fn scan(
    browser: &Browser,
    url: &str,
    bundle_path: &Path,
    runner_path: &Path,
    options: &AslintOptions,
) -> Result<AslintReport> {
    let bundle = tokio::fs::read_to_string(bundle_path)
        .await
        .with_context(|| format!("Failed to read ASLint bundle {}", bundle_path.display()))?;
    let runner = tokio::fs::read_to_string(runner_path)
        .await
        .with_context(|| format!("Failed to read ASLint runner {}", runner_path.display()))?;

    let mut report = AslintReport {
        url: url.to_string(),
        prevented: false,
        error: None,
        rules: Value::Null,
    };

    if let Err(e) = browser
        .inject_scripts(&bundle, &runner, options.nonce.as_deref())
        .await
    {
        warn!("ASLint injection failed ({})", e);
        report.prevented = true;
        report.error = Some(format!("ASLint injection failed: {}", e));
        return Ok(report);
    }

    let raw = match browser.wait_for_text(RESULT_SELECTOR, options.timeout).await {
        Ok(raw) => raw,
        Err(e) => {
            warn!("ASLint produced no result ({})", e);
            report.prevented = true;
            report.error = Some(format!("ASLint produced no result: {}", e));
            return Ok(report);
        }
    };

    match serde_json::from_str::<Value>(&raw) {
        Ok(mut result) => {
            if let Some(rules) = result.get_mut("rules") {
                let dropped = prune_rules(rules);
                debug!("Dropped {} passed/skipped ASLint rules", dropped);
            }
            report.rules = result.get("rules").cloned().unwrap_or(Value::Null);
        }
        Err(e) => {
            report.prevented = true;
            report.error = Some(format!("ASLint result was not JSON: {}", e));
        }
    }
    Ok(report)
}

/// Remove rules whose status is `passed` or `skipped`; returns how many
/// were dropped.
pub fn prune_rules(rules: &mut Value) -> usize {
    let Some(map) = rules.as_object_mut() else {
        return 0;
    };
    let doomed: Vec<String> = map
        .iter()
        .filter(|(_, rule)| {
            matches!(
                rule.get("status")
                    .and_then(|s| s.get("type"))
                    .and_then(|t| t.as_str()),
                Some("passed") | Some("skipped")
            )
        })
        .map(|(id, _)| id.clone())
        .collect();
    for id in &doomed {
        map.remove(id);
    }
    doomed.len()
}
