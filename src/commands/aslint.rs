use anyhow::Result;
use std::path::PathBuf;
use tracing::info;

use crate::commands::utils;
use crate::scanners::aslint::{self, AslintOptions};
use crate::scanners::ScanError;
use crate::types::OutputFormat;

#[allow(clippy::too_many_arguments)]
pub async fn handle_aslint(
    url: String,
    bundle: PathBuf,
    runner: PathBuf,
    nonce: Option<String>,
    timeout_secs: u64,
    browser: String,
    viewport: Option<String>,
    no_headless: bool,
    format: OutputFormat,
) -> Result<()> {
    utils::validate_url(&url)?;
    info!("Running ASLint against {}", url);

    let browser = utils::build_browser(&browser, viewport, no_headless).await?;
    browser.goto(&url).await?;
    let options = AslintOptions {
        nonce,
        timeout: std::time::Duration::from_secs(timeout_secs),
    };
    let report = aslint::scan(&browser, &url, &bundle, &runner, &options).await?;
    browser.close().await?;

    if report.prevented {
        let reason = report.error.clone().unwrap_or_else(|| "unknown".to_string());
        return Err(ScanError::Prevented(reason).into());
    }

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Simple => {
            let rule_count = report
                .rules
                .as_object()
                .map(|rules| rules.len())
                .unwrap_or(0);
            println!("ASLint reported {} violated rules on {}", rule_count, report.url);
            if let Some(rules) = report.rules.as_object() {
                for rule_id in rules.keys() {
                    println!("  {}", rule_id);
                }
            }
        }
    }
    Ok(())
}
