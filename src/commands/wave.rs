use anyhow::Result;
use tracing::info;

use crate::commands::utils;
use crate::scanners::wave::{self, WaveOptions};
use crate::scanners::ScanError;
use crate::types::OutputFormat;

pub async fn handle_wave(
    url: String,
    report_type: u8,
    key: Option<String>,
    rules: Vec<String>,
    format: OutputFormat,
) -> Result<()> {
    utils::validate_url(&url)?;
    info!("Requesting WAVE scan of {} (report type {})", url, report_type);

    // Flag wins over the environment, matching the other env-backed knobs
    let key = key.or_else(|| std::env::var("WAVE_KEY").ok());
    let options = WaveOptions {
        report_type,
        key,
        rules,
    };
    let report = wave::scan(&url, &options).await?;

    if report.prevented {
        let reason = report.error.clone().unwrap_or_else(|| "unknown".to_string());
        return Err(ScanError::Prevented(reason).into());
    }

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Simple => {
            println!("WAVE scan of {}", report.statistics.page_url);
            if let Some(categories) = report.categories.as_object() {
                for (name, category) in categories {
                    let count = category.get("count").and_then(|c| c.as_i64()).unwrap_or(0);
                    println!("  {}: {}", name, count);
                }
            }
            if let Some(credits) = report.statistics.credits_remaining {
                println!("  credits remaining: {}", credits);
            }
        }
    }
    Ok(())
}
