use anyhow::Result;
use tracing::info;

use crate::commands::utils;
use crate::scanners::hover;
use crate::types::OutputFormat;

pub async fn handle_hover(
    url: String,
    browser: String,
    viewport: Option<String>,
    no_headless: bool,
    format: OutputFormat,
    items: bool,
    sample: usize,
) -> Result<()> {
    utils::validate_url(&url)?;
    info!("Scanning hover impacts on {}", url);

    let browser = utils::build_browser(&browser, viewport, no_headless).await?;
    browser.goto(&url).await?;
    let report = hover::scan(&browser, &url, items, sample).await?;
    browser.close().await?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Simple => {
            println!(
                "{} of {} hover triggers changed the visible-element count ({} skipped)",
                report.impact_count, report.triggers, report.skipped
            );
            if let Some(impacts) = &report.impacts {
                for impact in impacts {
                    let verb = if impact.delta > 0 { "added" } else { "removed" };
                    println!(
                        "  <{}> {} {} elements",
                        impact.trigger.tag,
                        verb,
                        impact.delta.abs()
                    );
                }
            }
        }
    }
    Ok(())
}
