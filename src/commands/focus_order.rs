use anyhow::Result;
use tracing::info;

use crate::commands::utils;
use crate::traversal;
use crate::types::{FocusOrderReport, OutputFormat};

#[allow(clippy::too_many_arguments)]
pub async fn handle_focus_order(
    url: String,
    browser: String,
    viewport: Option<String>,
    no_headless: bool,
    format: OutputFormat,
    max_steps: u64,
    marker_attribute: String,
) -> Result<()> {
    utils::validate_url(&url)?;
    info!("Discovering focus order on {}", url);

    let browser = utils::build_browser(&browser, viewport, no_headless).await?;
    let browser_name = browser.browser_type().to_string();
    browser.goto(&url).await?;

    // 0 lifts the step bound entirely
    let limit = (max_steps > 0).then_some(max_steps);
    let summary = {
        let mut session = browser.focus_session(&marker_attribute);
        traversal::run(&mut session, limit).await?
    };

    // The traversal only marks; the marked set is queried separately
    let marked_elements = browser.marked_elements(&marker_attribute).await?;
    browser.close().await?;

    let report = FocusOrderReport {
        url,
        browser: browser_name,
        marker_attribute,
        traversal: summary,
        marked_elements,
        finished_at: chrono::Utc::now(),
    };

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Simple => {
            println!(
                "Marked {} focusable elements in {} steps ({:?})",
                report.traversal.marked, report.traversal.steps, report.traversal.stop
            );
            for (i, element) in report.marked_elements.iter().enumerate() {
                let id = element
                    .id
                    .as_deref()
                    .map(|id| format!("#{id}"))
                    .unwrap_or_default();
                match &element.text {
                    Some(text) => println!("  [{}] <{}>{}: {}", i, element.tag, id, text),
                    None => println!("  [{}] <{}>{}", i, element.tag, id),
                }
            }
        }
    }
    Ok(())
}
