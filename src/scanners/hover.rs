//! Hover-impact scanner.
//!
//! Hovers over trigger elements (everything with aria-controls,
//! aria-expanded, onmouseenter, or onmouseover, padded with a sample of
//! visible body elements) and reports triggers whose hovering adds or
//! removes visible elements.

use anyhow::Result;
use tracing::{debug, warn};

use crate::types::{HoverImpact, HoverReport};
use crate::webdriver::Browser;

/// Delay between dispatching hover events and re-counting, giving the
/// page's hover handlers time to mutate the DOM.
const SETTLE_MS: u64 = 500;

/// Run the hover-impact scan against an already-loaded page.
///
/// `cap` bounds the number of triggers; individual trigger failures are
/// logged and skipped rather than aborting the scan.
pub async fn scan(
    browser: &Browser,
    url: &str,
    with_items: bool,
    cap: usize,
) -> Result<HoverReport> {
    let triggers = browser.stamp_hover_triggers(cap).await?;
    debug!("Hovering over {} triggers", triggers);

    let mut skipped = 0usize;
    let mut impacts: Vec<HoverImpact> = Vec::new();

    for index in 0..triggers {
        let before = browser.count_visible_elements().await?;
        let trigger = match browser.hover_trigger(index).await {
            Ok(Some(trigger)) => trigger,
            Ok(None) => {
                debug!("Trigger {} detached before hovering", index);
                skipped += 1;
                continue;
            }
            Err(e) => {
                warn!("Hovering over trigger {} failed ({})", index, e);
                skipped += 1;
                continue;
            }
        };
        tokio::time::sleep(std::time::Duration::from_millis(SETTLE_MS)).await;
        let after = browser.count_visible_elements().await?;

        let delta = after - before;
        if delta != 0 {
            debug!(
                "Hovering over <{}> {} {} elements",
                trigger.tag,
                if delta > 0 { "added" } else { "removed" },
                delta.abs()
            );
            impacts.push(HoverImpact { trigger, delta });
        }
    }

    Ok(HoverReport {
        url: url.to_string(),
        triggers,
        skipped,
        impact_count: impacts.len(),
        impacts: with_items.then_some(impacts),
    })
}
