use anyhow::Result;
use std::str::FromStr;

use crate::types::ViewportSize;
use crate::webdriver::{Browser, BrowserType};

/// Build a connected browser from the shared CLI flags.
pub async fn build_browser(
    browser: &str,
    viewport: Option<String>,
    no_headless: bool,
) -> Result<Browser> {
    let browser_type = BrowserType::from_str(browser)?;
    let viewport = viewport.map(|v| ViewportSize::parse(&v)).transpose()?;
    Browser::new(browser_type, viewport, !no_headless).await
}

/// Validate a target URL before driving a browser at it.
pub fn validate_url(url: &str) -> Result<()> {
    let parsed = url::Url::parse(url)
        .map_err(|_| anyhow::anyhow!("Invalid URL: {}", url))?;
    match parsed.scheme() {
        "http" | "https" | "file" => Ok(()),
        scheme => anyhow::bail!("Unsupported URL scheme: {}", scheme),
    }
}
