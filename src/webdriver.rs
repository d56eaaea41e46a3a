use anyhow::{Context, Result};
use fantoccini::{Client, ClientBuilder};
use serde_json::json;
use tracing::{debug, info};

use crate::traversal::{FocusDriver, FocusOutcome, FocusedElement, NavKey};
use crate::types::ViewportSize;
use crate::webdriver_manager::GLOBAL_WEBDRIVER_MANAGER;

/// Attribute used to address hover triggers once they have been stamped
const HOVER_INDEX_ATTRIBUTE: &str = "data-a11yprobe-hover";

/// Browser instance for WebDriver automation
pub struct Browser {
    pub(crate) client: Client,
    browser_type: BrowserType,
}

/// Supported browser types
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum BrowserType {
    /// Mozilla Firefox
    Firefox,
    /// Google Chrome/Chromium
    Chrome,
}

impl std::str::FromStr for BrowserType {
    type Err = anyhow::Error;

    /// Parse browser type from string (case-insensitive)
    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "firefox" => Ok(BrowserType::Firefox),
            "chrome" | "chromium" => Ok(BrowserType::Chrome),
            _ => anyhow::bail!("Unsupported browser: {}", s),
        }
    }
}

impl BrowserType {
    /// Standard WebDriver port for this browser type
    pub fn default_port(&self) -> u16 {
        match self {
            BrowserType::Firefox => 4444,
            BrowserType::Chrome => 9515,
        }
    }

    pub fn driver_command(&self) -> &'static str {
        match self {
            BrowserType::Firefox => "geckodriver",
            BrowserType::Chrome => "chromedriver",
        }
    }
}

impl std::fmt::Display for BrowserType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BrowserType::Firefox => write!(f, "firefox"),
            BrowserType::Chrome => write!(f, "chrome"),
        }
    }
}

impl Browser {
    /// Create a new browser instance
    ///
    /// # Arguments
    /// * `browser_type` - Firefox or Chrome
    /// * `viewport` - Optional viewport dimensions
    /// * `headless` - Whether to run in headless mode
    pub async fn new(
        browser_type: BrowserType,
        viewport: Option<ViewportSize>,
        headless: bool,
    ) -> Result<Self> {
        info!("Connecting to {:?} WebDriver", browser_type);

        // Ensure a WebDriver is running (will auto-start if needed)
        let webdriver_url = GLOBAL_WEBDRIVER_MANAGER
            .ensure_driver(&browser_type)
            .await?;

        let mut caps = serde_json::Map::new();
        match &browser_type {
            BrowserType::Firefox => {
                let mut args = Vec::new();
                if headless {
                    args.push("--headless".to_string());
                }
                if let Some(vp) = &viewport {
                    args.push(format!("--width={}", vp.width));
                    args.push(format!("--height={}", vp.height));
                }
                caps.insert(
                    "moz:firefoxOptions".to_string(),
                    json!({ "args": args }),
                );
            }
            BrowserType::Chrome => {
                let mut args = vec!["--no-sandbox".to_string()];
                if headless {
                    args.push("--headless=new".to_string());
                    args.push("--disable-gpu".to_string());
                    args.push("--disable-dev-shm-usage".to_string());
                }
                if let Some(vp) = &viewport {
                    args.push(format!("--window-size={},{}", vp.width, vp.height));
                }
                caps.insert(
                    "goog:chromeOptions".to_string(),
                    json!({ "args": args }),
                );
            }
        }

        debug!("Connecting to WebDriver at {}", webdriver_url);
        let client = ClientBuilder::rustls()
            .capabilities(caps)
            .connect(&webdriver_url)
            .await
            .context("Failed to connect to WebDriver")?;

        // Set viewport size after connection if specified (best-effort)
        if let Some(vp) = viewport {
            debug!("Setting viewport to {}x{}", vp.width, vp.height);
            if let Err(e) = client.set_window_size(vp.width, vp.height).await {
                debug!("Note: Could not set window size: {}", e);
            }
        }

        Ok(Browser {
            client,
            browser_type,
        })
    }

    pub fn browser_type(&self) -> BrowserType {
        self.browser_type
    }

    pub async fn goto(&self, url: &str) -> Result<()> {
        info!("Navigating to {}", url);
        self.client.goto(url).await?;

        // Wait for the page to be ready before probing it
        let wait_script = "return document.readyState === 'complete';";
        for _ in 0..20 {
            // Max 2 seconds
            match self.client.execute(wait_script, vec![]).await {
                Ok(val) if val.as_bool().unwrap_or(false) => break,
                _ => tokio::time::sleep(tokio::time::Duration::from_millis(100)).await,
            }
        }
        Ok(())
    }

    pub async fn execute(
        &self,
        script: &str,
        args: Vec<serde_json::Value>,
    ) -> Result<serde_json::Value> {
        self.client
            .execute(script, args)
            .await
            .context("Failed to execute script")
    }

    pub async fn close(self) -> Result<()> {
        self.client.close().await?;
        Ok(())
    }

    /// Begin a focus-order session against this page.
    pub fn focus_session(&self, marker_attribute: &str) -> PageFocus<'_> {
        PageFocus {
            browser: self,
            marker_attribute: marker_attribute.to_string(),
        }
    }

    /// Press one navigation key against the page's active focus target.
    pub async fn press_nav_key(&self, key: NavKey) -> Result<()> {
        let target = self
            .client
            .active_element()
            .await
            .context("Failed to resolve the active element for a key press")?;
        target
            .send_keys(&key.code().to_string())
            .await
            .with_context(|| format!("Failed to press {}", key))?;
        Ok(())
    }

    /// Classify the currently focused element and, when it is new, apply
    /// the visited marker in the same page round trip. A single script
    /// evaluation keeps the check and the set atomic.
    pub async fn observe_and_mark(&self, marker_attribute: &str) -> Result<FocusOutcome> {
        let script = r#"
            const attr = arguments[0];
            const focus = document.activeElement;
            if (!focus || focus === document.body) {
                return { status: 'none' };
            }
            if (focus.hasAttribute(attr)) {
                return { status: 'already' };
            }
            focus.setAttribute(attr, '1');
            return {
                status: 'new',
                element: {
                    tag: focus.tagName.toLowerCase(),
                    id: focus.id || null,
                    text: (focus.textContent || '').trim().slice(0, 80) || null
                }
            };
        "#;
        let value = self
            .execute(script, vec![json!(marker_attribute)])
            .await
            .context("Focus observation failed")?;

        match value.get("status").and_then(|s| s.as_str()) {
            Some("new") => {
                let element: FocusedElement =
                    serde_json::from_value(value["element"].clone())
                        .context("Malformed focus descriptor")?;
                Ok(FocusOutcome::NewFocus(element))
            }
            Some("already") => Ok(FocusOutcome::AlreadyMarked),
            Some("none") => Ok(FocusOutcome::NoFocus),
            other => anyhow::bail!("Unexpected focus observation status: {:?}", other),
        }
    }

    /// Enumerate all elements carrying the visited marker, in DOM order.
    pub async fn marked_elements(&self, marker_attribute: &str) -> Result<Vec<FocusedElement>> {
        let script = r#"
            const attr = arguments[0];
            return Array.from(document.querySelectorAll('[' + attr + ']')).map(el => ({
                tag: el.tagName.toLowerCase(),
                id: el.id || null,
                text: (el.textContent || '').trim().slice(0, 80) || null
            }));
        "#;
        let value = self.execute(script, vec![json!(marker_attribute)]).await?;
        serde_json::from_value(value).context("Malformed marked-element list")
    }

    /// Count elements in the body that currently have a layout box.
    pub async fn count_visible_elements(&self) -> Result<i64> {
        let script = r#"
            return Array.from(document.querySelectorAll('body *'))
                .filter(el => el.getClientRects().length > 0)
                .length;
        "#;
        let value = self.execute(script, vec![]).await?;
        value
            .as_i64()
            .context("Visible-element count was not a number")
    }

    /// Stamp hover triggers with an index attribute so later hovers can
    /// address them without caching element handles. Triggers are the
    /// elements with hover-reactive attributes plus a sample of visible
    /// body elements, capped at `cap`. Returns the stamped count.
    pub async fn stamp_hover_triggers(&self, cap: usize) -> Result<usize> {
        let script = r#"
            const attr = arguments[0];
            const cap = arguments[1];
            const triggers = Array.from(document.querySelectorAll(
                'body [aria-controls], body [aria-expanded], body [onmouseenter], body [onmouseover]'
            ));
            const visible = Array.from(document.querySelectorAll('body *'))
                .filter(el => el.getClientRects().length > 0);
            for (const el of visible) {
                if (triggers.length >= cap) break;
                if (!triggers.includes(el)) triggers.push(el);
            }
            const stamped = triggers.slice(0, cap);
            stamped.forEach((el, i) => el.setAttribute(attr, String(i)));
            return stamped.length;
        "#;
        let value = self
            .execute(script, vec![json!(HOVER_INDEX_ATTRIBUTE), json!(cap)])
            .await?;
        let count = value.as_u64().context("Trigger count was not a number")?;
        Ok(count as usize)
    }

    /// Dispatch synthetic hover events at the stamped trigger `index`.
    /// Returns a descriptor of the trigger, or `None` if it detached.
    pub async fn hover_trigger(&self, index: usize) -> Result<Option<FocusedElement>> {
        let script = r#"
            const attr = arguments[0];
            const index = String(arguments[1]);
            const el = document.querySelector('[' + attr + '="' + index + '"]');
            if (!el) {
                return null;
            }
            for (const type of ['mouseover', 'mouseenter', 'mousemove']) {
                el.dispatchEvent(new MouseEvent(type, { bubbles: true, cancelable: true }));
            }
            return {
                tag: el.tagName.toLowerCase(),
                id: el.id || null,
                text: (el.textContent || '').trim().slice(0, 80) || null
            };
        "#;
        let value = self
            .execute(script, vec![json!(HOVER_INDEX_ATTRIBUTE), json!(index)])
            .await?;
        if value.is_null() {
            return Ok(None);
        }
        let element = serde_json::from_value(value).context("Malformed trigger descriptor")?;
        Ok(Some(element))
    }

    /// Inject a script bundle and its runner into the page as inline
    /// `<script>` elements, with an optional CSP nonce on both.
    pub async fn inject_scripts(
        &self,
        bundle: &str,
        runner: &str,
        nonce: Option<&str>,
    ) -> Result<()> {
        let script = r#"
            const bundle = arguments[0];
            const runner = arguments[1];
            const nonce = arguments[2];
            const bundleEl = document.createElement('script');
            bundleEl.id = 'aslintBundle';
            if (nonce) {
                bundleEl.nonce = nonce;
            }
            bundleEl.textContent = bundle;
            document.head.insertAdjacentElement('beforeend', bundleEl);
            const runnerEl = document.createElement('script');
            if (nonce) {
                runnerEl.nonce = nonce;
            }
            runnerEl.textContent = runner;
            document.body.insertAdjacentElement('beforeend', runnerEl);
            return true;
        "#;
        self.execute(
            script,
            vec![json!(bundle), json!(runner), json!(nonce)],
        )
        .await
        .context("Script injection failed")?;
        Ok(())
    }

    /// Poll for the text content of `selector` until it appears or the
    /// timeout elapses.
    pub async fn wait_for_text(
        &self,
        selector: &str,
        timeout: std::time::Duration,
    ) -> Result<String> {
        let script = r#"
            const el = document.querySelector(arguments[0]);
            return el ? el.textContent : null;
        "#;
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            let value = self.execute(script, vec![json!(selector)]).await?;
            if let Some(text) = value.as_str() {
                return Ok(text.to_string());
            }
            if tokio::time::Instant::now() >= deadline {
                anyhow::bail!("Timed out waiting for {}", selector);
            }
            tokio::time::sleep(std::time::Duration::from_millis(250)).await;
        }
    }
}

/// One focus-order session against a live page.
///
/// Holds the marker attribute for the session so the traversal core stays
/// free of page details.
pub struct PageFocus<'a> {
    browser: &'a Browser,
    marker_attribute: String,
}

impl FocusDriver for PageFocus<'_> {
    async fn press(&mut self, key: NavKey) -> Result<()> {
        self.browser.press_nav_key(key).await
    }

    async fn observe(&mut self) -> Result<FocusOutcome> {
        self.browser.observe_and_mark(&self.marker_attribute).await
    }
}
