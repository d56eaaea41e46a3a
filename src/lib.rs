//! # a11yprobe
#![allow(clippy::uninlined_format_args)]
//!
//! Automated accessibility-testing harness that drives browser pages
//! over WebDriver.
//!
//! The core is the keyboard focus-order discovery engine: a traversal
//! that simulates a sighted keyboard-only user tabbing through a page,
//! marks every keyboard-reachable element exactly once, and decides when
//! traversal is complete without global knowledge of the page's focus
//! graph. Around it sit thin scanner integrations (hover-impact
//! counting, the remote WAVE API, an injected ASLint bundle) and a
//! supervision loop for a one-shot watch subprocess.
//!
//! ## CLI Usage
//!
//! ```bash
//! # Discover and mark everything reachable by keyboard focus
//! a11yprobe focus-order "https://example.com"
//!
//! # Bound the traversal on hostile pages (0 = unbounded)
//! a11yprobe focus-order "https://example.com" --max-steps 500
//!
//! # Report hover triggers that add or remove visible elements
//! a11yprobe hover "https://example.com" --items
//!
//! # Remote WAVE scan (reads WAVE_KEY from the environment)
//! a11yprobe wave "https://example.com" --report-type 2
//!
//! # Run an injected ASLint bundle inside the page
//! a11yprobe aslint "https://example.com" --bundle aslint.bundle.js --runner runner.js
//!
//! # Supervise a one-shot watch command, relaunching after clean exits
//! a11yprobe watch -- node call watch false 300
//! ```
//!
//! ## Library Usage
//!
//! The traversal is generic over a [`traversal::FocusDriver`], so it can
//! run against any page transport (or a test double):
//!
//! ```no_run
//! # async fn example() -> anyhow::Result<()> {
//! use a11yprobe::traversal::{self, DEFAULT_MARKER_ATTRIBUTE};
//! use a11yprobe::types::ViewportSize;
//! use a11yprobe::webdriver::{Browser, BrowserType};
//!
//! let browser = Browser::new(BrowserType::Firefox, None, true).await?;
//! browser.goto("https://example.com").await?;
//! let mut session = browser.focus_session(DEFAULT_MARKER_ATTRIBUTE);
//! let summary = traversal::run(&mut session, Some(2000)).await?;
//! let marked = browser.marked_elements(DEFAULT_MARKER_ATTRIBUTE).await?;
//! println!("{} elements reachable by keyboard", marked.len());
//! # Ok(())
//! # }
//! ```

/// Error type with process exit codes
pub mod errors;

/// Scanner integrations (hover impact, WAVE, ASLint)
pub mod scanners;

/// Keyboard focus-order discovery state machine
pub mod traversal;

/// Type definitions for reports and CLI values
pub mod types;

/// Supervision loop for the one-shot watch subprocess
pub mod watch;

/// WebDriver browser control and page operations
pub mod webdriver;

/// Automatic WebDriver process management
pub mod webdriver_manager;

pub use traversal::{
    FocusDriver, FocusOutcome, FocusedElement, NavKey, StopReason, TraversalSummary,
    DEFAULT_MARKER_ATTRIBUTE,
};
pub use types::{FocusOrderReport, HoverReport, OutputFormat, ViewportSize};
pub use webdriver::{Browser, BrowserType};
