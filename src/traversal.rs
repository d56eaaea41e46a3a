//! Keyboard focus-order discovery.
//!
//! Simulates a sighted keyboard-only user tabbing through a page. Every
//! element that receives focus is marked exactly once with a visited
//! attribute; the traversal decides completion from local signals only
//! (no global knowledge of the page's focus graph).
//!
//! Native tab order is assumed acyclic until it wraps, so revisiting a
//! marked element while pressing Tab means the tab cycle has closed and
//! the traversal is done. Arrow keys are tried opportunistically to walk
//! into composite widgets (roving-tabindex toolbars, menus, grids) that
//! trap focus internally; revisiting a marked element there only exhausts
//! the widget, and the machine falls back toward Tab to escape it.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default value for the visited-marker attribute name.
pub const DEFAULT_MARKER_ATTRIBUTE: &str = "data-a11yprobe-focused";

/// Navigation key pressed between focus observations.
///
/// This is the only cross-step state the traversal carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NavKey {
    Tab,
    ArrowRight,
    ArrowDown,
}

impl NavKey {
    /// WebDriver key code for this key.
    pub fn code(self) -> char {
        match self {
            NavKey::Tab => '\u{e004}',
            NavKey::ArrowRight => '\u{e014}',
            NavKey::ArrowDown => '\u{e015}',
        }
    }

    /// Key to press after a newly focused element was marked.
    ///
    /// Tab hands off to ArrowRight to probe the new element for an
    /// internal arrow-key order; the arrow keys keep going in their own
    /// direction while they still reach fresh elements.
    pub fn on_new_focus(self) -> NavKey {
        match self {
            NavKey::Tab => NavKey::ArrowRight,
            NavKey::ArrowRight => NavKey::ArrowRight,
            NavKey::ArrowDown => NavKey::ArrowDown,
        }
    }

    /// Key to press after refocusing an already-marked element, or `None`
    /// when the revisit terminates the traversal (Tab-cycle closure).
    pub fn on_revisit(self) -> Option<NavKey> {
        match self {
            NavKey::Tab => None,
            NavKey::ArrowRight => Some(NavKey::ArrowDown),
            NavKey::ArrowDown => Some(NavKey::Tab),
        }
    }

    pub fn is_arrow(self) -> bool {
        matches!(self, NavKey::ArrowRight | NavKey::ArrowDown)
    }
}

impl std::fmt::Display for NavKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            NavKey::Tab => "Tab",
            NavKey::ArrowRight => "ArrowRight",
            NavKey::ArrowDown => "ArrowDown",
        };
        write!(f, "{}", name)
    }
}

/// Short description of a focused element, for step-level logging.
///
/// Element handles are never cached across steps; this is a snapshot
/// taken in the same page round trip that classified the element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FocusedElement {
    /// Lowercase tag name
    pub tag: String,
    /// Element id, if any
    #[serde(default)]
    pub id: Option<String>,
    /// Leading text content, truncated
    #[serde(default)]
    pub text: Option<String>,
}

/// Classification of one focus observation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FocusOutcome {
    /// An in-body element is focused and was not marked before; the
    /// visited marker has been applied as a side effect of observing it.
    NewFocus(FocusedElement),
    /// The focused element already carries the visited marker.
    AlreadyMarked,
    /// Nothing is focused, or focus sits on the document body itself.
    NoFocus,
}

/// Page capabilities the traversal needs.
///
/// The observation must be atomic: checking for the marker and writing it
/// happen in one page round trip, so observing the same focus state twice
/// can never classify as `NewFocus` both times.
pub trait FocusDriver {
    /// Press one key against the page's current focus target.
    fn press(&mut self, key: NavKey) -> impl Future<Output = Result<()>>;

    /// Classify the currently focused element, marking it if new.
    fn observe(&mut self) -> impl Future<Output = Result<FocusOutcome>>;
}

/// Why a traversal stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// Tab refocused an already-marked element: the tab cycle closed.
    TabCycleClosed,
    /// Focus was lost or returned to the document body.
    FocusLost,
    /// The configured step limit was reached before a natural stop.
    StepLimit,
}

/// Step accounting for one traversal run.
///
/// The marked set itself lives on the page; callers query it separately
/// after the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraversalSummary {
    /// Focus observations performed
    pub steps: u64,
    /// Elements newly marked
    pub marked: u64,
    /// Key presses issued, including the initial Tab
    pub presses: u64,
    pub stop: StopReason,
}

/// Walks the page's focus graph to completion.
///
/// Presses Tab once, then repeats: observe the focus classification,
/// pick the next key from the transition table, press it. Strictly
/// sequential; every driver failure aborts the run and propagates.
///
/// `max_steps` bounds the number of observations; `None` reproduces the
/// unbounded behavior and relies on the termination heuristics alone.
pub async fn run<D: FocusDriver>(driver: &mut D, max_steps: Option<u64>) -> Result<TraversalSummary> {
    driver.press(NavKey::Tab).await?;
    let mut key = NavKey::Tab;
    let mut steps = 0u64;
    let mut marked = 0u64;
    let mut presses = 1u64;

    loop {
        if let Some(limit) = max_steps
            && steps >= limit
        {
            debug!("step limit {} reached", limit);
            return Ok(TraversalSummary {
                steps,
                marked,
                presses,
                stop: StopReason::StepLimit,
            });
        }
        steps += 1;

        match driver.observe().await? {
            FocusOutcome::NewFocus(element) => {
                marked += 1;
                debug!(
                    "step {}: marked <{}>{} via {}",
                    steps,
                    element.tag,
                    element
                        .id
                        .as_deref()
                        .map(|id| format!("#{id}"))
                        .unwrap_or_default(),
                    key
                );
                key = key.on_new_focus();
                driver.press(key).await?;
                presses += 1;
            }
            FocusOutcome::AlreadyMarked => match key.on_revisit() {
                Some(next) => {
                    debug!("step {}: revisit under {}, falling back to {}", steps, key, next);
                    key = next;
                    driver.press(key).await?;
                    presses += 1;
                }
                None => {
                    debug!("step {}: revisit under Tab, cycle closed", steps);
                    return Ok(TraversalSummary {
                        steps,
                        marked,
                        presses,
                        stop: StopReason::TabCycleClosed,
                    });
                }
            },
            FocusOutcome::NoFocus => {
                debug!("step {}: focus lost", steps);
                return Ok(TraversalSummary {
                    steps,
                    marked,
                    presses,
                    stop: StopReason::FocusLost,
                });
            }
        }
    }
}

#[cfg(test)]
#[path = "traversal_test.rs"]
mod traversal_test;
