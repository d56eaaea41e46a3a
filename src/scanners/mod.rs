//! Scanner integrations: each one is a single request/response or
//! DOM-diff operation against an already-loaded page.

pub mod aslint;
pub mod hover;
pub mod wave;

/// Failure modes shared by the scanner integrations
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    /// The scan ran but could not produce a usable result
    #[error("Scan prevented: {0}")]
    Prevented(String),
    /// The scan gave up waiting for an in-page result
    #[error("Scan timed out: {0}")]
    Timeout(String),
}

#[cfg(test)]
#[path = "scanners_test.rs"]
mod scanners_test;
